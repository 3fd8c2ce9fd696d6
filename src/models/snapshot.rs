//! Snapshot de análisis
//!
//! Valor inmutable con todo lo que necesita un análisis: registros canónicos,
//! vehículos y los avisos producidos durante la ingesta. Se pasa por referencia
//! a las funciones puras de agrupación, detección y reportes.

use std::collections::HashMap;

use super::data_quality::DataQualityWarning;
use super::entity_id::EntityId;
use super::fuel_record::FuelRecord;
use super::vehicle::Vehicle;

#[derive(Debug, Clone)]
pub struct AnalysisSnapshot {
    records: Vec<FuelRecord>,
    vehicles: Vec<Vehicle>,
    vehicle_index: HashMap<EntityId, usize>,
    ingestion_warnings: Vec<DataQualityWarning>,
    received_records: usize,
}

impl AnalysisSnapshot {
    /// `received_records` cuenta también los registros descartados en la ingesta
    pub fn new(
        records: Vec<FuelRecord>,
        vehicles: Vec<Vehicle>,
        ingestion_warnings: Vec<DataQualityWarning>,
        received_records: usize,
    ) -> Self {
        let mut vehicle_index = HashMap::with_capacity(vehicles.len());
        for (position, vehicle) in vehicles.iter().enumerate() {
            // Ids duplicados: gana el primero
            vehicle_index.entry(vehicle.id.clone()).or_insert(position);
        }

        Self {
            records,
            vehicles,
            vehicle_index,
            ingestion_warnings,
            received_records,
        }
    }

    pub fn records(&self) -> &[FuelRecord] {
        &self.records
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn vehicle(&self, id: &EntityId) -> Option<&Vehicle> {
        self.vehicle_index.get(id).map(|&position| &self.vehicles[position])
    }

    pub fn ingestion_warnings(&self) -> &[DataQualityWarning] {
        &self.ingestion_warnings
    }

    pub fn received_records(&self) -> usize {
        self.received_records
    }
}
