//! Agrupación de registros por vehículo
//!
//! Base de todas las reglas secuenciales: cada grupo contiene los registros de
//! un vehículo ordenados por fecha ascendente. El orden de los grupos es el de
//! la primera aparición del vehículo en la respuesta de la API.

use std::collections::HashMap;

use crate::models::data_quality::DataQualityWarning;
use crate::models::{AnalysisSnapshot, EntityId, FuelRecord, Vehicle};

#[derive(Debug, Clone)]
pub struct VehicleGroup<'a> {
    pub vehicle: &'a Vehicle,
    pub records: Vec<&'a FuelRecord>,
}

#[derive(Debug, Clone, Default)]
pub struct GroupedRecords<'a> {
    pub groups: Vec<VehicleGroup<'a>>,
    /// Registros cuyo vehículo no existe (excluidos del análisis)
    pub orphans: Vec<DataQualityWarning>,
}

impl<'a> GroupedRecords<'a> {
    pub fn group(&self, vehicle_id: &EntityId) -> Option<&VehicleGroup<'a>> {
        self.groups.iter().find(|group| &group.vehicle.id == vehicle_id)
    }

    /// Todos los registros analizables, grupo por grupo
    pub fn records(&self) -> impl Iterator<Item = (&'a Vehicle, &'a FuelRecord)> + '_ {
        self.groups
            .iter()
            .flat_map(|group| group.records.iter().map(move |record| (group.vehicle, *record)))
    }

    pub fn record_count(&self) -> usize {
        self.groups.iter().map(|group| group.records.len()).sum()
    }
}

/// Particionar los registros del snapshot por vehículo
pub fn group_by_vehicle(snapshot: &AnalysisSnapshot) -> GroupedRecords<'_> {
    let mut groups: Vec<VehicleGroup<'_>> = Vec::new();
    let mut positions: HashMap<&EntityId, usize> = HashMap::new();
    let mut orphans = Vec::new();

    for record in snapshot.records() {
        let Some(vehicle) = snapshot.vehicle(&record.vehicle_id) else {
            orphans.push(DataQualityWarning::orphan(record.id.clone(), &record.vehicle_id));
            continue;
        };

        let position = *positions.entry(&record.vehicle_id).or_insert_with(|| {
            groups.push(VehicleGroup { vehicle, records: Vec::new() });
            groups.len() - 1
        });
        groups[position].records.push(record);
    }

    // sort_by es estable: fechas iguales conservan el orden de la API
    for group in &mut groups {
        group.records.sort_by(|a, b| a.date.cmp(&b.date));
    }

    if !orphans.is_empty() {
        log::warn!("⚠️ {} registros sin vehículo registrado", orphans.len());
    }

    GroupedRecords { groups, orphans }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::services::ingestion_service::build_snapshot;
    use serde_json::{json, Value};

    /// Registro de prueba: `(id, vehicleId, quantity, mileage, date)`
    pub(crate) fn record(id: i64, vehicle_id: i64, quantity: f64, mileage: f64, date: &str) -> Value {
        json!({
            "id": id,
            "vehicleId": vehicle_id,
            "quantity": quantity,
            "cost": quantity * 1.5,
            "mileage": mileage,
            "date": date
        })
    }

    pub(crate) fn vehicle(id: i64, plate: &str) -> Value {
        json!({ "id": id, "licensePlate": plate, "make": "Toyota", "model": "Hilux" })
    }

    #[test]
    fn test_groups_are_sorted_chronologically() {
        let snapshot = build_snapshot(
            vec![
                record(1, 10, 30.0, 300.0, "2024-03-01"),
                record(2, 10, 30.0, 100.0, "2024-01-01"),
                record(3, 10, 30.0, 200.0, "2024-02-01"),
            ],
            vec![vehicle(10, "CAB-10")],
        );
        let grouped = group_by_vehicle(&snapshot);

        let ids: Vec<String> = grouped.groups[0].records.iter().map(|r| r.id.to_string()).collect();
        assert_eq!(ids, vec!["2", "3", "1"]);
    }

    #[test]
    fn test_equal_dates_keep_fetch_order() {
        let snapshot = build_snapshot(
            vec![
                record(7, 10, 30.0, 100.0, "2024-01-01"),
                record(5, 10, 30.0, 100.0, "2024-01-01"),
                record(6, 10, 30.0, 100.0, "2024-01-01"),
            ],
            vec![vehicle(10, "CAB-10")],
        );
        let grouped = group_by_vehicle(&snapshot);

        let ids: Vec<String> = grouped.groups[0].records.iter().map(|r| r.id.to_string()).collect();
        assert_eq!(ids, vec!["7", "5", "6"]);
    }

    #[test]
    fn test_orphan_records_are_excluded_and_reported() {
        let snapshot = build_snapshot(
            vec![
                record(1, 20, 30.0, 100.0, "2024-01-01"),
                record(2, 99, 80.0, 100.0, "2024-01-01"),
                record(3, 10, 30.0, 100.0, "2024-01-01"),
            ],
            vec![vehicle(10, "CAB-10"), vehicle(20, "CAB-20")],
        );
        let grouped = group_by_vehicle(&snapshot);

        assert_eq!(grouped.groups.len(), 2);
        // Orden de primera aparición, no el del registro de vehículos
        assert_eq!(grouped.groups[0].vehicle.id, EntityId::Number(20));
        assert_eq!(grouped.groups[1].vehicle.id, EntityId::Number(10));
        assert_eq!(grouped.record_count(), 2);
        assert_eq!(grouped.orphans.len(), 1);
        assert_eq!(grouped.orphans[0].record_id, Some(EntityId::Number(2)));
        assert!(grouped.group(&EntityId::Number(99)).is_none());
    }
}
