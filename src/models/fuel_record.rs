//! Modelo de FuelRecord
//!
//! `RawFuelRecord` refleja el JSON tal como llega de la API de flota (todos los
//! campos opcionales, referencia al vehículo anidada o plana). `FuelRecord` es la
//! forma canónica que usa el análisis, producida por `services::ingestion_service`.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::entity_id::EntityId;
use crate::utils::dates::iso_datetime;

/// Referencia anidada `{ "vehicle": { "id": ... } }`
#[derive(Debug, Clone, Deserialize)]
pub struct VehicleRef {
    pub id: Option<EntityId>,
}

/// Registro de combustible tal como lo envía la API
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFuelRecord {
    pub id: Option<EntityId>,
    pub vehicle_id: Option<EntityId>,
    pub vehicle: Option<VehicleRef>,
    pub driver_id: Option<EntityId>,
    #[serde(alias = "fuelQuantity", alias = "fuelAmount")]
    pub quantity: Option<f64>,
    #[serde(alias = "totalCost")]
    pub cost: Option<f64>,
    pub mileage: Option<f64>,
    #[serde(alias = "purchaseDate")]
    pub date: Option<String>,
    pub station_name: Option<String>,
    #[serde(alias = "receiptUrl")]
    pub receipt_path: Option<String>,
    pub price_per_liter: Option<f64>,
}

impl RawFuelRecord {
    /// Referencia al vehículo: primero `vehicle.id`, luego `vehicleId`
    pub fn vehicle_reference(&self) -> Option<EntityId> {
        self.vehicle
            .as_ref()
            .and_then(|vehicle| vehicle.id.clone())
            .or_else(|| self.vehicle_id.clone())
    }
}

/// Registro de combustible canónico
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelRecord {
    pub id: EntityId,
    pub vehicle_id: EntityId,
    pub driver_id: Option<EntityId>,
    pub quantity: f64,
    pub cost: f64,
    pub mileage: f64,
    #[serde(with = "iso_datetime")]
    pub date: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub station_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt_path: Option<String>,
}

/// Filtros de `/fuel/history`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelHistoryFilter {
    pub vehicle_id: Option<EntityId>,
    /// Mes en formato `YYYY-MM`
    pub month: Option<String>,
}

impl FuelHistoryFilter {
    pub fn is_empty(&self) -> bool {
        self.vehicle_id.is_none() && self.month.is_none()
    }

    /// Parámetros de query para la API de flota
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(vehicle_id) = &self.vehicle_id {
            pairs.push(("vehicleId", vehicle_id.to_string()));
        }
        if let Some(month) = &self.month {
            pairs.push(("month", month.clone()));
        }
        pairs
    }
}
