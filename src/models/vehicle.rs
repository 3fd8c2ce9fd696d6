//! Modelo de Vehicle
//!
//! Datos de referencia del registro de vehículos. El análisis solo los lee,
//! resolviéndolos por `id`.

use serde::{Deserialize, Serialize};

use super::entity_id::EntityId;

/// Vehicle tal como lo expone `GET /vehicles`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: EntityId,
    pub make: Option<String>,
    pub model: Option<String>,
    pub license_plate: Option<String>,
    pub category: Option<String>,
    pub fuel_type: Option<String>,
    pub status: Option<String>,
    pub current_odometer: Option<f64>,
    pub year: Option<i32>,
}

impl Vehicle {
    /// Matrícula para mostrar; si falta se usa `Vehicle {id}`
    pub fn display_plate(&self) -> String {
        match &self.license_plate {
            Some(plate) if !plate.trim().is_empty() => plate.clone(),
            _ => format!("Vehicle {}", self.id),
        }
    }
}

/// Vehículo resumido para las respuestas de reportes
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleSummary {
    pub id: EntityId,
    pub license_plate: String,
    pub make: Option<String>,
    pub model: Option<String>,
    pub fuel_type: Option<String>,
}

impl From<&Vehicle> for VehicleSummary {
    fn from(vehicle: &Vehicle) -> Self {
        Self {
            id: vehicle.id.clone(),
            license_plate: vehicle.display_plate(),
            make: vehicle.make.clone(),
            model: vehicle.model.clone(),
            fuel_type: vehicle.fuel_type.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_plate_fallback() {
        let vehicle: Vehicle = serde_json::from_value(json!({ "id": 5, "make": "Toyota" })).unwrap();
        assert_eq!(vehicle.display_plate(), "Vehicle 5");

        let vehicle: Vehicle =
            serde_json::from_value(json!({ "id": "5", "licensePlate": "CAB-4512" })).unwrap();
        assert_eq!(vehicle.display_plate(), "CAB-4512");
        assert_eq!(vehicle.id, EntityId::Number(5));
    }
}
