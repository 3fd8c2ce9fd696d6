//! Ingesta de datos de la API de flota
//!
//! Único punto donde se resuelven las variaciones de forma del JSON
//! (`vehicle.id` vs `vehicleId`, alias de campos, ids numéricos en texto).
//! Cada elemento se decodifica por separado: un registro roto se convierte en
//! un `DataQualityWarning` y no tumba el análisis completo.

use serde_json::Value;

use crate::models::data_quality::DataQualityWarning;
use crate::models::{AnalysisSnapshot, EntityId, FuelRecord, RawFuelRecord, Vehicle};
use crate::utils::dates::parse_record_date;

/// Convertir un registro crudo a la forma canónica
pub fn normalize_fuel_record(raw: RawFuelRecord) -> Result<FuelRecord, DataQualityWarning> {
    let id = raw
        .id
        .clone()
        .ok_or_else(|| DataQualityWarning::malformed(None, "Missing record id"))?;
    let malformed = |message: String| DataQualityWarning::malformed(Some(id.clone()), message);

    let vehicle_id = raw
        .vehicle_reference()
        .ok_or_else(|| malformed("Missing vehicle reference".to_string()))?;

    let raw_date = raw
        .date
        .as_deref()
        .ok_or_else(|| malformed("Missing date".to_string()))?;
    let date = parse_record_date(raw_date)
        .ok_or_else(|| malformed(format!("Unparseable date '{}'", raw_date)))?;

    let quantity = required_amount("quantity", raw.quantity).map_err(malformed)?;
    let mileage = required_amount("mileage", raw.mileage).map_err(malformed)?;
    // Sin coste explícito se deriva del precio por litro, si viene
    let cost = match (raw.cost, raw.price_per_liter) {
        (Some(cost), _) => checked_amount("cost", cost).map_err(malformed)?,
        (None, Some(price)) => checked_amount("pricePerLiter", price).map_err(malformed)? * quantity,
        (None, None) => 0.0,
    };

    Ok(FuelRecord {
        id,
        vehicle_id,
        driver_id: raw.driver_id,
        quantity,
        cost,
        mileage,
        date,
        station_name: raw.station_name,
        receipt_path: raw.receipt_path,
    })
}

fn required_amount(field: &str, value: Option<f64>) -> Result<f64, String> {
    match value {
        Some(value) => checked_amount(field, value),
        None => Err(format!("Missing {}", field)),
    }
}

fn checked_amount(field: &str, value: f64) -> Result<f64, String> {
    if !value.is_finite() || value < 0.0 {
        return Err(format!("Invalid {} {}", field, value));
    }
    Ok(value)
}

/// Decodificar el array de `/fuel` elemento por elemento
pub fn decode_fuel_records(values: Vec<Value>) -> (Vec<FuelRecord>, Vec<DataQualityWarning>) {
    let mut records = Vec::with_capacity(values.len());
    let mut warnings = Vec::new();

    for value in values {
        let id_hint = value
            .get("id")
            .and_then(|id| serde_json::from_value::<EntityId>(id.clone()).ok());

        let raw = match serde_json::from_value::<RawFuelRecord>(value) {
            Ok(raw) => raw,
            Err(e) => {
                warnings.push(DataQualityWarning::malformed(id_hint, format!("Invalid record: {}", e)));
                continue;
            }
        };

        match normalize_fuel_record(raw) {
            Ok(record) => records.push(record),
            Err(warning) => {
                log::debug!("⚠️ Registro descartado: {}", warning.message);
                warnings.push(warning);
            }
        }
    }

    (records, warnings)
}

/// Decodificar el array de `/vehicles`; los vehículos sin id se ignoran
pub fn decode_vehicles(values: Vec<Value>) -> Vec<Vehicle> {
    values
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<Vehicle>(value) {
            Ok(vehicle) => Some(vehicle),
            Err(e) => {
                log::warn!("⚠️ Vehículo ignorado: {}", e);
                None
            }
        })
        .collect()
}

/// Construir el snapshot inmutable a partir de las dos respuestas de la API
pub fn build_snapshot(fuel_values: Vec<Value>, vehicle_values: Vec<Value>) -> AnalysisSnapshot {
    let received_records = fuel_values.len();
    let (records, warnings) = decode_fuel_records(fuel_values);
    let vehicles = decode_vehicles(vehicle_values);

    log::info!(
        "📥 Snapshot: {} registros válidos de {}, {} vehículos",
        records.len(),
        received_records,
        vehicles.len()
    );

    AnalysisSnapshot::new(records, vehicles, warnings, received_records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::data_quality::DataQualityKind;
    use serde_json::json;

    #[test]
    fn test_both_vehicle_reference_shapes_normalize_identically() {
        let (records, warnings) = decode_fuel_records(vec![
            json!({ "id": 1, "vehicle": { "id": 3 }, "quantity": 30, "cost": 45.5, "mileage": 1000, "date": "2024-01-05" }),
            json!({ "id": 2, "vehicleId": "3", "quantity": 25, "cost": 40, "mileage": 1200, "date": "2024-01-09" }),
        ]);

        assert!(warnings.is_empty());
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].vehicle_id, EntityId::Number(3));
        assert_eq!(records[1].vehicle_id, EntityId::Number(3));
        assert_eq!(records[0].cost, 45.5);
    }

    #[test]
    fn test_malformed_records_become_warnings() {
        let (records, warnings) = decode_fuel_records(vec![
            json!({ "id": 1, "vehicleId": 3, "quantity": 30, "mileage": 1000 }),
            json!({ "id": 2, "quantity": 30, "mileage": 1000, "date": "2024-01-05" }),
            json!({ "id": 3, "vehicleId": 3, "quantity": "thirty", "mileage": 1000, "date": "2024-01-05" }),
            json!({ "id": 4, "vehicleId": 3, "quantity": 30, "date": "2024-01-05" }),
            json!({ "id": 5, "vehicleId": 3, "quantity": -2, "mileage": 10, "date": "2024-01-05" }),
            json!({ "id": 6, "vehicleId": 3, "quantity": 30, "mileage": 1000, "date": "yesterday" }),
            json!({ "vehicleId": 3, "quantity": 30, "mileage": 1000, "date": "2024-01-05" }),
            json!({ "id": 8, "vehicleId": 3, "quantity": 30, "mileage": 1000, "date": "2024-01-05" }),
        ]);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, EntityId::Number(8));
        assert_eq!(warnings.len(), 7);
        assert!(warnings.iter().all(|w| w.kind == DataQualityKind::MalformedRecord));
        assert_eq!(warnings[0].record_id, Some(EntityId::Number(1)));
        assert_eq!(warnings[0].message, "Missing date");
        assert_eq!(warnings[1].message, "Missing vehicle reference");
        assert_eq!(warnings[2].record_id, Some(EntityId::Number(3)));
        assert_eq!(warnings[3].message, "Missing mileage");
        assert_eq!(warnings[6].record_id, None);
    }

    #[test]
    fn test_missing_cost_defaults_to_zero() {
        let (records, warnings) = decode_fuel_records(vec![
            json!({ "id": 1, "vehicleId": 3, "quantity": 30, "mileage": 1000, "date": "2024-01-05" }),
        ]);
        assert!(warnings.is_empty());
        assert_eq!(records[0].cost, 0.0);
    }

    #[test]
    fn test_cost_derived_from_price_per_liter() {
        let (records, _) = decode_fuel_records(vec![
            json!({ "id": 1, "vehicleId": 3, "quantity": 40, "pricePerLiter": 1.25, "mileage": 1000, "date": "2024-01-05" }),
            json!({ "id": 2, "vehicleId": 3, "quantity": 40, "cost": 52, "pricePerLiter": 1.25, "mileage": 1100, "date": "2024-01-09" }),
        ]);
        assert_eq!(records[0].cost, 50.0);
        assert_eq!(records[1].cost, 52.0);
    }

    #[test]
    fn test_build_snapshot_counts_received_records() {
        let snapshot = build_snapshot(
            vec![
                json!({ "id": 1, "vehicleId": 3, "quantity": 30, "mileage": 1000, "date": "2024-01-05" }),
                json!({ "id": 2 }),
            ],
            vec![json!({ "id": 3, "licensePlate": "CAB-1" }), json!({ "make": "no id" })],
        );

        assert_eq!(snapshot.received_records(), 2);
        assert_eq!(snapshot.records().len(), 1);
        assert_eq!(snapshot.ingestion_warnings().len(), 1);
        assert_eq!(snapshot.vehicles().len(), 1);
        assert!(snapshot.vehicle(&EntityId::Number(3)).is_some());
    }
}
