//! Avisos de calidad de datos
//!
//! Los registros mal formados o huérfanos no generan alertas, pero tampoco
//! desaparecen en silencio: se cuentan y se devuelven junto al análisis.

use serde::Serialize;

use super::entity_id::EntityId;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataQualityKind {
    /// Falta `date`, `quantity`, `mileage`, `id` o la referencia al vehículo
    MalformedRecord,
    /// El vehículo referenciado no existe en el registro de vehículos
    OrphanRecord,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DataQualityWarning {
    pub record_id: Option<EntityId>,
    pub kind: DataQualityKind,
    pub message: String,
}

impl DataQualityWarning {
    pub fn malformed(record_id: Option<EntityId>, message: impl Into<String>) -> Self {
        Self {
            record_id,
            kind: DataQualityKind::MalformedRecord,
            message: message.into(),
        }
    }

    pub fn orphan(record_id: EntityId, vehicle_id: &EntityId) -> Self {
        Self {
            record_id: Some(record_id),
            kind: DataQualityKind::OrphanRecord,
            message: format!("Vehicle {} is not registered", vehicle_id),
        }
    }
}

/// Resumen de calidad de datos de un análisis
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DataQualitySummary {
    pub total_records: usize,
    pub analyzed_records: usize,
    pub malformed_records: usize,
    pub orphan_records: usize,
    pub warnings: Vec<DataQualityWarning>,
}

impl DataQualitySummary {
    pub fn new(total_records: usize, analyzed_records: usize, warnings: Vec<DataQualityWarning>) -> Self {
        let malformed_records = warnings
            .iter()
            .filter(|w| w.kind == DataQualityKind::MalformedRecord)
            .count();
        let orphan_records = warnings
            .iter()
            .filter(|w| w.kind == DataQualityKind::OrphanRecord)
            .count();

        Self {
            total_records,
            analyzed_records,
            malformed_records,
            orphan_records,
            warnings,
        }
    }
}
