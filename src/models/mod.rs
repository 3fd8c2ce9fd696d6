//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos de la API de flota (registros de
//! combustible, vehículos) y los modelos derivados del análisis.

pub mod entity_id;
pub mod fuel_record;
pub mod vehicle;
pub mod alert;
pub mod data_quality;
pub mod snapshot;
pub mod analytics;

pub use entity_id::EntityId;
pub use fuel_record::{FuelHistoryFilter, FuelRecord, RawFuelRecord};
pub use snapshot::AnalysisSnapshot;
pub use vehicle::Vehicle;
