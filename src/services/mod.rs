//! Services module
//!
//! Lógica de negocio: ingesta y normalización de datos de la API de flota,
//! agrupación por vehículo, detección y ranking de alertas, reportes y
//! coordinación de análisis.

pub mod ingestion_service;
pub mod grouping_service;
pub mod misuse_detector;
pub mod alert_ranker;
pub mod report_service;
pub mod analysis_service;

pub use analysis_service::{AnalysisService, FleetDataSource};
pub use misuse_detector::{DetectionThresholds, MisuseDetector};
