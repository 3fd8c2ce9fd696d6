//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::services::analysis_service::AnalysisService;

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub analysis: Arc<AnalysisService>,
}

impl AppState {
    pub fn new(config: EnvironmentConfig, analysis: AnalysisService) -> Self {
        Self {
            config,
            analysis: Arc::new(analysis),
        }
    }
}
