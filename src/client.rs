//! Cliente HTTP de la API de flota
//!
//! Solo lectura: registros de combustible (`/fuel`, `/fuel/history`) y
//! registro de vehículos (`/vehicles`). Cualquier error de red, status no 2xx
//! o cuerpo que no sea un array JSON aborta el snapshot completo. Sin
//! reintentos automáticos.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::models::{AnalysisSnapshot, FuelHistoryFilter};
use crate::services::analysis_service::FleetDataSource;
use crate::services::ingestion_service::build_snapshot;
use crate::utils::errors::{AppError, AppResult};

/// Cliente de la API de flota
#[derive(Clone)]
pub struct FleetApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl FleetApiClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET {path}` esperando un array JSON
    async fn get_array(&self, path: &str, query: &[(&'static str, String)]) -> AppResult<Vec<Value>> {
        let url = format!("{}{}", self.base_url, path);

        let mut request = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .query(query);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            log::error!("❌ Error de red llamando a {}: {}", url, e);
            AppError::ExternalApi(format!("Request to {} failed: {}", path, e))
        })?;

        let status = response.status();
        if !status.is_success() {
            log::error!("❌ {} respondió {}", url, status);
            return Err(AppError::Upstream {
                endpoint: path.to_string(),
                status: status.as_u16(),
            });
        }

        match response.json::<Value>().await? {
            Value::Array(items) => {
                log::debug!("📥 {} devolvió {} elementos", path, items.len());
                Ok(items)
            }
            other => {
                log::error!("❌ {} no devolvió un array JSON", url);
                Err(AppError::ExternalApi(format!(
                    "{} did not return a JSON array (got {})",
                    path,
                    json_kind(&other)
                )))
            }
        }
    }

    /// Registros de combustible; `/fuel/history` si hay filtro
    pub async fn fetch_fuel_records(&self, filter: &FuelHistoryFilter) -> AppResult<Vec<Value>> {
        if filter.is_empty() {
            self.get_array("/fuel", &[]).await
        } else {
            self.get_array("/fuel/history", &filter.query_pairs()).await
        }
    }

    pub async fn fetch_vehicles(&self) -> AppResult<Vec<Value>> {
        self.get_array("/vehicles", &[]).await
    }
}

#[async_trait]
impl FleetDataSource for FleetApiClient {
    /// Ambas llamadas en paralelo; si una falla, falla el snapshot
    async fn fetch_snapshot(&self, filter: &FuelHistoryFilter) -> AppResult<AnalysisSnapshot> {
        let (fuel, vehicles) =
            tokio::try_join!(self.fetch_fuel_records(filter), self.fetch_vehicles())?;
        Ok(build_snapshot(fuel, vehicles))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
