//! Configuración de variables de entorno
//!
//! Todo se lee una sola vez al arrancar. Un valor inválido es un
//! `ConfigError`, nunca un panic.

use std::env;
use std::time::Duration;

use thiserror::Error;

use crate::cache::cache_config::DEFAULT_ALERT_STATUS_TTL;
use crate::services::misuse_detector::DetectionThresholds;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub cors_origins: Vec<String>,
    // API de flota
    pub fleet_api_url: String,
    pub fleet_api_token: Option<String>,
    pub fleet_api_timeout: Duration,
    // Persistencia de estados de alertas
    pub redis_url: Option<String>,
    pub alert_status_ttl: u64,
    pub thresholds: DetectionThresholds,
}

impl EnvironmentConfig {
    /// Leer la configuración del proceso
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Leer la configuración desde cualquier fuente clave/valor
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = DetectionThresholds::default();

        let fleet_api_url = var("FLEET_API_URL").ok_or(ConfigError::Missing("FLEET_API_URL"))?;

        Ok(Self {
            environment: var("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            port: parse_or("PORT", var("PORT"), 3000)?,
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            cors_origins: var("CORS_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            fleet_api_url,
            fleet_api_token: var("FLEET_API_TOKEN"),
            fleet_api_timeout: Duration::from_secs(parse_or(
                "FLEET_API_TIMEOUT_SECS",
                var("FLEET_API_TIMEOUT_SECS"),
                30,
            )?),
            redis_url: var("REDIS_URL"),
            alert_status_ttl: parse_or(
                "ALERT_STATUS_TTL_SECS",
                var("ALERT_STATUS_TTL_SECS"),
                DEFAULT_ALERT_STATUS_TTL,
            )?,
            thresholds: DetectionThresholds {
                min_refuel_interval_days: positive_or(
                    "MISUSE_MIN_REFUEL_INTERVAL_DAYS",
                    var("MISUSE_MIN_REFUEL_INTERVAL_DAYS"),
                    defaults.min_refuel_interval_days,
                )?,
                excessive_refuel_liters: positive_or(
                    "MISUSE_EXCESSIVE_REFUEL_LITERS",
                    var("MISUSE_EXCESSIVE_REFUEL_LITERS"),
                    defaults.excessive_refuel_liters,
                )?,
                tank_capacity_liters: positive_or(
                    "MISUSE_TANK_CAPACITY_LITERS",
                    var("MISUSE_TANK_CAPACITY_LITERS"),
                    defaults.tank_capacity_liters,
                )?,
                consumption_deviation: positive_or(
                    "MISUSE_CONSUMPTION_DEVIATION",
                    var("MISUSE_CONSUMPTION_DEVIATION"),
                    defaults.consumption_deviation,
                )?,
                min_consumption_history: defaults.min_consumption_history,
            },
        })
    }

    /// Obtener la dirección de escucha del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T: std::str::FromStr>(
    name: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}

/// Umbrales: número finito y mayor que cero
fn positive_or(name: &'static str, value: Option<String>, default: f64) -> Result<f64, ConfigError> {
    let parsed = parse_or(name, value.clone(), default)?;
    if parsed.is_finite() && parsed > 0.0 {
        Ok(parsed)
    } else {
        Err(ConfigError::Invalid {
            name,
            value: value.unwrap_or_default(),
        })
    }
}
