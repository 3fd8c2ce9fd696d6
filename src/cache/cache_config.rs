//! Configuración de cache

/// 30 días: una alerta revisada no debería volver a PENDING mientras su
/// registro siga apareciendo en la API
pub const DEFAULT_ALERT_STATUS_TTL: u64 = 30 * 24 * 60 * 60;

/// Configuración del cache
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub redis_url: String,
    pub default_ttl: u64,
}

impl CacheConfig {
    pub fn new(redis_url: impl Into<String>, default_ttl: u64) -> Self {
        Self {
            redis_url: redis_url.into(),
            default_ttl,
        }
    }
}
