//! Cache
//!
//! Persistencia ligera sobre Redis. Lo único que sobrevive entre análisis es
//! el estado de revisión de las alertas; el resto se recalcula.

pub mod cache_config;
pub mod redis_client;
pub mod alert_status_store;

pub use alert_status_store::{AlertStatusStore, InMemoryAlertStatusStore, RedisAlertStatusStore};
pub use cache_config::CacheConfig;
pub use redis_client::RedisClient;

use anyhow::Result;
use serde::{de::DeserializeOwned, Serialize};

/// Operaciones de cache con valores serializados en JSON
#[async_trait::async_trait]
pub trait CacheOperations {
    async fn get<T: DeserializeOwned + Send>(&self, key: &str) -> Result<Option<T>>;
    /// Varias claves en una sola ida y vuelta, en el orden recibido
    async fn get_many<T: DeserializeOwned + Send>(&self, keys: &[String]) -> Result<Vec<Option<T>>>;
    async fn set<T: Serialize + Send + Sync>(&self, key: &str, value: &T, ttl: u64) -> Result<()>;
}
