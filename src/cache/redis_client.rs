use anyhow::Result;
use redis::{aio::ConnectionManager, AsyncCommands, RedisResult};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error, info, warn};

use super::{CacheConfig, CacheOperations};
use crate::models::alert::AlertKey;

const KEY_PREFIX: &str = "fuel_watch";

/// Cliente Redis sobre `ConnectionManager` (reconexión automática)
#[derive(Clone)]
pub struct RedisClient {
    manager: ConnectionManager,
    config: CacheConfig,
}

impl RedisClient {
    /// Conectar y verificar con PING
    pub async fn new(config: CacheConfig) -> Result<Self> {
        info!("🔗 Conectando a Redis: {}", config.redis_url);

        let client = redis::Client::open(config.redis_url.clone())?;
        let manager = ConnectionManager::new(client).await?;

        let mut conn = manager.clone();
        let _: () = redis::cmd("PING").query_async(&mut conn).await?;

        info!("✅ Redis conectado exitosamente");

        Ok(Self { manager, config })
    }

    fn make_key(&self, prefix: &str, identifier: &str) -> String {
        format!("{}:{}:{}", KEY_PREFIX, prefix, identifier)
    }

    /// Clave del estado de revisión de una alerta
    pub fn alert_status_key(&self, key: &AlertKey) -> String {
        self.make_key("alert_status", &key.to_string())
    }

    pub fn default_ttl(&self) -> u64 {
        self.config.default_ttl
    }
}

/// `MGET` con todas las claves
fn mget_command(keys: &[String]) -> redis::Cmd {
    let mut cmd = redis::cmd("MGET");
    cmd.arg(keys);
    cmd
}

#[async_trait::async_trait]
impl CacheOperations for RedisClient {
    async fn get<T: DeserializeOwned + Send>(&self, key: &str) -> Result<Option<T>> {
        let mut conn = self.manager.clone();

        match conn.get::<_, Option<String>>(key).await {
            Ok(Some(value)) => {
                debug!("📥 Cache HIT para clave: {}", key);
                let deserialized: T = serde_json::from_str(&value)?;
                Ok(Some(deserialized))
            }
            Ok(None) => {
                debug!("❌ Cache MISS para clave: {}", key);
                Ok(None)
            }
            Err(e) => {
                warn!("⚠️ Error leyendo cache para clave {}: {}", key, e);
                Err(anyhow::anyhow!("Error de Redis: {}", e))
            }
        }
    }

    async fn get_many<T: DeserializeOwned + Send>(&self, keys: &[String]) -> Result<Vec<Option<T>>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.manager.clone();

        let values: Vec<Option<String>> = mget_command(keys)
            .query_async(&mut conn)
            .await
            .map_err(|e| {
                warn!("⚠️ Error leyendo {} claves de cache: {}", keys.len(), e);
                anyhow::anyhow!("Error de Redis: {}", e)
            })?;

        debug!(
            "📥 Cache MGET: {} de {} claves encontradas",
            values.iter().filter(|value| value.is_some()).count(),
            keys.len()
        );

        values
            .into_iter()
            .map(|value| {
                value
                    .map(|value| serde_json::from_str(&value))
                    .transpose()
                    .map_err(anyhow::Error::from)
            })
            .collect()
    }

    async fn set<T: Serialize + Send + Sync>(&self, key: &str, value: &T, ttl: u64) -> Result<()> {
        let mut conn = self.manager.clone();

        let serialized = serde_json::to_string(value)?;

        let result: RedisResult<()> = redis::cmd("SET")
            .arg(key)
            .arg(serialized)
            .arg("EX")
            .arg(ttl)
            .query_async(&mut conn)
            .await;

        match result {
            Ok(()) => {
                debug!("💾 Cache SET para clave: {} (TTL: {}s)", key, ttl);
                Ok(())
            }
            Err(e) => {
                error!("❌ Error guardando en cache para clave {}: {}", key, e);
                Err(anyhow::anyhow!("Error de Redis: {}", e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mget_sends_every_key_in_one_command() {
        let keys = vec!["fuel_watch:a".to_string(), "fuel_watch:bc".to_string()];

        let packed = mget_command(&keys).get_packed_command();
        assert_eq!(
            String::from_utf8_lossy(&packed),
            "*3\r\n$4\r\nMGET\r\n$12\r\nfuel_watch:a\r\n$13\r\nfuel_watch:bc\r\n"
        );
    }
}
