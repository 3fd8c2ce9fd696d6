//! Almacén de estados de revisión de alertas
//!
//! Las alertas se recalculan en cada análisis, así que su estado no puede
//! vivir en la alerta. Se guarda aparte, indexado por `AlertKey`
//! (`recordId` + tipo), y se vuelve a aplicar tras cada análisis.

use std::collections::HashMap;

use anyhow::Result;
use tokio::sync::RwLock;

use super::{CacheOperations, RedisClient};
use crate::models::alert::{AlertKey, AlertStatus};

#[async_trait::async_trait]
pub trait AlertStatusStore: Send + Sync {
    /// Estado persistido, `None` si la alerta nunca se revisó
    async fn load(&self, key: &AlertKey) -> Result<Option<AlertStatus>>;

    async fn save(&self, key: &AlertKey, status: AlertStatus) -> Result<()>;

    /// Estados de varias alertas; las claves sin estado no aparecen
    async fn load_many(&self, keys: &[AlertKey]) -> Result<HashMap<AlertKey, AlertStatus>> {
        let mut statuses = HashMap::new();
        for key in keys {
            if let Some(status) = self.load(key).await? {
                statuses.insert(key.clone(), status);
            }
        }
        Ok(statuses)
    }
}

/// Implementación en memoria, usada cuando no hay `REDIS_URL`
#[derive(Default)]
pub struct InMemoryAlertStatusStore {
    statuses: RwLock<HashMap<AlertKey, AlertStatus>>,
}

impl InMemoryAlertStatusStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl AlertStatusStore for InMemoryAlertStatusStore {
    async fn load(&self, key: &AlertKey) -> Result<Option<AlertStatus>> {
        Ok(self.statuses.read().await.get(key).copied())
    }

    async fn save(&self, key: &AlertKey, status: AlertStatus) -> Result<()> {
        self.statuses.write().await.insert(key.clone(), status);
        Ok(())
    }

    async fn load_many(&self, keys: &[AlertKey]) -> Result<HashMap<AlertKey, AlertStatus>> {
        let statuses = self.statuses.read().await;
        Ok(keys
            .iter()
            .filter_map(|key| statuses.get(key).map(|status| (key.clone(), *status)))
            .collect())
    }
}

/// Implementación sobre Redis con TTL por clave
pub struct RedisAlertStatusStore {
    client: RedisClient,
    ttl: u64,
}

impl RedisAlertStatusStore {
    pub fn new(client: RedisClient) -> Self {
        let ttl = client.default_ttl();
        Self { client, ttl }
    }
}

#[async_trait::async_trait]
impl AlertStatusStore for RedisAlertStatusStore {
    async fn load(&self, key: &AlertKey) -> Result<Option<AlertStatus>> {
        self.client.get(&self.client.alert_status_key(key)).await
    }

    async fn save(&self, key: &AlertKey, status: AlertStatus) -> Result<()> {
        self.client
            .set(&self.client.alert_status_key(key), &status, self.ttl)
            .await
    }

    async fn load_many(&self, keys: &[AlertKey]) -> Result<HashMap<AlertKey, AlertStatus>> {
        let redis_keys: Vec<String> = keys.iter().map(|key| self.client.alert_status_key(key)).collect();
        let statuses = self.client.get_many(&redis_keys).await?;
        Ok(pair_statuses(keys, statuses))
    }
}

/// Unir cada clave con su estado, descartando las que no tienen
fn pair_statuses(keys: &[AlertKey], statuses: Vec<Option<AlertStatus>>) -> HashMap<AlertKey, AlertStatus> {
    keys.iter()
        .zip(statuses)
        .filter_map(|(key, status)| status.map(|status| (key.clone(), status)))
        .collect()
}
