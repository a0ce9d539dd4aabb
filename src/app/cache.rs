use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::notification::Notification;

/// Minimal key-value interface the cache layer needs from its backend.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<()>;

    async fn del(&self, key: &str) -> Result<()>;

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

/// Read-through cache in front of the notification store, keyed by
/// notification id and by user id (the per-user key holds the full list as
/// one value). Every backend failure is logged and degraded to a miss or a
/// no-op; callers never see a cache error and the store path is never
/// blocked by one.
#[derive(Clone)]
pub struct NotificationCache {
    backend: Arc<dyn CacheBackend>,
    ttl_seconds: u64,
}

fn id_key(id: Uuid) -> String {
    format!("notification:{}", id)
}

fn user_key(user_id: &str) -> String {
    format!("notifications:user:{}", user_id)
}

impl NotificationCache {
    pub fn new(backend: Arc<dyn CacheBackend>, ttl_seconds: u64) -> Self {
        Self { backend, ttl_seconds }
    }

    pub async fn ping(&self) -> Result<()> {
        self.backend.ping().await
    }

    pub async fn get_notification(&self, id: Uuid) -> Option<Notification> {
        let raw = self.get_raw(&id_key(id)).await?;
        match serde_json::from_str(&raw) {
            Ok(notification) => Some(notification),
            Err(err) => {
                tracing::warn!(%id, error = %err, "discarding undecodable cache entry");
                None
            }
        }
    }

    pub async fn get_user_list(&self, user_id: &str) -> Option<Vec<Notification>> {
        let raw = self.get_raw(&user_key(user_id)).await?;
        match serde_json::from_str(&raw) {
            Ok(list) => Some(list),
            Err(err) => {
                tracing::warn!(user_id, error = %err, "discarding undecodable cache entry");
                None
            }
        }
    }

    pub async fn put_notification(&self, notification: &Notification) {
        if let Ok(raw) = serde_json::to_string(notification) {
            self.set_raw(&id_key(notification.id), &raw).await;
        }
    }

    pub async fn put_user_list(&self, user_id: &str, list: &[Notification]) {
        if let Ok(raw) = serde_json::to_string(list) {
            self.set_raw(&user_key(user_id), &raw).await;
        }
    }

    /// Appends to the cached per-user list when present, otherwise seeds a
    /// one-element list. An independently expired list key is rebuilt from
    /// the store on the next read; a concurrently appended entry from
    /// another process can be missed within one TTL. Known staleness window.
    pub async fn append_user_list(&self, notification: &Notification) {
        let mut list = self
            .get_user_list(&notification.user_id)
            .await
            .unwrap_or_default();
        list.push(notification.clone());
        self.put_user_list(&notification.user_id, &list).await;
    }

    /// Drops both keys for a mutated record. Reads after a mutation fall
    /// through to the store instead of serving the pre-mutation entry.
    pub async fn invalidate(&self, id: Uuid, user_id: &str) {
        if let Err(err) = self.backend.del(&id_key(id)).await {
            tracing::warn!(%id, error = %err, "cache invalidate failed");
        }
        if let Err(err) = self.backend.del(&user_key(user_id)).await {
            tracing::warn!(user_id, error = %err, "cache invalidate failed");
        }
    }

    async fn get_raw(&self, key: &str) -> Option<String> {
        match self.backend.get(key).await {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(key, error = %err, "cache read failed, treating as miss");
                None
            }
        }
    }

    async fn set_raw(&self, key: &str, value: &str) {
        if let Err(err) = self.backend.set(key, value, self.ttl_seconds).await {
            tracing::warn!(key, error = %err, "cache write failed, skipping");
        }
    }
}
