//! In-memory backends with the same atomicity guarantees as the Postgres
//! ones (every operation runs under one lock acquisition). The test suite
//! runs the full stack on these; they also allow local development without
//! Postgres or Redis.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::Result;
use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::app::cache::CacheBackend;
use crate::app::store::{NotificationStore, SummaryStore, UpdateOutcome};
use crate::domain::notification::{
    NewNotification, Notification, NotificationPatch, NotificationSummary,
};

#[derive(Default)]
pub struct MemoryNotificationStore {
    records: Mutex<HashMap<Uuid, Notification>>,
    reads: AtomicUsize,
}

impl MemoryNotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of read operations served, for cache hit assertions.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.records.lock().expect("store lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl NotificationStore for MemoryNotificationStore {
    async fn create(&self, data: NewNotification) -> Result<Notification> {
        let now = OffsetDateTime::now_utc();
        let notification = Notification {
            id: Uuid::new_v4(),
            user_id: data.user_id,
            notification_type: data.notification_type,
            resource_id: data.resource_id,
            status: data.status,
            config: data.config,
            created_at: now,
            updated_at: now,
        };
        self.records
            .lock()
            .expect("store lock poisoned")
            .insert(notification.id, notification.clone());
        Ok(notification)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Notification>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .records
            .lock()
            .expect("store lock poisoned")
            .get(&id)
            .cloned())
    }

    async fn get_by_user(&self, user_id: &str) -> Result<Vec<Notification>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let records = self.records.lock().expect("store lock poisoned");
        let mut matches: Vec<Notification> = records
            .values()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(matches)
    }

    async fn list_all(&self) -> Result<Vec<Notification>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let records = self.records.lock().expect("store lock poisoned");
        let mut all: Vec<Notification> = records.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(all)
    }

    async fn update(&self, id: Uuid, patch: NotificationPatch) -> Result<Option<UpdateOutcome>> {
        let mut records = self.records.lock().expect("store lock poisoned");
        let Some(record) = records.get_mut(&id) else {
            return Ok(None);
        };

        let before = record.clone();
        if let Some(notification_type) = patch.notification_type {
            record.notification_type = notification_type;
        }
        if let Some(resource_id) = patch.resource_id {
            record.resource_id = resource_id;
        }
        if let Some(status) = patch.status {
            record.status = status;
        }
        if let Some(config) = patch.config {
            record.config = config;
        }
        record.updated_at = OffsetDateTime::now_utc();

        Ok(Some(UpdateOutcome {
            before,
            after: record.clone(),
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Notification>> {
        Ok(self
            .records
            .lock()
            .expect("store lock poisoned")
            .remove(&id))
    }
}

#[derive(Default)]
pub struct MemorySummaryStore {
    summaries: Mutex<HashMap<String, NotificationSummary>>,
}

impl MemorySummaryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SummaryStore for MemorySummaryStore {
    async fn adjust(&self, user_id: &str, delta: i64) -> Result<NotificationSummary> {
        let mut summaries = self.summaries.lock().expect("summary lock poisoned");
        let now = OffsetDateTime::now_utc();
        let summary = summaries
            .entry(user_id.to_string())
            .and_modify(|summary| {
                summary.unseen_count += delta;
                summary.last_updated = now;
            })
            .or_insert_with(|| NotificationSummary {
                user_id: user_id.to_string(),
                unseen_count: delta,
                last_updated: now,
            });
        Ok(summary.clone())
    }

    async fn get(&self, user_id: &str) -> Result<Option<NotificationSummary>> {
        Ok(self
            .summaries
            .lock()
            .expect("summary lock poisoned")
            .get(user_id)
            .cloned())
    }
}

pub struct MemoryCacheBackend {
    entries: Mutex<HashMap<String, (String, Instant)>>,
}

impl MemoryCacheBackend {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemoryCacheBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheBackend for MemoryCacheBackend {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        match entries.get(key) {
            Some((value, expires_at)) if Instant::now() < *expires_at => Ok(Some(value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<()> {
        let expires_at = Instant::now() + Duration::from_secs(ttl_seconds);
        self.entries
            .lock()
            .expect("cache lock poisoned")
            .insert(key.to_string(), (value.to_string(), expires_at));
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<()> {
        self.entries.lock().expect("cache lock poisoned").remove(key);
        Ok(())
    }
}
