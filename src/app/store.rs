use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::notification::{
    NewNotification, Notification, NotificationPatch, NotificationSummary,
};

/// Prior and resulting state of an update, captured in one atomic store
/// operation. The summary delta is decided from `before`, so two racing
/// updates can never both observe the same prior status.
#[derive(Debug, Clone)]
pub struct UpdateOutcome {
    pub before: Notification,
    pub after: Notification,
}

/// Persistence for individual notification records. Every operation touches
/// a single document and is atomic on its own; nothing here spans documents.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn create(&self, data: NewNotification) -> Result<Notification>;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Notification>>;

    async fn get_by_user(&self, user_id: &str) -> Result<Vec<Notification>>;

    async fn list_all(&self) -> Result<Vec<Notification>>;

    /// Applies the patch and returns both prior and new state, or `None`
    /// when the record is absent.
    async fn update(&self, id: Uuid, patch: NotificationPatch) -> Result<Option<UpdateOutcome>>;

    /// Removes the record and returns its prior state, or `None` when absent.
    async fn delete(&self, id: Uuid) -> Result<Option<Notification>>;

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

/// Persistence for the per-user materialized counter.
#[async_trait]
pub trait SummaryStore: Send + Sync {
    /// Single atomic find-increment-touch-upsert: creates the summary with
    /// the given delta when absent, otherwise increments and refreshes
    /// `last_updated`. A delta of zero still touches the timestamp.
    async fn adjust(&self, user_id: &str, delta: i64) -> Result<NotificationSummary>;

    async fn get(&self, user_id: &str) -> Result<Option<NotificationSummary>>;
}
