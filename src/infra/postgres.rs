use anyhow::{anyhow, Result};
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::Row;
use uuid::Uuid;

use crate::app::store::{NotificationStore, SummaryStore, UpdateOutcome};
use crate::domain::notification::{
    NewNotification, Notification, NotificationConfig, NotificationPatch, NotificationStatus,
    NotificationSummary, NotificationType,
};
use crate::infra::db::Db;

/// sqlx-backed notification store. Every operation is a single statement,
/// so each one is atomic on its own; update and delete capture the prior
/// row state in the same statement that mutates it.
#[derive(Clone)]
pub struct PgNotificationStore {
    db: Db,
}

impl PgNotificationStore {
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

fn parse_type(value: &str) -> Result<NotificationType> {
    NotificationType::parse(value).ok_or_else(|| anyhow!("unknown notification type: {}", value))
}

fn parse_status(value: &str) -> Result<NotificationStatus> {
    NotificationStatus::parse(value)
        .ok_or_else(|| anyhow!("unknown notification status: {}", value))
}

fn row_to_notification(row: &PgRow) -> Result<Notification> {
    let type_raw: String = row.get("notification_type");
    let status_raw: String = row.get("notification_status");
    Ok(Notification {
        id: row.get("id"),
        user_id: row.get("user_id"),
        notification_type: parse_type(&type_raw)?,
        resource_id: row.get("resource_id"),
        status: parse_status(&status_raw)?,
        config: NotificationConfig {
            email: row.get("email_enabled"),
        },
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[async_trait]
impl NotificationStore for PgNotificationStore {
    async fn create(&self, data: NewNotification) -> Result<Notification> {
        let row = sqlx::query(
            "INSERT INTO notifications \
                 (id, user_id, notification_type, resource_id, notification_status, email_enabled) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id, user_id, notification_type, resource_id, notification_status, \
                       email_enabled, created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(&data.user_id)
        .bind(data.notification_type.as_str())
        .bind(&data.resource_id)
        .bind(data.status.as_str())
        .bind(data.config.email)
        .fetch_one(self.db.pool())
        .await?;

        row_to_notification(&row)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Notification>> {
        let row = sqlx::query(
            "SELECT id, user_id, notification_type, resource_id, notification_status, \
                    email_enabled, created_at, updated_at \
             FROM notifications WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(row_to_notification).transpose()
    }

    async fn get_by_user(&self, user_id: &str) -> Result<Vec<Notification>> {
        let rows = sqlx::query(
            "SELECT id, user_id, notification_type, resource_id, notification_status, \
                    email_enabled, created_at, updated_at \
             FROM notifications WHERE user_id = $1 \
             ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;

        let mut notifications = Vec::with_capacity(rows.len());
        for row in &rows {
            notifications.push(row_to_notification(row)?);
        }
        Ok(notifications)
    }

    async fn list_all(&self) -> Result<Vec<Notification>> {
        let rows = sqlx::query(
            "SELECT id, user_id, notification_type, resource_id, notification_status, \
                    email_enabled, created_at, updated_at \
             FROM notifications \
             ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(self.db.pool())
        .await?;

        let mut notifications = Vec::with_capacity(rows.len());
        for row in &rows {
            notifications.push(row_to_notification(row)?);
        }
        Ok(notifications)
    }

    async fn update(&self, id: Uuid, patch: NotificationPatch) -> Result<Option<UpdateOutcome>> {
        // The locked CTE pins the row, so the prev_* columns are the exact
        // state this statement replaced. Racing updates serialize here.
        let row = sqlx::query(
            "WITH prev AS (\
                 SELECT id, notification_type, resource_id, notification_status, email_enabled, \
                        created_at, updated_at \
                 FROM notifications WHERE id = $1 FOR UPDATE\
             ) \
             UPDATE notifications n SET \
                 notification_type = COALESCE($2, n.notification_type), \
                 resource_id = COALESCE($3, n.resource_id), \
                 notification_status = COALESCE($4, n.notification_status), \
                 email_enabled = COALESCE($5, n.email_enabled), \
                 updated_at = now() \
             FROM prev WHERE n.id = prev.id \
             RETURNING n.id, n.user_id, n.notification_type, n.resource_id, \
                       n.notification_status, n.email_enabled, n.created_at, n.updated_at, \
                       prev.notification_type AS prev_type, prev.resource_id AS prev_resource_id, \
                       prev.notification_status AS prev_status, prev.email_enabled AS prev_email, \
                       prev.updated_at AS prev_updated_at",
        )
        .bind(id)
        .bind(patch.notification_type.map(|t| t.as_str()))
        .bind(patch.resource_id)
        .bind(patch.status.map(|s| s.as_str()))
        .bind(patch.config.map(|c| c.email))
        .fetch_optional(self.db.pool())
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let after = row_to_notification(&row)?;
        let prev_type: String = row.get("prev_type");
        let prev_status: String = row.get("prev_status");
        let before = Notification {
            id: after.id,
            user_id: after.user_id.clone(),
            notification_type: parse_type(&prev_type)?,
            resource_id: row.get("prev_resource_id"),
            status: parse_status(&prev_status)?,
            config: NotificationConfig {
                email: row.get("prev_email"),
            },
            created_at: after.created_at,
            updated_at: row.get("prev_updated_at"),
        };

        Ok(Some(UpdateOutcome { before, after }))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Notification>> {
        let row = sqlx::query(
            "DELETE FROM notifications WHERE id = $1 \
             RETURNING id, user_id, notification_type, resource_id, notification_status, \
                       email_enabled, created_at, updated_at",
        )
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(row_to_notification).transpose()
    }

    async fn ping(&self) -> Result<()> {
        self.db.ping().await
    }
}

#[derive(Clone)]
pub struct PgSummaryStore {
    db: Db,
}

impl PgSummaryStore {
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SummaryStore for PgSummaryStore {
    async fn adjust(&self, user_id: &str, delta: i64) -> Result<NotificationSummary> {
        let row = sqlx::query(
            "INSERT INTO notification_summaries (user_id, unseen_count, last_updated) \
             VALUES ($1, $2, now()) \
             ON CONFLICT (user_id) DO UPDATE SET \
                 unseen_count = notification_summaries.unseen_count + $2, \
                 last_updated = now() \
             RETURNING user_id, unseen_count, last_updated",
        )
        .bind(user_id)
        .bind(delta)
        .fetch_one(self.db.pool())
        .await?;

        Ok(NotificationSummary {
            user_id: row.get("user_id"),
            unseen_count: row.get("unseen_count"),
            last_updated: row.get("last_updated"),
        })
    }

    async fn get(&self, user_id: &str) -> Result<Option<NotificationSummary>> {
        let row = sqlx::query(
            "SELECT user_id, unseen_count, last_updated \
             FROM notification_summaries WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(|row| NotificationSummary {
            user_id: row.get("user_id"),
            unseen_count: row.get("unseen_count"),
            last_updated: row.get("last_updated"),
        }))
    }
}
