use std::sync::Arc;

use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::app::cache::NotificationCache;
use crate::app::email::EmailSender;
use crate::app::events::{EventRegistry, NotificationEvent};
use crate::app::features::{self, FeatureGate};
use crate::app::store::{NotificationStore, SummaryStore};
use crate::app::throttle::ThrottleGate;
use crate::domain::notification::{
    validate_new_notification, NewNotification, Notification, NotificationPatch,
    NotificationStatus, NotificationSummary,
};

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("{0}")]
    Validation(String),

    #[error("Notification not found")]
    NotFound,

    #[error("Notifications are currently disabled")]
    FeatureDisabled,

    #[error("Too many requests. Please try again later.")]
    RateLimited,

    /// Unexpected store failure, surfaced as a bad request carrying the
    /// original failure as detail.
    #[error("Error performing notification operation")]
    Store(#[source] anyhow::Error),
}

/// Orchestrator for the notification lifecycle: the only component external
/// callers invoke directly. Composes the store, the summary maintenance
/// policy, the cache layer, both gates, the event registry and the email
/// collaborator. There is no cross-document transaction behind any of this;
/// each step handles its own failure.
#[derive(Clone)]
pub struct NotificationLifecycle {
    store: Arc<dyn NotificationStore>,
    summaries: Arc<dyn SummaryStore>,
    cache: NotificationCache,
    events: Arc<EventRegistry>,
    throttle: Arc<ThrottleGate>,
    features: Arc<FeatureGate>,
    email: Arc<dyn EmailSender>,
}

impl NotificationLifecycle {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store: Arc<dyn NotificationStore>,
        summaries: Arc<dyn SummaryStore>,
        cache: NotificationCache,
        events: Arc<EventRegistry>,
        throttle: Arc<ThrottleGate>,
        features: Arc<FeatureGate>,
        email: Arc<dyn EmailSender>,
    ) -> Self {
        Self {
            store,
            summaries,
            cache,
            events,
            throttle,
            features,
            email,
        }
    }

    pub fn features(&self) -> &FeatureGate {
        &self.features
    }

    /// Create path: feature gate, throttle gate, persist, counter
    /// adjustment, best-effort cache update, best-effort email, announce.
    pub async fn create(&self, data: NewNotification) -> Result<Notification, LifecycleError> {
        validate_new_notification(&data).map_err(LifecycleError::Validation)?;

        // The feature gate short-circuits before the throttle gate, so a
        // disabled feature never consumes the throttle window.
        if !self.features.is_enabled(features::NOTIFICATIONS) {
            return Err(LifecycleError::FeatureDisabled);
        }
        if !self.throttle.acquire() {
            return Err(LifecycleError::RateLimited);
        }

        let notification = self.store.create(data).await.map_err(LifecycleError::Store)?;

        // A SEEN creation contributes no unseen work but still refreshes
        // the summary's last_updated.
        let delta = match notification.status {
            NotificationStatus::NotSeen => 1,
            NotificationStatus::Seen => 0,
        };
        self.summaries
            .adjust(&notification.user_id, delta)
            .await
            .map_err(LifecycleError::Store)?;

        // Only SEEN creations are written through; NOT_SEEN bypasses the
        // cache entirely and is picked up by the next read-through miss.
        if notification.status == NotificationStatus::Seen {
            self.cache.put_notification(&notification).await;
            self.cache.append_user_list(&notification).await;
        }

        if notification.config.email {
            self.send_email(&notification).await;
        }

        self.events
            .publish(&NotificationEvent::Created(notification.clone()));

        Ok(notification)
    }

    pub async fn get(&self, id: Uuid) -> Result<Notification, LifecycleError> {
        if let Some(cached) = self.cache.get_notification(id).await {
            return Ok(cached);
        }

        let notification = self
            .store
            .get_by_id(id)
            .await
            .map_err(LifecycleError::Store)?
            .ok_or(LifecycleError::NotFound)?;

        self.cache.put_notification(&notification).await;
        Ok(notification)
    }

    /// A user with no notifications gets an empty list, not an error.
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<Notification>, LifecycleError> {
        if let Some(cached) = self.cache.get_user_list(user_id).await {
            return Ok(cached);
        }

        let notifications = self
            .store
            .get_by_user(user_id)
            .await
            .map_err(LifecycleError::Store)?;

        self.cache.put_user_list(user_id, &notifications).await;
        Ok(notifications)
    }

    pub async fn list_all(&self) -> Result<Vec<Notification>, LifecycleError> {
        self.store.list_all().await.map_err(LifecycleError::Store)
    }

    /// A user whose summary document does not exist yet reads as zero.
    pub async fn summary(&self, user_id: &str) -> Result<NotificationSummary, LifecycleError> {
        let summary = self
            .summaries
            .get(user_id)
            .await
            .map_err(LifecycleError::Store)?;

        Ok(summary.unwrap_or_else(|| NotificationSummary {
            user_id: user_id.to_string(),
            unseen_count: 0,
            last_updated: OffsetDateTime::now_utc(),
        }))
    }

    /// Update path. The prior status is captured by the store in the same
    /// atomic operation as the patch, so two racing updates can never both
    /// see NOT_SEEN and double-decrement the counter.
    pub async fn update(
        &self,
        id: Uuid,
        patch: NotificationPatch,
    ) -> Result<Notification, LifecycleError> {
        let outcome = self
            .store
            .update(id, patch)
            .await
            .map_err(LifecycleError::Store)?
            .ok_or(LifecycleError::NotFound)?;

        let delta = match (outcome.before.status, outcome.after.status) {
            (NotificationStatus::NotSeen, NotificationStatus::Seen) => -1,
            // Re-opening a seen notification counts it as unseen again.
            (NotificationStatus::Seen, NotificationStatus::NotSeen) => 1,
            _ => 0,
        };
        if delta != 0 {
            self.summaries
                .adjust(&outcome.after.user_id, delta)
                .await
                .map_err(LifecycleError::Store)?;
        }

        self.cache.invalidate(id, &outcome.after.user_id).await;
        self.events
            .publish(&NotificationEvent::Updated(outcome.after.clone()));

        Ok(outcome.after)
    }

    /// Delete path: returns the deleted record so the caller can inspect its
    /// prior state. Only a NOT_SEEN record still contributes to the counter,
    /// so only that case decrements; the count never goes negative.
    pub async fn delete(&self, id: Uuid) -> Result<Notification, LifecycleError> {
        let deleted = self
            .store
            .delete(id)
            .await
            .map_err(LifecycleError::Store)?
            .ok_or(LifecycleError::NotFound)?;

        if deleted.status == NotificationStatus::NotSeen {
            self.summaries
                .adjust(&deleted.user_id, -1)
                .await
                .map_err(LifecycleError::Store)?;
        }

        self.cache.invalidate(id, &deleted.user_id).await;
        self.events.publish(&NotificationEvent::Deleted(id));

        Ok(deleted)
    }

    pub async fn ping_store(&self) -> bool {
        self.store.ping().await.is_ok()
    }

    pub async fn ping_cache(&self) -> bool {
        self.cache.ping().await.is_ok()
    }

    async fn send_email(&self, notification: &Notification) {
        let subject = format!("New {} notification", notification.notification_type.as_str());
        let text = format!(
            "You have a new {} notification.",
            notification.notification_type.as_str()
        );
        let html = format!(
            "<p>You have a new <strong>{}</strong> notification.</p>",
            notification.notification_type.as_str()
        );

        if let Err(err) = self
            .email
            .send(&notification.user_id, &subject, &text, &html)
            .await
        {
            tracing::warn!(
                id = %notification.id,
                user_id = %notification.user_id,
                error = %err,
                "email dispatch failed"
            );
        }
    }
}
