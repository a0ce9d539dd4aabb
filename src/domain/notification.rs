use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Closed set of notification kinds. Wire names match what clients send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationType {
    #[serde(rename = "itinerary comment")]
    ItineraryComment,
    #[serde(rename = "report")]
    Report,
    #[serde(rename = "itinerary review")]
    ItineraryReview,
    #[serde(rename = "likes")]
    Likes,
    #[serde(rename = "pub comment")]
    PubComment,
    #[serde(rename = "friend request")]
    FriendRequest,
    #[serde(rename = "message")]
    Message,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::ItineraryComment => "itinerary comment",
            NotificationType::Report => "report",
            NotificationType::ItineraryReview => "itinerary review",
            NotificationType::Likes => "likes",
            NotificationType::PubComment => "pub comment",
            NotificationType::FriendRequest => "friend request",
            NotificationType::Message => "message",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "itinerary comment" => Some(NotificationType::ItineraryComment),
            "report" => Some(NotificationType::Report),
            "itinerary review" => Some(NotificationType::ItineraryReview),
            "likes" => Some(NotificationType::Likes),
            "pub comment" => Some(NotificationType::PubComment),
            "friend request" => Some(NotificationType::FriendRequest),
            "message" => Some(NotificationType::Message),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationStatus {
    #[serde(rename = "NOT_SEEN")]
    NotSeen,
    #[serde(rename = "SEEN")]
    Seen,
}

impl NotificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationStatus::NotSeen => "NOT_SEEN",
            NotificationStatus::Seen => "SEEN",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "NOT_SEEN" => Some(NotificationStatus::NotSeen),
            "SEEN" => Some(NotificationStatus::Seen),
            _ => None,
        }
    }
}

/// Per-notification delivery options. Only email today.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default)]
    pub email: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: String,
    pub notification_type: NotificationType,
    pub resource_id: String,
    pub status: NotificationStatus,
    pub config: NotificationConfig,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// One materialized counter document per user. Only the lifecycle service's
/// summary maintenance writes this.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationSummary {
    pub user_id: String,
    pub unseen_count: i64,
    pub last_updated: OffsetDateTime,
}

/// Input for a create call. The store assigns id and timestamps.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: String,
    pub notification_type: NotificationType,
    pub resource_id: String,
    pub status: NotificationStatus,
    pub config: NotificationConfig,
}

/// Field patch for an update call. `user_id` and `created_at` are immutable;
/// the summary is keyed on the owner and the creation time never moves.
#[derive(Debug, Clone, Default)]
pub struct NotificationPatch {
    pub notification_type: Option<NotificationType>,
    pub resource_id: Option<String>,
    pub status: Option<NotificationStatus>,
    pub config: Option<NotificationConfig>,
}

/// Validates a create input before any store call. The enums already make
/// unknown types and statuses unrepresentable; this checks the rest.
pub fn validate_new_notification(data: &NewNotification) -> Result<(), String> {
    if data.user_id.trim().is_empty() {
        return Err("userId is required".into());
    }
    if data.resource_id.trim().is_empty() {
        return Err("resourceId is required".into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_wire_names_round_trip() {
        for value in [
            "itinerary comment",
            "report",
            "itinerary review",
            "likes",
            "pub comment",
            "friend request",
            "message",
        ] {
            let parsed = NotificationType::parse(value).expect("known type");
            assert_eq!(parsed.as_str(), value);
        }
        assert!(NotificationType::parse("poke").is_none());
    }

    #[test]
    fn validation_rejects_blank_ids() {
        let mut data = NewNotification {
            user_id: "U1".into(),
            notification_type: NotificationType::Likes,
            resource_id: "R1".into(),
            status: NotificationStatus::NotSeen,
            config: NotificationConfig::default(),
        };
        assert!(validate_new_notification(&data).is_ok());

        data.user_id = "  ".into();
        assert!(validate_new_notification(&data).is_err());

        data.user_id = "U1".into();
        data.resource_id = String::new();
        assert!(validate_new_notification(&data).is_err());
    }
}
