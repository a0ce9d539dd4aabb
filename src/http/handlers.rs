use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::notification::{
    NewNotification, Notification, NotificationConfig, NotificationPatch, NotificationStatus,
    NotificationSummary, NotificationType,
};
use crate::http::envelope::success;
use crate::http::AppError;
use crate::AppState;

// ---------------------------------------------------------------------------
// Boundary DTOs. The core's snake_case types never leak; this is the one
// place the camelCase wire shape is defined.
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct NotificationDto {
    pub id: Uuid,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    #[serde(rename = "resourceId")]
    pub resource_id: String,
    #[serde(rename = "notificationStatus")]
    pub status: NotificationStatus,
    pub config: NotificationConfig,
    #[serde(rename = "createdAt", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(rename = "updatedAt", with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Notification> for NotificationDto {
    fn from(n: Notification) -> Self {
        Self {
            id: n.id,
            user_id: n.user_id,
            notification_type: n.notification_type,
            resource_id: n.resource_id,
            status: n.status,
            config: n.config,
            created_at: n.created_at,
            updated_at: n.updated_at,
        }
    }
}

#[derive(Serialize)]
pub struct SummaryDto {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "unseenCount")]
    pub unseen_count: i64,
    #[serde(rename = "lastUpdated", with = "time::serde::rfc3339")]
    pub last_updated: OffsetDateTime,
}

impl From<NotificationSummary> for SummaryDto {
    fn from(s: NotificationSummary) -> Self {
        Self {
            user_id: s.user_id,
            unseen_count: s.unseen_count,
            last_updated: s.last_updated,
        }
    }
}

#[derive(Deserialize)]
pub struct CreateNotificationRequest {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    #[serde(rename = "resourceId")]
    pub resource_id: String,
    #[serde(rename = "notificationStatus")]
    pub status: Option<NotificationStatus>,
    pub config: Option<NotificationConfig>,
}

#[derive(Deserialize, Default)]
pub struct UpdateNotificationRequest {
    #[serde(rename = "type")]
    pub notification_type: Option<NotificationType>,
    #[serde(rename = "resourceId")]
    pub resource_id: Option<String>,
    #[serde(rename = "notificationStatus")]
    pub status: Option<NotificationStatus>,
    pub config: Option<NotificationConfig>,
}

fn parse_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::bad_request("Invalid notification id"))
}

fn to_dtos(notifications: Vec<Notification>) -> Vec<NotificationDto> {
    notifications.into_iter().map(NotificationDto::from).collect()
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub(crate) struct HealthResponse {
    status: &'static str,
}

pub(crate) async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let store = state.lifecycle.ping_store().await;
    let cache = state.lifecycle.ping_cache().await;
    let status = if store && cache { "ok" } else { "degraded" };

    Json(HealthResponse { status })
}

pub async fn get_notification(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_id(&id)?;
    let notification = state.lifecycle.get(id).await?;
    Ok(success(
        NotificationDto::from(notification),
        "Success!",
        StatusCode::OK,
    ))
}

pub async fn create_notification(
    State(state): State<AppState>,
    payload: Result<Json<CreateNotificationRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(payload) = payload?;

    let data = NewNotification {
        user_id: payload.user_id,
        notification_type: payload.notification_type,
        resource_id: payload.resource_id,
        status: payload.status.unwrap_or(NotificationStatus::NotSeen),
        config: payload.config.unwrap_or_default(),
    };

    let notification = state.lifecycle.create(data).await?;
    Ok(success(
        NotificationDto::from(notification),
        "Notification created successfully",
        StatusCode::CREATED,
    ))
}

pub async fn list_user_notifications(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Response, AppError> {
    let notifications = state.lifecycle.list_for_user(&user_id).await?;
    Ok(success(to_dtos(notifications), "Success!", StatusCode::OK))
}

pub async fn list_notifications(State(state): State<AppState>) -> Result<Response, AppError> {
    let notifications = state.lifecycle.list_all().await?;
    Ok(success(to_dtos(notifications), "Success!", StatusCode::OK))
}

pub async fn get_user_summary(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Response, AppError> {
    let summary = state.lifecycle.summary(&user_id).await?;
    Ok(success(SummaryDto::from(summary), "Success!", StatusCode::OK))
}

pub async fn update_notification(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateNotificationRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let id = parse_id(&id)?;
    let Json(payload) = payload?;

    let patch = NotificationPatch {
        notification_type: payload.notification_type,
        resource_id: payload.resource_id,
        status: payload.status,
        config: payload.config,
    };

    let notification = state.lifecycle.update(id, patch).await?;
    Ok(success(
        NotificationDto::from(notification),
        "Notification updated successfully",
        StatusCode::OK,
    ))
}

pub async fn delete_notification(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_id(&id)?;
    let deleted = state.lifecycle.delete(id).await?;
    Ok(success(
        NotificationDto::from(deleted),
        "Notification deleted successfully",
        StatusCode::OK,
    ))
}
