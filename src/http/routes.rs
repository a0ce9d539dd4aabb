use axum::{routing::delete, routing::get, routing::post, routing::put, Router};

use crate::http::handlers;
use crate::AppState;

pub fn health() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health))
}

pub fn notifications() -> Router<AppState> {
    Router::new()
        .route("/notifications", post(handlers::create_notification))
        .route("/notifications", get(handlers::list_notifications))
        .route(
            "/notifications/user/:userId",
            get(handlers::list_user_notifications),
        )
        .route(
            "/notifications/userSummary/:userId",
            get(handlers::get_user_summary),
        )
        .route("/notifications/:id", get(handlers::get_notification))
        .route("/notifications/:id", put(handlers::update_notification))
        .route("/notifications/:id", delete(handlers::delete_notification))
}
