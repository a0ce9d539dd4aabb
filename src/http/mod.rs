use axum::Router;

use crate::AppState;

pub mod envelope;
mod error;
mod handlers;
mod routes;

pub use error::AppError;

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health())
        .merge(routes::notifications())
        .with_state(state)
}
