pub mod app;
pub mod config;
pub mod domain;
pub mod http;
pub mod infra;

use crate::app::lifecycle::NotificationLifecycle;

#[derive(Clone)]
pub struct AppState {
    pub lifecycle: NotificationLifecycle,
}
