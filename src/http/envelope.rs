//! The response envelope callers depend on: success bodies carry
//! `{status, message, data, appCode, timestamp}`, failures carry
//! `{status, message, details, appCode, timestamp}` with `"failed"` for
//! 4xx and `"error"` for 5xx.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

pub mod app_code {
    pub const OK: &str = "OK";
    pub const UNKNOWN_ERROR: &str = "UNKNOWN_ERROR";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const FORBIDDEN: &str = "FORBIDDEN";
    pub const INTERNAL_SERVER_ERROR: &str = "INTERNAL_SERVER_ERROR";
    pub const BAD_JSON: &str = "BAD_JSON";
    pub const RATE_LIMITED: &str = "RATE_LIMITED";
    pub const FEATURE_DISABLED: &str = "FEATURE_DISABLED";
}

#[derive(Serialize)]
struct SuccessBody<T: Serialize> {
    status: &'static str,
    message: String,
    data: T,
    #[serde(rename = "appCode")]
    app_code: &'static str,
    timestamp: String,
}

#[derive(Serialize)]
pub(crate) struct FailureBody {
    pub status: &'static str,
    pub message: String,
    pub details: Value,
    #[serde(rename = "appCode")]
    pub app_code: &'static str,
    pub timestamp: String,
}

pub fn timestamp() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default()
}

pub fn success<T: Serialize>(data: T, message: impl Into<String>, status: StatusCode) -> Response {
    let body = SuccessBody {
        status: "success",
        message: message.into(),
        data,
        app_code: app_code::OK,
        timestamp: timestamp(),
    };
    (status, Json(body)).into_response()
}
