use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;

use crate::app::lifecycle::LifecycleError;
use crate::http::envelope::{app_code, timestamp, FailureBody};

#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    app_code: &'static str,
    details: Option<Value>,
}

impl AppError {
    fn new(status: StatusCode, message: impl Into<String>, app_code: &'static str) -> Self {
        Self {
            status,
            message: message.into(),
            app_code,
            details: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message, app_code::BAD_REQUEST)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message, app_code::VALIDATION_ERROR)
    }

    pub fn bad_json(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message, app_code::BAD_JSON)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message, app_code::NOT_FOUND)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::TOO_MANY_REQUESTS,
            message,
            app_code::RATE_LIMITED,
        )
    }

    pub fn feature_disabled(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message, app_code::FEATURE_DISABLED)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            message,
            app_code::INTERNAL_SERVER_ERROR,
        )
    }

    pub fn unknown() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Unknown error",
            app_code::UNKNOWN_ERROR,
        )
    }
}

impl From<LifecycleError> for AppError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::Validation(message) => AppError::validation(message),
            LifecycleError::NotFound => AppError::not_found("Notification not found"),
            LifecycleError::FeatureDisabled => {
                AppError::feature_disabled("Notifications are currently disabled")
            }
            LifecycleError::RateLimited => {
                AppError::rate_limited("Too many requests. Please try again later.")
            }
            // Unexpected store failures become a bad request carrying the
            // original failure as detail.
            LifecycleError::Store(source) => {
                tracing::error!(error = ?source, "notification store failure");
                AppError::bad_request("Error performing notification operation")
                    .with_details(Value::String(source.to_string()))
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(err) => AppError::validation(err.body_text()),
            JsonRejection::JsonSyntaxError(_) => AppError::bad_json("Invalid JSON format"),
            JsonRejection::MissingJsonContentType(_) => {
                AppError::bad_json("Expected application/json content type")
            }
            other => AppError::bad_request(other.body_text()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = if self.status.is_server_error() {
            "error"
        } else {
            "failed"
        };
        let body = FailureBody {
            status,
            message: self.message,
            details: self.details.unwrap_or(Value::Null),
            app_code: self.app_code,
            timestamp: timestamp(),
        };
        (self.status, Json(body)).into_response()
    }
}
