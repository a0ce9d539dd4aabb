#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use faro::app::cache::NotificationCache;
use faro::app::events::{EventRegistry, LogListener};
use faro::app::features::FeatureGate;
use faro::app::lifecycle::NotificationLifecycle;
use faro::app::throttle::ThrottleGate;
use faro::infra::email::LogEmailSender;
use faro::infra::memory::{MemoryCacheBackend, MemoryNotificationStore, MemorySummaryStore};
use faro::AppState;

// ---------------------------------------------------------------------------
// TestApp — the full router over in-memory backends. Each test builds its
// own instance so throttle and feature state never leak between tests.
// ---------------------------------------------------------------------------

pub struct TestApp {
    router: Router,
    pub state: AppState,
    pub store: Arc<MemoryNotificationStore>,
}

pub struct TestResponse {
    pub status: StatusCode,
    body_bytes: bytes::Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body_bytes).unwrap_or(Value::Null)
    }

    pub fn data(&self) -> Value {
        self.json()["data"].clone()
    }

    pub fn app_code(&self) -> String {
        self.json()["appCode"].as_str().unwrap_or("").to_string()
    }

    pub fn envelope_status(&self) -> String {
        self.json()["status"].as_str().unwrap_or("").to_string()
    }
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_throttle_delay(Duration::ZERO)
    }

    pub fn with_throttle_delay(delay: Duration) -> Self {
        let store = Arc::new(MemoryNotificationStore::new());
        let summaries = Arc::new(MemorySummaryStore::new());
        let cache = NotificationCache::new(Arc::new(MemoryCacheBackend::new()), 60);

        let events = Arc::new(EventRegistry::new());
        events.register(Arc::new(LogListener));

        let lifecycle = NotificationLifecycle::new(
            store.clone(),
            summaries,
            cache,
            events,
            Arc::new(ThrottleGate::new(delay)),
            Arc::new(FeatureGate::new(true)),
            Arc::new(LogEmailSender::new("test@localhost")),
        );

        let state = AppState { lifecycle };
        let router = faro::http::router(state.clone());

        TestApp {
            router,
            state,
            store,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> TestResponse {
        let builder = Request::builder()
            .method(method)
            .uri(path)
            .header("host", "localhost");

        let request = if let Some(body) = body {
            builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap()
        } else {
            builder.body(Body::empty()).unwrap()
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("request failed");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("failed to read body")
            .to_bytes();

        TestResponse { status, body_bytes }
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Method::GET, path, None).await
    }

    pub async fn post_json(&self, path: &str, body: Value) -> TestResponse {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn put_json(&self, path: &str, body: Value) -> TestResponse {
        self.request(Method::PUT, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request(Method::DELETE, path, None).await
    }

    /// POSTs a raw (possibly malformed) body with a JSON content type.
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method(Method::POST)
            .uri(path)
            .header("host", "localhost")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("request failed");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("failed to read body")
            .to_bytes();

        TestResponse { status, body_bytes }
    }
}
