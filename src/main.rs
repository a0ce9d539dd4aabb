use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use faro::app::cache::NotificationCache;
use faro::app::events::{EventRegistry, LogListener};
use faro::app::features::FeatureGate;
use faro::app::lifecycle::NotificationLifecycle;
use faro::app::throttle::ThrottleGate;
use faro::config::AppConfig;
use faro::http;
use faro::infra::cache::RedisCache;
use faro::infra::db::Db;
use faro::infra::email::LogEmailSender;
use faro::infra::postgres::{PgNotificationStore, PgSummaryStore};
use faro::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    let db = Db::connect(&config).await?;
    let redis = RedisCache::connect(&config.redis_url).await?;

    let store = Arc::new(PgNotificationStore::new(db.clone()));
    let summaries = Arc::new(PgSummaryStore::new(db));
    let cache = NotificationCache::new(Arc::new(redis), config.cache_ttl_seconds);

    let events = Arc::new(EventRegistry::new());
    events.register(Arc::new(LogListener));

    let lifecycle = NotificationLifecycle::new(
        store,
        summaries,
        cache,
        events,
        Arc::new(ThrottleGate::new(Duration::from_millis(
            config.throttle_delay_ms,
        ))),
        Arc::new(FeatureGate::new(config.notifications_enabled)),
        Arc::new(LogEmailSender::new(config.email_from.clone())),
    );

    let state = AppState { lifecycle };

    let app: Router = http::router(state).layer(TraceLayer::new_for_http());
    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    tracing::info!("listening on {}", config.http_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
