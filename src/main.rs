use api_rest::AppState;
use notify_channel::{ChannelConfig, WebSocketSource, channel_url_from_env_value};
use notify_core::config::{alert_capacity_from_env_value, scope_mode_from_env_value};
use notify_core::constants::DEFAULT_DATA_DIR;
use notify_core::{Alert, CoreConfig, NotificationService, Session};
use notify_store::FileNotificationStore;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the notification service
///
/// Wires the file store, the realtime channel and the reconciliation service together and serves
/// the REST API (with Swagger UI) until interrupted.
///
/// # Environment Variables
/// - `NOTIFY_DATA_DIR`: Directory for persisted notification lists (default: "notification_data")
/// - `NOTIFY_STORE_SCOPE`: `identity` (per admin, default) or `deployment` (one shared list)
/// - `NOTIFY_ALERT_CAPACITY`: Alerts buffered per alert subscriber (default: 64)
/// - `NOTIFY_WS_URL`: Notification channel endpoint (default: "ws://localhost:8000/admin/ws/notifications")
/// - `NOTIFY_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `NOTIFY_API_KEY`: When set, required as `x-api-key` on every route except `/health`
/// - `NOTIFY_SESSION_TOKEN` + `NOTIFY_ADMIN_ID`: When both are set, a session starts at boot
///
/// # Errors
/// Returns an error if configuration is invalid, the data directory cannot be used, or the
/// REST server fails to bind or run.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("notify=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let data_dir = env_value("NOTIFY_DATA_DIR").unwrap_or_else(|| DEFAULT_DATA_DIR.into());
    let cfg = CoreConfig::new(
        data_dir.into(),
        scope_mode_from_env_value(env_value("NOTIFY_STORE_SCOPE"))?,
        alert_capacity_from_env_value(env_value("NOTIFY_ALERT_CAPACITY"))?,
    )?;
    let channel_cfg = ChannelConfig::new(&channel_url_from_env_value(env_value("NOTIFY_WS_URL")))?;
    let rest_addr = env_value("NOTIFY_REST_ADDR").unwrap_or_else(|| "0.0.0.0:3000".into());
    let api_key = env_value("NOTIFY_API_KEY");

    tracing::info!(
        "++ Notification store at {} ({:?} scope)",
        cfg.data_dir().display(),
        cfg.scope_mode()
    );
    tracing::info!("++ Notification channel at {}", channel_cfg.url());

    let store = Arc::new(FileNotificationStore::new(cfg.data_dir())?);
    let source = Arc::new(WebSocketSource::new(channel_cfg));
    let connection = source.state();
    let service = NotificationService::new(store, source, &cfg);

    tokio::spawn(log_alerts(service.subscribe_alerts()));

    if let (Some(token), Some(admin_id)) = (
        env_value("NOTIFY_SESSION_TOKEN"),
        env_value("NOTIFY_ADMIN_ID"),
    ) {
        service.start(Session::new(token, admin_id)?)?;
    }

    if api_key.is_none() {
        tracing::warn!("NOTIFY_API_KEY not set; REST routes are unauthenticated");
    }
    let app = api_rest::router(AppState::new(service, connection, api_key));

    tracing::info!("++ Starting notification REST API on {}", rest_addr);
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("-- Shutting down");
        })
        .await?;

    Ok(())
}

/// Reads an environment variable, treating blank values as unset.
fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Stands in for the dashboard's toast surface.
async fn log_alerts(mut alerts: broadcast::Receiver<Alert>) {
    loop {
        match alerts.recv().await {
            Ok(alert) => match alert.target {
                Some(target) => tracing::info!("[{}] {} -> {}", alert.category, alert.message, target),
                None => tracing::info!("[{}] {}", alert.category, alert.message),
            },
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!("Alert log fell behind, skipped {} alerts", skipped)
            }
            Err(RecvError::Closed) => break,
        }
    }
}
