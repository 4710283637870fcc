//! # API REST
//!
//! REST API for the admin notification service.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, API key checking)
//!
//! Uses `api-shared` for wire types and `notify-core` for the notification state.

#![warn(rust_2018_idioms)]

use api_shared::auth::{validate_api_key, API_KEY_HEADER};
use api_shared::{
    ConnectionRes, HealthRes, HealthService, ListNotificationsRes, NavigationRes,
    NotificationRes, StartSessionReq, StartSessionRes, UnreadCountRes,
};
use axum::{
    extract::{Path as AxumPath, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{Json, Response},
    routing::{get, post},
    Router,
};
use notify_channel::ConnectionState;
use notify_core::{NotificationService, NotifyError, Session};
use notify_types::NotificationId;
use std::sync::Arc;
use tokio::sync::watch;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared across REST handlers
#[derive(Clone)]
pub struct AppState {
    service: NotificationService,
    connection: watch::Receiver<ConnectionState>,
    api_key: Option<Arc<str>>,
}

impl AppState {
    /// When `api_key` is set every route except `/health` requires a matching `x-api-key`
    /// header.
    pub fn new(
        service: NotificationService,
        connection: watch::Receiver<ConnectionState>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            service,
            connection,
            api_key: api_key.map(Arc::from),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        start_session,
        end_session,
        list_notifications,
        unread_count,
        mark_read,
        mark_all_read,
        open_notification,
        clear_notifications,
        connection,
    ),
    components(schemas(
        HealthRes,
        NotificationRes,
        ListNotificationsRes,
        UnreadCountRes,
        StartSessionReq,
        StartSessionRes,
        NavigationRes,
        ConnectionRes,
    ))
)]
pub struct ApiDoc;

/// Build the REST router, including Swagger UI at `/swagger-ui`.
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/session", post(start_session).delete(end_session))
        .route(
            "/notifications",
            get(list_notifications).delete(clear_notifications),
        )
        .route("/notifications/unread-count", get(unread_count))
        .route("/notifications/read-all", post(mark_all_read))
        .route("/notifications/:id/read", post(mark_read))
        .route("/notifications/:id/open", post(open_notification))
        .route("/connection", get(connection))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_key,
        ));

    Router::new()
        .route("/health", get(health))
        .merge(protected)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn require_api_key(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, (StatusCode, &'static str)> {
    if let Some(expected) = state.api_key.as_deref() {
        let provided = req
            .headers()
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok());
        if let Err(e) = validate_api_key(provided, expected) {
            tracing::warn!("Rejected request to {}: {}", req.uri().path(), e);
            return Err((StatusCode::UNAUTHORIZED, "Invalid or missing API key"));
        }
    }
    Ok(next.run(req).await)
}

fn parse_id(raw: &str) -> Result<NotificationId, (StatusCode, &'static str)> {
    raw.parse().map_err(|e| {
        tracing::error!("Invalid notification id: {:?}", e);
        (StatusCode::BAD_REQUEST, "Invalid notification id")
    })
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint, never behind the API key
#[axum::debug_handler]
async fn health() -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    post,
    path = "/session",
    request_body = StartSessionReq,
    responses(
        (status = 201, description = "Session started", body = StartSessionRes),
        (status = 400, description = "Blank token or admin id"),
        (status = 409, description = "A session is already active")
    )
)]
/// Start the notification session for a signed-in admin
///
/// Loads the admin's persisted notifications and connects the realtime channel with `token`.
///
/// # Errors
/// Returns `409 Conflict` if a session is already running; sign out first.
#[axum::debug_handler]
async fn start_session(
    State(state): State<AppState>,
    Json(req): Json<StartSessionReq>,
) -> Result<(StatusCode, Json<StartSessionRes>), (StatusCode, &'static str)> {
    let session = match Session::new(&req.token, &req.admin_id) {
        Ok(session) => session,
        Err(e) => {
            tracing::error!("Invalid session request: {:?}", e);
            return Err((StatusCode::BAD_REQUEST, "token and admin_id are required"));
        }
    };
    let admin_id = session.admin_id.to_string();

    match state.service.start(session) {
        Ok(()) => Ok((StatusCode::CREATED, Json(StartSessionRes { admin_id }))),
        Err(NotifyError::SessionActive) => {
            Err((StatusCode::CONFLICT, "A session is already active"))
        }
        Err(e) => {
            tracing::error!("Start session error: {:?}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, "Internal error"))
        }
    }
}

#[utoipa::path(
    delete,
    path = "/session",
    responses(
        (status = 204, description = "Signed out; notifications discarded")
    )
)]
/// Sign out: drop the in-memory list, empty its stored copy and disconnect
#[axum::debug_handler]
async fn end_session(State(state): State<AppState>) -> StatusCode {
    if !state.service.stop() {
        tracing::debug!("Sign-out without an active session");
    }
    StatusCode::NO_CONTENT
}

#[utoipa::path(
    get,
    path = "/notifications",
    responses(
        (status = 200, description = "Notifications, newest first", body = ListNotificationsRes)
    )
)]
#[axum::debug_handler]
async fn list_notifications(State(state): State<AppState>) -> Json<ListNotificationsRes> {
    Json(ListNotificationsRes::from_snapshot(
        &state.service.notifications(),
    ))
}

#[utoipa::path(
    get,
    path = "/notifications/unread-count",
    responses(
        (status = 200, description = "Unread notifications", body = UnreadCountRes)
    )
)]
#[axum::debug_handler]
async fn unread_count(State(state): State<AppState>) -> Json<UnreadCountRes> {
    Json(UnreadCountRes {
        unread_count: state.service.unread_count() as u64,
    })
}

#[utoipa::path(
    post,
    path = "/notifications/{id}/read",
    params(("id" = String, Path, description = "Notification id")),
    responses(
        (status = 204, description = "Marked read; unknown ids are ignored"),
        (status = 400, description = "Malformed notification id")
    )
)]
#[axum::debug_handler]
async fn mark_read(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<StatusCode, (StatusCode, &'static str)> {
    let id = parse_id(&id)?;
    state.service.mark_one_as_read(&id);
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/notifications/read-all",
    responses(
        (status = 204, description = "All notifications marked read")
    )
)]
#[axum::debug_handler]
async fn mark_all_read(State(state): State<AppState>) -> StatusCode {
    state.service.mark_all_as_read();
    StatusCode::NO_CONTENT
}

#[utoipa::path(
    post,
    path = "/notifications/{id}/open",
    params(("id" = String, Path, description = "Notification id")),
    responses(
        (status = 200, description = "Marked read; where the notification leads", body = NavigationRes),
        (status = 400, description = "Malformed notification id")
    )
)]
/// Panel row click
///
/// Marks the notification read and returns the dashboard route it leads to, if any.
#[axum::debug_handler]
async fn open_notification(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<NavigationRes>, (StatusCode, &'static str)> {
    let id = parse_id(&id)?;
    Ok(Json(NavigationRes::from(state.service.open(&id))))
}

#[utoipa::path(
    delete,
    path = "/notifications",
    responses(
        (status = 204, description = "All notifications removed")
    )
)]
#[axum::debug_handler]
async fn clear_notifications(State(state): State<AppState>) -> StatusCode {
    state.service.clear_all_notifications();
    StatusCode::NO_CONTENT
}

#[utoipa::path(
    get,
    path = "/connection",
    responses(
        (status = 200, description = "Realtime channel state", body = ConnectionRes)
    )
)]
#[axum::debug_handler]
async fn connection(State(state): State<AppState>) -> Json<ConnectionRes> {
    let current = *state.connection.borrow();
    Json(connection_res(current))
}

fn connection_res(state: ConnectionState) -> ConnectionRes {
    let (name, attempt) = match state {
        ConnectionState::Disconnected => ("disconnected", None),
        ConnectionState::Connecting => ("connecting", None),
        ConnectionState::Open => ("open", None),
        ConnectionState::Backoff { attempt } => ("backoff", Some(attempt + 1)),
    };
    ConnectionRes {
        state: name.to_string(),
        attempt,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Method, Request as HttpRequest};
    use http_body_util::BodyExt;
    use notify_core::{CoreConfig, EventSource, SessionCredential, Subscription};
    use notify_store::{MemoryNotificationStore, StoreScopeMode};
    use notify_types::RawEvent;
    use serde_json::{json, Value};
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tower::ServiceExt;

    #[derive(Default)]
    struct TestSource {
        senders: Mutex<Vec<mpsc::Sender<RawEvent>>>,
    }

    impl TestSource {
        fn latest(&self) -> mpsc::Sender<RawEvent> {
            self.senders.lock().unwrap().last().unwrap().clone()
        }
    }

    impl EventSource for TestSource {
        fn subscribe(&self, _credential: &SessionCredential) -> Subscription {
            let (tx, rx) = mpsc::channel(16);
            let (shutdown, _) = watch::channel(false);
            self.senders.lock().unwrap().push(tx);
            Subscription::new(rx, shutdown)
        }
    }

    struct Harness {
        state: AppState,
        source: Arc<TestSource>,
        connection: watch::Sender<ConnectionState>,
    }

    fn harness(api_key: Option<&str>) -> Harness {
        let source = Arc::new(TestSource::default());
        let config = CoreConfig::new("unused".into(), StoreScopeMode::Identity, 16).unwrap();
        let service = NotificationService::new(
            Arc::new(MemoryNotificationStore::new()),
            source.clone(),
            &config,
        );
        let (connection, rx) = watch::channel(ConnectionState::Disconnected);
        Harness {
            state: AppState::new(service, rx, api_key.map(str::to_string)),
            source,
            connection,
        }
    }

    async fn send(
        state: &AppState,
        method: Method,
        uri: &str,
        body: Option<Value>,
        api_key: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = HttpRequest::builder().method(method).uri(uri);
        if let Some(key) = api_key {
            builder = builder.header(API_KEY_HEADER, key);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = router(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn wait_for_len(state: &AppState, len: usize) {
        for _ in 0..200 {
            if state.service.notifications().len() == len {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("notifications never reached {}", len);
    }

    async fn start(state: &AppState) {
        let (status, body) = send(
            state,
            Method::POST,
            "/session",
            Some(json!({"token": "tok", "admin_id": "admin@example.com"})),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["admin_id"], "admin@example.com");
    }

    #[tokio::test]
    async fn test_health() {
        let h = harness(Some("secret"));
        let (status, body) = send(&h.state, Method::GET, "/health", None, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn test_api_key_enforced_when_configured() {
        let h = harness(Some("secret"));

        let (status, _) = send(&h.state, Method::GET, "/notifications", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) =
            send(&h.state, Method::GET, "/notifications", None, Some("wrong")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) =
            send(&h.state, Method::GET, "/notifications", None, Some("secret")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"notifications": [], "unread_count": 0}));
    }

    #[tokio::test]
    async fn test_session_start_rules() {
        let h = harness(None);

        let (status, _) = send(
            &h.state,
            Method::POST,
            "/session",
            Some(json!({"token": " ", "admin_id": "a"})),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        start(&h.state).await;

        let (status, _) = send(
            &h.state,
            Method::POST,
            "/session",
            Some(json!({"token": "tok", "admin_id": "other"})),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = send(&h.state, Method::DELETE, "/session", None, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        start(&h.state).await;
    }

    #[tokio::test]
    async fn test_notification_flow() {
        let h = harness(None);
        start(&h.state).await;

        let tx = h.source.latest();
        tx.send(RawEvent::new("new_report_filed", "New report filed regarding: Ana.").unwrap())
            .await
            .unwrap();
        tx.send(RawEvent::new("verification_approved", "Approved.").unwrap())
            .await
            .unwrap();
        tx.send(RawEvent::new("system_notice", "Heads up.").unwrap())
            .await
            .unwrap();
        wait_for_len(&h.state, 3).await;

        let (status, body) = send(&h.state, Method::GET, "/notifications", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["unread_count"], 3);
        let list = body["notifications"].as_array().unwrap();
        assert_eq!(list[0]["title"], "System Notice");
        assert_eq!(list[1]["category"], "success");
        assert_eq!(list[2]["details"]["kind"], "new_report_filed");

        let report_id = list[2]["id"].as_str().unwrap().to_string();
        let notice_id = list[0]["id"].as_str().unwrap().to_string();

        let (status, body) = send(
            &h.state,
            Method::POST,
            &format!("/notifications/{}/open", report_id),
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["target"], "/reports");

        let (_, body) = send(
            &h.state,
            Method::POST,
            &format!("/notifications/{}/open", notice_id),
            None,
            None,
        )
        .await;
        assert_eq!(body["target"], Value::Null);

        let (_, body) =
            send(&h.state, Method::GET, "/notifications/unread-count", None, None).await;
        assert_eq!(body["unread_count"], 1);

        let (status, _) =
            send(&h.state, Method::POST, "/notifications/read-all", None, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(h.state.service.unread_count(), 0);

        let (status, _) = send(&h.state, Method::DELETE, "/notifications", None, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(h.state.service.notifications().is_empty());
    }

    #[tokio::test]
    async fn test_mark_read_single() {
        let h = harness(None);
        start(&h.state).await;
        h.source
            .latest()
            .send(RawEvent::new("report_rejected", "Rejected.").unwrap())
            .await
            .unwrap();
        wait_for_len(&h.state, 1).await;
        let id = h.state.service.notifications()[0].id.to_string();

        let (status, _) = send(
            &h.state,
            Method::POST,
            &format!("/notifications/{}/read", id),
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(h.state.service.unread_count(), 0);

        // unknown but well-formed ids are a no-op
        let unknown = NotificationId::generate(None).to_string();
        let (status, _) = send(
            &h.state,
            Method::POST,
            &format!("/notifications/{}/read", unknown),
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_malformed_id_is_bad_request() {
        let h = harness(None);
        let (status, _) = send(
            &h.state,
            Method::POST,
            "/notifications/not-an-id/read",
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_connection_state() {
        let h = harness(None);
        let (_, body) = send(&h.state, Method::GET, "/connection", None, None).await;
        assert_eq!(body, json!({"state": "disconnected"}));

        h.connection
            .send_replace(ConnectionState::Backoff { attempt: 2 });
        let (_, body) = send(&h.state, Method::GET, "/connection", None, None).await;
        assert_eq!(body, json!({"state": "backoff", "attempt": 3}));
    }

    #[tokio::test]
    async fn test_openapi_document_served() {
        let h = harness(None);
        let (status, body) =
            send(&h.state, Method::GET, "/api-docs/openapi.json", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/notifications/{id}/open"].is_object());
    }
}
