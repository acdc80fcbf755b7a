//! HTTP server: operator dashboard, inbound event webhook, health check.
//!
//! The dashboard turns one form submission into one reconciliation batch;
//! the webhook turns one sidecar POST into one gateway event. Both are thin
//! adapters around the core.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{Html, Json, Redirect},
    routing::{get, post},
    Form, Router,
};
use replybot_core::{
    config::DashboardConfig,
    message::IncomingMessage,
    reconcile::{self, ReconcileBatch},
    store::ConfigStore,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Shared state for dashboard and API handlers.
#[derive(Clone)]
pub struct ApiState {
    config: DashboardConfig,
    store: ConfigStore,
    tx: mpsc::Sender<IncomingMessage>,
    uptime: Instant,
}

impl ApiState {
    pub fn new(
        config: DashboardConfig,
        store: ConfigStore,
        tx: mpsc::Sender<IncomingMessage>,
        uptime: Instant,
    ) -> Self {
        Self {
            config,
            store,
            tx,
            uptime,
        }
    }
}

/// Inbound event body POSTed by the messaging sidecar.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventRequest {
    /// Conversation the message arrived in.
    source_id: String,
    /// Direct-contact identifier of the sender.
    sender_id: String,
    #[serde(default)]
    sender_name: Option<String>,
    #[serde(default)]
    sender_number: Option<String>,
    body: String,
    #[serde(default)]
    is_group: bool,
}

/// Constant-time string comparison to prevent timing attacks on token validation.
fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}

/// Check bearer token auth. Returns `None` if authorized, `Some(response)` if rejected.
fn check_auth(headers: &HeaderMap, api_key: &str) -> Option<(StatusCode, Json<Value>)> {
    if api_key.is_empty() {
        return None; // No auth configured — allow all.
    }

    let header = match headers.get("authorization") {
        Some(h) => h,
        None => {
            return Some((
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "missing Authorization header"})),
            ));
        }
    };

    let value = match header.to_str() {
        Ok(v) => v,
        Err(_) => {
            return Some((
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "invalid Authorization header"})),
            ));
        }
    };

    match value.strip_prefix("Bearer ") {
        Some(token) if constant_time_eq(token, api_key) => None, // Authorized.
        _ => Some((
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "invalid token"})),
        )),
    }
}

/// `GET /` — the management page.
async fn index(State(state): State<ApiState>) -> Result<Html<String>, (StatusCode, Html<String>)> {
    let doc = state.store.load().map_err(|e| {
        error!("failed to load reply configuration: {e}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html("failed to load configuration".to_string()),
        )
    })?;

    match crate::dashboard::render(&doc) {
        Ok(page) => Ok(Html(page)),
        Err(e) => {
            error!("failed to render dashboard: {e}");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Html("failed to render dashboard".to_string()),
            ))
        }
    }
}

/// `POST /save` — one reconciliation batch from the dashboard form.
///
/// Always redirects back to the page: ignored fields and stale revisions
/// never surface as submission errors. A stale revision is logged and the
/// page re-renders from the winning document.
async fn save(
    State(state): State<ApiState>,
    Form(fields): Form<HashMap<String, String>>,
) -> Redirect {
    let batch = ReconcileBatch::from_form(&fields);

    match state.store.load() {
        Ok(current) => {
            if batch.revision.is_some_and(|r| r != current.revision) {
                warn!(
                    "discarding stale dashboard submission (form revision {:?}, document at {})",
                    batch.revision, current.revision
                );
                return Redirect::to("/");
            }

            let next = reconcile::reconcile(&current, &batch);
            match state.store.replace(&next) {
                Ok(stored) => {
                    info!("reply configuration updated to revision {}", stored.revision)
                }
                Err(e) => warn!("failed to persist reconciled configuration: {e}"),
            }
        }
        Err(e) => error!("failed to load reply configuration: {e}"),
    }

    Redirect::to("/")
}

/// `POST /api/event` — inbound event webhook from the messaging sidecar.
async fn event(
    headers: HeaderMap,
    State(state): State<ApiState>,
    Json(req): Json<EventRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if let Some(err) = check_auth(&headers, &state.config.api_key) {
        return Err(err);
    }

    let incoming = IncomingMessage {
        id: Uuid::new_v4(),
        channel: "bridge".to_string(),
        chat_id: req.source_id,
        sender_id: req.sender_id,
        sender_name: req.sender_name,
        sender_number: req.sender_number,
        text: req.body,
        timestamp: chrono::Utc::now(),
        is_group: req.is_group,
    };

    match state.tx.send(incoming).await {
        Ok(()) => Ok(Json(json!({"status": "accepted"}))),
        Err(e) => {
            error!("gateway queue closed: {e}");
            Err((
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({"error": "gateway not running"})),
            ))
        }
    }
}

/// `GET /api/health` — uptime and document stats.
async fn health(
    headers: HeaderMap,
    State(state): State<ApiState>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if let Some(err) = check_auth(&headers, &state.config.api_key) {
        return Err(err);
    }

    let doc = state.store.load().map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": e.to_string()})),
        )
    })?;

    Ok(Json(json!({
        "status": "ok",
        "uptime_secs": state.uptime.elapsed().as_secs(),
        "keywords": doc.keywords.len(),
        "targets": doc.targets.len(),
        "revision": doc.revision,
    })))
}

/// Bind and serve until the gateway shuts down.
pub async fn serve(state: ApiState) {
    let addr = format!("{}:{}", state.config.host, state.config.port);
    let app = Router::new()
        .route("/", get(index))
        .route("/save", post(save))
        .route("/api/event", post(event))
        .route("/api/health", get(health))
        .with_state(state);

    info!("dashboard listening on http://{addr}");
    match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => {
            if let Err(e) = axum::serve(listener, app).await {
                error!("dashboard server error: {e}");
            }
        }
        Err(e) => error!("failed to bind dashboard on {addr}: {e}"),
    }
}
