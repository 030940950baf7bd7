//! HTTP API for the coordinator
//!
//! - `POST /api/messages` submit a write, blocks until replicated or failed
//! - `GET /api/messages` committed log snapshot
//! - `GET /health` coordinator and replica reachability
//! - `GET /metrics` Prometheus metrics

use crate::common::tracing_middleware::request_tracing_middleware;
use crate::common::{Entry, Error, METRICS};
use crate::coordinator::writer::WriteCoordinator;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct CoordState {
    pub writer: Arc<WriteCoordinator>,
    pub health_probe_timeout: Duration,
}

/// Write request body
#[derive(Debug, Deserialize)]
pub struct MessageCreate {
    pub message: String,
}

/// Successful write response
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub status: String,
    pub sequence_number: u64,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageList {
    pub messages: Vec<Entry>,
}

/// Creates the HTTP router with all public endpoints.
pub fn create_router(state: CoordState) -> Router {
    Router::new()
        .route("/api/messages", get(list_messages).post(append_message))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .layer(axum::middleware::from_fn(request_tracing_middleware))
        .with_state(state)
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.to_http_status();
        (
            status,
            Json(json!({
                "status": "error",
                "error": self.to_string(),
            })),
        )
            .into_response()
    }
}

/// Replicates the message to every replica before answering.
/// Failure responses never carry a sequence number.
async fn append_message(
    State(state): State<CoordState>,
    payload: Result<Json<MessageCreate>, JsonRejection>,
) -> Result<Json<MessageResponse>, Error> {
    let Json(req) = payload.map_err(|e| {
        METRICS.submissions_rejected.inc();
        Error::InvalidInput(e.body_text())
    })?;

    let entry = state.writer.submit(req.message).await?;
    Ok(Json(MessageResponse {
        status: "success".to_string(),
        sequence_number: entry.sequence_number,
        message: entry.content,
    }))
}

async fn list_messages(State(state): State<CoordState>) -> Json<MessageList> {
    Json(MessageList {
        messages: state.writer.list(),
    })
}

/// Reports reachability of each replica. Informational only: writes are
/// never gated on it.
async fn health(State(state): State<CoordState>) -> impl IntoResponse {
    let replicas = state.writer.broadcaster().replicas();
    let probes = replicas.iter().map(|replica| {
        let timeout = state.health_probe_timeout;
        async move {
            match tokio::time::timeout(timeout, replica.heartbeat()).await {
                Ok(Ok(hb)) => json!({
                    "addr": replica.addr(),
                    "status": "healthy",
                    "replica_id": hb.replica_id,
                    "entries": hb.entries,
                }),
                Ok(Err(e)) => json!({
                    "addr": replica.addr(),
                    "status": "unreachable",
                    "error": e.to_string(),
                }),
                Err(_) => json!({
                    "addr": replica.addr(),
                    "status": "unreachable",
                    "error": format!("no heartbeat within {:?}", timeout),
                }),
            }
        }
    });
    let replicas: Vec<serde_json::Value> = join_all(probes).await;
    let all_healthy = replicas.iter().all(|r| r["status"] == "healthy");

    Json(json!({
        "status": if all_healthy { "healthy" } else { "degraded" },
        "entries": state.writer.log().len(),
        "last_sequence_number": state.writer.log().last_sequence(),
        "replication_timeout_ms": state.writer.broadcaster().timeout().as_millis() as u64,
        "replicas": replicas,
        "version": crate::VERSION,
    }))
}

async fn metrics() -> impl IntoResponse {
    (StatusCode::OK, METRICS.to_prometheus())
}
