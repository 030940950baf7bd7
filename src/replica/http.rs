//! HTTP read API for a replica

use crate::common::tracing_middleware::request_tracing_middleware;
use crate::common::{Entry, METRICS};
use crate::replica::store::ReplicaStore;
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;
use serde_json::json;
use std::time::Duration;

#[derive(Clone)]
pub struct ReplicaState {
    pub store: ReplicaStore,
    pub replica_id: String,
    pub delay: Duration,
}

#[derive(Debug, Serialize)]
pub struct MessageList {
    pub messages: Vec<Entry>,
}

pub fn create_router(state: ReplicaState) -> Router {
    Router::new()
        .route("/api/messages", get(list_messages))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .layer(axum::middleware::from_fn(request_tracing_middleware))
        .with_state(state)
}

async fn list_messages(State(state): State<ReplicaState>) -> Json<MessageList> {
    let messages = state.store.list();
    tracing::debug!(count = messages.len(), "Returning stored messages");
    Json(MessageList { messages })
}

async fn health(State(state): State<ReplicaState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "replica_id": state.replica_id,
        "entries": state.store.len(),
        "delay_ms": state.delay.as_millis() as u64,
        "version": crate::VERSION,
    }))
}

async fn metrics() -> impl IntoResponse {
    (StatusCode::OK, METRICS.to_prometheus())
}
