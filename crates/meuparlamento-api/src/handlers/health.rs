//! Service status handlers.
//!
//! `GET /` answers a fixed greeting; `GET /health` reports document store
//! connectivity for liveness and readiness probes.

use crate::models::{HealthResponse, HelloResponse};
use crate::routes::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;
use tracing::{instrument, warn};

/// Greeting returned by `GET /`.
pub const HELLO_MESSAGE: &str = "meuParlamento!";

/// Handler for GET /
#[instrument(skip_all, name = "api.health.index")]
pub async fn index() -> Json<HelloResponse> {
    Json(HelloResponse {
        hello: HELLO_MESSAGE.to_string(),
    })
}

/// Health check handler.
///
/// Pings the document store and returns the service status.
///
/// ## Response
///
/// - 200 `{"status": "healthy", "database": "healthy"}`
/// - 503 `{"status": "unhealthy", "database": "unhealthy"}`
#[instrument(skip_all, name = "api.health.check")]
pub async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    match state.service.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy".to_string(),
                database: Some("healthy".to_string()),
            }),
        ),
        Err(e) => {
            warn!(target: "api.health", error = %e, "Document store ping failed");
            // Still answer with a body so probes can see the reason.
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unhealthy".to_string(),
                    database: Some("unhealthy".to_string()),
                }),
            )
        }
    }
}
