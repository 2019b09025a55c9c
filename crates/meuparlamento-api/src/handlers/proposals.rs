//! Proposal handlers.
//!
//! - `GET /proposals/batch/{batch_size}` - Balanced random batch
//! - `GET /proposals/recent/{batch_size}` - Most recently voted proposals
//! - `GET /proposals/authors/{proposal_id}` - Authors of a proposal
//!
//! Responses are gzip-compressed `{"data": [...]}` envelopes.

use crate::errors::ApiError;
use crate::handlers::envelope::GzipJson;
use crate::models::DataEnvelope;
use crate::routes::AppState;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use std::sync::Arc;
use tracing::{error, instrument};

/// Unwrap a path extraction, mapping axum's rejection to `BadRequest`.
pub(crate) fn path_segments<T>(path: Result<Path<T>, PathRejection>) -> Result<T, ApiError> {
    path.map(|Path(segments)| segments)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

/// Parse an integer path segment such as a batch size or proposal id.
pub(crate) fn parse_integer(name: &str, raw: &str) -> Result<i64, ApiError> {
    raw.trim().parse().map_err(|e| {
        ApiError::BadRequest(format!("{} '{}' is not an integer: {}", name, raw, e))
    })
}

/// Handler for GET /proposals/batch/{batch_size}
#[instrument(skip_all, name = "api.proposals.batch")]
pub async fn sampling_batch(
    State(state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<GzipJson, ApiError> {
    let raw = path_segments(path)?;
    let batch_size = parse_integer("batch size", &raw)?;

    let batch = state.service.sampling_batch(batch_size).await.map_err(|e| {
        if e.is_server_error() {
            error!(target: "api.handlers.proposals", batch_size, "Failed to build proposal batch");
        }
        e
    })?;

    GzipJson::encode(&DataEnvelope::new(batch))
}

/// Handler for GET /proposals/recent/{batch_size}
#[instrument(skip_all, name = "api.proposals.recent")]
pub async fn recent_batch(
    State(state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<GzipJson, ApiError> {
    let raw = path_segments(path)?;
    let batch_size = parse_integer("batch size", &raw)?;

    let batch = state.service.recent_batch(batch_size).await.map_err(|e| {
        if e.is_server_error() {
            error!(target: "api.handlers.proposals", batch_size, "Failed to build recent batch");
        }
        e
    })?;

    GzipJson::encode(&DataEnvelope::new(batch))
}

/// Handler for GET /proposals/authors/{proposal_id}
///
/// Returns 404 if the proposal does not exist.
#[instrument(skip_all, name = "api.proposals.authors")]
pub async fn authors(
    State(state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<GzipJson, ApiError> {
    let raw = path_segments(path)?;
    let proposal_id = parse_integer("proposal id", &raw)?;

    let hits = state
        .service
        .find_authors_by_proposal_id(proposal_id)
        .await
        .map_err(|e| {
            if e.is_server_error() {
                error!(target: "api.handlers.proposals", proposal_id, "Failed to search authors");
            }
            e
        })?;

    GzipJson::encode(&DataEnvelope::new(hits))
}
