//! News handlers.
//!
//! - `GET /proposals/news/{proposal_id}` - News for the stored vote date
//! - `GET /proposals/news/{proposal_id}/{proposal_date}` - News for a given date

use crate::errors::ApiError;
use crate::handlers::envelope::GzipJson;
use crate::handlers::proposals::{parse_integer, path_segments};
use crate::models::DataEnvelope;
use crate::routes::AppState;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use std::sync::Arc;
use tracing::{error, instrument, warn};

/// Handler for GET /proposals/news/{proposal_id}
///
/// Returns 404 if the proposal does not exist.
#[instrument(skip_all, name = "api.news.by_proposal")]
pub async fn news_for_proposal(
    State(state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
) -> Result<GzipJson, ApiError> {
    let raw = path_segments(path)?;
    let proposal_id = parse_integer("proposal id", &raw)?;

    let hits = state
        .service
        .news_search_for_proposal(proposal_id)
        .await
        .map_err(|e| {
            if e.is_server_error() {
                error!(target: "api.handlers.news", proposal_id, "Failed to search news");
            }
            e
        })?;

    GzipJson::encode(&DataEnvelope::new(hits))
}

/// Handler for GET /proposals/news/{proposal_id}/{proposal_date}
///
/// `proposal_date` is `YYYY-MM-DD`. The document store is not consulted.
#[instrument(skip_all, name = "api.news.by_date")]
pub async fn news_for_date(
    State(state): State<Arc<AppState>>,
    path: Result<Path<(String, String)>, PathRejection>,
) -> Result<GzipJson, ApiError> {
    let (raw_id, proposal_date) = path_segments(path)?;
    let proposal_id = parse_integer("proposal id", &raw_id)?;

    let hits = state
        .service
        .news_search(proposal_id, &proposal_date)
        .map_err(|e| {
            warn!(
                target: "api.handlers.news",
                proposal_id,
                proposal_date = %proposal_date,
                "Rejected news date"
            );
            e
        })?;

    GzipJson::encode(&DataEnvelope::new(hits))
}
