//! Gzip-compressed JSON response body.

use crate::errors::ApiError;
use axum::{
    http::header,
    response::{IntoResponse, Response},
};
use flate2::{write::GzEncoder, Compression};
use serde::Serialize;
use std::io::Write;

/// JSON body compressed with gzip, sent with `Content-Encoding: gzip`.
///
/// Compression happens eagerly in [`GzipJson::encode`] so serialization
/// failures surface as an [`ApiError`] instead of a broken response.
#[derive(Debug, Clone)]
pub struct GzipJson(Vec<u8>);

impl GzipJson {
    /// Serialize `value` to JSON and gzip it.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Internal` if serialization or compression fails.
    pub fn encode<T: Serialize>(value: &T) -> Result<Self, ApiError> {
        let json = serde_json::to_vec(value).map_err(|e| {
            tracing::error!(target: "api.handlers", error = %e, "Failed to serialize response");
            ApiError::Internal
        })?;

        let compression_failed = |e: std::io::Error| {
            tracing::error!(target: "api.handlers", error = %e, "Failed to compress response");
            ApiError::Internal
        };

        let mut encoder = GzEncoder::new(Vec::with_capacity(json.len() / 2), Compression::default());
        encoder.write_all(&json).map_err(compression_failed)?;
        let compressed = encoder.finish().map_err(compression_failed)?;

        Ok(GzipJson(compressed))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl IntoResponse for GzipJson {
    fn into_response(self) -> Response {
        (
            [
                (header::CONTENT_TYPE, "application/json"),
                (header::CONTENT_ENCODING, "gzip"),
            ],
            self.0,
        )
            .into_response()
    }
}
