//! meuParlamento API error types.
//!
//! All errors map to appropriate HTTP status codes via the `IntoResponse` impl.
//! Error messages returned to clients are intentionally generic to avoid
//! leaking internal details. Actual errors are logged server-side.

use crate::models::MessageResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Generic message returned for every request or server failure.
pub const GENERIC_ERROR_MESSAGE: &str =
    "Oops. Something bad happened :( If error persists, please contact system admin";

/// Message returned for any failure of `POST /register_device`.
pub const DEVICE_REGISTRATION_ERROR_MESSAGE: &str =
    "Failed to register device. Unable to support notifications for this device";

/// API error type.
///
/// Rejected input answers 400 and store or internal failures answer 500, both
/// with the generic message. NotFound answers 404 with the resource
/// description.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Database(_) | ApiError::MalformedDocument(_) | ApiError::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Whether the failure is on the server side (store, stored data, or
    /// internal), as opposed to a rejected or unknown request.
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Log the error server-side. Store and internal failures are logged at
    /// error level.
    fn log(&self) {
        match self {
            ApiError::BadRequest(reason) => {
                tracing::warn!(target: "api.request", reason = %reason, "Rejected request");
            }
            ApiError::NotFound(resource) => {
                tracing::debug!(target: "api.request", resource = %resource, "Resource not found");
            }
            ApiError::Database(err) => {
                tracing::error!(target: "api.database", error = %err, "Database operation failed");
            }
            ApiError::MalformedDocument(reason) => {
                tracing::error!(target: "api.database", reason = %reason, "Stored document could not be used");
            }
            ApiError::Internal => {
                tracing::error!(target: "api.request", "Internal error");
            }
        }
    }

    /// Message safe to return to clients.
    fn client_message(&self) -> String {
        match self {
            ApiError::NotFound(resource) => resource.clone(),
            _ => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log();

        (
            self.status_code(),
            Json(MessageResponse::new(self.client_message())),
        )
            .into_response()
    }
}

/// Error of `POST /register_device`.
///
/// Keeps the status code of the wrapped error but always answers with the
/// device registration message.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct DeviceRegistrationError(#[from] pub ApiError);

impl IntoResponse for DeviceRegistrationError {
    fn into_response(self) -> Response {
        self.0.log();
        tracing::error!(target: "api.handlers.devices", "Failed to register notification device");

        (
            self.0.status_code(),
            Json(MessageResponse::new(DEVICE_REGISTRATION_ERROR_MESSAGE)),
        )
            .into_response()
    }
}

/// Convert MongoDB driver errors to ApiError
impl From<mongodb::error::Error> for ApiError {
    fn from(err: mongodb::error::Error) -> Self {
        ApiError::Database(err.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use axum::body::Body;
    use http_body_util::BodyExt;

    // Helper function to read the response body as JSON
    async fn read_body_json(body: Body) -> serde_json::Value {
        let bytes = body.collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_display_bad_request() {
        let error = ApiError::BadRequest("invalid batch size".to_string());
        assert_eq!(format!("{}", error), "Bad request: invalid batch size");
    }

    #[test]
    fn test_display_not_found() {
        let error = ApiError::NotFound("Proposal 12 not found".to_string());
        assert_eq!(format!("{}", error), "Not found: Proposal 12 not found");
    }

    #[test]
    fn test_display_database_error() {
        let error = ApiError::Database("connection refused".to_string());
        assert_eq!(format!("{}", error), "Database error: connection refused");
    }

    #[test]
    fn test_display_internal() {
        let error = ApiError::Internal;
        assert_eq!(format!("{}", error), "Internal server error");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::BadRequest("test".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotFound("test".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Database("test".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::MalformedDocument("test".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Internal.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_is_server_error() {
        assert!(!ApiError::BadRequest("test".to_string()).is_server_error());
        assert!(!ApiError::NotFound("test".to_string()).is_server_error());
        assert!(ApiError::Database("test".to_string()).is_server_error());
        assert!(ApiError::MalformedDocument("test".to_string()).is_server_error());
        assert!(ApiError::Internal.is_server_error());
    }

    #[tokio::test]
    async fn test_into_response_bad_request_is_generic() {
        let error = ApiError::BadRequest("batch size 'abc' is not an integer".to_string());
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body_json = read_body_json(response.into_body()).await;
        assert_eq!(body_json["message"], GENERIC_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn test_into_response_not_found() {
        let error = ApiError::NotFound("Proposal 12 not found".to_string());
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body_json = read_body_json(response.into_body()).await;
        assert_eq!(body_json["message"], "Proposal 12 not found");
    }

    #[tokio::test]
    async fn test_into_response_database_error_hides_details() {
        let error = ApiError::Database("mongodb://user:secret@db:27017 refused".to_string());
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body_json = read_body_json(response.into_body()).await;
        assert_eq!(body_json["message"], GENERIC_ERROR_MESSAGE);
        assert!(!body_json.to_string().contains("secret"));
    }

    #[tokio::test]
    async fn test_device_registration_error_message() {
        let response =
            DeviceRegistrationError(ApiError::BadRequest("missing token".to_string()))
                .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body_json = read_body_json(response.into_body()).await;
        assert_eq!(body_json["message"], DEVICE_REGISTRATION_ERROR_MESSAGE);

        let response =
            DeviceRegistrationError::from(ApiError::Database("timeout".to_string()))
                .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body_json = read_body_json(response.into_body()).await;
        assert_eq!(body_json["message"], DEVICE_REGISTRATION_ERROR_MESSAGE);
    }
}
