//! Notification device registration handler.

use crate::errors::{ApiError, DeviceRegistrationError};
use crate::models::{MessageResponse, RegisterDeviceRequest};
use crate::routes::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;
use tracing::{info, instrument};

/// Message returned after a successful registration.
pub const DEVICE_REGISTERED_MESSAGE: &str = "Device registered for notification";

/// Handler for POST /register_device
///
/// Registers a push notification token. Registering a known token again
/// refreshes its timestamp.
///
/// # Response
///
/// - 201 Created: `{"message": "Device registered for notification"}`
/// - 400 Bad Request: missing or malformed body, empty token
/// - 500 Internal Server Error: store failure
#[instrument(skip_all, name = "api.devices.register")]
pub async fn register_device(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegisterDeviceRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), DeviceRegistrationError> {
    let Json(request) =
        payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    let token = request
        .validate()
        .map_err(|reason| ApiError::BadRequest(reason.to_string()))?;

    state.service.register_device(token).await?;

    info!(target: "api.handlers.devices", "Notification device registered");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new(DEVICE_REGISTERED_MESSAGE)),
    ))
}
