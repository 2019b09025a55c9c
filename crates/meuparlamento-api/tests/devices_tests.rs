//! Notification device registration integration tests.
//!
//! Tests `POST /register_device` using the `TestApiServer` harness.

use api_test_utils::TestApiServer;
use meuparlamento_api::repositories::mock::InMemoryStore;
use serde_json::{json, Value};
use std::sync::Arc;

const DEVICE_ERROR: &str =
    "Failed to register device. Unable to support notifications for this device";

#[tokio::test]
async fn test_register_device_returns_201() -> Result<(), anyhow::Error> {
    let server = TestApiServer::spawn(Arc::new(InMemoryStore::new())).await?;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/register_device", server.url()))
        .json(&json!({"token": "fcm-token-123"}))
        .send()
        .await?;

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await?;
    assert_eq!(body["message"], "Device registered for notification");

    let devices = server.store().devices().await;
    assert_eq!(devices.len(), 1);
    assert_eq!(
        devices.first().map(|(token, _)| token.as_str()),
        Some("fcm-token-123")
    );

    Ok(())
}

#[tokio::test]
async fn test_register_device_twice_refreshes_timestamp() -> Result<(), anyhow::Error> {
    let server = TestApiServer::spawn(Arc::new(InMemoryStore::new())).await?;
    let client = reqwest::Client::new();
    let url = format!("{}/register_device", server.url());

    client
        .post(&url)
        .json(&json!({"token": "fcm-token-123"}))
        .send()
        .await?;
    let first = server.store().devices().await;

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    let response = client
        .post(&url)
        .json(&json!({"token": "fcm-token-123"}))
        .send()
        .await?;
    assert_eq!(response.status(), 201);

    let second = server.store().devices().await;
    assert_eq!(second.len(), 1, "re-registration must not duplicate the device");

    let first_at = first.first().map(|(_, at)| *at);
    let second_at = second.first().map(|(_, at)| *at);
    assert!(second_at > first_at);

    Ok(())
}

#[tokio::test]
async fn test_register_device_rejects_missing_token() -> Result<(), anyhow::Error> {
    let server = TestApiServer::spawn(Arc::new(InMemoryStore::new())).await?;
    let client = reqwest::Client::new();

    for payload in [json!({}), json!({"token": ""}), json!({"token": "   "}), json!({"token": 42})] {
        let response = client
            .post(format!("{}/register_device", server.url()))
            .json(&payload)
            .send()
            .await?;

        assert_eq!(response.status(), 400, "payload {} should be rejected", payload);
        let body: Value = response.json().await?;
        assert_eq!(body["message"], DEVICE_ERROR);
    }

    assert!(server.store().devices().await.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_register_device_rejects_non_json_body() -> Result<(), anyhow::Error> {
    let server = TestApiServer::spawn(Arc::new(InMemoryStore::new())).await?;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/register_device", server.url()))
        .body("token=abc")
        .send()
        .await?;

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await?;
    assert_eq!(body["message"], DEVICE_ERROR);

    Ok(())
}

#[tokio::test]
async fn test_register_device_store_failure() -> Result<(), anyhow::Error> {
    let server = TestApiServer::spawn(Arc::new(InMemoryStore::failing())).await?;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/register_device", server.url()))
        .json(&json!({"token": "fcm-token-123"}))
        .send()
        .await?;

    assert_eq!(response.status(), 500);
    let body: Value = response.json().await?;
    assert_eq!(body["message"], DEVICE_ERROR);

    Ok(())
}
