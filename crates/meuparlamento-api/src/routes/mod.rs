//! HTTP routes for the meuParlamento API.
//!
//! Defines the Axum router and application state.

use crate::config::Config;
use crate::handlers;
use crate::middleware::http_metrics_middleware;
use crate::services::ProposalService;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Proposal service over the document store.
    pub service: ProposalService,

    /// Service configuration.
    pub config: Config,
}

/// Build the application routes.
///
/// Creates an Axum router with:
/// - `/` - Greeting
/// - `/health` - Document store health check
/// - `/metrics` - Prometheus metrics endpoint
/// - `/register_device` - Notification device registration
/// - `/proposals/batch/{batch_size}` - Balanced random batch
/// - `/proposals/recent/{batch_size}` - Most recently voted proposals
/// - `/proposals/authors/{proposal_id}` - Authors of a proposal
/// - `/proposals/news/{proposal_id}` - News for the stored vote date
/// - `/proposals/news/{proposal_id}/{proposal_date}` - News for a given date
/// - TraceLayer for request logging
/// - HTTP metrics middleware
pub fn build_routes(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let api_routes = Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health_check))
        .route("/register_device", post(handlers::register_device))
        .route("/proposals/batch/:batch_size", get(handlers::sampling_batch))
        .route("/proposals/recent/:batch_size", get(handlers::recent_batch))
        .route("/proposals/authors/:proposal_id", get(handlers::authors))
        .route(
            "/proposals/news/:proposal_id",
            get(handlers::news_for_proposal),
        )
        .route(
            "/proposals/news/:proposal_id/:proposal_date",
            get(handlers::news_for_date),
        )
        .with_state(state);

    // Metrics route with its own state
    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(metrics_handle);

    // Layer order (bottom-to-top execution):
    // 1. TraceLayer - Log request details
    // 2. http_metrics_middleware - Record ALL responses (outermost)
    api_routes
        .merge(metrics_routes)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(http_metrics_middleware))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::errors::{DEVICE_REGISTRATION_ERROR_MESSAGE, GENERIC_ERROR_MESSAGE};
    use crate::models::{ProposalRecord, VoteMatching};
    use crate::repositories::mock::InMemoryStore;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use flate2::read::GzDecoder;
    use http_body_util::BodyExt;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::io::Read;
    use tower::ServiceExt;

    fn proposal(bid: i64) -> ProposalRecord {
        serde_json::from_value(json!({
            "BID": bid,
            "title": "Projeto de Lei",
            "dataVotacao": 1579046400000_i64,
            "anoVotacao": 2020,
            "authors": [{"name": "Ana Silva (PS)", "bioURL": "/bio/ana"}],
            "resultadoFinal": "Aprovado",
            "votos": {"afavor": "PS", "contra": "PSD", "abstencao": "CDS-PP"},
            "metadata": {
                "is_governo": bid % 2 == 0,
                "is_oposition": bid % 2 == 1,
                "num_chars": 100,
                "readability_score": 0
            }
        }))
        .unwrap()
    }

    fn app_with(store: InMemoryStore) -> (Router, Arc<InMemoryStore>) {
        let store = Arc::new(store);
        let config = Config::from_vars(&HashMap::new()).unwrap();
        let state = Arc::new(AppState {
            service: ProposalService::new(store.clone(), VoteMatching::Exact),
            config,
        });
        let handle = PrometheusBuilder::new().build_recorder().handle();

        (build_routes(state, handle), store)
    }

    fn app() -> (Router, Arc<InMemoryStore>) {
        app_with(InMemoryStore::with_proposals((1..=6).map(proposal).collect()))
    }

    async fn get_request(app: Router, uri: &str) -> Response {
        let request = Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request builder should succeed");
        app.oneshot(request).await.expect("request should succeed")
    }

    async fn json_body(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn gzip_body(response: Response) -> Value {
        assert_eq!(
            response.headers().get(header::CONTENT_ENCODING).unwrap(),
            "gzip"
        );
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let mut json = String::new();
        GzDecoder::new(bytes.as_ref()).read_to_string(&mut json).unwrap();
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn test_app_state_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[tokio::test]
    async fn test_index() {
        let (app, _) = app();
        let response = get_request(app, "/").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::CONTENT_ENCODING).is_none());
        assert_eq!(json_body(response).await, json!({"hello": "meuParlamento!"}));
    }

    #[tokio::test]
    async fn test_health_reports_store_state() {
        let (app, _) = app();
        let response = get_request(app, "/health").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({"status": "healthy", "database": "healthy"})
        );

        let (app, _) = app_with(InMemoryStore::failing());
        let response = get_request(app, "/health").await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json_body(response).await["status"], "unhealthy");
    }

    #[tokio::test]
    async fn test_batch_is_gzipped_envelope() {
        let (app, _) = app();
        let response = get_request(app, "/proposals/batch/4").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );

        let body = gzip_body(response).await;
        let data = body["data"].as_array().unwrap();
        assert_eq!(data.len(), 4);
        let first = data.first().unwrap();
        assert_eq!(first["PS"], 1);
        assert_eq!(first["PSD"], -1);
        assert_eq!(first["CDS_PP"], 0);
        assert_eq!(first["VoteDate"], "2020-01-15");
    }

    #[tokio::test]
    async fn test_batch_rejects_non_integer_size() {
        let (app, store) = app();
        let response = get_request(app, "/proposals/batch/ten").await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["message"], GENERIC_ERROR_MESSAGE);
        assert_eq!(store.query_count(), 0);
    }

    #[tokio::test]
    async fn test_batch_store_failure_is_generic_500() {
        let (app, _) = app_with(InMemoryStore::failing());
        let response = get_request(app, "/proposals/batch/3").await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(response).await["message"], GENERIC_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn test_authors_unknown_proposal_is_404() {
        let (app, _) = app();
        let response = get_request(app, "/proposals/authors/999").await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_dated_news_skips_store() {
        let (app, store) = app_with(InMemoryStore::failing());
        let response = get_request(app, "/proposals/news/3/2020-01-15").await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = gzip_body(response).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 5);
        assert_eq!(store.query_count(), 0);
    }

    #[tokio::test]
    async fn test_register_device_malformed_body() {
        let (app, store) = app();
        let request = Request::builder()
            .method("POST")
            .uri("/register_device")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["message"],
            DEVICE_REGISTRATION_ERROR_MESSAGE
        );
        assert!(store.devices().await.is_empty());
    }

    #[tokio::test]
    async fn test_metrics_route_is_served() {
        let (app, _) = app();
        let response = get_request(app, "/metrics").await;

        assert_eq!(response.status(), StatusCode::OK);
    }
}
