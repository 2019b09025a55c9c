//! Middleware for the meuParlamento API.
//!
//! # Components
//!
//! - `http_metrics` - Request metrics for every response

pub mod http_metrics;

pub use http_metrics::http_metrics_middleware;
