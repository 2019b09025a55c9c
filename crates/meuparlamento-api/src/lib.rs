//! meuParlamento API Library
//!
//! Read API over the meuParlamento legislative proposals database:
//!
//! - Balanced random and most-recent proposal batches
//! - Proposal author search
//! - Archived news outlet links for a proposal's vote date
//! - Notification device registration
//!
//! # Architecture
//!
//! The API follows the Handler -> Service -> Repository pattern:
//!
//! ```text
//! routes/mod.rs -> handlers/*.rs -> services/*.rs -> repositories/*.rs
//! ```
//!
//! # Modules
//!
//! - `config` - Service configuration from environment
//! - `errors` - Error types with HTTP status code mapping
//! - `handlers` - HTTP request handlers
//! - `middleware` - HTTP metrics middleware
//! - `models` - Stored records and client-facing shapes
//! - `observability` - Prometheus metrics
//! - `repositories` - Document store trait, MongoDB and in-memory stores
//! - `routes` - Axum router setup
//! - `services` - Normalization, sampling and proposal operations

pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod repositories;
pub mod routes;
pub mod services;
