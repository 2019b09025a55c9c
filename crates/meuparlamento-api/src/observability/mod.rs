//! Observability module for the meuParlamento API.
//!
//! Provides metrics definitions and recording helpers.

pub mod metrics;
