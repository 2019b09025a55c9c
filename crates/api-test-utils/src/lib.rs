//! # meuParlamento API Test Utilities
//!
//! Shared test utilities for the meuParlamento API.
//!
//! This crate provides:
//! - Server test harness (`TestApiServer` for E2E tests)
//! - Proposal fixtures (`ProposalFixture`)
//! - Gzip response decoding (`decode_gzip_json`)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use api_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<(), anyhow::Error> {
//!     let store = Arc::new(InMemoryStore::with_proposals(vec![
//!         ProposalFixture::government(1).build(),
//!     ]));
//!     let server = TestApiServer::spawn(store).await?;
//!
//!     let response = reqwest::get(format!("{}/proposals/batch/1", server.url())).await?;
//!     assert_eq!(response.status(), 200);
//!
//!     let body = decode_gzip_json(response).await?;
//!     assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
//!     Ok(())
//! }
//! ```

pub mod fixtures;
pub mod server_harness;

pub use fixtures::*;
pub use server_harness::*;
