//! Repository layer for the meuParlamento API.
//!
//! Provides document store access following the Handler -> Service -> Repository
//! architecture. Services depend on the [`DocumentStore`] trait only.

pub mod mock;
pub mod mongo;
pub mod store;

pub use mongo::MongoStore;
pub use store::{Cohort, DocumentStore};
