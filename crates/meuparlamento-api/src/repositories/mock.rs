//! In-memory document store for tests.
//!
//! Mirrors the filtering and ordering of the MongoDB store so the HTTP layer
//! can be exercised without a running database.

use crate::errors::ApiError;
use crate::models::ProposalRecord;
use crate::repositories::store::{Cohort, DocumentStore};
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// In-memory [`DocumentStore`].
#[derive(Default)]
pub struct InMemoryStore {
    proposals: RwLock<Vec<ProposalRecord>>,
    devices: RwLock<BTreeMap<String, DateTime<Utc>>>,
    /// Whether every operation fails with a database error.
    return_error: bool,
    query_count: AtomicUsize,
    closed: AtomicBool,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with proposals.
    pub fn with_proposals(proposals: Vec<ProposalRecord>) -> Self {
        Self {
            proposals: RwLock::new(proposals),
            ..Self::default()
        }
    }

    /// Create a store whose operations all fail.
    pub fn failing() -> Self {
        Self {
            return_error: true,
            ..Self::default()
        }
    }

    /// Add a proposal.
    pub async fn insert(&self, proposal: ProposalRecord) {
        self.proposals.write().await.push(proposal);
    }

    /// Registered devices as (token, last registration), ordered by token.
    pub async fn devices(&self) -> Vec<(String, DateTime<Utc>)> {
        self.devices
            .read()
            .await
            .iter()
            .map(|(token, at)| (token.clone(), *at))
            .collect()
    }

    /// Number of store operations served, failed ones included.
    pub fn query_count(&self) -> usize {
        self.query_count.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), ApiError> {
        self.query_count.fetch_add(1, Ordering::SeqCst);

        if self.return_error {
            return Err(ApiError::Database("Mock store error".to_string()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl DocumentStore for InMemoryStore {
    async fn find_proposal(&self, bid: i64) -> Result<Option<ProposalRecord>, ApiError> {
        self.check()?;

        Ok(self
            .proposals
            .read()
            .await
            .iter()
            .find(|record| record.bid == bid)
            .cloned())
    }

    async fn sample_proposals(
        &self,
        cohort: Cohort,
        size: usize,
    ) -> Result<Vec<ProposalRecord>, ApiError> {
        self.check()?;

        let proposals = self.proposals.read().await;
        let candidates: Vec<&ProposalRecord> =
            proposals.iter().filter(|r| cohort.matches(r)).collect();

        let mut rng = rand::thread_rng();
        Ok(candidates
            .choose_multiple(&mut rng, size)
            .map(|record| (*record).clone())
            .collect())
    }

    async fn recent_proposals(&self, limit: usize) -> Result<Vec<ProposalRecord>, ApiError> {
        self.check()?;

        let mut ready: Vec<ProposalRecord> = self
            .proposals
            .read()
            .await
            .iter()
            .filter(|r| r.is_ready())
            .cloned()
            .collect();

        ready.sort_by(|a, b| b.vote_timestamp_ms.cmp(&a.vote_timestamp_ms));
        ready.truncate(limit);
        Ok(ready)
    }

    async fn upsert_device(&self, token: &str, at: DateTime<Utc>) -> Result<(), ApiError> {
        self.check()?;

        self.devices.write().await.insert(token.to_string(), at);
        Ok(())
    }

    async fn ping(&self) -> Result<(), ApiError> {
        self.check()
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}
