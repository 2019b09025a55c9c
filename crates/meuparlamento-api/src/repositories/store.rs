//! Document store abstraction.
//!
//! The HTTP layer only talks to the store through [`DocumentStore`], which
//! keeps the MongoDB driver out of the service logic and lets tests run
//! against an in-memory store.

use crate::errors::ApiError;
use crate::models::{ProposalRecord, READY_MAX_NUM_CHARS, READY_READABILITY_SCORE};
use chrono::{DateTime, Utc};
use mongodb::bson::{doc, Document};

/// Proposal cohort drawn by the balanced sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cohort {
    /// Proposals flagged `metadata.is_governo`.
    Government,
    /// Proposals flagged `metadata.is_oposition`.
    Opposition,
}

impl Cohort {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cohort::Government => "government",
            Cohort::Opposition => "opposition",
        }
    }

    /// Query filter selecting ready proposals of this cohort.
    pub fn filter(&self) -> Document {
        let flag = match self {
            Cohort::Government => "metadata.is_governo",
            Cohort::Opposition => "metadata.is_oposition",
        };

        let mut filter = Document::new();
        filter.insert(flag, true);
        for (key, value) in ready_filter() {
            filter.insert(key, value);
        }
        filter
    }

    /// In-process equivalent of [`Cohort::filter`].
    pub fn matches(&self, record: &ProposalRecord) -> bool {
        let flagged = match self {
            Cohort::Government => record.metadata.is_governo,
            Cohort::Opposition => record.metadata.is_oposition,
        };

        flagged && record.is_ready()
    }
}

/// Query filter of the readiness gate applied to every listing.
pub fn ready_filter() -> Document {
    doc! {
        "metadata.readability_score": READY_READABILITY_SCORE,
        "metadata.num_chars": { "$lte": READY_MAX_NUM_CHARS },
    }
}

/// Read access to proposals and write access to notification devices.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Look up a single proposal by its `BID`.
    async fn find_proposal(&self, bid: i64) -> Result<Option<ProposalRecord>, ApiError>;

    /// Draw up to `size` random ready proposals of a cohort.
    ///
    /// Candidates are ordered by `last_update` descending before sampling.
    async fn sample_proposals(
        &self,
        cohort: Cohort,
        size: usize,
    ) -> Result<Vec<ProposalRecord>, ApiError>;

    /// Up to `limit` ready proposals, most recent vote first.
    async fn recent_proposals(&self, limit: usize) -> Result<Vec<ProposalRecord>, ApiError>;

    /// Insert or refresh a notification device token.
    async fn upsert_device(&self, token: &str, at: DateTime<Utc>) -> Result<(), ApiError>;

    /// Verify store connectivity.
    async fn ping(&self) -> Result<(), ApiError>;

    /// Release store connections. Safe to call more than once.
    async fn close(&self);
}
