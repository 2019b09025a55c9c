//! Proposal service.
//!
//! Composes the document store with the pure helpers (normalizer, parsers,
//! sampler, news stubs) into the operations served by the HTTP layer.

use crate::errors::ApiError;
use crate::models::{HitKind, OutputDocument, ProposalRecord, SearchHit, VoteMatching};
use crate::observability::metrics::record_batch_size;
use crate::repositories::{Cohort, DocumentStore};
use crate::services::news::{news_stubs, parse_vote_date, ARCHIVE_BASE_URL};
use crate::services::normalizer::normalize;
use crate::services::parsers::{parse_author_name, parse_party_name};
use crate::services::sampling::{assemble_batch, SamplePlan};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, instrument};

/// `YYYYMMDDHHMMSS` layout of author hit timestamps.
const AUTHOR_TSTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Service for proposal and notification device operations.
#[derive(Clone)]
pub struct ProposalService {
    store: Arc<dyn DocumentStore>,
    vote_matching: VoteMatching,
}

impl ProposalService {
    pub fn new(store: Arc<dyn DocumentStore>, vote_matching: VoteMatching) -> Self {
        Self {
            store,
            vote_matching,
        }
    }

    /// Register a device for push notifications.
    ///
    /// Idempotent: registering a known token only refreshes its timestamp.
    #[instrument(skip_all, name = "api.proposals.register_device")]
    pub async fn register_device(&self, token: &str) -> Result<(), ApiError> {
        self.store.upsert_device(token, Utc::now()).await
    }

    /// Look up a proposal. A missing proposal is `Ok(None)`.
    pub async fn find_proposal_by_id(&self, bid: i64) -> Result<Option<ProposalRecord>, ApiError> {
        self.store.find_proposal(bid).await
    }

    /// One author hit per author of the proposal, in stored order.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the proposal does not exist.
    #[instrument(skip_all, name = "api.proposals.authors", fields(bid = bid))]
    pub async fn find_authors_by_proposal_id(&self, bid: i64) -> Result<Vec<SearchHit>, ApiError> {
        let record = self.require_proposal(bid).await?;
        let tstamp = author_tstamp(&vote_datetime(&record)?);

        Ok(record
            .authors
            .iter()
            .enumerate()
            .map(|(position, author)| SearchHit {
                title: parse_author_name(&author.name).to_string(),
                domain: parse_party_name(&author.name).to_string(),
                tstamp,
                proposal_id: record.bid,
                url: format!("{}{}", ARCHIVE_BASE_URL, author.bio_url),
                id: position,
                kind: HitKind::Author,
            })
            .collect())
    }

    /// Balanced random batch of about `target` ready proposals.
    ///
    /// Roughly 60% government and 40% opposition proposals, shuffled. The
    /// batch is shorter than `target` when the cohorts run out, and empty
    /// when `target <= 0`.
    #[instrument(skip_all, name = "api.proposals.sampling_batch", fields(target = target))]
    pub async fn sampling_batch(&self, target: i64) -> Result<Vec<OutputDocument>, ApiError> {
        let Some(plan) = SamplePlan::for_target(target) else {
            return Ok(Vec::new());
        };

        let government = self
            .store
            .sample_proposals(Cohort::Government, plan.government)
            .await?;
        let opposition = self
            .store
            .sample_proposals(Cohort::Opposition, plan.opposition)
            .await?;

        debug!(
            target: "api.proposals",
            government = government.len(),
            opposition = opposition.len(),
            "Sampled cohorts"
        );

        // Every drawn record is normalized, including those truncated away.
        let government = self.normalize_all(&government)?;
        let opposition = self.normalize_all(&opposition)?;
        let documents = assemble_batch(
            government,
            opposition,
            plan.target,
            |document: &OutputDocument| document.id_proposal,
            &mut rand::thread_rng(),
        );

        record_batch_size("sampled", documents.len());
        Ok(documents)
    }

    /// The `limit` most recently voted ready proposals, newest first.
    #[instrument(skip_all, name = "api.proposals.recent_batch", fields(limit = limit))]
    pub async fn recent_batch(&self, limit: i64) -> Result<Vec<OutputDocument>, ApiError> {
        let limit = match usize::try_from(limit) {
            Ok(limit) if limit > 0 => limit,
            _ => return Ok(Vec::new()),
        };

        let records = self.store.recent_proposals(limit).await?;
        let documents = self.normalize_all(&records)?;

        record_batch_size("recent", documents.len());
        Ok(documents)
    }

    /// Archived news outlet links for a vote date. Does not touch the store.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::BadRequest` if `date` is not `YYYY-MM-DD`.
    pub fn news_search(&self, bid: i64, date: &str) -> Result<Vec<SearchHit>, ApiError> {
        Ok(news_stubs(bid, parse_vote_date(date)?))
    }

    /// Archived news outlet links for the vote date of a stored proposal.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the proposal does not exist.
    #[instrument(skip_all, name = "api.proposals.news", fields(bid = bid))]
    pub async fn news_search_for_proposal(&self, bid: i64) -> Result<Vec<SearchHit>, ApiError> {
        let record = self.require_proposal(bid).await?;
        let vote_date = vote_datetime(&record)?.date_naive();

        Ok(news_stubs(record.bid, vote_date))
    }

    /// Verify store connectivity.
    pub async fn ping(&self) -> Result<(), ApiError> {
        self.store.ping().await
    }

    /// Release store connections.
    pub async fn close(&self) {
        self.store.close().await;
    }

    async fn require_proposal(&self, bid: i64) -> Result<ProposalRecord, ApiError> {
        self.store
            .find_proposal(bid)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Proposal {} not found", bid)))
    }

    fn normalize_all(&self, records: &[ProposalRecord]) -> Result<Vec<OutputDocument>, ApiError> {
        records
            .iter()
            .map(|record| normalize(record, self.vote_matching))
            .collect()
    }
}

fn vote_datetime(record: &ProposalRecord) -> Result<DateTime<Utc>, ApiError> {
    record.vote_datetime().ok_or_else(|| {
        ApiError::MalformedDocument(format!(
            "proposal {} has out of range vote timestamp {}",
            record.bid, record.vote_timestamp_ms
        ))
    })
}

fn author_tstamp(at: &DateTime<Utc>) -> i64 {
    // Fourteen digits always fit in an i64.
    at.format(AUTHOR_TSTAMP_FORMAT)
        .to_string()
        .parse()
        .unwrap_or_default()
}
