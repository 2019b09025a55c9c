//! MongoDB-backed document store.
//!
//! Proposals live in the `proposals` collection, maintained by the ingestion
//! pipeline. Notification devices are kept in `notification_devices` as
//! `{token, tstamp}` documents, unique by token.

use crate::config::Config;
use crate::errors::ApiError;
use crate::models::ProposalRecord;
use crate::observability::metrics::record_db_query;
use crate::repositories::store::{ready_filter, Cohort, DocumentStore};
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::bson::{self, doc, Document};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{info, instrument, warn};

/// Collection holding proposal documents.
pub const PROPOSALS_COLLECTION: &str = "proposals";

/// Collection holding notification device tokens.
pub const DEVICES_COLLECTION: &str = "notification_devices";

/// Document store backed by a pooled MongoDB client.
pub struct MongoStore {
    client: Client,
    database: Database,
    closed: AtomicBool,
}

impl MongoStore {
    /// Build a pooled client for `config.mongodb_uri`.
    ///
    /// The driver connects lazily; call [`DocumentStore::ping`] to verify
    /// the server is reachable.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Database` if the URI cannot be parsed.
    pub async fn connect(config: &Config) -> Result<Self, ApiError> {
        let mut options = ClientOptions::parse(&config.mongodb_uri).await?;
        options.max_pool_size = Some(config.max_pool_size);
        options.app_name = Some("meuparlamento-api".to_string());

        let client = Client::with_options(options)?;
        let database = client.database(&config.db_name);

        info!(
            target: "api.repositories.mongo",
            db_name = %config.db_name,
            max_pool_size = config.max_pool_size,
            "MongoDB client created"
        );

        Ok(Self {
            client,
            database,
            closed: AtomicBool::new(false),
        })
    }

    fn proposals(&self) -> Collection<ProposalRecord> {
        self.database.collection(PROPOSALS_COLLECTION)
    }

    fn devices(&self) -> Collection<Document> {
        self.database.collection(DEVICES_COLLECTION)
    }
}

/// Record duration and outcome of a store operation.
fn observe<T>(operation: &str, start: Instant, result: &Result<T, ApiError>) {
    let status = if result.is_ok() { "success" } else { "error" };
    record_db_query(operation, status, start.elapsed());
}

#[async_trait::async_trait]
impl DocumentStore for MongoStore {
    #[instrument(skip_all, name = "api.db.find_proposal", fields(bid = bid))]
    async fn find_proposal(&self, bid: i64) -> Result<Option<ProposalRecord>, ApiError> {
        let start = Instant::now();

        let result = self
            .proposals()
            .find_one(doc! { "BID": bid })
            .await
            .map_err(ApiError::from);

        observe("find_proposal", start, &result);
        result
    }

    #[instrument(
        skip_all,
        name = "api.db.sample_proposals",
        fields(cohort = cohort.as_str(), size = size)
    )]
    async fn sample_proposals(
        &self,
        cohort: Cohort,
        size: usize,
    ) -> Result<Vec<ProposalRecord>, ApiError> {
        let start = Instant::now();
        let sample_size = i64::try_from(size).unwrap_or(i64::MAX);

        let pipeline = vec![
            doc! { "$match": cohort.filter() },
            doc! { "$sort": { "last_update": -1 } },
            doc! { "$sample": { "size": sample_size } },
        ];

        let result: Result<Vec<ProposalRecord>, ApiError> = async {
            let documents: Vec<Document> = self
                .proposals()
                .aggregate(pipeline)
                .await?
                .try_collect()
                .await?;

            documents
                .into_iter()
                .map(|document| {
                    bson::from_document::<ProposalRecord>(document)
                        .map_err(|e| ApiError::MalformedDocument(e.to_string()))
                })
                .collect::<Result<Vec<_>, _>>()
        }
        .await;

        observe("sample_proposals", start, &result);
        result
    }

    #[instrument(skip_all, name = "api.db.recent_proposals", fields(limit = limit))]
    async fn recent_proposals(&self, limit: usize) -> Result<Vec<ProposalRecord>, ApiError> {
        let start = Instant::now();
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let result: Result<Vec<ProposalRecord>, ApiError> = async {
            let records: Vec<ProposalRecord> = self
                .proposals()
                .find(ready_filter())
                .sort(doc! { "dataVotacao": -1 })
                .limit(limit)
                .await?
                .try_collect()
                .await?;
            Ok(records)
        }
        .await;

        observe("recent_proposals", start, &result);
        result
    }

    #[instrument(skip_all, name = "api.db.upsert_device")]
    async fn upsert_device(&self, token: &str, at: DateTime<Utc>) -> Result<(), ApiError> {
        let start = Instant::now();
        let tstamp = bson::DateTime::from_millis(at.timestamp_millis());

        let result = self
            .devices()
            .update_one(
                doc! { "token": token },
                doc! { "$set": { "token": token, "tstamp": tstamp } },
            )
            .upsert(true)
            .await
            .map(|_| ())
            .map_err(ApiError::from);

        observe("upsert_device", start, &result);
        result
    }

    #[instrument(skip_all, name = "api.db.ping")]
    async fn ping(&self) -> Result<(), ApiError> {
        let start = Instant::now();

        let result = self
            .database
            .run_command(doc! { "ping": 1 })
            .await
            .map(|_| ())
            .map_err(ApiError::from);

        observe("ping", start, &result);
        result
    }

    async fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            warn!(target: "api.repositories.mongo", "MongoDB client already closed");
            return;
        }

        self.client.clone().shutdown().await;
        info!(target: "api.repositories.mongo", "MongoDB client closed");
    }
}
