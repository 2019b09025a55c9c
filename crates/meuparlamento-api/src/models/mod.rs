//! meuParlamento API models.
//!
//! Contains the raw document shapes read from the document store and the
//! client-facing shapes returned by the HTTP API.

pub mod votes;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub use votes::{decode_vote, PartyCodes, Vote, VoteMatching, VoteTally};

/// Maximum `metadata.num_chars` of a proposal eligible for public listing.
pub const READY_MAX_NUM_CHARS: i64 = 150;

/// Required `metadata.readability_score` of a proposal eligible for public listing.
pub const READY_READABILITY_SCORE: i64 = 0;

// ============================================================================
// Document Store Records
// ============================================================================

/// Proposal document as stored in the `proposals` collection.
///
/// Maintained by the external ingestion pipeline; read-only here.
#[derive(Debug, Clone, Deserialize)]
pub struct ProposalRecord {
    /// Legislative identifier, the primary lookup key.
    #[serde(rename = "BID")]
    pub bid: i64,

    #[serde(default)]
    pub title: String,

    #[serde(rename = "pdfLink", default)]
    pub pdf_link: String,

    /// Vote timestamp in epoch milliseconds.
    #[serde(rename = "dataVotacao", deserialize_with = "deserialize_epoch_millis")]
    pub vote_timestamp_ms: i64,

    /// Vote year, passed through untouched (number or string).
    #[serde(rename = "anoVotacao", default)]
    pub vote_year: Value,

    #[serde(rename = "proposedBy", default)]
    pub proposed_by: String,

    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub authors: Vec<Author>,

    #[serde(rename = "votos", default)]
    pub votes: Option<VoteTally>,

    /// Final result. `null` and a missing key are both treated as absent.
    #[serde(rename = "resultadoFinal", default)]
    pub final_result: Option<Value>,

    #[serde(rename = "comissoes", default)]
    pub committees: Option<Value>,

    #[serde(default)]
    pub metadata: ProposalMetadata,
}

impl ProposalRecord {
    /// Vote timestamp as a UTC datetime, `None` if out of range.
    pub fn vote_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.vote_timestamp_ms)
    }

    /// Whether the proposal passes the readiness gate for public listing.
    pub fn is_ready(&self) -> bool {
        self.metadata.num_chars <= READY_MAX_NUM_CHARS
            && (self.metadata.readability_score - READY_READABILITY_SCORE as f64).abs()
                < f64::EPSILON
    }
}

/// Proposal classification and quality metadata.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProposalMetadata {
    #[serde(default)]
    pub is_governo: bool,

    #[serde(default)]
    pub is_oposition: bool,

    #[serde(default)]
    pub num_chars: i64,

    #[serde(default)]
    pub readability_score: f64,

    #[serde(default)]
    pub proposal_summary: String,
}

/// Proposal author. `name` embeds the party code, e.g. `"Ana Silva (PS)"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,

    /// Path relative to the web archive host.
    #[serde(rename = "bioURL", default)]
    pub bio_url: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EpochMillis {
    Int(i64),
    Float(f64),
}

fn deserialize_epoch_millis<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match EpochMillis::deserialize(deserializer)? {
        EpochMillis::Int(ms) => ms,
        EpochMillis::Float(ms) => ms as i64,
    })
}

// ============================================================================
// Client-facing Models
// ============================================================================

/// Normalized proposal returned by the batch endpoints.
///
/// Presence of the optional blocks:
/// - `author`: the proposal has at least one author (first author only)
/// - `outcome`: the proposal carries a final result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputDocument {
    #[serde(rename = "IDProposal")]
    pub id_proposal: i64,

    #[serde(rename = "Description")]
    pub description: String,

    #[serde(rename = "LinkPdf")]
    pub link_pdf: String,

    /// Vote date, `YYYY-MM-DD` in UTC.
    #[serde(rename = "VoteDate")]
    pub vote_date: String,

    #[serde(rename = "VoteYear")]
    pub vote_year: Value,

    #[serde(rename = "ProposedBy")]
    pub proposed_by: String,

    pub url: String,

    #[serde(rename = "Summary")]
    pub summary: String,

    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub author: Option<AuthorFields>,

    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<OutcomeFields>,
}

/// First-author columns of an [`OutputDocument`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorFields {
    #[serde(rename = "ProposedByAuthor")]
    pub name: String,

    #[serde(rename = "ProposedByAuthorBioURL")]
    pub bio_url: String,
}

/// Outcome columns of an [`OutputDocument`]: result, committees and the
/// decoded vote of each tracked party.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcomeFields {
    #[serde(rename = "Result")]
    pub result: Value,

    #[serde(rename = "Comissions")]
    pub committees: Value,

    #[serde(rename = "PSD")]
    pub psd: Vote,

    #[serde(rename = "PS")]
    pub ps: Vote,

    #[serde(rename = "CDS_PP")]
    pub cds_pp: Vote,

    #[serde(rename = "PCP")]
    pub pcp: Vote,

    #[serde(rename = "BE")]
    pub be: Vote,

    #[serde(rename = "PEV")]
    pub pev: Vote,

    #[serde(rename = "PAN")]
    pub pan: Vote,
}

/// Kind of a [`SearchHit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitKind {
    #[serde(rename = "author")]
    Author,

    #[serde(rename = "news_outlet_homepage")]
    NewsOutletHomepage,
}

/// Entry of the authors and news search responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,

    pub domain: String,

    /// `YYYYMMDDHHMMSS` as an integer.
    pub tstamp: i64,

    #[serde(rename = "proposalID")]
    pub proposal_id: i64,

    pub url: String,

    /// Position within the response.
    pub id: usize,

    #[serde(rename = "type")]
    pub kind: HitKind,
}

/// `{"data": ...}` envelope of the proposal endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

impl<T> DataEnvelope<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Request body of `POST /register_device`.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterDeviceRequest {
    /// Push notification token of the device.
    pub token: String,
}

impl RegisterDeviceRequest {
    /// Validate the request.
    ///
    /// # Errors
    ///
    /// Returns an error message if validation fails.
    pub fn validate(&self) -> Result<&str, &'static str> {
        let token = self.token.trim();

        if token.is_empty() {
            return Err("Device token is required");
        }

        Ok(token)
    }
}

/// `{"message": ...}` response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Response of `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloResponse {
    pub hello: String,
}

/// Health check response.
///
/// Returned by the `/health` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service health status ("healthy" or "unhealthy").
    pub status: String,

    /// Document store connectivity status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
}
