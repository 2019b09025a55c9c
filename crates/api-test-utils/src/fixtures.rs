//! Proposal fixtures.
//!
//! Builds raw proposal documents the way the ingestion pipeline stores them,
//! then deserializes them through the API's own record type.

use meuparlamento_api::models::ProposalRecord;
use serde_json::{json, Map, Value};

/// `2020-01-15T00:00:00Z` in epoch milliseconds.
pub const DEFAULT_VOTE_TIMESTAMP_MS: i64 = 1_579_046_400_000;

/// Builder for a raw proposal document.
///
/// Defaults to a ready proposal (readability score 0, 100 characters) with
/// one author and no outcome.
#[derive(Debug, Clone)]
pub struct ProposalFixture {
    raw: Map<String, Value>,
}

impl ProposalFixture {
    /// Proposal flagged as government-authored.
    pub fn government(bid: i64) -> Self {
        Self::new(bid, true, false)
    }

    /// Proposal flagged as opposition-authored.
    pub fn opposition(bid: i64) -> Self {
        Self::new(bid, false, true)
    }

    fn new(bid: i64, is_governo: bool, is_oposition: bool) -> Self {
        let raw = json!({
            "BID": bid,
            "title": format!("Projeto de Lei {}/XIII", bid),
            "pdfLink": format!("https://app.parlamento.pt/{}.pdf", bid),
            "dataVotacao": DEFAULT_VOTE_TIMESTAMP_MS,
            "anoVotacao": 2020,
            "proposedBy": if is_governo { "Governo" } else { "BE" },
            "url": format!("https://www.parlamento.pt/proposta/{}", bid),
            "authors": [{"name": "Ana Silva (PS)", "bioURL": "/wayback/bio/ana"}],
            "metadata": {
                "is_governo": is_governo,
                "is_oposition": is_oposition,
                "num_chars": 100,
                "readability_score": 0,
                "proposal_summary": format!("Resumo {}", bid)
            }
        });

        match raw {
            Value::Object(raw) => Self { raw },
            _ => unreachable!("fixture literal is an object"),
        }
    }

    /// Set the vote timestamp (epoch milliseconds).
    pub fn voted_at(mut self, timestamp_ms: i64) -> Self {
        self.raw.insert("dataVotacao".to_string(), json!(timestamp_ms));
        self
    }

    /// Replace the authors list with `(name, bioURL)` pairs.
    pub fn authors(mut self, authors: &[(&str, &str)]) -> Self {
        let authors: Vec<Value> = authors
            .iter()
            .map(|(name, bio_url)| json!({"name": name, "bioURL": bio_url}))
            .collect();
        self.raw.insert("authors".to_string(), Value::Array(authors));
        self
    }

    /// Add a final result and comma-joined vote tally.
    pub fn outcome(mut self, result: &str, in_favor: &str, against: &str, abstain: &str) -> Self {
        self.raw
            .insert("resultadoFinal".to_string(), json!(result));
        self.raw.insert(
            "votos".to_string(),
            json!({"afavor": in_favor, "contra": against, "abstencao": abstain}),
        );
        self
    }

    /// Make the proposal fail the readiness gate.
    pub fn not_ready(mut self) -> Self {
        if let Some(Value::Object(metadata)) = self.raw.get_mut("metadata") {
            metadata.insert("num_chars".to_string(), json!(500));
        }
        self
    }

    /// Deserialize into a [`ProposalRecord`].
    pub fn build(self) -> ProposalRecord {
        serde_json::from_value(Value::Object(self.raw)).expect("fixture must be a valid proposal")
    }
}
