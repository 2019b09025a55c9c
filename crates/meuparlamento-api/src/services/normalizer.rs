//! Proposal normalization into the client-facing document shape.

use crate::errors::ApiError;
use crate::models::{
    decode_vote, AuthorFields, OutcomeFields, OutputDocument, ProposalRecord, VoteMatching,
    VoteTally,
};
use crate::services::parsers::parse_original_document_url;
use serde_json::Value;

/// Host marker of archive-replay document links.
const ARCHIVE_HOST_MARKER: &str = "arquivo.pt";

/// Calendar date format of `VoteDate`.
pub const VOTE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Map a raw proposal to the client-facing [`OutputDocument`].
///
/// # Errors
///
/// Returns `ApiError::MalformedDocument` if the vote timestamp is out of range.
pub fn normalize(
    record: &ProposalRecord,
    matching: VoteMatching,
) -> Result<OutputDocument, ApiError> {
    let vote_date = record
        .vote_datetime()
        .ok_or_else(|| {
            ApiError::MalformedDocument(format!(
                "proposal {} has out of range vote timestamp {}",
                record.bid, record.vote_timestamp_ms
            ))
        })?
        .format(VOTE_DATE_FORMAT)
        .to_string();

    let author = record.authors.first().map(|first| AuthorFields {
        name: first.name.clone(),
        bio_url: first.bio_url.clone(),
    });

    let outcome = record.final_result.as_ref().map(|result| {
        let empty = VoteTally::default();
        let tally = record.votes.as_ref().unwrap_or(&empty);
        let vote = |party: &str| decode_vote(party, tally, matching);

        OutcomeFields {
            result: result.clone(),
            committees: record
                .committees
                .clone()
                .unwrap_or_else(|| Value::Array(Vec::new())),
            psd: vote("PSD"),
            ps: vote("PS"),
            cds_pp: vote("CDS-PP"),
            pcp: vote("PCP"),
            be: vote("BE"),
            pev: vote("PEV"),
            pan: vote("PAN"),
        }
    });

    Ok(OutputDocument {
        id_proposal: record.bid,
        description: record.title.clone(),
        link_pdf: original_pdf_link(&record.pdf_link).to_string(),
        vote_date,
        vote_year: record.vote_year.clone(),
        proposed_by: record.proposed_by.clone(),
        url: record.url.clone(),
        summary: record.metadata.proposal_summary.clone(),
        author,
        outcome,
    })
}

/// Undo the archive-proxy rewrite of a pdf link.
fn original_pdf_link(link: &str) -> &str {
    if link.contains(ARCHIVE_HOST_MARKER) {
        parse_original_document_url(link)
    } else {
        link
    }
}
