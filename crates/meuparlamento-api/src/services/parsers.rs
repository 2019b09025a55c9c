//! Text parsers for composite document fields.
//!
//! Author names embed the party code (`"Ana Silva (PS)"`), and archived
//! document links embed the original publisher URL after the archive
//! prefix. None of these parsers fail: malformed input falls back to a
//! sensible default.

/// Display name of an author: the text before the first `(`, trimmed.
pub fn parse_author_name(text: &str) -> &str {
    text.split_once('(').map_or(text, |(name, _)| name).trim()
}

/// Party code of an author: the text inside the first `(...)` pair, trimmed.
///
/// Returns an empty string when there is no complete pair.
pub fn parse_party_name(text: &str) -> &str {
    text.split_once('(')
        .and_then(|(_, rest)| rest.split_once(')'))
        .map_or("", |(party, _)| party.trim())
}

/// Original document URL recovered from an archive-replay URL.
///
/// Returns the suffix starting at the last occurrence of `http`, or the
/// input unchanged when there is none.
pub fn parse_original_document_url(url: &str) -> &str {
    url.rfind("http")
        .and_then(|start| url.get(start..))
        .unwrap_or(url)
}
