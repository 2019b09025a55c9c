//! Archived news outlet links for a proposal's vote date.
//!
//! No search happens here: each hit points to the web archive's replay of a
//! fixed outlet homepage as it was on the vote date.

use crate::errors::ApiError;
use crate::models::{HitKind, SearchHit};
use chrono::NaiveDate;

/// Web archive host used for replay and author biography links.
pub const ARCHIVE_BASE_URL: &str = "https://arquivo.pt";

/// News outlets as (name, homepage URL), in response order.
pub const NEWS_OUTLETS: [(&str, &str); 5] = [
    ("Expresso", "http://expresso.pt/"),
    ("Público", "http://publico.pt/"),
    ("Diario de Noticias", "http://www.dn.pt/"),
    ("Jornal de Negócios", "http://www.jornaldenegocios.pt/"),
    ("Correio da Manhã", "http://www.cmjornal.pt/"),
];

/// Parse a `YYYY-MM-DD` vote date.
///
/// # Errors
///
/// Returns `ApiError::BadRequest` if the date is malformed.
pub fn parse_vote_date(date: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|e| ApiError::BadRequest(format!("invalid proposal date '{}': {}", date, e)))
}

/// Archive snapshot timestamp at midnight of `date`, `YYYYMMDD000000`.
fn snapshot_timestamp(date: NaiveDate) -> String {
    format!("{}000000", date.format("%Y%m%d"))
}

/// Build one archive-replay hit per news outlet.
pub fn news_stubs(proposal_id: i64, vote_date: NaiveDate) -> Vec<SearchHit> {
    let snapshot = snapshot_timestamp(vote_date);
    // Eight date digits followed by six zeros always fit.
    let tstamp = snapshot.parse::<i64>().unwrap_or_default();

    NEWS_OUTLETS
        .iter()
        .enumerate()
        .map(|(position, (name, homepage))| SearchHit {
            title: (*name).to_string(),
            domain: (*homepage).to_string(),
            tstamp,
            proposal_id,
            url: format!(
                "{}/noFrame/replay/{}/{}",
                ARCHIVE_BASE_URL, snapshot, homepage
            ),
            id: position,
            kind: HitKind::NewsOutletHomepage,
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_news_stubs_fixed_outlets() {
        let date = parse_vote_date("2020-01-15").unwrap();
        let hits = news_stubs(4321, date);

        assert_eq!(hits.len(), 5);
        for (position, hit) in hits.iter().enumerate() {
            assert_eq!(hit.id, position);
            assert_eq!(hit.tstamp, 20200115000000);
            assert_eq!(hit.proposal_id, 4321);
            assert_eq!(hit.kind, HitKind::NewsOutletHomepage);
        }

        let titles: Vec<&str> = hits.iter().map(|h| h.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Expresso",
                "Público",
                "Diario de Noticias",
                "Jornal de Negócios",
                "Correio da Manhã"
            ]
        );
    }

    #[test]
    fn test_news_stubs_replay_url() {
        let hits = news_stubs(1, parse_vote_date("2016-03-04").unwrap());
        let first = hits.first().unwrap();

        assert_eq!(first.domain, "http://expresso.pt/");
        assert_eq!(
            first.url,
            "https://arquivo.pt/noFrame/replay/20160304000000/http://expresso.pt/"
        );
    }

    #[test]
    fn test_parse_vote_date_rejects_malformed_input() {
        for input in ["15-01-2020", "2020/01/15", "yesterday", "", "2020-02-30"] {
            assert!(
                matches!(parse_vote_date(input), Err(ApiError::BadRequest(_))),
                "expected {:?} to be rejected",
                input
            );
        }
    }
}
