//! News endpoint integration tests.
//!
//! Tests `/proposals/news/{proposal_id}` and
//! `/proposals/news/{proposal_id}/{proposal_date}`.

use api_test_utils::{decode_gzip_json, ProposalFixture, TestApiServer};
use meuparlamento_api::repositories::mock::InMemoryStore;
use serde_json::Value;
use std::sync::Arc;

const OUTLETS: [(&str, &str); 5] = [
    ("Expresso", "http://expresso.pt/"),
    ("Público", "http://publico.pt/"),
    ("Diario de Noticias", "http://www.dn.pt/"),
    ("Jornal de Negócios", "http://www.jornaldenegocios.pt/"),
    ("Correio da Manhã", "http://www.cmjornal.pt/"),
];

fn assert_news_hits(hits: &[Value], proposal_id: i64, snapshot: &str) {
    assert_eq!(hits.len(), OUTLETS.len());

    for (position, (hit, (title, homepage))) in hits.iter().zip(OUTLETS).enumerate() {
        assert_eq!(hit["id"], position);
        assert_eq!(hit["title"], title);
        assert_eq!(hit["domain"], homepage);
        assert_eq!(hit["proposalID"], proposal_id);
        assert_eq!(hit["type"], "news_outlet_homepage");
        assert_eq!(hit["tstamp"].to_string(), snapshot);
        assert_eq!(
            hit["url"],
            format!("https://arquivo.pt/noFrame/replay/{}/{}", snapshot, homepage)
        );
    }
}

#[tokio::test]
async fn test_dated_news_returns_five_outlets() -> Result<(), anyhow::Error> {
    // A failing store proves the dated route never reads it.
    let server = TestApiServer::spawn(Arc::new(InMemoryStore::failing())).await?;

    let response = reqwest::get(format!("{}/proposals/news/41234/2020-01-15", server.url())).await?;
    assert_eq!(response.status(), 200);

    let body = decode_gzip_json(response).await?;
    let hits = body["data"].as_array().cloned().unwrap_or_default();
    assert_news_hits(&hits, 41234, "20200115000000");
    assert_eq!(server.store().query_count(), 0);

    Ok(())
}

#[tokio::test]
async fn test_dated_news_rejects_malformed_date() -> Result<(), anyhow::Error> {
    let server = TestApiServer::spawn(Arc::new(InMemoryStore::new())).await?;

    for date in ["15-01-2020", "2020-13-01", "today"] {
        let response =
            reqwest::get(format!("{}/proposals/news/1/{}", server.url(), date)).await?;
        assert_eq!(response.status(), 400, "date {} should be rejected", date);
    }

    Ok(())
}

#[tokio::test]
async fn test_news_uses_stored_vote_date() -> Result<(), anyhow::Error> {
    let store = Arc::new(InMemoryStore::with_proposals(vec![ProposalFixture::opposition(77)
        // 2016-03-04T18:30:00Z
        .voted_at(1_457_116_200_000)
        .build()]));
    let server = TestApiServer::spawn(store).await?;

    let response = reqwest::get(format!("{}/proposals/news/77", server.url())).await?;
    assert_eq!(response.status(), 200);

    let body = decode_gzip_json(response).await?;
    let hits = body["data"].as_array().cloned().unwrap_or_default();
    assert_news_hits(&hits, 77, "20160304000000");

    Ok(())
}

#[tokio::test]
async fn test_news_unknown_proposal_returns_404() -> Result<(), anyhow::Error> {
    let server = TestApiServer::spawn(Arc::new(InMemoryStore::new())).await?;

    let response = reqwest::get(format!("{}/proposals/news/404", server.url())).await?;

    assert_eq!(response.status(), 404);

    Ok(())
}
