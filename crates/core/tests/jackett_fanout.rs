//! Jackett fan-out tests against a local Torznab endpoint.
//!
//! A minimal HTTP responder stands in for the aggregator: one indexer
//! id answers with a valid feed, the others with errors.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use debridify_core::config::JackettConfig;
use debridify_core::searcher::{JackettSearcher, TorrentSearcher, TorznabQuery};

const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:torznab="http://torznab.com/schemas/2015/feed">
  <channel>
    <item>
      <title>Show.Name.S01E03.1080p.WEB-DL</title>
      <guid>magnet:?xt=urn:btih:aabbccdd</guid>
      <jackettindexer>eztv</jackettindexer>
      <size>1400000000</size>
    </item>
    <item>
      <title>Show.Name.S01E03.720p</title>
      <guid>magnet:?xt=urn:btih:eeff0011</guid>
      <jackettindexer>eztv</jackettindexer>
      <size>700000000</size>
    </item>
  </channel>
</rss>"#;

fn http_response(status_line: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {}\r\nContent-Type: application/xml\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_line,
        body.len(),
        body
    )
}

/// Serve Torznab requests: the `good` indexer returns the feed, the
/// `broken` indexer returns HTTP 500, anything else gets garbage XML.
async fn spawn_torznab_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let mut buf = vec![0u8; 8192];
                let n = socket.read(&mut buf).await.unwrap_or(0);
                let request = String::from_utf8_lossy(&buf[..n]).to_string();

                let response = if request.contains("/indexers/good/") {
                    http_response("200 OK", FEED)
                } else if request.contains("/indexers/broken/") {
                    http_response("500 Internal Server Error", "indexer exploded")
                } else {
                    http_response("200 OK", "<rss><channel><item></rss>")
                };

                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    format!("http://{}/api/v2.0", addr)
}

fn searcher(url: String) -> JackettSearcher {
    JackettSearcher::new(JackettConfig {
        url,
        api_key: "test-key".to_string(),
        timeout_secs: 5,
    })
}

#[tokio::test]
async fn one_indexer_failing_does_not_fail_the_fanout() {
    let url = spawn_torznab_endpoint().await;
    let searcher = searcher(url);

    let indexers = vec!["good".to_string(), "broken".to_string()];
    let candidates = searcher
        .query(&indexers, &TorznabQuery::free_text("Show S01E03", 50))
        .await
        .unwrap();

    assert_eq!(candidates.len(), 2);
    assert!(candidates.iter().all(|c| c.indexer == "eztv"));
}

#[tokio::test]
async fn malformed_feed_is_dropped_like_any_other_failure() {
    let url = spawn_torznab_endpoint().await;
    let searcher = searcher(url);

    let indexers = vec!["good".to_string(), "mangled".to_string()];
    let candidates = searcher
        .query(&indexers, &TorznabQuery::free_text("Show S01E03", 50))
        .await
        .unwrap();

    assert_eq!(candidates.len(), 2);
}

#[tokio::test]
async fn all_indexers_failing_yields_empty_not_error() {
    let url = spawn_torznab_endpoint().await;
    let searcher = searcher(url);

    let indexers = vec!["broken".to_string(), "mangled".to_string()];
    let candidates = searcher
        .query(&indexers, &TorznabQuery::free_text("Show S01E03", 50))
        .await
        .unwrap();

    assert!(candidates.is_empty());
}
