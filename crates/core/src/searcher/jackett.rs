//! Jackett (Torznab) search backend implementation.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::JackettConfig;
use crate::fanout::settle_all;
use crate::metrics::INDEXER_QUERY_FAILURES;

use super::{parse_torznab_feed, Candidate, SearchError, TorrentSearcher, TorznabQuery};

/// Jackett search backend. Fans a single query out over one indexer id
/// per request; partial failures are logged and dropped, never
/// propagated.
pub struct JackettSearcher {
    client: Client,
    config: JackettConfig,
}

impl JackettSearcher {
    /// Create a new JackettSearcher with the given configuration.
    pub fn new(config: JackettConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    /// Build the Torznab API URL for one indexer.
    fn build_search_url(&self, indexer: &str, query: &TorznabQuery) -> String {
        let mut url = format!(
            "{}/indexers/{}/results/torznab?apikey={}&t={}&q={}&limit={}",
            self.config.url.trim_end_matches('/'),
            urlencoding::encode(indexer),
            urlencoding::encode(&self.config.api_key),
            query.kind.as_param(),
            urlencoding::encode(&query.text),
            query.limit
        );

        if let Some(ref imdb_id) = query.imdb_id {
            url.push_str(&format!("&imdbid={}", urlencoding::encode(imdb_id)));
        }
        if let Some(year) = query.year {
            url.push_str(&format!("&year={}", year));
        }
        if let Some(category) = query.category {
            url.push_str(&format!("&cat={}", category));
        }

        url
    }

    /// Query a single indexer.
    async fn query_indexer(
        &self,
        indexer: &str,
        query: &TorznabQuery,
    ) -> Result<Vec<Candidate>, SearchError> {
        let url = self.build_search_url(indexer, query);
        debug!(indexer = indexer, query = %query.text, "Querying Torznab indexer");

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                SearchError::Timeout
            } else if e.is_connect() {
                SearchError::ConnectionFailed(e.to_string())
            } else {
                SearchError::ApiError(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::ApiError(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SearchError::ApiError(e.to_string()))?;

        let candidates = parse_torznab_feed(&body)?;

        debug!(
            indexer = indexer,
            results = candidates.len(),
            "Indexer query complete"
        );

        Ok(candidates)
    }
}

#[async_trait]
impl TorrentSearcher for JackettSearcher {
    fn name(&self) -> &str {
        "jackett"
    }

    async fn query(
        &self,
        indexers: &[String],
        query: &TorznabQuery,
    ) -> Result<Vec<Candidate>, SearchError> {
        debug!(
            indexers = ?indexers,
            query = %query.text,
            "Starting parallel indexer fan-out"
        );

        let futures: Vec<_> = indexers
            .iter()
            .map(|indexer| {
                let indexer = indexer.clone();
                async move {
                    self.query_indexer(&indexer, query)
                        .await
                        .map_err(|e| (indexer, e))
                }
            })
            .collect();

        let (batches, failures) = settle_all(futures).await;

        for (indexer, error) in &failures {
            warn!(indexer = %indexer, error = %error, "Indexer query failed");
            INDEXER_QUERY_FAILURES.with_label_values(&[indexer]).inc();
        }

        // Concatenate in settle order; duplicates across indexers are
        // kept as distinct candidates.
        Ok(batches.into_iter().flatten().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::searcher::QueryKind;

    fn test_config() -> JackettConfig {
        JackettConfig {
            url: "http://localhost:9117/api/v2.0".to_string(),
            api_key: "test-key".to_string(),
            timeout_secs: 15,
        }
    }

    #[test]
    fn test_build_search_url_movie() {
        let searcher = JackettSearcher::new(test_config());
        let query = TorznabQuery {
            text: "The Matrix".to_string(),
            kind: QueryKind::Movie,
            imdb_id: Some("tt0133093".to_string()),
            year: Some(1999),
            category: None,
            limit: 50,
        };

        let url = searcher.build_search_url("all", &query);
        assert!(url.starts_with("http://localhost:9117/api/v2.0/indexers/all/results/torznab?"));
        assert!(url.contains("apikey=test-key"));
        assert!(url.contains("t=movie"));
        assert!(url.contains("q=The%20Matrix"));
        assert!(url.contains("imdbid=tt0133093"));
        assert!(url.contains("year=1999"));
        assert!(url.contains("limit=50"));
    }

    #[test]
    fn test_build_search_url_anime_category() {
        let searcher = JackettSearcher::new(test_config());
        let query = TorznabQuery {
            text: "Frieren S02E01".to_string(),
            kind: QueryKind::TvSearch,
            imdb_id: None,
            year: None,
            category: Some(5070),
            limit: 33,
        };

        let url = searcher.build_search_url("nyaasi", &query);
        assert!(url.contains("/indexers/nyaasi/results/torznab?"));
        assert!(url.contains("t=tvsearch"));
        assert!(url.contains("cat=5070"));
        assert!(!url.contains("imdbid"));
    }

    #[test]
    fn test_build_search_url_trims_trailing_slash() {
        let mut config = test_config();
        config.url = "http://localhost:9117/api/v2.0/".to_string();
        let searcher = JackettSearcher::new(config);

        let url = searcher.build_search_url("all", &TorznabQuery::free_text("x", 10));
        assert!(url.contains("v2.0/indexers/all"));
        assert!(!url.contains("v2.0//indexers"));
    }
}
