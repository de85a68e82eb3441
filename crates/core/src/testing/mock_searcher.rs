//! Mock torrent searcher for testing.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::searcher::{Candidate, SearchError, TorrentSearcher, TorznabQuery};

/// A recorded query for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedQuery {
    /// Indexer ids the query was fanned out over.
    pub indexers: Vec<String>,
    /// The query itself.
    pub query: TorznabQuery,
}

/// Mock implementation of the TorrentSearcher trait.
///
/// Returns configurable candidates, records every query for
/// assertions, and can be primed to fail the next call.
pub struct MockSearcher {
    results: RwLock<Vec<Candidate>>,
    queries: RwLock<Vec<RecordedQuery>>,
    next_error: RwLock<Option<SearchError>>,
}

impl Default for MockSearcher {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSearcher {
    pub fn new() -> Self {
        Self {
            results: RwLock::new(Vec::new()),
            queries: RwLock::new(Vec::new()),
            next_error: RwLock::new(None),
        }
    }

    /// Set the candidates returned by subsequent queries.
    pub async fn set_results(&self, results: Vec<Candidate>) {
        *self.results.write().await = results;
    }

    /// Queries seen so far, in call order.
    pub async fn recorded_queries(&self) -> Vec<RecordedQuery> {
        self.queries.read().await.clone()
    }

    pub async fn query_count(&self) -> usize {
        self.queries.read().await.len()
    }

    /// Fail the next query with the given error; consumed on use.
    pub async fn set_next_error(&self, error: SearchError) {
        *self.next_error.write().await = Some(error);
    }
}

#[async_trait]
impl TorrentSearcher for MockSearcher {
    fn name(&self) -> &str {
        "mock"
    }

    async fn query(
        &self,
        indexers: &[String],
        query: &TorznabQuery,
    ) -> Result<Vec<Candidate>, SearchError> {
        self.queries.write().await.push(RecordedQuery {
            indexers: indexers.to_vec(),
            query: query.clone(),
        });

        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        Ok(self.results.read().await.clone())
    }
}
