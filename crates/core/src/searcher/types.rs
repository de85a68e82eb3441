//! Types for the torrent search system.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A normalized indexer result. Immutable once parsed; the `guid` is
/// the opaque magnet-style token handed back to us for resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    /// Release title as reported by the indexer.
    pub title: String,
    /// Opaque magnet/link token.
    pub guid: String,
    /// Which indexer returned this result.
    pub indexer: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// When the torrent was published.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    /// Torznab category tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<u32>,
}

/// Torznab search flavor (`t=` parameter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    Search,
    Movie,
    TvSearch,
}

impl QueryKind {
    pub fn as_param(&self) -> &'static str {
        match self {
            QueryKind::Search => "search",
            QueryKind::Movie => "movie",
            QueryKind::TvSearch => "tvsearch",
        }
    }
}

/// A single Torznab query, fanned out across one or more indexers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TorznabQuery {
    /// Free-text search term.
    pub text: String,
    /// Search flavor.
    pub kind: QueryKind,
    /// IMDb id hint (movie searches).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imdb_id: Option<String>,
    /// Release year hint (movie searches).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    /// Torznab category filter (e.g. 5070 for TV/Anime).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<u32>,
    /// Per-indexer result cap.
    pub limit: u32,
}

impl TorznabQuery {
    /// Plain free-text query with a result cap.
    pub fn free_text(text: impl Into<String>, limit: u32) -> Self {
        Self {
            text: text.into(),
            kind: QueryKind::Search,
            imdb_id: None,
            year: None,
            category: None,
            limit,
        }
    }
}

/// Errors that can occur while querying an indexer.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Indexer connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Indexer API error: {0}")]
    ApiError(String),

    #[error("Failed to parse indexer feed: {0}")]
    ParseError(String),

    #[error("Request timeout")]
    Timeout,
}

/// Trait for torrent search backends.
///
/// `indexers` names the aggregator-side indexer ids to fan out over;
/// the special id `all` queries every indexer the aggregator knows.
/// Implementations absorb partial failures: a single indexer erroring
/// never fails the call, it just contributes zero candidates.
#[async_trait]
pub trait TorrentSearcher: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Fan a query out over the given indexers and concatenate whatever
    /// settles successfully, in settle order.
    async fn query(
        &self,
        indexers: &[String],
        query: &TorznabQuery,
    ) -> Result<Vec<Candidate>, SearchError>;
}
