//! Metadata lookup for movies and series.
//!
//! Two external collaborators live here: the OMDb-style provider that
//! maps an IMDb id to structured metadata, and the AniList search used
//! to turn a western series title into a canonical anime title.

mod anilist;
mod omdb;
mod types;

pub use anilist::{AnilistClient, AnilistConfig};
pub use omdb::OmdbClient;
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when talking to metadata services.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Client not configured (missing API key, etc.).
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

/// Trait for IMDb-id metadata providers.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Look up metadata for a content id. `Ok(None)` means the id is
    /// unknown to the provider, which is not an error.
    async fn get(&self, imdb_id: &str) -> Result<Option<MediaMetadata>, MetadataError>;
}

/// Trait for anime catalog search.
#[async_trait]
pub trait AnimeCatalog: Send + Sync {
    /// Resolve a series title and season into the catalog's canonical
    /// title. `Ok(None)` when the search yields nothing.
    async fn resolve_title(
        &self,
        series_title: &str,
        season: u32,
    ) -> Result<Option<String>, MetadataError>;
}
