//! AniList GraphQL client.
//!
//! Used only to canonicalize anime titles: western metadata providers
//! report localized titles that anime indexers rarely use, so we ask
//! AniList for the romanized title before building indexer queries.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::{AnimeCatalog, MetadataError};

const SEARCH_QUERY: &str = r#"
query ($search: String!) {
  Page {
    media(search: $search, type: ANIME) {
      id
      title {
        romaji
        english
        native
      }
      episodes
    }
  }
}
"#;

/// AniList client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnilistConfig {
    /// GraphQL endpoint (default: https://graphql.anilist.co).
    #[serde(default = "default_url")]
    pub url: String,
    /// Request timeout in seconds (default: 15).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

impl Default for AnilistConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_url() -> String {
    "https://graphql.anilist.co".to_string()
}

fn default_timeout() -> u32 {
    15
}

/// AniList anime catalog client.
pub struct AnilistClient {
    client: Client,
    config: AnilistConfig,
}

impl AnilistClient {
    pub fn new(config: AnilistConfig) -> Result<Self, MetadataError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()?;

        Ok(Self { client, config })
    }

    async fn search(&self, search: &str) -> Result<Vec<AnilistMedia>, MetadataError> {
        debug!(search = search, "AniList search");

        let body = serde_json::json!({
            "query": SEARCH_QUERY,
            "variables": { "search": search },
        });

        let response = self.client.post(&self.config.url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MetadataError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let payload: GraphqlResponse = response
            .json()
            .await
            .map_err(|e| MetadataError::ParseError(format!("AniList response: {}", e)))?;

        Ok(payload
            .data
            .and_then(|d| d.page)
            .map(|p| p.media)
            .unwrap_or_default())
    }
}

#[async_trait]
impl AnimeCatalog for AnilistClient {
    async fn resolve_title(
        &self,
        series_title: &str,
        season: u32,
    ) -> Result<Option<String>, MetadataError> {
        let search = anilist_search_term(series_title, season);
        let media = self.search(&search).await?;

        Ok(media.into_iter().next().and_then(|m| m.title.preferred()))
    }
}

/// Season 1 searches by the bare title; later seasons append
/// "Season N", which is how AniList lists sequel cours.
fn anilist_search_term(series_title: &str, season: u32) -> String {
    if season > 1 {
        format!("{} Season {}", series_title, season)
    } else {
        series_title.to_string()
    }
}

// AniList API response types
#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    data: Option<GraphqlData>,
}

#[derive(Debug, Deserialize)]
struct GraphqlData {
    #[serde(rename = "Page")]
    page: Option<AnilistPage>,
}

#[derive(Debug, Deserialize)]
struct AnilistPage {
    #[serde(default)]
    media: Vec<AnilistMedia>,
}

#[derive(Debug, Deserialize)]
struct AnilistMedia {
    #[allow(dead_code)]
    id: u64,
    title: AnilistTitle,
    #[allow(dead_code)]
    episodes: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct AnilistTitle {
    romaji: Option<String>,
    english: Option<String>,
    native: Option<String>,
}

impl AnilistTitle {
    /// Romanized title first, then English, then native.
    fn preferred(self) -> Option<String> {
        self.romaji.or(self.english).or(self.native)
    }
}
