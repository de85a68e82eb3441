//! OMDb API client.
//!
//! One GET per IMDb id; responses are memoized for the process
//! lifetime (metadata is treated as immutable) in a capacity-bounded
//! cache.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use async_trait::async_trait;

use crate::cache::TtlCache;
use crate::config::OmdbConfig;

use super::{MediaMetadata, MetadataError, MetadataProvider, MovieMetadata, SeriesMetadata};

/// OMDb metadata provider with a per-id memo cache.
pub struct OmdbClient {
    client: Client,
    config: OmdbConfig,
    cache: TtlCache<String, MediaMetadata>,
}

impl OmdbClient {
    pub fn new(config: OmdbConfig, cache_capacity: usize) -> Result<Self, MetadataError> {
        if config.api_key.is_empty() {
            return Err(MetadataError::NotConfigured(
                "OMDb API key is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            config,
            // Metadata never goes stale within a process; only capacity bounds it.
            cache: TtlCache::new(None, cache_capacity),
        })
    }

    async fn fetch(&self, imdb_id: &str) -> Result<Option<MediaMetadata>, MetadataError> {
        debug!(imdb_id = imdb_id, "OMDb lookup");

        let response = self
            .client
            .get(&self.config.url)
            .query(&[("i", imdb_id), ("apikey", &self.config.api_key)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MetadataError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let payload: OmdbPayload = response
            .json()
            .await
            .map_err(|e| MetadataError::ParseError(format!("OMDb response: {}", e)))?;

        Ok(payload.into_metadata())
    }
}

#[async_trait]
impl MetadataProvider for OmdbClient {
    async fn get(&self, imdb_id: &str) -> Result<Option<MediaMetadata>, MetadataError> {
        if let Some(cached) = self.cache.get(&imdb_id.to_string()).await {
            return Ok(Some(cached));
        }

        let metadata = self.fetch(imdb_id).await?;

        if let Some(ref meta) = metadata {
            self.cache.insert(imdb_id.to_string(), meta.clone()).await;
        }

        Ok(metadata)
    }
}

// OMDb API response shape (comma-separated list fields, everything a string)
#[derive(Debug, Deserialize)]
struct OmdbPayload {
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "Year")]
    year: Option<String>,
    #[serde(rename = "Country")]
    country: Option<String>,
    #[serde(rename = "Genre")]
    genre: Option<String>,
    #[serde(rename = "Type")]
    kind: Option<String>,
    #[serde(rename = "totalSeasons")]
    total_seasons: Option<String>,
    #[serde(rename = "imdbID")]
    imdb_id: Option<String>,
    #[serde(rename = "Response")]
    response: Option<String>,
}

impl OmdbPayload {
    fn into_metadata(self) -> Option<MediaMetadata> {
        if self.response.as_deref() == Some("False") {
            return None;
        }

        let imdb_id = self.imdb_id?;
        let title = self.title?;
        let year = self.year.as_deref().and_then(parse_year);
        let countries = split_list(self.country.as_deref());
        let genres = split_list(self.genre.as_deref());

        match self.kind.as_deref() {
            Some("movie") => Some(MediaMetadata::Movie(MovieMetadata {
                imdb_id,
                title,
                year,
                countries,
                genres,
            })),
            Some("series") => Some(MediaMetadata::Series(SeriesMetadata {
                imdb_id,
                title,
                year,
                countries,
                genres,
                total_seasons: self.total_seasons.and_then(|s| s.parse().ok()),
            })),
            _ => None,
        }
    }
}

/// OMDb years look like "1999" for movies and "2008–2013" for series;
/// the leading four digits are what we want.
fn parse_year(year: &str) -> Option<u32> {
    let digits: String = year.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.len() == 4 {
        digits.parse().ok()
    } else {
        None
    }
}

fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(kind: &str) -> OmdbPayload {
        OmdbPayload {
            title: Some("Vinland Saga".to_string()),
            year: Some("2019–2023".to_string()),
            country: Some("Japan, United States".to_string()),
            genre: Some("Animation, Action, Adventure".to_string()),
            kind: Some(kind.to_string()),
            total_seasons: Some("2".to_string()),
            imdb_id: Some("tt10233448".to_string()),
            response: Some("True".to_string()),
        }
    }

    #[test]
    fn test_series_payload_conversion() {
        let meta = payload("series").into_metadata().unwrap();
        match meta {
            MediaMetadata::Series(series) => {
                assert_eq!(series.title, "Vinland Saga");
                assert_eq!(series.year, Some(2019));
                assert_eq!(series.countries, vec!["Japan", "United States"]);
                assert_eq!(series.total_seasons, Some(2));
                assert!(series.is_anime());
            }
            MediaMetadata::Movie(_) => panic!("expected series"),
        }
    }

    #[test]
    fn test_movie_payload_conversion() {
        let meta = payload("movie").into_metadata().unwrap();
        assert!(matches!(meta, MediaMetadata::Movie(_)));
    }

    #[test]
    fn test_negative_response_is_none() {
        let mut p = payload("movie");
        p.response = Some("False".to_string());
        assert!(p.into_metadata().is_none());
    }

    #[test]
    fn test_unknown_type_is_none() {
        let mut p = payload("game");
        assert!(p.into_metadata().is_none());
        p = payload("movie");
        p.kind = None;
        assert!(p.into_metadata().is_none());
    }

    #[test]
    fn test_parse_year() {
        assert_eq!(parse_year("1999"), Some(1999));
        assert_eq!(parse_year("2008–2013"), Some(2008));
        assert_eq!(parse_year("N/A"), None);
    }

    #[test]
    fn test_split_list_handles_missing() {
        assert!(split_list(None).is_empty());
        assert_eq!(split_list(Some("a, b")), vec!["a", "b"]);
    }
}
