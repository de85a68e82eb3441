//! Structured media metadata.

use serde::{Deserialize, Serialize};

/// Countries whose animated series are treated as anime for indexer
/// selection.
const ANIME_COUNTRIES: [&str; 3] = ["Japan", "China", "South Korea"];

/// Metadata for a movie or a series, discriminated by content type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MediaMetadata {
    Movie(MovieMetadata),
    Series(SeriesMetadata),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieMetadata {
    pub imdb_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    #[serde(default)]
    pub countries: Vec<String>,
    #[serde(default)]
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesMetadata {
    pub imdb_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    #[serde(default)]
    pub countries: Vec<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_seasons: Option<u32>,
}

impl SeriesMetadata {
    /// A series is classified as anime when it comes from an
    /// anime-producing country and carries the Animation genre.
    pub fn is_anime(&self) -> bool {
        let anime_country = self
            .countries
            .iter()
            .any(|c| ANIME_COUNTRIES.contains(&c.as_str()));
        let animation = self.genres.iter().any(|g| g == "Animation");
        anime_country && animation
    }
}

impl MediaMetadata {
    pub fn title(&self) -> &str {
        match self {
            MediaMetadata::Movie(m) => &m.title,
            MediaMetadata::Series(s) => &s.title,
        }
    }

    pub fn imdb_id(&self) -> &str {
        match self {
            MediaMetadata::Movie(m) => &m.imdb_id,
            MediaMetadata::Series(s) => &s.imdb_id,
        }
    }
}
