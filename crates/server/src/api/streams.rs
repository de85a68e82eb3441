//! Stremio addon surface: manifest and stream lists.
//!
//! Stream endpoints never fail outward. Whatever goes wrong upstream
//! (metadata lookup, indexer fan-out, bad ids), the player gets an
//! empty stream list and moves on to its other addons.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

use debridify_core::metadata::MediaMetadata;
use debridify_core::ranking::{format_size, RankedCandidate};

use crate::state::AppState;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub id: String,
    pub version: String,
    pub name: String,
    pub description: String,
    pub resources: Vec<String>,
    pub types: Vec<String>,
    pub id_prefixes: Vec<String>,
    pub catalogs: Vec<serde_json::Value>,
}

pub async fn manifest() -> Json<Manifest> {
    Json(Manifest {
        id: "community.debridify".to_string(),
        version: VERSION.to_string(),
        name: "Debridify".to_string(),
        description: "Torrent streams resolved through your debrid account".to_string(),
        resources: vec!["stream".to_string()],
        types: vec!["movie".to_string(), "series".to_string()],
        id_prefixes: vec!["tt".to_string()],
        catalogs: Vec::new(),
    })
}

#[derive(Serialize)]
pub struct StreamsResponse {
    pub streams: Vec<StreamEntry>,
}

#[derive(Serialize)]
pub struct StreamEntry {
    pub name: String,
    pub description: String,
    pub url: String,
}

pub async fn movie_streams(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Json<StreamsResponse> {
    let imdb_id = id.trim_end_matches(".json");
    let streams = movie_stream_list(&state, imdb_id).await.unwrap_or_default();
    Json(StreamsResponse { streams })
}

pub async fn series_streams(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Json<StreamsResponse> {
    let id = id.trim_end_matches(".json");
    let streams = match parse_series_id(id) {
        Some((imdb_id, season, episode)) => {
            series_stream_list(&state, &imdb_id, season, episode)
                .await
                .unwrap_or_default()
        }
        None => {
            warn!(id = id, "Malformed series stream id");
            Vec::new()
        }
    };
    Json(StreamsResponse { streams })
}

async fn movie_stream_list(state: &AppState, imdb_id: &str) -> Option<Vec<StreamEntry>> {
    let metadata = lookup_metadata(state, imdb_id).await?;

    let movie = match metadata {
        MediaMetadata::Movie(movie) => movie,
        MediaMetadata::Series(_) => {
            warn!(imdb_id = imdb_id, "Movie stream requested for a series id");
            return None;
        }
    };

    debug!(imdb_id = imdb_id, title = %movie.title, "Searching movie streams");
    let ranked = state.search().search_movie(&movie).await?;

    Some(build_entries(state, ranked))
}

async fn series_stream_list(
    state: &AppState,
    imdb_id: &str,
    season: u32,
    episode: u32,
) -> Option<Vec<StreamEntry>> {
    let metadata = lookup_metadata(state, imdb_id).await?;

    let series = match metadata {
        MediaMetadata::Series(series) => series,
        MediaMetadata::Movie(_) => {
            warn!(imdb_id = imdb_id, "Series stream requested for a movie id");
            return None;
        }
    };

    debug!(
        imdb_id = imdb_id,
        title = %series.title,
        season = season,
        episode = episode,
        "Searching series streams"
    );
    let ranked = state.search().search_series(&series, season, episode).await?;

    Some(build_entries(state, ranked))
}

async fn lookup_metadata(state: &AppState, imdb_id: &str) -> Option<MediaMetadata> {
    match state.metadata().get(imdb_id).await {
        Ok(metadata) => metadata,
        Err(e) => {
            warn!(imdb_id = imdb_id, error = %e, "Metadata lookup failed");
            None
        }
    }
}

fn build_entries(state: &AppState, ranked: Vec<RankedCandidate>) -> Vec<StreamEntry> {
    let base = state.public_base_url();
    ranked
        .into_iter()
        .map(|r| StreamEntry {
            name: format!("Debridify ({})", r.quality.label()),
            description: format!(
                "{}\n{} | {}",
                r.candidate.title,
                format_size(r.candidate.size_bytes),
                r.candidate.indexer
            ),
            url: format!(
                "{}/resolve?magnet={}",
                base,
                urlencoding::encode(&r.candidate.guid)
            ),
        })
        .collect()
}

/// Series ids look like `tt0903747:2:3` (imdb id, season, episode).
fn parse_series_id(id: &str) -> Option<(String, u32, u32)> {
    let mut parts = id.split(':');
    let imdb_id = parts.next()?;
    let season = parts.next()?.parse().ok()?;
    let episode = parts.next()?.parse().ok()?;
    if parts.next().is_some() || !imdb_id.starts_with("tt") {
        return None;
    }
    Some((imdb_id.to_string(), season, episode))
}

#[cfg(test)]
mod tests {
    use super::*;
    use debridify_core::debrid::MagnetResolver;
    use debridify_core::pipeline::StreamSearch;
    use debridify_core::testing::{
        fixtures, MockAnimeCatalog, MockDebridClient, MockMetadataProvider, MockSearcher,
    };
    use debridify_core::load_config_from_str;

    struct TestEnv {
        state: Arc<AppState>,
        metadata: Arc<MockMetadataProvider>,
        searcher: Arc<MockSearcher>,
    }

    fn test_env() -> TestEnv {
        let config = load_config_from_str(
            r#"
[server]
public_base_url = "https://addon.example.com"

[jackett]
url = "http://localhost:9117/api/v2.0"
api_key = "key"

[omdb]
api_key = "key"

[realdebrid]
api_key = "key"
"#,
        )
        .unwrap();

        let metadata = Arc::new(MockMetadataProvider::new());
        let searcher = Arc::new(MockSearcher::new());
        let anime = Arc::new(MockAnimeCatalog::new());
        let search = StreamSearch::new(searcher.clone(), anime, config.search.clone());
        let resolver = MagnetResolver::new(
            Arc::new(MockDebridClient::new()),
            chrono::Duration::hours(1),
            16,
        );

        TestEnv {
            state: Arc::new(AppState::new(config, metadata.clone(), search, resolver)),
            metadata,
            searcher,
        }
    }

    #[tokio::test]
    async fn test_movie_streams_happy_path() {
        let env = test_env();
        env.metadata
            .set(fixtures::movie_metadata("tt0133093", "The Matrix"))
            .await;
        env.searcher
            .set_results(vec![fixtures::candidate(
                "The Matrix 1999 1080p BluRay",
                "yts",
                1_400_000_000,
            )])
            .await;

        let Json(response) = movie_streams(
            State(env.state.clone()),
            Path("tt0133093.json".to_string()),
        )
        .await;

        assert_eq!(response.streams.len(), 1);
        let entry = &response.streams[0];
        assert_eq!(entry.name, "Debridify (1080p)");
        assert!(entry.description.contains("The Matrix 1999 1080p BluRay"));
        assert!(entry.description.contains("1.3 GB"));
        assert!(entry.description.contains("yts"));
        assert!(entry
            .url
            .starts_with("https://addon.example.com/resolve?magnet="));
    }

    #[tokio::test]
    async fn test_movie_streams_unknown_id_is_empty() {
        let env = test_env();

        let Json(response) = movie_streams(
            State(env.state.clone()),
            Path("tt9999999.json".to_string()),
        )
        .await;

        assert!(response.streams.is_empty());
    }

    #[tokio::test]
    async fn test_movie_streams_metadata_error_is_empty() {
        let env = test_env();
        env.metadata.fail_lookups();

        let Json(response) = movie_streams(
            State(env.state.clone()),
            Path("tt0133093.json".to_string()),
        )
        .await;

        assert!(response.streams.is_empty());
    }

    #[tokio::test]
    async fn test_movie_route_with_series_id_is_empty() {
        let env = test_env();
        env.metadata
            .set(fixtures::series_metadata("tt0903747", "Breaking Bad"))
            .await;

        let Json(response) = movie_streams(
            State(env.state.clone()),
            Path("tt0903747.json".to_string()),
        )
        .await;

        assert!(response.streams.is_empty());
    }

    #[tokio::test]
    async fn test_series_streams_happy_path() {
        let env = test_env();
        env.metadata
            .set(fixtures::series_metadata("tt0903747", "Breaking Bad"))
            .await;
        env.searcher
            .set_results(vec![fixtures::candidate(
                "Breaking Bad S02E03 720p",
                "eztv",
                900_000_000,
            )])
            .await;

        let Json(response) = series_streams(
            State(env.state.clone()),
            Path("tt0903747:2:3.json".to_string()),
        )
        .await;

        assert_eq!(response.streams.len(), 1);
        assert_eq!(response.streams[0].name, "Debridify (720p)");
    }

    #[tokio::test]
    async fn test_series_streams_malformed_id_is_empty() {
        let env = test_env();

        let Json(response) = series_streams(
            State(env.state.clone()),
            Path("tt0903747.json".to_string()),
        )
        .await;

        assert!(response.streams.is_empty());
    }

    #[test]
    fn test_parse_series_id_valid() {
        assert_eq!(
            parse_series_id("tt0903747:2:3"),
            Some(("tt0903747".to_string(), 2, 3))
        );
    }

    #[test]
    fn test_parse_series_id_invalid() {
        assert_eq!(parse_series_id("tt0903747"), None);
        assert_eq!(parse_series_id("tt0903747:2"), None);
        assert_eq!(parse_series_id("tt0903747:a:3"), None);
        assert_eq!(parse_series_id("tt0903747:2:3:4"), None);
        assert_eq!(parse_series_id("0903747:2:3"), None);
    }
}
