use serde::{Deserialize, Serialize};
use std::net::IpAddr;

pub use crate::metadata::AnilistConfig;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub jackett: JackettConfig,
    pub omdb: OmdbConfig,
    pub realdebrid: RealDebridConfig,
    #[serde(default)]
    pub anilist: AnilistConfig,
    #[serde(default)]
    pub search: SearchTuning,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Externally reachable base URL, used when building stream links.
    /// Defaults to `http://{host}:{port}` when unset.
    #[serde(default)]
    pub public_base_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_base_url: None,
        }
    }
}

fn default_host() -> IpAddr {
    [0, 0, 0, 0].into()
}

fn default_port() -> u16 {
    7000
}

/// Jackett aggregator configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JackettConfig {
    /// Torznab API base URL (e.g., "http://localhost:9117/api/v2.0")
    pub url: String,
    /// Jackett API key
    pub api_key: String,
    /// Per-indexer request timeout in seconds (default: 15)
    #[serde(default = "default_jackett_timeout")]
    pub timeout_secs: u32,
}

fn default_jackett_timeout() -> u32 {
    15
}

/// OMDb metadata provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OmdbConfig {
    #[serde(default = "default_omdb_url")]
    pub url: String,
    pub api_key: String,
}

fn default_omdb_url() -> String {
    "https://www.omdbapi.com".to_string()
}

/// Real-Debrid configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RealDebridConfig {
    pub api_key: String,
    #[serde(default = "default_realdebrid_url")]
    pub base_url: String,
    #[serde(default = "default_realdebrid_timeout")]
    pub timeout_secs: u32,
}

fn default_realdebrid_url() -> String {
    "https://api.real-debrid.com/rest/1.0".to_string()
}

fn default_realdebrid_timeout() -> u32 {
    30
}

/// Search fan-out tuning
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchTuning {
    /// Per-indexer result cap for movie searches (default: 50)
    #[serde(default = "default_movie_limit")]
    pub movie_limit: u32,
    /// Per-indexer result cap for series searches (default: 100)
    #[serde(default = "default_series_limit")]
    pub series_limit: u32,
    /// Per-indexer result cap for anime searches (default: 33)
    #[serde(default = "default_anime_limit")]
    pub anime_limit: u32,
    /// Indexer ids queried for anime series
    #[serde(default = "default_anime_indexers")]
    pub anime_indexers: Vec<String>,
    /// Torznab category for anime searches (default: 5070, TV/Anime)
    #[serde(default = "default_anime_category")]
    pub anime_category: u32,
}

impl Default for SearchTuning {
    fn default() -> Self {
        Self {
            movie_limit: default_movie_limit(),
            series_limit: default_series_limit(),
            anime_limit: default_anime_limit(),
            anime_indexers: default_anime_indexers(),
            anime_category: default_anime_category(),
        }
    }
}

fn default_movie_limit() -> u32 {
    50
}

fn default_series_limit() -> u32 {
    100
}

fn default_anime_limit() -> u32 {
    33
}

fn default_anime_indexers() -> Vec<String> {
    vec![
        "nyaasi".to_string(),
        "subsplease".to_string(),
        "animetosho".to_string(),
    ]
}

fn default_anime_category() -> u32 {
    5070
}

/// Cache bounds
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// How long a resolved stream URL stays valid (default: 3600)
    #[serde(default = "default_resolved_ttl")]
    pub resolved_ttl_secs: u32,
    /// Max resolved URLs kept in memory (default: 4096)
    #[serde(default = "default_resolved_max")]
    pub resolved_max_entries: usize,
    /// Max metadata entries kept in memory (default: 1024)
    #[serde(default = "default_metadata_max")]
    pub metadata_max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            resolved_ttl_secs: default_resolved_ttl(),
            resolved_max_entries: default_resolved_max(),
            metadata_max_entries: default_metadata_max(),
        }
    }
}

fn default_resolved_ttl() -> u32 {
    3600
}

fn default_resolved_max() -> usize {
    4096
}

fn default_metadata_max() -> usize {
    1024
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub jackett: SanitizedUpstream,
    pub omdb: SanitizedUpstream,
    pub realdebrid: SanitizedUpstream,
    pub anilist: AnilistConfig,
    pub search: SearchTuning,
    pub cache: CacheConfig,
}

/// An upstream endpoint with its API key reduced to a presence flag.
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedUpstream {
    pub url: String,
    pub api_key_configured: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            jackett: SanitizedUpstream {
                url: config.jackett.url.clone(),
                api_key_configured: !config.jackett.api_key.is_empty(),
            },
            omdb: SanitizedUpstream {
                url: config.omdb.url.clone(),
                api_key_configured: !config.omdb.api_key.is_empty(),
            },
            realdebrid: SanitizedUpstream {
                url: config.realdebrid.base_url.clone(),
                api_key_configured: !config.realdebrid.api_key.is_empty(),
            },
            anilist: config.anilist.clone(),
            search: config.search.clone(),
            cache: config.cache.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[jackett]
url = "http://localhost:9117/api/v2.0"
api_key = "jackett-key"

[omdb]
api_key = "omdb-key"

[realdebrid]
api_key = "rd-key"
"#;

    #[test]
    fn test_deserialize_minimal_config() {
        let config: Config = toml::from_str(MINIMAL).unwrap();
        assert_eq!(config.server.port, 7000);
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
        assert_eq!(config.jackett.timeout_secs, 15);
        assert_eq!(config.omdb.url, "https://www.omdbapi.com");
        assert_eq!(
            config.realdebrid.base_url,
            "https://api.real-debrid.com/rest/1.0"
        );
        assert_eq!(config.anilist.url, "https://graphql.anilist.co");
        assert_eq!(config.search.movie_limit, 50);
        assert_eq!(config.search.series_limit, 100);
        assert_eq!(config.search.anime_limit, 33);
        assert_eq!(config.search.anime_category, 5070);
        assert_eq!(
            config.search.anime_indexers,
            vec!["nyaasi", "subsplease", "animetosho"]
        );
        assert_eq!(config.cache.resolved_ttl_secs, 3600);
    }

    #[test]
    fn test_deserialize_missing_jackett_fails() {
        let toml = r#"
[omdb]
api_key = "omdb-key"

[realdebrid]
api_key = "rd-key"
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_overrides() {
        let toml = format!(
            "{}\n[server]\nhost = \"127.0.0.1\"\nport = 9000\npublic_base_url = \"https://streams.example.com\"\n",
            MINIMAL
        );
        let config: Config = toml::from_str(&toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(
            config.server.public_base_url.as_deref(),
            Some("https://streams.example.com")
        );
    }

    #[test]
    fn test_sanitized_config_redacts_keys() {
        let config: Config = toml::from_str(MINIMAL).unwrap();
        let sanitized = SanitizedConfig::from(&config);

        assert!(sanitized.jackett.api_key_configured);
        assert!(sanitized.omdb.api_key_configured);
        assert!(sanitized.realdebrid.api_key_configured);

        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("jackett-key"));
        assert!(!json.contains("omdb-key"));
        assert!(!json.contains("rd-key"));
    }
}
