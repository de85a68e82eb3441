//! Types for the debrid provider API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Provider-reported torrent status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TorrentStatus {
    MagnetError,
    MagnetConversion,
    WaitingFilesSelection,
    Queued,
    Downloading,
    Downloaded,
    Error,
    Virus,
    Compressing,
    Uploading,
    Dead,
    #[serde(other)]
    Unknown,
}

/// A torrent tracked by the debrid account. Read-only from our side;
/// the provider owns this state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebridTorrent {
    pub id: String,
    /// Info hash; canonical form is lowercase hex but matching is
    /// case-insensitive.
    pub hash: String,
    pub status: TorrentStatus,
    /// Provider-internal file links, present once downloaded.
    #[serde(default)]
    pub links: Vec<String>,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub bytes: u64,
    #[serde(default)]
    pub progress: f32,
}

/// Response from adding a magnet.
#[derive(Debug, Clone, Deserialize)]
pub struct AddedMagnet {
    pub id: String,
    #[serde(default)]
    pub uri: String,
}

/// An unrestricted (directly downloadable) file link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnrestrictedLink {
    #[serde(default)]
    pub filename: String,
    #[serde(rename = "mimeType", default)]
    pub mime_type: String,
    #[serde(default)]
    pub filesize: u64,
    /// The direct download URL.
    pub download: String,
    #[serde(default)]
    pub streamable: u8,
}

impl UnrestrictedLink {
    pub fn is_video(&self) -> bool {
        self.mime_type.starts_with("video/")
    }
}

/// Errors from the debrid provider API.
#[derive(Debug, Error)]
pub enum DebridError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

/// Trait for debrid providers.
#[async_trait]
pub trait DebridClient: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &str;

    /// All torrents known to the account.
    async fn list_torrents(&self) -> Result<Vec<DebridTorrent>, DebridError>;

    /// Submit a magnet; returns the provider-assigned torrent id.
    async fn add_magnet(&self, magnet: &str) -> Result<AddedMagnet, DebridError>;

    /// Instruct the provider to fetch every file in the torrent.
    async fn select_all_files(&self, torrent_id: &str) -> Result<(), DebridError>;

    /// Full torrent info by id.
    async fn torrent_info(&self, torrent_id: &str) -> Result<DebridTorrent, DebridError>;

    /// Convert a provider-internal file link into a direct URL.
    async fn unrestrict_link(&self, link: &str) -> Result<UnrestrictedLink, DebridError>;
}
