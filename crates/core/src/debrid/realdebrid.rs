//! Real-Debrid REST API client.
//!
//! All endpoints are authenticated with the account token as an
//! `auth_token` query parameter; mutating calls take form-encoded
//! bodies.

use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::debug;

use crate::config::RealDebridConfig;

use super::{AddedMagnet, DebridClient, DebridError, DebridTorrent, UnrestrictedLink};

/// Real-Debrid API client.
pub struct RealDebridClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RealDebridClient {
    pub fn new(config: RealDebridConfig) -> Result<Self, DebridError> {
        if config.api_key.is_empty() {
            return Err(DebridError::NotConfigured(
                "Real-Debrid API key is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
        })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}?auth_token={}",
            self.base_url,
            path,
            urlencoding::encode(&self.api_key)
        )
    }

    async fn check(&self, response: Response) -> Result<Response, DebridError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DebridError::ApiError {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl DebridClient for RealDebridClient {
    fn name(&self) -> &str {
        "real-debrid"
    }

    async fn list_torrents(&self) -> Result<Vec<DebridTorrent>, DebridError> {
        debug!("Listing debrid torrents");

        let response = self.client.get(self.url("torrents")).send().await?;
        let response = self.check(response).await?;

        response
            .json()
            .await
            .map_err(|e| DebridError::ParseError(format!("torrent list: {}", e)))
    }

    async fn add_magnet(&self, magnet: &str) -> Result<AddedMagnet, DebridError> {
        debug!("Adding magnet to debrid account");

        let response = self
            .client
            .post(self.url("torrents/addMagnet"))
            .form(&[("magnet", magnet)])
            .send()
            .await?;
        let response = self.check(response).await?;

        response
            .json()
            .await
            .map_err(|e| DebridError::ParseError(format!("addMagnet response: {}", e)))
    }

    async fn select_all_files(&self, torrent_id: &str) -> Result<(), DebridError> {
        debug!(torrent_id = torrent_id, "Selecting all files");

        let response = self
            .client
            .post(self.url(&format!("torrents/selectFiles/{}", torrent_id)))
            .form(&[("files", "all")])
            .send()
            .await?;
        self.check(response).await?;

        Ok(())
    }

    async fn torrent_info(&self, torrent_id: &str) -> Result<DebridTorrent, DebridError> {
        debug!(torrent_id = torrent_id, "Fetching torrent info");

        let response = self
            .client
            .get(self.url(&format!("torrents/info/{}", torrent_id)))
            .send()
            .await?;
        let response = self.check(response).await?;

        response
            .json()
            .await
            .map_err(|e| DebridError::ParseError(format!("torrent info: {}", e)))
    }

    async fn unrestrict_link(&self, link: &str) -> Result<UnrestrictedLink, DebridError> {
        debug!("Unrestricting link");

        let response = self
            .client
            .post(self.url("unrestrict/link"))
            .form(&[("link", link)])
            .send()
            .await?;
        let response = self.check(response).await?;

        response
            .json()
            .await
            .map_err(|e| DebridError::ParseError(format!("unrestrict response: {}", e)))
    }
}
