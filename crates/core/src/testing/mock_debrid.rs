//! Mock debrid provider for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;

use crate::debrid::{
    AddedMagnet, DebridClient, DebridError, DebridTorrent, UnrestrictedLink,
};

/// Mock implementation of the DebridClient trait.
///
/// Each endpoint can be preloaded with responses and toggled to fail;
/// call counts are tracked for assertions about which provider calls a
/// resolution actually made.
pub struct MockDebridClient {
    /// Account torrents returned by `list_torrents`.
    torrents: RwLock<Vec<DebridTorrent>>,
    /// Torrent info keyed by torrent id.
    infos: RwLock<HashMap<String, DebridTorrent>>,
    /// Unrestricted files keyed by provider link.
    unrestricted: RwLock<HashMap<String, UnrestrictedLink>>,
    /// Id assigned to the next added magnet.
    next_id: RwLock<String>,
    fail_list: AtomicBool,
    fail_add: AtomicBool,
    fail_select: AtomicBool,
    fail_unrestrict: AtomicBool,
    pub list_calls: AtomicUsize,
    pub add_calls: AtomicUsize,
    pub select_calls: AtomicUsize,
    pub info_calls: AtomicUsize,
    pub unrestrict_calls: AtomicUsize,
}

impl Default for MockDebridClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDebridClient {
    pub fn new() -> Self {
        Self {
            torrents: RwLock::new(Vec::new()),
            infos: RwLock::new(HashMap::new()),
            unrestricted: RwLock::new(HashMap::new()),
            next_id: RwLock::new("MOCK1".to_string()),
            fail_list: AtomicBool::new(false),
            fail_add: AtomicBool::new(false),
            fail_select: AtomicBool::new(false),
            fail_unrestrict: AtomicBool::new(false),
            list_calls: AtomicUsize::new(0),
            add_calls: AtomicUsize::new(0),
            select_calls: AtomicUsize::new(0),
            info_calls: AtomicUsize::new(0),
            unrestrict_calls: AtomicUsize::new(0),
        }
    }

    /// Set the torrents already present on the account.
    pub async fn set_torrents(&self, torrents: Vec<DebridTorrent>) {
        *self.torrents.write().await = torrents;
    }

    /// Register the info returned for a torrent id.
    pub async fn set_info(&self, info: DebridTorrent) {
        self.infos.write().await.insert(info.id.clone(), info);
    }

    /// Register the unrestricted file returned for a provider link.
    pub async fn set_unrestricted(&self, link: &str, file: UnrestrictedLink) {
        self.unrestricted.write().await.insert(link.to_string(), file);
    }

    /// Set the id assigned to the next added magnet.
    pub async fn set_next_id(&self, id: &str) {
        *self.next_id.write().await = id.to_string();
    }

    pub fn fail_list(&self) {
        self.fail_list.store(true, Ordering::SeqCst);
    }

    pub fn fail_add(&self) {
        self.fail_add.store(true, Ordering::SeqCst);
    }

    pub fn fail_select(&self) {
        self.fail_select.store(true, Ordering::SeqCst);
    }

    pub fn fail_unrestrict(&self) {
        self.fail_unrestrict.store(true, Ordering::SeqCst);
    }

    fn api_error(message: &str) -> DebridError {
        DebridError::ApiError {
            status: 503,
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl DebridClient for MockDebridClient {
    fn name(&self) -> &str {
        "mock-debrid"
    }

    async fn list_torrents(&self) -> Result<Vec<DebridTorrent>, DebridError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(Self::api_error("list unavailable"));
        }
        Ok(self.torrents.read().await.clone())
    }

    async fn add_magnet(&self, _magnet: &str) -> Result<AddedMagnet, DebridError> {
        self.add_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_add.load(Ordering::SeqCst) {
            return Err(Self::api_error("add rejected"));
        }
        let id = self.next_id.read().await.clone();
        Ok(AddedMagnet {
            id: id.clone(),
            uri: format!("https://mock.example.com/torrents/{}", id),
        })
    }

    async fn select_all_files(&self, _torrent_id: &str) -> Result<(), DebridError> {
        self.select_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_select.load(Ordering::SeqCst) {
            return Err(Self::api_error("select rejected"));
        }
        Ok(())
    }

    async fn torrent_info(&self, torrent_id: &str) -> Result<DebridTorrent, DebridError> {
        self.info_calls.fetch_add(1, Ordering::SeqCst);
        self.infos
            .read()
            .await
            .get(torrent_id)
            .cloned()
            .ok_or_else(|| DebridError::ApiError {
                status: 404,
                message: format!("unknown torrent {}", torrent_id),
            })
    }

    async fn unrestrict_link(&self, link: &str) -> Result<UnrestrictedLink, DebridError> {
        self.unrestrict_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_unrestrict.load(Ordering::SeqCst) {
            return Err(Self::api_error("unrestrict rejected"));
        }
        self.unrestricted
            .read()
            .await
            .get(link)
            .cloned()
            .ok_or_else(|| DebridError::ApiError {
                status: 404,
                message: format!("unknown link {}", link),
            })
    }
}
