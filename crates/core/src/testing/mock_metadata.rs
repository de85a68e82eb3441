//! Mock metadata provider for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use crate::metadata::{MediaMetadata, MetadataError, MetadataProvider};

/// Mock implementation of the MetadataProvider trait. Serves metadata
/// from a preloaded map; unknown ids yield `Ok(None)`.
pub struct MockMetadataProvider {
    entries: RwLock<HashMap<String, MediaMetadata>>,
    fail: AtomicBool,
}

impl Default for MockMetadataProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMetadataProvider {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            fail: AtomicBool::new(false),
        }
    }

    pub async fn set(&self, metadata: MediaMetadata) {
        self.entries
            .write()
            .await
            .insert(metadata.imdb_id().to_string(), metadata);
    }

    /// Make every lookup fail from now on.
    pub fn fail_lookups(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl MetadataProvider for MockMetadataProvider {
    async fn get(&self, imdb_id: &str) -> Result<Option<MediaMetadata>, MetadataError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(MetadataError::ApiError {
                status: 503,
                message: "metadata unavailable".to_string(),
            });
        }
        Ok(self.entries.read().await.get(imdb_id).cloned())
    }
}
