//! Mock anime catalog for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use crate::metadata::{AnimeCatalog, MetadataError};

/// Mock implementation of the AnimeCatalog trait.
///
/// Maps `(series title, season)` to a canonical title; unmapped
/// lookups yield `Ok(None)`.
pub struct MockAnimeCatalog {
    titles: RwLock<HashMap<(String, u32), String>>,
    lookups: RwLock<Vec<(String, u32)>>,
    fail: AtomicBool,
}

impl Default for MockAnimeCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAnimeCatalog {
    pub fn new() -> Self {
        Self {
            titles: RwLock::new(HashMap::new()),
            lookups: RwLock::new(Vec::new()),
            fail: AtomicBool::new(false),
        }
    }

    pub async fn set_title(&self, series_title: &str, season: u32, canonical: &str) {
        self.titles
            .write()
            .await
            .insert((series_title.to_string(), season), canonical.to_string());
    }

    /// Lookups seen so far, in call order.
    pub async fn recorded_lookups(&self) -> Vec<(String, u32)> {
        self.lookups.read().await.clone()
    }

    /// Make every lookup fail from now on.
    pub fn fail_lookups(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl AnimeCatalog for MockAnimeCatalog {
    async fn resolve_title(
        &self,
        series_title: &str,
        season: u32,
    ) -> Result<Option<String>, MetadataError> {
        self.lookups
            .write()
            .await
            .push((series_title.to_string(), season));

        if self.fail.load(Ordering::SeqCst) {
            return Err(MetadataError::ApiError {
                status: 503,
                message: "catalog unavailable".to_string(),
            });
        }

        Ok(self
            .titles
            .read()
            .await
            .get(&(series_title.to_string(), season))
            .cloned())
    }
}
