//! Magnet resolution state machine.
//!
//! Drives a magnet identifier through the debrid provider until it
//! becomes a direct video URL: probe the account for an existing
//! torrent, add the magnet if needed, fetch info, and unrestrict the
//! file links. No polling happens inside a single resolution; a torrent
//! that is still downloading yields `StillCaching` and the caller
//! retries with the same identifier later.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::cache::TtlCache;
use crate::fanout::all_or_first_error;
use crate::metrics::{RESOLUTIONS_TOTAL, RESOLUTION_DURATION};

use super::{DebridClient, DebridTorrent, TorrentStatus, UnrestrictedLink};

static INFO_HASH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"urn:btih:([0-9a-fA-F]+)").expect("valid regex"));

/// Extract the content hash from a magnet-style identifier, canonical
/// lowercase. `None` is not fatal; resolution proceeds by adding the
/// magnet as new.
pub fn extract_info_hash(magnet: &str) -> Option<String> {
    INFO_HASH_RE
        .captures(magnet)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_lowercase())
}

/// Terminal outcome of a resolution attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A direct video URL, ready to redirect to.
    Resolved(String),
    /// The provider has not finished caching the torrent yet.
    StillCaching,
    /// Resolution failed; the caller shows a generic failure.
    Failed(ResolveFailure),
}

/// Why a resolution failed. All variants surface identically to end
/// users; the distinction exists for logs and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveFailure {
    AddFailed,
    InfoFailed,
    NoPlayableFile,
    UnrestrictFailed,
}

/// One transition of the state machine.
enum Step {
    /// Look for an existing torrent with this hash.
    Probe { hash: String },
    /// Submit the magnet and select all files.
    Add,
    /// Fetch full torrent info.
    Fetch { torrent_id: String },
    /// Branch on provider-reported status.
    Inspect { info: DebridTorrent },
    /// Unrestrict every link and pick the largest video.
    Unrestrict { links: Vec<String> },
}

/// Resolves magnet identifiers through a debrid provider, memoizing
/// successful resolutions for a bounded time.
pub struct MagnetResolver {
    client: Arc<dyn DebridClient>,
    cache: TtlCache<String, String>,
}

impl MagnetResolver {
    pub fn new(client: Arc<dyn DebridClient>, ttl: chrono::Duration, cache_capacity: usize) -> Self {
        Self {
            client,
            cache: TtlCache::new(Some(ttl), cache_capacity),
        }
    }

    /// Resolve a magnet identifier to a direct video URL.
    pub async fn resolve(&self, magnet: &str) -> Resolution {
        if let Some(url) = self.cache.get(&magnet.to_string()).await {
            debug!("Serving resolution from cache");
            RESOLUTIONS_TOTAL.with_label_values(&["cache_hit"]).inc();
            return Resolution::Resolved(url);
        }

        let started = Instant::now();
        let outcome = self.run(magnet).await;

        if let Resolution::Resolved(ref url) = outcome {
            self.cache.insert(magnet.to_string(), url.clone()).await;
        }

        let label = outcome_label(&outcome);
        RESOLUTIONS_TOTAL.with_label_values(&[label]).inc();
        RESOLUTION_DURATION
            .with_label_values(&[label])
            .observe(started.elapsed().as_secs_f64());

        outcome
    }

    async fn run(&self, magnet: &str) -> Resolution {
        let mut step = match extract_info_hash(magnet) {
            Some(hash) => Step::Probe { hash },
            None => {
                debug!("No info hash in identifier, adding as new");
                Step::Add
            }
        };

        loop {
            step = match step {
                Step::Probe { hash } => self.probe(&hash).await,
                Step::Add => match self.add(magnet).await {
                    Ok(torrent_id) => Step::Fetch { torrent_id },
                    Err(failure) => return Resolution::Failed(failure),
                },
                Step::Fetch { torrent_id } => match self.client.torrent_info(&torrent_id).await {
                    Ok(info) => Step::Inspect { info },
                    Err(e) => {
                        warn!(error = %e, "Failed to fetch torrent info");
                        return Resolution::Failed(ResolveFailure::InfoFailed);
                    }
                },
                Step::Inspect { info } => match inspect(info) {
                    Ok(next) => next,
                    Err(outcome) => return outcome,
                },
                Step::Unrestrict { links } => return self.unrestrict(links).await,
            };
        }
    }

    /// Probe the account for a torrent with a matching hash. A lookup
    /// failure behaves as a miss; the magnet is added as new.
    async fn probe(&self, hash: &str) -> Step {
        let torrents = match self.client.list_torrents().await {
            Ok(torrents) => torrents,
            Err(e) => {
                warn!(error = %e, "Failed to list torrents, adding magnet as new");
                return Step::Add;
            }
        };

        match torrents
            .into_iter()
            .find(|t| t.hash.eq_ignore_ascii_case(hash))
        {
            Some(existing) => {
                debug!(torrent_id = %existing.id, "Reusing existing torrent");
                Step::Fetch {
                    torrent_id: existing.id,
                }
            }
            None => Step::Add,
        }
    }

    /// Submit the magnet and immediately select all files. Failure at
    /// either step is terminal.
    async fn add(&self, magnet: &str) -> Result<String, ResolveFailure> {
        let added = match self.client.add_magnet(magnet).await {
            Ok(added) => added,
            Err(e) => {
                warn!(error = %e, "Failed to add magnet");
                return Err(ResolveFailure::AddFailed);
            }
        };

        info!(torrent_id = %added.id, "Added magnet to debrid account");

        if let Err(e) = self.client.select_all_files(&added.id).await {
            warn!(error = %e, torrent_id = %added.id, "Failed to select files");
            return Err(ResolveFailure::AddFailed);
        }

        Ok(added.id)
    }

    /// Unrestrict all links in parallel (fail-fast), keep videos, pick
    /// the largest.
    async fn unrestrict(&self, links: Vec<String>) -> Resolution {
        let futures: Vec<_> = links
            .iter()
            .map(|link| self.client.unrestrict_link(link))
            .collect();

        let unrestricted = match all_or_first_error(futures).await {
            Ok(files) => files,
            Err(e) => {
                warn!(error = %e, "Unrestrict failed");
                return Resolution::Failed(ResolveFailure::UnrestrictFailed);
            }
        };

        match select_largest_video(unrestricted) {
            Some(file) => {
                info!(filename = %file.filename, size = file.filesize, "Selected video file");
                Resolution::Resolved(file.download)
            }
            None => {
                warn!("No playable video files in torrent");
                Resolution::Failed(ResolveFailure::NoPlayableFile)
            }
        }
    }
}

/// Pure transition out of the Inspect state.
fn inspect(info: DebridTorrent) -> Result<Step, Resolution> {
    if info.status != TorrentStatus::Downloaded {
        info!(torrent_id = %info.id, status = ?info.status, "Torrent not cached yet");
        return Err(Resolution::StillCaching);
    }

    if info.links.is_empty() {
        warn!(torrent_id = %info.id, "Downloaded torrent has no file links");
        return Err(Resolution::Failed(ResolveFailure::NoPlayableFile));
    }

    Ok(Step::Unrestrict { links: info.links })
}

/// Largest video by filesize; the first encountered wins ties.
fn select_largest_video(files: Vec<UnrestrictedLink>) -> Option<UnrestrictedLink> {
    files
        .into_iter()
        .filter(UnrestrictedLink::is_video)
        .fold(None, |best: Option<UnrestrictedLink>, file| match best {
            Some(b) if b.filesize >= file.filesize => Some(b),
            _ => Some(file),
        })
}

fn outcome_label(outcome: &Resolution) -> &'static str {
    match outcome {
        Resolution::Resolved(_) => "resolved",
        Resolution::StillCaching => "still_caching",
        Resolution::Failed(_) => "failed",
    }
}
