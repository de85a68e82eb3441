//! Quality extraction and candidate ordering.
//!
//! Titles are free text; the only quality signal we trust is a literal
//! resolution token. Ranking is a strict total order over (quality,
//! indexer priority, size) with input order as the final tie-break, so
//! the sort must be stable.

use serde::{Deserialize, Serialize};

use crate::searcher::Candidate;

/// Coarse resolution class derived from a release title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QualityTier {
    #[serde(rename = "2160p")]
    Uhd2160,
    #[serde(rename = "1440p")]
    Uhd1440,
    #[serde(rename = "1080p")]
    Fhd1080,
    #[serde(rename = "720p")]
    Hd720,
    #[serde(rename = "480p")]
    Sd480,
    #[serde(rename = "360p")]
    Sd360,
    #[serde(rename = "unknown")]
    Unknown,
}

/// Token scan order doubles as the ranking order. A title carrying
/// several tokens resolves to the earliest one here, not necessarily
/// the true highest resolution.
const QUALITY_TOKENS: [(&str, QualityTier); 6] = [
    ("2160p", QualityTier::Uhd2160),
    ("1440p", QualityTier::Uhd1440),
    ("1080p", QualityTier::Fhd1080),
    ("720p", QualityTier::Hd720),
    ("480p", QualityTier::Sd480),
    ("360p", QualityTier::Sd360),
];

/// Known indexers in priority order. Names are compared after
/// lowercasing and stripping spaces/hyphens; anything not listed sorts
/// after every known name.
const INDEXER_PRIORITY: [&str; 13] = [
    "therarbg",
    "1337x",
    "thepiratebay",
    "yts",
    "rutor",
    "uindex",
    "eztv",
    "ilcorsaronero",
    "kickasstorrentsws",
    "nyaasi",
    "subsplease",
    "animetosho",
    "extratorrentst",
];

impl QualityTier {
    /// Scan a title for the first matching resolution token.
    pub fn from_title(title: &str) -> Self {
        let lower = title.to_lowercase();
        QUALITY_TOKENS
            .iter()
            .find(|(token, _)| lower.contains(token))
            .map(|(_, tier)| *tier)
            .unwrap_or(QualityTier::Unknown)
    }

    /// Position in the ranking order; `Unknown` sorts last.
    pub fn rank(&self) -> usize {
        QUALITY_TOKENS
            .iter()
            .position(|(_, tier)| tier == self)
            .unwrap_or(QUALITY_TOKENS.len())
    }

    /// Display label shown to the player UI.
    pub fn label(&self) -> &'static str {
        match self {
            QualityTier::Uhd2160 => "4K",
            QualityTier::Uhd1440 => "UHD",
            QualityTier::Fhd1080 => "1080p",
            QualityTier::Hd720 => "720p",
            QualityTier::Sd480 => "480p",
            QualityTier::Sd360 => "360p",
            QualityTier::Unknown => "Unknown",
        }
    }
}

/// A candidate annotated with its derived quality tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub quality: QualityTier,
    #[serde(flatten)]
    pub candidate: Candidate,
}

fn indexer_rank(indexer: &str) -> usize {
    let normalized: String = indexer
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();
    INDEXER_PRIORITY
        .iter()
        .position(|known| *known == normalized)
        .unwrap_or(INDEXER_PRIORITY.len())
}

/// Order candidates best-first: quality tier, then indexer priority,
/// then size descending. Stable, so equal-rank items keep their
/// arrival order.
pub fn rank_candidates(candidates: Vec<Candidate>) -> Vec<RankedCandidate> {
    let mut ranked: Vec<RankedCandidate> = candidates
        .into_iter()
        .map(|candidate| RankedCandidate {
            quality: QualityTier::from_title(&candidate.title),
            candidate,
        })
        .collect();

    ranked.sort_by(|a, b| {
        a.quality
            .rank()
            .cmp(&b.quality.rank())
            .then_with(|| {
                indexer_rank(&a.candidate.indexer).cmp(&indexer_rank(&b.candidate.indexer))
            })
            .then_with(|| b.candidate.size_bytes.cmp(&a.candidate.size_bytes))
    });

    ranked
}

/// Human-readable size, one decimal place.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;
    const GB: u64 = 1024 * 1024 * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
