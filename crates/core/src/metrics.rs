//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Search pipeline (searches by kind and result, candidates found)
//! - Indexer fan-out (per-indexer query failures)
//! - Debrid resolution (outcomes, duration)

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts};

// =============================================================================
// Search pipeline
// =============================================================================

/// Searches executed, by kind and result.
pub static SEARCHES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("debridify_searches_total", "Total stream searches"),
        &["kind", "result"], // kind: "movie", "series", "anime"; result: "hit", "empty", "error"
    )
    .unwrap()
});

/// Candidates returned per search.
pub static CANDIDATES_FOUND: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "debridify_candidates_found",
            "Number of ranked candidates per search",
        )
        .buckets(vec![0.0, 1.0, 5.0, 10.0, 25.0, 50.0, 100.0]),
        &["kind"],
    )
    .unwrap()
});

// =============================================================================
// Indexer fan-out
// =============================================================================

/// Individual indexer query failures (absorbed by the fan-out).
pub static INDEXER_QUERY_FAILURES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "debridify_indexer_query_failures_total",
            "Indexer queries that failed and were dropped from the fan-out",
        ),
        &["indexer"],
    )
    .unwrap()
});

// =============================================================================
// Debrid resolution
// =============================================================================

/// Resolution outcomes.
pub static RESOLUTIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("debridify_resolutions_total", "Total magnet resolutions"),
        &["outcome"], // "resolved", "cache_hit", "still_caching", "failed"
    )
    .unwrap()
});

/// End-to-end resolution duration.
pub static RESOLUTION_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "debridify_resolution_duration_seconds",
            "Duration of the debrid resolution flow",
        )
        .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["outcome"],
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(SEARCHES_TOTAL.clone()),
        Box::new(CANDIDATES_FOUND.clone()),
        Box::new(INDEXER_QUERY_FAILURES.clone()),
        Box::new(RESOLUTIONS_TOTAL.clone()),
        Box::new(RESOLUTION_DURATION.clone()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_metrics_register_cleanly() {
        let registry = prometheus::Registry::new();
        for metric in all_metrics() {
            registry.register(metric).unwrap();
        }
    }
}
