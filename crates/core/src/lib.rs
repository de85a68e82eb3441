pub mod cache;
pub mod config;
pub mod debrid;
pub mod fanout;
pub mod metadata;
pub mod metrics;
pub mod pipeline;
pub mod ranking;
pub mod searcher;
pub mod testing;

pub use cache::TtlCache;
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
};
pub use debrid::{
    extract_info_hash, DebridClient, MagnetResolver, RealDebridClient, Resolution, ResolveFailure,
};
pub use metadata::{
    AnilistClient, AnimeCatalog, MediaMetadata, MetadataError, MetadataProvider, OmdbClient,
};
pub use pipeline::StreamSearch;
pub use ranking::{format_size, rank_candidates, QualityTier, RankedCandidate};
pub use searcher::{Candidate, JackettSearcher, SearchError, TorrentSearcher, TorznabQuery};
