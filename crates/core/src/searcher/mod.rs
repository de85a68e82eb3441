//! Torrent search abstraction.
//!
//! This module provides a `TorrentSearcher` trait for querying torrent
//! indexers through an aggregator (Jackett's Torznab endpoints), plus
//! the feed parsing and season/episode filtering that sit on top of the
//! raw results.

mod feed;
mod filter;
mod jackett;
mod types;

pub use feed::parse_torznab_feed;
pub use filter::{filter_by_season_episode, season_episode_token};
pub use jackett::JackettSearcher;
pub use types::*;
