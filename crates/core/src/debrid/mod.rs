//! Debrid provider integration.
//!
//! The provider caches torrent content and hands out direct HTTP
//! download links. Provider state is authoritative: we never cache a
//! torrent's status locally, only the final resolved URL (with a TTL).

mod realdebrid;
mod resolver;
mod types;

pub use realdebrid::RealDebridClient;
pub use resolver::{extract_info_hash, MagnetResolver, Resolution, ResolveFailure};
pub use types::*;
