//! Ready-made values for tests.

use crate::debrid::{DebridTorrent, TorrentStatus, UnrestrictedLink};
use crate::metadata::{MediaMetadata, MovieMetadata, SeriesMetadata};
use crate::searcher::Candidate;

/// A search candidate with the fields that matter for ranking.
pub fn candidate(title: &str, indexer: &str, size_bytes: u64) -> Candidate {
    Candidate {
        title: title.to_string(),
        guid: format!("magnet:?xt=urn:btih:{:040x}&dn={}", size_bytes, title),
        indexer: indexer.to_string(),
        size_bytes,
        published_at: None,
        categories: Vec::new(),
    }
}

/// A torrent the debrid provider has finished caching.
pub fn downloaded_torrent(id: &str, hash: &str, links: &[&str]) -> DebridTorrent {
    DebridTorrent {
        id: id.to_string(),
        hash: hash.to_string(),
        status: TorrentStatus::Downloaded,
        links: links.iter().map(|l| l.to_string()).collect(),
        filename: format!("{}.mkv", id),
        bytes: 1_400_000_000,
        progress: 100.0,
    }
}

/// A torrent the provider is still fetching.
pub fn downloading_torrent(id: &str, hash: &str) -> DebridTorrent {
    DebridTorrent {
        id: id.to_string(),
        hash: hash.to_string(),
        status: TorrentStatus::Downloading,
        links: Vec::new(),
        filename: format!("{}.mkv", id),
        bytes: 1_400_000_000,
        progress: 42.0,
    }
}

/// An unrestricted video file.
pub fn video_link(filename: &str, filesize: u64) -> UnrestrictedLink {
    UnrestrictedLink {
        filename: filename.to_string(),
        mime_type: "video/x-matroska".to_string(),
        filesize,
        download: format!("https://cdn.example.com/dl/{}", filename),
        streamable: 1,
    }
}

/// An unrestricted non-video file (subtitles, nfo, ...).
pub fn extra_link(filename: &str) -> UnrestrictedLink {
    UnrestrictedLink {
        filename: filename.to_string(),
        mime_type: "text/plain".to_string(),
        filesize: 50_000,
        download: format!("https://cdn.example.com/dl/{}", filename),
        streamable: 0,
    }
}

/// Movie metadata for a non-anime western title.
pub fn movie_metadata(imdb_id: &str, title: &str) -> MediaMetadata {
    MediaMetadata::Movie(MovieMetadata {
        imdb_id: imdb_id.to_string(),
        title: title.to_string(),
        year: Some(2010),
        countries: vec!["United States".to_string()],
        genres: vec!["Drama".to_string()],
    })
}

/// Series metadata for a non-anime show.
pub fn series_metadata(imdb_id: &str, title: &str) -> MediaMetadata {
    MediaMetadata::Series(SeriesMetadata {
        imdb_id: imdb_id.to_string(),
        title: title.to_string(),
        year: Some(2015),
        countries: vec!["United States".to_string()],
        genres: vec!["Drama".to_string()],
        total_seasons: Some(5),
    })
}

/// Series metadata that classifies as anime.
pub fn anime_metadata(imdb_id: &str, title: &str) -> MediaMetadata {
    MediaMetadata::Series(SeriesMetadata {
        imdb_id: imdb_id.to_string(),
        title: title.to_string(),
        year: Some(2019),
        countries: vec!["Japan".to_string()],
        genres: vec!["Animation".to_string(), "Action".to_string()],
        total_seasons: Some(2),
    })
}
