//! Stream search orchestration.
//!
//! Builds the right indexer queries for a piece of content, fans them
//! out through the searcher, and ranks the results. The contract with
//! the server layer is deliberately lossy: any upstream error or an
//! empty result set comes back as `None`, never as an error the caller
//! has to branch on.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::SearchTuning;
use crate::metadata::{AnimeCatalog, MovieMetadata, SeriesMetadata};
use crate::metrics::{CANDIDATES_FOUND, SEARCHES_TOTAL};
use crate::ranking::{rank_candidates, RankedCandidate};
use crate::searcher::{
    filter_by_season_episode, season_episode_token, QueryKind, TorrentSearcher, TorznabQuery,
};

/// Orchestrates metadata-aware torrent searches.
pub struct StreamSearch {
    searcher: Arc<dyn TorrentSearcher>,
    anime: Arc<dyn AnimeCatalog>,
    tuning: SearchTuning,
}

impl StreamSearch {
    pub fn new(
        searcher: Arc<dyn TorrentSearcher>,
        anime: Arc<dyn AnimeCatalog>,
        tuning: SearchTuning,
    ) -> Self {
        Self {
            searcher,
            anime,
            tuning,
        }
    }

    /// Search for a movie across all indexers. `None` on any failure or
    /// when nothing was found.
    pub async fn search_movie(&self, movie: &MovieMetadata) -> Option<Vec<RankedCandidate>> {
        let query = TorznabQuery {
            text: movie.title.clone(),
            kind: QueryKind::Movie,
            imdb_id: Some(movie.imdb_id.clone()),
            year: movie.year,
            category: None,
            limit: self.tuning.movie_limit,
        };

        let candidates = match self.searcher.query(&all_indexers(), &query).await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(imdb_id = %movie.imdb_id, error = %e, "Movie search failed");
                SEARCHES_TOTAL.with_label_values(&["movie", "error"]).inc();
                return None;
            }
        };

        finish("movie", rank_candidates(candidates))
    }

    /// Search for a series episode. Anime series go through the anime
    /// catalog and dedicated indexers; everything else gets a free-text
    /// search filtered down to the requested episode.
    pub async fn search_series(
        &self,
        series: &SeriesMetadata,
        season: u32,
        episode: u32,
    ) -> Option<Vec<RankedCandidate>> {
        if series.is_anime() {
            self.search_anime(series, season, episode).await
        } else {
            self.search_general_series(series, season, episode).await
        }
    }

    async fn search_general_series(
        &self,
        series: &SeriesMetadata,
        season: u32,
        episode: u32,
    ) -> Option<Vec<RankedCandidate>> {
        let token = season_episode_token(season, episode);
        let query = TorznabQuery::free_text(
            format!("{} {}", series.title, token),
            self.tuning.series_limit,
        );

        let candidates = match self.searcher.query(&all_indexers(), &query).await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(imdb_id = %series.imdb_id, error = %e, "Series search failed");
                SEARCHES_TOTAL.with_label_values(&["series", "error"]).inc();
                return None;
            }
        };

        // Free-text matching is loose; keep only titles that actually
        // name the requested episode.
        let filtered = filter_by_season_episode(candidates, season, episode);

        finish("series", rank_candidates(filtered))
    }

    async fn search_anime(
        &self,
        series: &SeriesMetadata,
        season: u32,
        episode: u32,
    ) -> Option<Vec<RankedCandidate>> {
        let canonical = match self.anime.resolve_title(&series.title, season).await {
            Ok(Some(title)) => title,
            // No catalog entry means no canonical title to query with;
            // the search ends here with no results.
            Ok(None) => {
                debug!(title = %series.title, "Anime catalog has no entry, skipping search");
                SEARCHES_TOTAL.with_label_values(&["anime", "empty"]).inc();
                return None;
            }
            Err(e) => {
                warn!(title = %series.title, error = %e, "Anime title resolution failed");
                SEARCHES_TOTAL.with_label_values(&["anime", "error"]).inc();
                return None;
            }
        };

        debug!(title = %series.title, canonical = %canonical, "Searching anime indexers");

        let query = TorznabQuery {
            text: format!("{} {}", canonical, season_episode_token(season, episode)),
            kind: QueryKind::TvSearch,
            imdb_id: None,
            year: None,
            category: Some(self.tuning.anime_category),
            limit: self.tuning.anime_limit,
        };

        let candidates = match self
            .searcher
            .query(&self.tuning.anime_indexers, &query)
            .await
        {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(title = %canonical, error = %e, "Anime search failed");
                SEARCHES_TOTAL.with_label_values(&["anime", "error"]).inc();
                return None;
            }
        };

        finish("anime", rank_candidates(candidates))
    }
}

fn all_indexers() -> Vec<String> {
    vec!["all".to_string()]
}

/// Record metrics and apply the empty-means-None contract.
fn finish(kind: &str, ranked: Vec<RankedCandidate>) -> Option<Vec<RankedCandidate>> {
    CANDIDATES_FOUND
        .with_label_values(&[kind])
        .observe(ranked.len() as f64);

    if ranked.is_empty() {
        SEARCHES_TOTAL.with_label_values(&[kind, "empty"]).inc();
        None
    } else {
        SEARCHES_TOTAL.with_label_values(&[kind, "hit"]).inc();
        Some(ranked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::searcher::SearchError;
    use crate::testing::{fixtures, MockAnimeCatalog, MockSearcher};

    fn movie() -> MovieMetadata {
        match fixtures::movie_metadata("tt0133093", "The Matrix") {
            crate::metadata::MediaMetadata::Movie(m) => m,
            _ => unreachable!(),
        }
    }

    fn series(meta: crate::metadata::MediaMetadata) -> SeriesMetadata {
        match meta {
            crate::metadata::MediaMetadata::Series(s) => s,
            _ => unreachable!(),
        }
    }

    fn pipeline(
        searcher: Arc<MockSearcher>,
        anime: Arc<MockAnimeCatalog>,
    ) -> StreamSearch {
        StreamSearch::new(searcher, anime, SearchTuning::default())
    }

    #[tokio::test]
    async fn test_movie_search_builds_movie_query() {
        let searcher = Arc::new(MockSearcher::new());
        searcher
            .set_results(vec![fixtures::candidate(
                "The Matrix 1999 1080p",
                "yts",
                1_400_000_000,
            )])
            .await;
        let anime = Arc::new(MockAnimeCatalog::new());

        let ranked = pipeline(searcher.clone(), anime)
            .search_movie(&movie())
            .await
            .unwrap();
        assert_eq!(ranked.len(), 1);

        let queries = searcher.recorded_queries().await;
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].indexers, vec!["all"]);
        assert_eq!(queries[0].query.kind, QueryKind::Movie);
        assert_eq!(queries[0].query.imdb_id.as_deref(), Some("tt0133093"));
        assert_eq!(queries[0].query.year, Some(2010));
        assert_eq!(queries[0].query.limit, 50);
    }

    #[tokio::test]
    async fn test_movie_search_error_is_none() {
        let searcher = Arc::new(MockSearcher::new());
        searcher.set_next_error(SearchError::Timeout).await;
        let anime = Arc::new(MockAnimeCatalog::new());

        let result = pipeline(searcher, anime).search_movie(&movie()).await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_movie_search_empty_is_none() {
        let searcher = Arc::new(MockSearcher::new());
        let anime = Arc::new(MockAnimeCatalog::new());

        let result = pipeline(searcher, anime).search_movie(&movie()).await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_general_series_search_filters_episodes() {
        let searcher = Arc::new(MockSearcher::new());
        searcher
            .set_results(vec![
                fixtures::candidate("Show S01E03 1080p", "eztv", 900_000_000),
                fixtures::candidate("Show S01E04 1080p", "eztv", 900_000_000),
            ])
            .await;
        let anime = Arc::new(MockAnimeCatalog::new());

        let show = series(fixtures::series_metadata("tt0903747", "Show"));
        let ranked = pipeline(searcher.clone(), anime.clone())
            .search_series(&show, 1, 3)
            .await
            .unwrap();

        assert_eq!(ranked.len(), 1);
        assert!(ranked[0].candidate.title.contains("S01E03"));

        // Non-anime series never consult the anime catalog.
        assert!(anime.recorded_lookups().await.is_empty());

        let queries = searcher.recorded_queries().await;
        assert_eq!(queries[0].query.text, "Show S01E03");
        assert_eq!(queries[0].query.limit, 100);
    }

    #[tokio::test]
    async fn test_anime_series_uses_catalog_and_anime_indexers() {
        let searcher = Arc::new(MockSearcher::new());
        searcher
            .set_results(vec![fixtures::candidate(
                "Vinland Saga Season 2 S02E05 1080p",
                "nyaasi",
                800_000_000,
            )])
            .await;
        let anime = Arc::new(MockAnimeCatalog::new());
        anime
            .set_title("Vinland Saga", 2, "Vinland Saga Season 2")
            .await;

        let show = series(fixtures::anime_metadata("tt10233448", "Vinland Saga"));
        let ranked = pipeline(searcher.clone(), anime)
            .search_series(&show, 2, 5)
            .await
            .unwrap();
        assert_eq!(ranked.len(), 1);

        let queries = searcher.recorded_queries().await;
        assert_eq!(
            queries[0].indexers,
            vec!["nyaasi", "subsplease", "animetosho"]
        );
        assert_eq!(queries[0].query.kind, QueryKind::TvSearch);
        assert_eq!(queries[0].query.text, "Vinland Saga Season 2 S02E05");
        assert_eq!(queries[0].query.category, Some(5070));
        assert_eq!(queries[0].query.limit, 33);
    }

    #[tokio::test]
    async fn test_anime_catalog_miss_yields_none_without_searching() {
        let searcher = Arc::new(MockSearcher::new());
        searcher
            .set_results(vec![fixtures::candidate(
                "Obscure Show S01E01",
                "nyaasi",
                500_000_000,
            )])
            .await;
        let anime = Arc::new(MockAnimeCatalog::new());

        let show = series(fixtures::anime_metadata("tt9999999", "Obscure Show"));
        let result = pipeline(searcher.clone(), anime)
            .search_series(&show, 1, 1)
            .await;

        assert!(result.is_none());
        // Without a canonical title the indexers are never queried.
        assert_eq!(searcher.query_count().await, 0);
    }

    #[tokio::test]
    async fn test_anime_catalog_error_is_none() {
        let searcher = Arc::new(MockSearcher::new());
        let anime = Arc::new(MockAnimeCatalog::new());
        anime.fail_lookups();

        let show = series(fixtures::anime_metadata("tt10233448", "Vinland Saga"));
        let result = pipeline(searcher.clone(), anime)
            .search_series(&show, 1, 1)
            .await;

        assert!(result.is_none());
        // The search never starts when title resolution errors out.
        assert_eq!(searcher.query_count().await, 0);
    }
}
