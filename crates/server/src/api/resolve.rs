//! Magnet resolution endpoint.
//!
//! Always answers with a redirect: to the resolved video URL on
//! success, or to one of the bundled placeholder videos otherwise.
//! Players treat a 5xx here as a broken addon, so errors are expressed
//! as watchable content instead.

use axum::extract::{Query, State};
use axum::response::Redirect;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

use debridify_core::debrid::Resolution;

use crate::state::AppState;

const CACHING_VIDEO: &str = "/public/being_cached_message.mp4";
const ERROR_VIDEO: &str = "/public/something_went_wrong.mp4";

#[derive(Deserialize)]
pub struct ResolveParams {
    pub magnet: Option<String>,
}

pub async fn resolve(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ResolveParams>,
) -> Redirect {
    let magnet = match params.magnet {
        Some(ref magnet) if !magnet.is_empty() => magnet,
        _ => {
            warn!("Resolve called without a magnet parameter");
            return Redirect::temporary(ERROR_VIDEO);
        }
    };

    match state.resolver().resolve(magnet).await {
        Resolution::Resolved(url) => {
            info!("Redirecting to resolved stream");
            Redirect::temporary(&url)
        }
        Resolution::StillCaching => {
            info!("Torrent still caching, serving placeholder");
            Redirect::temporary(CACHING_VIDEO)
        }
        Resolution::Failed(failure) => {
            warn!(failure = ?failure, "Resolution failed, serving placeholder");
            Redirect::temporary(ERROR_VIDEO)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::LOCATION;
    use axum::response::IntoResponse;
    use debridify_core::debrid::MagnetResolver;
    use debridify_core::load_config_from_str;
    use debridify_core::pipeline::StreamSearch;
    use debridify_core::testing::{
        fixtures, MockAnimeCatalog, MockDebridClient, MockMetadataProvider, MockSearcher,
    };

    const MAGNET: &str = "magnet:?xt=urn:btih:AABBCC001122&dn=Movie";
    const HASH: &str = "aabbcc001122";

    fn test_state(debrid: Arc<MockDebridClient>) -> Arc<AppState> {
        let config = load_config_from_str(
            r#"
[jackett]
url = "http://localhost:9117/api/v2.0"
api_key = "key"

[omdb]
api_key = "key"

[realdebrid]
api_key = "key"
"#,
        )
        .unwrap();

        let search = StreamSearch::new(
            Arc::new(MockSearcher::new()),
            Arc::new(MockAnimeCatalog::new()),
            config.search.clone(),
        );
        let resolver = MagnetResolver::new(debrid, chrono::Duration::hours(1), 16);

        Arc::new(AppState::new(
            config,
            Arc::new(MockMetadataProvider::new()),
            search,
            resolver,
        ))
    }

    async fn location_of(state: Arc<AppState>, magnet: Option<&str>) -> String {
        let params = ResolveParams {
            magnet: magnet.map(str::to_string),
        };
        let response = resolve(State(state), Query(params)).await.into_response();
        response
            .headers()
            .get(LOCATION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_missing_magnet_redirects_to_error_video() {
        let state = test_state(Arc::new(MockDebridClient::new()));
        assert_eq!(location_of(state, None).await, ERROR_VIDEO);
    }

    #[tokio::test]
    async fn test_resolved_magnet_redirects_to_stream() {
        let debrid = Arc::new(MockDebridClient::new());
        debrid.set_next_id("RD1").await;
        debrid
            .set_info(fixtures::downloaded_torrent("RD1", HASH, &["link-1"]))
            .await;
        debrid
            .set_unrestricted("link-1", fixtures::video_link("movie.mkv", 1_400_000_000))
            .await;

        let state = test_state(debrid);
        assert_eq!(
            location_of(state, Some(MAGNET)).await,
            "https://cdn.example.com/dl/movie.mkv"
        );
    }

    #[tokio::test]
    async fn test_still_caching_redirects_to_placeholder() {
        let debrid = Arc::new(MockDebridClient::new());
        debrid.set_next_id("RD2").await;
        debrid
            .set_info(fixtures::downloading_torrent("RD2", HASH))
            .await;

        let state = test_state(debrid);
        assert_eq!(location_of(state, Some(MAGNET)).await, CACHING_VIDEO);
    }

    #[tokio::test]
    async fn test_failure_redirects_to_error_video_not_5xx() {
        let debrid = Arc::new(MockDebridClient::new());
        debrid.fail_add();

        let params = ResolveParams {
            magnet: Some(MAGNET.to_string()),
        };
        let response = resolve(State(test_state(debrid)), Query(params))
            .await
            .into_response();

        assert!(response.status().is_redirection());
        assert_eq!(
            response.headers().get(LOCATION).unwrap().to_str().unwrap(),
            ERROR_VIDEO
        );
    }
}
