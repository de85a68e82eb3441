mod api;
mod metrics;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use debridify_core::debrid::{DebridClient, MagnetResolver, RealDebridClient};
use debridify_core::metadata::{AnilistClient, AnimeCatalog, MetadataProvider, OmdbClient};
use debridify_core::pipeline::StreamSearch;
use debridify_core::searcher::{JackettSearcher, TorrentSearcher};
use debridify_core::{load_config, validate_config};

use api::create_router;
use state::AppState;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("DEBRIDIFY_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;
    info!("Configuration loaded successfully");

    // Metadata provider (OMDb, memoized)
    let metadata: Arc<dyn MetadataProvider> = Arc::new(
        OmdbClient::new(config.omdb.clone(), config.cache.metadata_max_entries)
            .context("Failed to create OMDb client")?,
    );
    info!("OMDb metadata provider initialized");

    // Anime catalog (AniList)
    let anime: Arc<dyn AnimeCatalog> = Arc::new(
        AnilistClient::new(config.anilist.clone()).context("Failed to create AniList client")?,
    );
    info!("AniList catalog initialized at {}", config.anilist.url);

    // Torrent searcher (Jackett/Torznab)
    info!("Initializing Jackett searcher at {}", config.jackett.url);
    let searcher: Arc<dyn TorrentSearcher> =
        Arc::new(JackettSearcher::new(config.jackett.clone()));

    // Debrid client and resolver
    let debrid: Arc<dyn DebridClient> = Arc::new(
        RealDebridClient::new(config.realdebrid.clone())
            .context("Failed to create Real-Debrid client")?,
    );
    info!("Debrid provider initialized: {}", debrid.name());

    let search = StreamSearch::new(searcher, anime, config.search.clone());
    let resolver = MagnetResolver::new(
        debrid,
        chrono::Duration::seconds(config.cache.resolved_ttl_secs as i64),
        config.cache.resolved_max_entries,
    );

    // Create app state and router
    let state = Arc::new(AppState::new(config.clone(), metadata, search, resolver));
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
