use axum::{
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Instant;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use super::{handlers, resolve, streams};
use crate::metrics::{normalize_path, HTTP_REQUESTS_TOTAL, HTTP_REQUEST_DURATION};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Placeholder videos path (configurable via env)
    let public_dir = std::env::var("PUBLIC_DIR").unwrap_or_else(|_| "public".to_string());

    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config));

    Router::new()
        // Stremio addon surface
        .route("/manifest.json", get(streams::manifest))
        .route("/stream/movie/{id}", get(streams::movie_streams))
        .route("/stream/series/{id}", get(streams::series_streams))
        .route("/resolve", get(resolve::resolve))
        // Operational endpoints
        .nest("/api/v1", api_routes)
        .route("/metrics", get(handlers::metrics))
        .nest_service("/public", ServeDir::new(&public_dir))
        .with_state(state)
        .layer(middleware::from_fn(track_metrics))
        // Stremio clients are web apps on other origins.
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn track_metrics(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = normalize_path(request.uri().path());
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16().to_string();
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[&method, &path, &status])
        .inc();
    HTTP_REQUEST_DURATION
        .with_label_values(&[&method, &path, &status])
        .observe(started.elapsed().as_secs_f64());

    response
}
