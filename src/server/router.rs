use std::sync::Arc;
use std::time::Instant;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Request},
    middleware::{self, Next},
    response::Response,
    routing::get,
};
use serde_json::json;
use tower_http::services::ServeDir;

use super::routes;
use crate::config::ServerConfig;
use crate::media::{MAX_FILE_SIZE, MAX_FILES_PER_UPLOAD, MediaStorage};
use crate::store::Store;

/// Shared state for all request handlers.
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub media: MediaStorage,
    pub config: ServerConfig,
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "OK",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn api_index() -> Json<serde_json::Value> {
    Json(json!({
        "name": "touchline",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/api/health",
            "age_groups": "/api/age-groups",
            "teams": "/api/teams",
            "players": "/api/players",
            "coaches": "/api/coaches",
            "matches": "/api/matches",
            "tournaments": "/api/tournaments",
            "trainings": "/api/trainings",
            "news": "/api/news",
            "photos": "/api/photos",
            "videos": "/api/videos",
            "upload": "/api/upload/single",
            "uploads": "/uploads",
        },
    }))
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status();

    tracing::info!(
        method = %method,
        path = %path,
        status = %status.as_u16(),
        latency_ms = %latency.as_millis(),
        "request"
    );

    response
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let uploads_dir = state.media.uploads_dir().to_path_buf();

    Router::new()
        .route("/api", get(api_index))
        .route("/api/health", get(health))
        .nest("/api", routes::api_router())
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .layer(middleware::from_fn(log_request))
        .layer(DefaultBodyLimit::max(
            MAX_FILE_SIZE * MAX_FILES_PER_UPLOAD + 1024 * 1024,
        ))
        .with_state(state)
}
