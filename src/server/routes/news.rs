use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::auth::RequireAdmin;
use crate::server::AppState;
use crate::server::dto::NewsPayload;
use crate::server::response::{ApiError, StoreOptionExt, StoreResultExt};
use crate::server::validation::require_non_empty;
use crate::types::News;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/news", get(list_news).post(create_news))
        .route("/news/admin", get(list_all_news))
        .route(
            "/news/{id}",
            get(get_news).put(update_news).delete(delete_news),
        )
}

/// Public listing. Only published items, newest first.
async fn list_news(State(state): State<Arc<AppState>>) -> Result<Json<Vec<News>>, ApiError> {
    Ok(Json(state.store.list_published_news().api_err()?))
}

/// Admin listing. Includes drafts, ordered by creation.
async fn list_all_news(
    _auth: RequireAdmin,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<News>>, ApiError> {
    Ok(Json(state.store.list_all_news().api_err()?))
}

async fn get_news(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<News>, ApiError> {
    let news = state.store.get_news(&id).api_err()?.or_not_found("News")?;
    Ok(Json(news))
}

async fn create_news(
    _auth: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewsPayload>,
) -> Result<(StatusCode, Json<News>), ApiError> {
    require_non_empty(&payload.title, "title")?;
    require_non_empty(&payload.content, "content")?;

    let now = Utc::now();
    let news = News {
        id: Uuid::new_v4().to_string(),
        title: payload.title,
        content: payload.content,
        excerpt: payload.excerpt,
        image_url: payload.image_url,
        published: payload.published,
        published_at: payload.published.then_some(now),
        created_at: now,
        updated_at: now,
    };

    state.store.create_news(&news).api_err()?;
    Ok((StatusCode::CREATED, Json(news)))
}

async fn update_news(
    _auth: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<NewsPayload>,
) -> Result<Json<News>, ApiError> {
    require_non_empty(&payload.title, "title")?;
    require_non_empty(&payload.content, "content")?;

    let mut news = state.store.get_news(&id).api_err()?.or_not_found("News")?;

    news.title = payload.title;
    news.content = payload.content;
    news.excerpt = payload.excerpt;
    news.image_url = payload.image_url;
    // published_at records the first publication and survives later
    // unpublish/republish cycles.
    if payload.published && news.published_at.is_none() {
        news.published_at = Some(Utc::now());
    }
    news.published = payload.published;
    news.updated_at = Utc::now();

    state.store.update_news(&news).api_err()?;
    Ok(Json(news))
}

async fn delete_news(
    _auth: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !state.store.delete_news(&id).api_err()? {
        return Err(ApiError::not_found("News not found"));
    }
    Ok(Json(json!({ "message": "News deleted successfully" })))
}
