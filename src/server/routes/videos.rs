use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::auth::RequireAdmin;
use crate::media::filename_from_url;
use crate::server::AppState;
use crate::server::dto::{ListVideosParams, VideoPayload};
use crate::server::response::{ApiError, StoreOptionExt, StoreResultExt};
use crate::server::validation::require_non_empty;
use crate::store::VideoFilter;
use crate::types::{Video, VideoType, VideoWithRelations};

use super::photos::DEFAULT_CATEGORY;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/videos", get(list_videos).post(create_video))
        .route(
            "/videos/{id}",
            get(get_video).put(update_video).delete(delete_video),
        )
}

fn attach_relations(state: &Arc<AppState>, video: Video) -> Result<VideoWithRelations, ApiError> {
    let team = match &video.team_id {
        Some(team_id) => state.store.get_team(team_id).api_err()?,
        None => None,
    };
    let match_ = match &video.match_id {
        Some(match_id) => state.store.get_match(match_id).api_err()?,
        None => None,
    };
    Ok(VideoWithRelations {
        video,
        team,
        match_,
    })
}

async fn list_videos(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListVideosParams>,
) -> Result<Json<Vec<VideoWithRelations>>, ApiError> {
    let filter = VideoFilter {
        category: params.category,
        team_id: params.team_id,
        published: params.published,
    };
    let videos = state.store.list_videos(&filter).api_err()?;
    let result = videos
        .into_iter()
        .map(|v| attach_relations(&state, v))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(result))
}

async fn get_video(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<VideoWithRelations>, ApiError> {
    let video = state
        .store
        .get_video(&id)
        .api_err()?
        .or_not_found("Video")?;
    Ok(Json(attach_relations(&state, video)?))
}

async fn create_video(
    _auth: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<VideoPayload>,
) -> Result<(StatusCode, Json<Video>), ApiError> {
    validate_payload(&state, &payload)?;

    let now = Utc::now();
    let video = Video {
        id: Uuid::new_v4().to_string(),
        title: payload.title,
        description: payload.description,
        url: payload.url,
        video_type: payload.video_type.unwrap_or(VideoType::Upload),
        thumbnail_url: payload.thumbnail_url,
        category: payload
            .category
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        duration: payload.duration,
        published: payload.published.unwrap_or(true),
        team_id: payload.team_id,
        match_id: payload.match_id,
        created_at: now,
        updated_at: now,
    };

    state.store.create_video(&video).api_err()?;
    Ok((StatusCode::CREATED, Json(video)))
}

async fn update_video(
    _auth: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<VideoPayload>,
) -> Result<Json<Video>, ApiError> {
    validate_payload(&state, &payload)?;

    let mut video = state
        .store
        .get_video(&id)
        .api_err()?
        .or_not_found("Video")?;

    video.title = payload.title;
    video.description = payload.description;
    video.url = payload.url;
    video.video_type = payload.video_type.unwrap_or(VideoType::Upload);
    video.thumbnail_url = payload.thumbnail_url;
    video.category = payload
        .category
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
    video.duration = payload.duration;
    video.published = payload.published.unwrap_or(true);
    video.team_id = payload.team_id;
    video.match_id = payload.match_id;
    video.updated_at = Utc::now();

    state.store.update_video(&video).api_err()?;
    Ok(Json(video))
}

/// Removes the row and, for uploaded videos, the file on disk.
async fn delete_video(
    _auth: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let video = state
        .store
        .get_video(&id)
        .api_err()?
        .or_not_found("Video")?;

    if !state.store.delete_video(&id).api_err()? {
        return Err(ApiError::not_found("Video not found"));
    }

    if video.video_type == VideoType::Upload {
        if let Some(filename) = filename_from_url(&video.url) {
            if let Err(e) = state.media.delete(filename).await {
                tracing::warn!("Failed to remove video file {filename}: {e}");
            }
        }
    }

    Ok(Json(json!({ "message": "Video deleted successfully" })))
}

fn validate_payload(state: &Arc<AppState>, payload: &VideoPayload) -> Result<(), ApiError> {
    require_non_empty(&payload.title, "title")?;
    require_non_empty(&payload.url, "url")?;

    if payload.duration.is_some_and(|d| d <= 0) {
        return Err(ApiError::bad_request("duration must be positive"));
    }

    if let Some(team_id) = &payload.team_id {
        state
            .store
            .get_team(team_id)
            .api_err()?
            .map(|_| ())
            .ok_or_else(|| ApiError::bad_request("team_id does not reference a team"))?;
    }
    if let Some(match_id) = &payload.match_id {
        state
            .store
            .get_match(match_id)
            .api_err()?
            .map(|_| ())
            .ok_or_else(|| ApiError::bad_request("match_id does not reference a match"))?;
    }
    Ok(())
}
