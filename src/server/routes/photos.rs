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
use crate::media::filename_from_url;
use crate::server::AppState;
use crate::server::dto::PhotoPayload;
use crate::server::response::{ApiError, StoreOptionExt, StoreResultExt};
use crate::server::validation::require_non_empty;
use crate::types::{Photo, PhotoWithTeam};

pub const DEFAULT_CATEGORY: &str = "general";

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/photos", get(list_photos).post(create_photo))
        .route(
            "/photos/{id}",
            get(get_photo).put(update_photo).delete(delete_photo),
        )
}

fn attach_team(state: &Arc<AppState>, photo: Photo) -> Result<PhotoWithTeam, ApiError> {
    let team = match &photo.team_id {
        Some(team_id) => state.store.get_team(team_id).api_err()?,
        None => None,
    };
    Ok(PhotoWithTeam { photo, team })
}

async fn list_photos(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PhotoWithTeam>>, ApiError> {
    let photos = state.store.list_photos().api_err()?;
    let result = photos
        .into_iter()
        .map(|p| attach_team(&state, p))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(result))
}

async fn get_photo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<PhotoWithTeam>, ApiError> {
    let photo = state
        .store
        .get_photo(&id)
        .api_err()?
        .or_not_found("Photo")?;
    Ok(Json(attach_team(&state, photo)?))
}

async fn create_photo(
    _auth: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<PhotoPayload>,
) -> Result<(StatusCode, Json<Photo>), ApiError> {
    validate_payload(&state, &payload)?;

    let photo = Photo {
        id: Uuid::new_v4().to_string(),
        title: payload.title,
        description: payload.description,
        category: payload.category.unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        url: payload.url,
        team_id: payload.team_id,
        created_at: Utc::now(),
    };

    state.store.create_photo(&photo).api_err()?;
    Ok((StatusCode::CREATED, Json(photo)))
}

async fn update_photo(
    _auth: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<PhotoPayload>,
) -> Result<Json<Photo>, ApiError> {
    validate_payload(&state, &payload)?;

    let mut photo = state
        .store
        .get_photo(&id)
        .api_err()?
        .or_not_found("Photo")?;

    photo.title = payload.title;
    photo.description = payload.description;
    photo.category = payload
        .category
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
    photo.url = payload.url;
    photo.team_id = payload.team_id;

    state.store.update_photo(&photo).api_err()?;
    Ok(Json(photo))
}

/// Removes the row and, for locally stored photos, the file on disk. A file
/// that is already gone does not fail the delete.
async fn delete_photo(
    _auth: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let photo = state
        .store
        .get_photo(&id)
        .api_err()?
        .or_not_found("Photo")?;

    if !state.store.delete_photo(&id).api_err()? {
        return Err(ApiError::not_found("Photo not found"));
    }

    if let Some(filename) = filename_from_url(&photo.url) {
        if let Err(e) = state.media.delete(filename).await {
            tracing::warn!("Failed to remove photo file {filename}: {e}");
        }
    }

    Ok(Json(json!({ "message": "Photo deleted successfully" })))
}

fn validate_payload(state: &Arc<AppState>, payload: &PhotoPayload) -> Result<(), ApiError> {
    require_non_empty(&payload.title, "title")?;
    require_non_empty(&payload.url, "url")?;

    if let Some(team_id) = &payload.team_id {
        state
            .store
            .get_team(team_id)
            .api_err()?
            .map(|_| ())
            .ok_or_else(|| ApiError::bad_request("team_id does not reference a team"))?;
    }
    Ok(())
}
