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
use crate::server::dto::TrainingPayload;
use crate::server::response::{ApiError, StoreOptionExt, StoreResultExt};
use crate::server::validation::{require_non_empty, validate_time};
use crate::types::Training;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/trainings", get(list_trainings).post(create_training))
        .route(
            "/trainings/{id}",
            get(get_training).put(update_training).delete(delete_training),
        )
}

async fn list_trainings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Training>>, ApiError> {
    Ok(Json(state.store.list_trainings().api_err()?))
}

async fn get_training(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Training>, ApiError> {
    let training = state
        .store
        .get_training(&id)
        .api_err()?
        .or_not_found("Training")?;
    Ok(Json(training))
}

async fn create_training(
    _auth: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TrainingPayload>,
) -> Result<(StatusCode, Json<Training>), ApiError> {
    validate_payload(&state, &payload)?;

    let now = Utc::now();
    let training = Training {
        id: Uuid::new_v4().to_string(),
        title: payload.title,
        description: payload.description,
        date: payload.date,
        start_time: payload.start_time,
        end_time: payload.end_time,
        location: payload.location,
        team_id: payload.team_id,
        age_group_id: payload.age_group_id,
        created_at: now,
        updated_at: now,
    };

    state.store.create_training(&training).api_err()?;
    Ok((StatusCode::CREATED, Json(training)))
}

async fn update_training(
    _auth: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<TrainingPayload>,
) -> Result<Json<Training>, ApiError> {
    validate_payload(&state, &payload)?;

    let mut training = state
        .store
        .get_training(&id)
        .api_err()?
        .or_not_found("Training")?;

    training.title = payload.title;
    training.description = payload.description;
    training.date = payload.date;
    training.start_time = payload.start_time;
    training.end_time = payload.end_time;
    training.location = payload.location;
    training.team_id = payload.team_id;
    training.age_group_id = payload.age_group_id;
    training.updated_at = Utc::now();

    state.store.update_training(&training).api_err()?;
    Ok(Json(training))
}

async fn delete_training(
    _auth: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !state.store.delete_training(&id).api_err()? {
        return Err(ApiError::not_found("Training not found"));
    }
    Ok(Json(json!({ "message": "Training deleted successfully" })))
}

fn validate_payload(state: &Arc<AppState>, payload: &TrainingPayload) -> Result<(), ApiError> {
    require_non_empty(&payload.title, "title")?;
    require_non_empty(&payload.location, "location")?;
    validate_time(&payload.start_time, "start_time")?;
    validate_time(&payload.end_time, "end_time")?;

    if payload.start_time >= payload.end_time {
        return Err(ApiError::bad_request("start_time must be before end_time"));
    }

    if let Some(team_id) = &payload.team_id {
        state
            .store
            .get_team(team_id)
            .api_err()?
            .map(|_| ())
            .ok_or_else(|| ApiError::bad_request("team_id does not reference a team"))?;
    }
    if let Some(age_group_id) = &payload.age_group_id {
        state
            .store
            .get_age_group(age_group_id)
            .api_err()?
            .map(|_| ())
            .ok_or_else(|| ApiError::bad_request("age_group_id does not reference an age group"))?;
    }
    Ok(())
}
