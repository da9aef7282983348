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
use crate::server::dto::CoachPayload;
use crate::server::response::{ApiError, StoreOptionExt, StoreResultExt};
use crate::server::validation::require_non_empty;
use crate::types::{Coach, CoachWithTeam, TeamWithAgeGroup};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/coaches", get(list_coaches).post(create_coach))
        .route("/coaches/position/{position}", get(list_by_position))
        .route(
            "/coaches/{id}",
            get(get_coach).put(update_coach).delete(delete_coach),
        )
}

fn attach_team(state: &Arc<AppState>, coach: Coach) -> Result<CoachWithTeam, ApiError> {
    let team = match &coach.team_id {
        Some(team_id) => match state.store.get_team(team_id).api_err()? {
            Some(team) => {
                let age_group = state.store.get_age_group(&team.age_group_id).api_err()?;
                Some(TeamWithAgeGroup { team, age_group })
            }
            None => None,
        },
        None => None,
    };
    Ok(CoachWithTeam { coach, team })
}

async fn list_coaches(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CoachWithTeam>>, ApiError> {
    let coaches = state.store.list_coaches().api_err()?;
    let result = coaches
        .into_iter()
        .map(|c| attach_team(&state, c))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(result))
}

/// Case-insensitive substring match on the coach role, e.g.
/// `/coaches/position/goalkeeper`.
async fn list_by_position(
    State(state): State<Arc<AppState>>,
    Path(position): Path<String>,
) -> Result<Json<Vec<CoachWithTeam>>, ApiError> {
    let coaches = state.store.list_coaches_by_position(&position).api_err()?;
    let result = coaches
        .into_iter()
        .map(|c| attach_team(&state, c))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(result))
}

async fn get_coach(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CoachWithTeam>, ApiError> {
    let coach = state
        .store
        .get_coach(&id)
        .api_err()?
        .or_not_found("Coach")?;
    Ok(Json(attach_team(&state, coach)?))
}

async fn create_coach(
    _auth: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CoachPayload>,
) -> Result<(StatusCode, Json<Coach>), ApiError> {
    validate_payload(&state, &payload)?;

    let now = Utc::now();
    let coach = Coach {
        id: Uuid::new_v4().to_string(),
        first_name: payload.first_name,
        last_name: payload.last_name,
        position: payload.position,
        experience_years: payload.experience_years,
        biography: payload.biography,
        phone: payload.phone,
        email: payload.email,
        photo_url: payload.photo_url,
        achievements: payload.achievements,
        team_id: payload.team_id,
        created_at: now,
        updated_at: now,
    };

    state.store.create_coach(&coach).api_err()?;
    Ok((StatusCode::CREATED, Json(coach)))
}

async fn update_coach(
    _auth: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<CoachPayload>,
) -> Result<Json<Coach>, ApiError> {
    validate_payload(&state, &payload)?;

    let mut coach = state
        .store
        .get_coach(&id)
        .api_err()?
        .or_not_found("Coach")?;

    coach.first_name = payload.first_name;
    coach.last_name = payload.last_name;
    coach.position = payload.position;
    coach.experience_years = payload.experience_years;
    coach.biography = payload.biography;
    coach.phone = payload.phone;
    coach.email = payload.email;
    coach.photo_url = payload.photo_url;
    coach.achievements = payload.achievements;
    coach.team_id = payload.team_id;
    coach.updated_at = Utc::now();

    state.store.update_coach(&coach).api_err()?;
    Ok(Json(coach))
}

async fn delete_coach(
    _auth: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !state.store.delete_coach(&id).api_err()? {
        return Err(ApiError::not_found("Coach not found"));
    }
    Ok(Json(json!({ "message": "Coach deleted successfully" })))
}

fn validate_payload(state: &Arc<AppState>, payload: &CoachPayload) -> Result<(), ApiError> {
    require_non_empty(&payload.first_name, "first_name")?;
    require_non_empty(&payload.last_name, "last_name")?;

    if let Some(years) = payload.experience_years {
        if years < 0 {
            return Err(ApiError::bad_request("experience_years must not be negative"));
        }
    }

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
