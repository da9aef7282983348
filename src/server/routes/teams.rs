use std::collections::HashMap;
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
use crate::server::dto::TeamPayload;
use crate::server::response::{ApiError, StoreOptionExt, StoreResultExt};
use crate::server::validation::require_non_empty;
use crate::types::{Team, TeamDetail, TeamWithAgeGroup};

const DETAIL_PHOTO_LIMIT: i32 = 10;
const DETAIL_VIDEO_LIMIT: i32 = 5;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/teams", get(list_teams).post(create_team))
        .route(
            "/teams/{id}",
            get(get_team).put(update_team).delete(delete_team),
        )
}

async fn list_teams(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TeamWithAgeGroup>>, ApiError> {
    let teams = state.store.list_teams().api_err()?;
    let groups: HashMap<String, _> = state
        .store
        .list_age_groups()
        .api_err()?
        .into_iter()
        .map(|g| (g.id.clone(), g))
        .collect();

    let result = teams
        .into_iter()
        .map(|team| {
            let age_group = groups.get(&team.age_group_id).cloned();
            TeamWithAgeGroup { team, age_group }
        })
        .collect();
    Ok(Json(result))
}

/// Team detail bundles the roster and the newest team media for the
/// public team page.
async fn get_team(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TeamDetail>, ApiError> {
    let team = state.store.get_team(&id).api_err()?.or_not_found("Team")?;

    let age_group = state.store.get_age_group(&team.age_group_id).api_err()?;
    let players = state.store.list_players(Some(&id)).api_err()?;
    let photos = state
        .store
        .list_team_photos(&id, DETAIL_PHOTO_LIMIT)
        .api_err()?;
    let videos = state
        .store
        .list_team_videos(&id, DETAIL_VIDEO_LIMIT)
        .api_err()?;

    Ok(Json(TeamDetail {
        team,
        age_group,
        players,
        photos,
        videos,
    }))
}

async fn create_team(
    _auth: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TeamPayload>,
) -> Result<(StatusCode, Json<Team>), ApiError> {
    require_non_empty(&payload.name, "name")?;
    ensure_age_group_exists(&state, &payload.age_group_id)?;

    let now = Utc::now();
    let team = Team {
        id: Uuid::new_v4().to_string(),
        name: payload.name,
        description: payload.description,
        age_group_id: payload.age_group_id,
        founded: payload.founded,
        created_at: now,
        updated_at: now,
    };

    state.store.create_team(&team).api_err()?;
    Ok((StatusCode::CREATED, Json(team)))
}

async fn update_team(
    _auth: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<TeamPayload>,
) -> Result<Json<Team>, ApiError> {
    require_non_empty(&payload.name, "name")?;
    ensure_age_group_exists(&state, &payload.age_group_id)?;

    let mut team = state.store.get_team(&id).api_err()?.or_not_found("Team")?;

    team.name = payload.name;
    team.description = payload.description;
    team.age_group_id = payload.age_group_id;
    team.founded = payload.founded;
    team.updated_at = Utc::now();

    state.store.update_team(&team).api_err()?;
    Ok(Json(team))
}

async fn delete_team(
    _auth: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    // Matches keep a hard reference to both teams.
    let referenced = state
        .store
        .list_matches()
        .api_err()?
        .iter()
        .any(|m| m.home_team_id == id || m.away_team_id == id);
    if referenced {
        return Err(ApiError::conflict("Team still has matches"));
    }

    if !state.store.delete_team(&id).api_err()? {
        return Err(ApiError::not_found("Team not found"));
    }
    Ok(Json(json!({ "message": "Team deleted successfully" })))
}

fn ensure_age_group_exists(state: &Arc<AppState>, age_group_id: &str) -> Result<(), ApiError> {
    state
        .store
        .get_age_group(age_group_id)
        .api_err()?
        .map(|_| ())
        .ok_or_else(|| ApiError::bad_request("age_group_id does not reference an age group"))
}
