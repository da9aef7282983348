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
use crate::server::AppState;
use crate::server::dto::{ListPlayersParams, PlayerPayload};
use crate::server::response::{ApiError, StoreOptionExt, StoreResultExt};
use crate::server::validation::require_non_empty;
use crate::types::{Player, PlayerWithTeam, TeamWithAgeGroup};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/players", get(list_players).post(create_player))
        .route(
            "/players/{id}",
            get(get_player).put(update_player).delete(delete_player),
        )
}

fn attach_team(state: &Arc<AppState>, player: Player) -> Result<PlayerWithTeam, ApiError> {
    let team = match state.store.get_team(&player.team_id).api_err()? {
        Some(team) => {
            let age_group = state.store.get_age_group(&team.age_group_id).api_err()?;
            Some(TeamWithAgeGroup { team, age_group })
        }
        None => None,
    };
    Ok(PlayerWithTeam { player, team })
}

async fn list_players(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListPlayersParams>,
) -> Result<Json<Vec<PlayerWithTeam>>, ApiError> {
    let players = state
        .store
        .list_players(params.team_id.as_deref())
        .api_err()?;
    let result = players
        .into_iter()
        .map(|p| attach_team(&state, p))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(result))
}

async fn get_player(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<PlayerWithTeam>, ApiError> {
    let player = state
        .store
        .get_player(&id)
        .api_err()?
        .or_not_found("Player")?;
    Ok(Json(attach_team(&state, player)?))
}

async fn create_player(
    _auth: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<PlayerPayload>,
) -> Result<(StatusCode, Json<Player>), ApiError> {
    validate_payload(&state, &payload)?;

    let now = Utc::now();
    let player = Player {
        id: Uuid::new_v4().to_string(),
        first_name: payload.first_name,
        last_name: payload.last_name,
        date_of_birth: payload.date_of_birth,
        position: payload.position,
        number: payload.number,
        team_id: payload.team_id,
        photo_url: payload.photo_url,
        created_at: now,
        updated_at: now,
    };

    state.store.create_player(&player).api_err()?;
    Ok((StatusCode::CREATED, Json(player)))
}

async fn update_player(
    _auth: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<PlayerPayload>,
) -> Result<Json<Player>, ApiError> {
    validate_payload(&state, &payload)?;

    let mut player = state
        .store
        .get_player(&id)
        .api_err()?
        .or_not_found("Player")?;

    player.first_name = payload.first_name;
    player.last_name = payload.last_name;
    player.date_of_birth = payload.date_of_birth;
    player.position = payload.position;
    player.number = payload.number;
    player.team_id = payload.team_id;
    player.photo_url = payload.photo_url;
    player.updated_at = Utc::now();

    state.store.update_player(&player).api_err()?;
    Ok(Json(player))
}

async fn delete_player(
    _auth: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !state.store.delete_player(&id).api_err()? {
        return Err(ApiError::not_found("Player not found"));
    }
    Ok(Json(json!({ "message": "Player deleted successfully" })))
}

fn validate_payload(state: &Arc<AppState>, payload: &PlayerPayload) -> Result<(), ApiError> {
    require_non_empty(&payload.first_name, "first_name")?;
    require_non_empty(&payload.last_name, "last_name")?;

    if let Some(number) = payload.number {
        if !(1..=99).contains(&number) {
            return Err(ApiError::bad_request("number must be between 1 and 99"));
        }
    }

    state
        .store
        .get_team(&payload.team_id)
        .api_err()?
        .map(|_| ())
        .ok_or_else(|| ApiError::bad_request("team_id does not reference a team"))
}
