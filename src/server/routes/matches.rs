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
use crate::server::dto::MatchPayload;
use crate::server::response::{ApiError, StoreOptionExt, StoreResultExt};
use crate::types::{Match, MatchWithTeams};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/matches", get(list_matches).post(create_match))
        .route(
            "/matches/{id}",
            get(get_match).put(update_match).delete(delete_match),
        )
}

fn with_teams(state: &Arc<AppState>, m: Match) -> Result<MatchWithTeams, ApiError> {
    let home_team = state.store.get_team(&m.home_team_id).api_err()?;
    let away_team = state.store.get_team(&m.away_team_id).api_err()?;
    Ok(MatchWithTeams {
        match_: m,
        home_team,
        away_team,
    })
}

async fn list_matches(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MatchWithTeams>>, ApiError> {
    let matches = state.store.list_matches().api_err()?;
    let result = matches
        .into_iter()
        .map(|m| with_teams(&state, m))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(result))
}

async fn get_match(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MatchWithTeams>, ApiError> {
    let m = state.store.get_match(&id).api_err()?.or_not_found("Match")?;
    Ok(Json(with_teams(&state, m)?))
}

async fn create_match(
    _auth: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<MatchPayload>,
) -> Result<(StatusCode, Json<Match>), ApiError> {
    validate_payload(&state, &payload)?;

    let now = Utc::now();
    let m = Match {
        id: Uuid::new_v4().to_string(),
        home_team_id: payload.home_team_id,
        away_team_id: payload.away_team_id,
        match_date: payload.match_date,
        home_score: payload.home_score,
        away_score: payload.away_score,
        location: payload.location,
        created_at: now,
        updated_at: now,
    };

    state.store.create_match(&m).api_err()?;
    Ok((StatusCode::CREATED, Json(m)))
}

async fn update_match(
    _auth: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<MatchPayload>,
) -> Result<Json<Match>, ApiError> {
    validate_payload(&state, &payload)?;

    let mut m = state.store.get_match(&id).api_err()?.or_not_found("Match")?;

    m.home_team_id = payload.home_team_id;
    m.away_team_id = payload.away_team_id;
    m.match_date = payload.match_date;
    m.home_score = payload.home_score;
    m.away_score = payload.away_score;
    m.location = payload.location;
    m.updated_at = Utc::now();

    state.store.update_match(&m).api_err()?;
    Ok(Json(m))
}

async fn delete_match(
    _auth: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !state.store.delete_match(&id).api_err()? {
        return Err(ApiError::not_found("Match not found"));
    }
    Ok(Json(json!({ "message": "Match deleted successfully" })))
}

fn validate_payload(state: &Arc<AppState>, payload: &MatchPayload) -> Result<(), ApiError> {
    if payload.home_team_id == payload.away_team_id {
        return Err(ApiError::bad_request("A team cannot play against itself"));
    }

    for (team_id, field) in [
        (&payload.home_team_id, "home_team_id"),
        (&payload.away_team_id, "away_team_id"),
    ] {
        state
            .store
            .get_team(team_id)
            .api_err()?
            .map(|_| ())
            .ok_or_else(|| ApiError::bad_request(format!("{field} does not reference a team")))?;
    }

    // Scores arrive together once the match has been played.
    if payload.home_score.is_some() != payload.away_score.is_some() {
        return Err(ApiError::bad_request(
            "home_score and away_score must be set together",
        ));
    }
    if payload.home_score.is_some_and(|s| s < 0) || payload.away_score.is_some_and(|s| s < 0) {
        return Err(ApiError::bad_request("Scores must not be negative"));
    }

    Ok(())
}
