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
use crate::server::dto::{
    CreateTablePayload, StandingPayload, TournamentPayload, UpdateTablePayload,
};
use crate::server::response::{ApiError, StoreOptionExt, StoreResultExt};
use crate::server::validation::require_non_empty;
use crate::types::{Standing, TableDetail, Tournament, TournamentTable, TournamentWithAgeGroup};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/tournaments",
            get(list_tournaments).post(create_tournament),
        )
        .route("/tournaments/tables", axum::routing::post(create_table))
        .route("/tournaments/tables/current", get(list_current_tables))
        // One param route serves both verbs: GET lists the tables of an age
        // group, PUT rewrites the standings of one table.
        .route(
            "/tournaments/tables/{id}",
            get(list_tables_by_age_group).put(update_table),
        )
        .route(
            "/tournaments/{id}",
            get(get_tournament)
                .put(update_tournament)
                .delete(delete_tournament),
        )
}

async fn list_tournaments(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TournamentWithAgeGroup>>, ApiError> {
    let tournaments = state.store.list_tournaments().api_err()?;
    let result = tournaments
        .into_iter()
        .map(|t| {
            let age_group = state.store.get_age_group(&t.age_group_id).api_err()?;
            Ok(TournamentWithAgeGroup {
                tournament: t,
                age_group,
            })
        })
        .collect::<Result<Vec<_>, ApiError>>()?;
    Ok(Json(result))
}

async fn get_tournament(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TournamentWithAgeGroup>, ApiError> {
    let tournament = state
        .store
        .get_tournament(&id)
        .api_err()?
        .or_not_found("Tournament")?;
    let age_group = state
        .store
        .get_age_group(&tournament.age_group_id)
        .api_err()?;
    Ok(Json(TournamentWithAgeGroup {
        tournament,
        age_group,
    }))
}

async fn create_tournament(
    _auth: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TournamentPayload>,
) -> Result<(StatusCode, Json<Tournament>), ApiError> {
    validate_payload(&state, &payload)?;

    let tournament = Tournament {
        id: Uuid::new_v4().to_string(),
        name: payload.name,
        season: payload.season,
        age_group_id: payload.age_group_id,
        start_date: payload.start_date,
        end_date: payload.end_date,
        description: payload.description,
        created_at: Utc::now(),
    };

    state.store.create_tournament(&tournament).api_err()?;
    Ok((StatusCode::CREATED, Json(tournament)))
}

async fn update_tournament(
    _auth: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<TournamentPayload>,
) -> Result<Json<Tournament>, ApiError> {
    validate_payload(&state, &payload)?;

    let mut tournament = state
        .store
        .get_tournament(&id)
        .api_err()?
        .or_not_found("Tournament")?;

    tournament.name = payload.name;
    tournament.season = payload.season;
    tournament.age_group_id = payload.age_group_id;
    tournament.start_date = payload.start_date;
    tournament.end_date = payload.end_date;
    tournament.description = payload.description;

    state.store.update_tournament(&tournament).api_err()?;
    Ok(Json(tournament))
}

async fn delete_tournament(
    _auth: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !state.store.delete_tournament(&id).api_err()? {
        return Err(ApiError::not_found("Tournament not found"));
    }
    Ok(Json(json!({ "message": "Tournament deleted successfully" })))
}

// Tournament tables

fn build_standings(table_id: &str, rows: &[StandingPayload]) -> Result<Vec<Standing>, ApiError> {
    rows.iter()
        .enumerate()
        .map(|(idx, row)| {
            require_non_empty(&row.team_name, "team_name")?;
            let stats = [
                row.played,
                row.wins,
                row.draws,
                row.losses,
                row.goals_for,
                row.goals_against,
                row.points,
            ];
            if stats.iter().any(|&v| v < 0) {
                return Err(ApiError::bad_request("Standing counters must not be negative"));
            }

            Ok(Standing {
                id: Uuid::new_v4().to_string(),
                table_id: table_id.to_string(),
                // Position reflects the submitted order.
                position: idx as i32 + 1,
                team_name: row.team_name.clone(),
                played: row.played,
                wins: row.wins,
                draws: row.draws,
                losses: row.losses,
                goals_for: row.goals_for,
                goals_against: row.goals_against,
                points: row.points,
            })
        })
        .collect()
}

fn table_detail(state: &Arc<AppState>, table: TournamentTable) -> Result<TableDetail, ApiError> {
    let tournament = state.store.get_tournament(&table.tournament_id).api_err()?;
    let age_group = state.store.get_age_group(&table.age_group_id).api_err()?;
    let standings = state.store.list_table_standings(&table.id).api_err()?;
    Ok(TableDetail {
        table,
        tournament,
        age_group,
        standings,
    })
}

async fn create_table(
    _auth: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateTablePayload>,
) -> Result<(StatusCode, Json<TableDetail>), ApiError> {
    state
        .store
        .get_tournament(&payload.tournament_id)
        .api_err()?
        .or_not_found("Tournament")?;
    state
        .store
        .get_age_group(&payload.age_group_id)
        .api_err()?
        .or_not_found("Age group")?;

    let now = Utc::now();
    let table = TournamentTable {
        id: Uuid::new_v4().to_string(),
        tournament_id: payload.tournament_id,
        age_group_id: payload.age_group_id,
        created_at: now,
        updated_at: now,
    };
    let standings = build_standings(&table.id, &payload.standings)?;

    state.store.create_table(&table, &standings).api_err()?;
    Ok((StatusCode::CREATED, Json(table_detail(&state, table)?)))
}

/// Tables for the season the club is currently playing.
async fn list_current_tables(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TableDetail>>, ApiError> {
    let tables = state
        .store
        .list_tables_by_season(&state.config.current_season)
        .api_err()?;
    let result = tables
        .into_iter()
        .map(|t| table_detail(&state, t))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(result))
}

async fn list_tables_by_age_group(
    State(state): State<Arc<AppState>>,
    Path(age_group_id): Path<String>,
) -> Result<Json<Vec<TableDetail>>, ApiError> {
    let tables = state
        .store
        .list_tables_by_age_group(&age_group_id)
        .api_err()?;
    let result = tables
        .into_iter()
        .map(|t| table_detail(&state, t))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(result))
}

/// Replaces every standing of a table with the submitted list, in one
/// transaction.
async fn update_table(
    _auth: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateTablePayload>,
) -> Result<Json<TableDetail>, ApiError> {
    let table = state
        .store
        .get_table(&id)
        .api_err()?
        .or_not_found("Tournament table")?;

    let standings = build_standings(&table.id, &payload.standings)?;
    state
        .store
        .replace_table_standings(&table.id, &standings)
        .api_err()?;

    let table = state
        .store
        .get_table(&id)
        .api_err()?
        .or_not_found("Tournament table")?;
    Ok(Json(table_detail(&state, table)?))
}

fn validate_payload(state: &Arc<AppState>, payload: &TournamentPayload) -> Result<(), ApiError> {
    require_non_empty(&payload.name, "name")?;
    require_non_empty(&payload.season, "season")?;

    if let (Some(start), Some(end)) = (payload.start_date, payload.end_date) {
        if start > end {
            return Err(ApiError::bad_request("start_date must not be after end_date"));
        }
    }

    state
        .store
        .get_age_group(&payload.age_group_id)
        .api_err()?
        .map(|_| ())
        .ok_or_else(|| ApiError::bad_request("age_group_id does not reference an age group"))
}
