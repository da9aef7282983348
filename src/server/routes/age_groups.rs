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
use crate::server::dto::AgeGroupPayload;
use crate::server::response::{ApiError, StoreOptionExt, StoreResultExt};
use crate::server::validation::{require_non_empty, validate_age_bounds};
use crate::types::{AgeGroup, AgeGroupWithTeams};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/age-groups", get(list_age_groups).post(create_age_group))
        .route(
            "/age-groups/{id}",
            get(get_age_group)
                .put(update_age_group)
                .delete(delete_age_group),
        )
}

fn with_teams(
    state: &Arc<AppState>,
    age_group: AgeGroup,
) -> Result<AgeGroupWithTeams, ApiError> {
    let teams = state.store.list_age_group_teams(&age_group.id).api_err()?;
    let team_count = teams.len();
    Ok(AgeGroupWithTeams {
        age_group,
        teams,
        team_count,
    })
}

async fn list_age_groups(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<AgeGroupWithTeams>>, ApiError> {
    let groups = state.store.list_age_groups().api_err()?;
    let result = groups
        .into_iter()
        .map(|g| with_teams(&state, g))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(result))
}

async fn get_age_group(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<AgeGroupWithTeams>, ApiError> {
    let group = state
        .store
        .get_age_group(&id)
        .api_err()?
        .or_not_found("Age group")?;
    Ok(Json(with_teams(&state, group)?))
}

async fn create_age_group(
    _auth: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AgeGroupPayload>,
) -> Result<(StatusCode, Json<AgeGroup>), ApiError> {
    require_non_empty(&payload.name, "name")?;
    validate_age_bounds(payload.min_age, payload.max_age)?;

    let group = AgeGroup {
        id: Uuid::new_v4().to_string(),
        name: payload.name,
        min_age: payload.min_age,
        max_age: payload.max_age,
        created_at: Utc::now(),
    };

    state.store.create_age_group(&group).api_err()?;
    Ok((StatusCode::CREATED, Json(group)))
}

async fn update_age_group(
    _auth: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<AgeGroupPayload>,
) -> Result<Json<AgeGroup>, ApiError> {
    require_non_empty(&payload.name, "name")?;
    validate_age_bounds(payload.min_age, payload.max_age)?;

    let mut group = state
        .store
        .get_age_group(&id)
        .api_err()?
        .or_not_found("Age group")?;

    group.name = payload.name;
    group.min_age = payload.min_age;
    group.max_age = payload.max_age;

    state.store.update_age_group(&group).api_err()?;
    Ok(Json(group))
}

async fn delete_age_group(
    _auth: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    // Teams, tournaments, and tournament tables keep a hard reference, so
    // refuse the delete instead of surfacing a foreign key failure.
    if !state.store.list_age_group_teams(&id).api_err()?.is_empty() {
        return Err(ApiError::conflict("Age group still has teams"));
    }
    let referenced = state
        .store
        .list_tournaments()
        .api_err()?
        .iter()
        .any(|t| t.age_group_id == id);
    if referenced {
        return Err(ApiError::conflict("Age group still has tournaments"));
    }
    if !state
        .store
        .list_tables_by_age_group(&id)
        .api_err()?
        .is_empty()
    {
        return Err(ApiError::conflict("Age group still has tournament tables"));
    }

    if !state.store.delete_age_group(&id).api_err()? {
        return Err(ApiError::not_found("Age group not found"));
    }
    Ok(Json(json!({ "message": "Age group deleted successfully" })))
}
