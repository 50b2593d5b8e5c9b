use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::Json,
};

use super::{message, AppState, Message};
use crate::error::ApiError;
use crate::models::{Team, TeamPayload};

// GET /teams - List all teams
pub async fn get_teams(State(state): State<AppState>) -> Result<Json<Vec<Team>>, ApiError> {
    let teams = state.store.find_all_teams().await?;
    Ok(Json(teams))
}

// POST /teams - Create a team
pub async fn create_team(
    State(state): State<AppState>,
    payload: Result<Json<TeamPayload>, JsonRejection>,
) -> Result<Message, ApiError> {
    let Json(payload) = payload?;
    state.store.create_team(payload).await?;

    Ok(message(StatusCode::CREATED, "team has been created successfully"))
}

// GET /teams/{id} - Get team by ID
pub async fn get_team_by_id(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Team>, ApiError> {
    let Path(id) = id?;
    let team = state.store.find_team_by_id(id).await?;
    Ok(Json(team))
}

// PUT /teams/{id} - Overwrite name and gender
pub async fn update_team(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<TeamPayload>, JsonRejection>,
) -> Result<Message, ApiError> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    state.store.update_team(payload, id).await?;

    Ok(message(StatusCode::OK, "team has been updated successfully"))
}

// DELETE /teams/{id} - Delete a team and, by cascade, its players
pub async fn delete_team(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Message, ApiError> {
    let Path(id) = id?;
    state.store.delete_team(id).await?;

    Ok(message(StatusCode::OK, "team has been deleted successfully"))
}
