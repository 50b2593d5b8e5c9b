use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
};

use super::{message, AppState, Message};
use crate::error::ApiError;
use crate::models::{Player, PlayerPayload};

// GET /players - List all players
pub async fn get_players(State(state): State<AppState>) -> Result<Json<Vec<Player>>, ApiError> {
    let players = state.store.find_all_players().await?;
    Ok(Json(players))
}

// POST /players - Create a player on an existing team
pub async fn create_player(
    State(state): State<AppState>,
    payload: Result<Json<PlayerPayload>, JsonRejection>,
) -> Result<Message, ApiError> {
    let Json(payload) = payload?;
    state.store.create_player(payload).await?;

    Ok(message(StatusCode::CREATED, "player has been created successfully"))
}

// GET /players/{id} - Get player by ID
// Ids are validated by the store so a malformed one reads as "not found".
pub async fn get_player_by_id(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> Result<Json<Player>, ApiError> {
    let player = state.store.find_player_by_id(&player_id).await?;
    Ok(Json(player))
}

// PUT /players/{id}
pub async fn update_player(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
    payload: Result<Json<PlayerPayload>, JsonRejection>,
) -> Result<Message, ApiError> {
    let Json(payload) = payload?;
    state.store.update_player(payload, &player_id).await?;

    Ok(message(StatusCode::OK, "player has been updated successfully"))
}

// DELETE /players/{id}
pub async fn delete_player(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> Result<Message, ApiError> {
    state.store.delete_player(&player_id).await?;

    Ok(message(StatusCode::OK, "player has been deleted successfully"))
}
