use std::sync::Arc;

use axum::{
    http::{Method, StatusCode},
    response::Json,
    routing::get,
    Router,
};

use crate::db::Storage;
use crate::error::ApiError;
use crate::models::MessageResponse;

pub mod health;
pub mod players;
pub mod teams;

/// Shared handler state; the store is the only thing requests have in common.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Storage>,
}

impl AppState {
    pub fn new(store: impl Storage + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

pub type Message = (StatusCode, Json<MessageResponse>);

/// Success envelope for mutating requests, echoing the status it is sent with.
pub fn message(status: StatusCode, message: impl Into<String>) -> Message {
    let body = MessageResponse {
        message: message.into(),
        status_code: status.as_u16(),
    };
    (status, Json(body))
}

async fn method_not_allowed(method: Method) -> ApiError {
    ApiError::MethodNotAllowed(method)
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "Basketball API - v1.0" }))
        .route("/health", get(health::health_check))

        // Team endpoints
        .route(
            "/teams",
            get(teams::get_teams)
                .post(teams::create_team)
                .fallback(method_not_allowed),
        )
        .route(
            "/teams/{id}",
            get(teams::get_team_by_id)
                .put(teams::update_team)
                .delete(teams::delete_team)
                .fallback(method_not_allowed),
        )

        // Player endpoints
        .route(
            "/players",
            get(players::get_players)
                .post(players::create_player)
                .fallback(method_not_allowed),
        )
        .route(
            "/players/{id}",
            get(players::get_player_by_id)
                .put(players::update_player)
                .delete(players::delete_player)
                .fallback(method_not_allowed),
        )
        .with_state(state)
}
