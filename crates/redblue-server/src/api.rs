//! Lobby API handlers.

use crate::AppState;
use axum::{
    extract::{Extension, Json, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use redblue_db::DbError;
use redblue_lobby::{
    create_game, get_game, is_valid_join_code, join_game, list_games, list_rounds,
    normalize_join_code, Game, LobbyError, Page, Round,
};
use redblue_types::{GameState, NameError, PlayerName};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

const GAME_NOT_FOUND: &str = "Game not found.";
const GAME_ALREADY_ACTIVE: &str = "Game is already active!";

/// Query string for `GET /games`.
#[derive(Debug, Deserialize)]
pub struct ListGamesQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page() -> u32 {
    Page::default().page
}

fn default_page_size() -> u32 {
    Page::default().page_size
}

/// Request body for game creation.
#[derive(Debug, Deserialize)]
pub struct CreateGameRequest {
    pub player1_name: String,
}

/// Response body for game creation.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateGameResponse {
    pub game_id: String,
    /// Join code to hand to the second player.
    pub code: String,
}

/// Request body for joining a game.
#[derive(Debug, Deserialize)]
pub struct JoinGameRequest {
    /// Join code, matched case-insensitively.
    pub code: String,
    pub player_name: String,
}

/// Response body for a successful join.
#[derive(Debug, Serialize, Deserialize)]
pub struct JoinGameResponse {
    pub game_id: String,
    pub player2_name: String,
    pub game_state: GameState,
}

/// API error type mapping to HTTP status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    BadRequest(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("internal server error: {0}")]
    InternalServerError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

impl From<NameError> for ApiError {
    fn from(e: NameError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<LobbyError> for ApiError {
    fn from(e: LobbyError) -> Self {
        match e {
            LobbyError::NotFound(_) => ApiError::NotFound(GAME_NOT_FOUND.to_string()),
            LobbyError::AlreadyActive(_) => ApiError::Forbidden(GAME_ALREADY_ACTIVE.to_string()),
            LobbyError::InvalidPage(msg) => ApiError::BadRequest(msg),
            LobbyError::RoundExists { .. } => ApiError::Conflict(e.to_string()),
            LobbyError::Database(_) | LobbyError::CodeExhausted(_) => {
                tracing::error!(error = %e, "lobby operation failed");
                ApiError::InternalServerError(e.to_string())
            }
        }
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        tracing::error!(error = %e, "storage unavailable");
        ApiError::InternalServerError(format!("db connection failed: {}", e))
    }
}

/// Runs `f` on a blocking thread with a connection checked out of the pool.
async fn with_session<T, F>(state: Arc<AppState>, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&Connection) -> Result<T, ApiError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let conn = state.storage.session()?;
        f(&*conn)
    })
    .await
    .map_err(|e| ApiError::InternalServerError(format!("task join error: {}", e)))?
}

/// Handler for `GET /games`.
///
/// Pagination only; `page` and `page_size` default to 1 and 10.
pub async fn list_games_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<ListGamesQuery>,
) -> Result<Json<Vec<Game>>, ApiError> {
    let page = Page::new(query.page, query.page_size)?;

    let games = with_session(state, move |conn| Ok(list_games(conn, page)?)).await?;

    Ok(Json(games))
}

/// Handler for `POST /game/create`.
pub async fn create_game_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<CreateGameRequest>,
) -> Result<Json<CreateGameResponse>, ApiError> {
    let player1 = PlayerName::parse(&payload.player1_name)?;

    let game = with_session(state, move |conn| Ok(create_game(conn, &player1)?)).await?;

    Ok(Json(CreateGameResponse {
        game_id: game.id,
        code: game.code,
    }))
}

/// Handler for `GET /game/{game_id}`.
pub async fn get_game_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(game_id): Path<String>,
) -> Result<Json<Game>, ApiError> {
    let game = with_session(state, move |conn| Ok(get_game(conn, &game_id)?))
        .await?
        .ok_or_else(|| ApiError::NotFound(GAME_NOT_FOUND.to_string()))?;

    Ok(Json(game))
}

/// Handler for `GET /game/{game_id}/rounds`.
pub async fn list_rounds_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(game_id): Path<String>,
) -> Result<Json<Vec<Round>>, ApiError> {
    let rounds = with_session(state, move |conn| {
        if get_game(conn, &game_id)?.is_none() {
            return Err(ApiError::NotFound(GAME_NOT_FOUND.to_string()));
        }
        Ok(list_rounds(conn, &game_id)?)
    })
    .await?;

    Ok(Json(rounds))
}

/// Handler for `POST /game/join`.
///
/// Seats the second player. Unknown codes are 404, games that already have
/// a second player are 403.
pub async fn join_game_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<JoinGameRequest>,
) -> Result<Json<JoinGameResponse>, ApiError> {
    let player2 = PlayerName::parse(&payload.player_name)?;

    let code = normalize_join_code(&payload.code);
    if !is_valid_join_code(&code) {
        return Err(ApiError::NotFound(GAME_NOT_FOUND.to_string()));
    }

    let game = with_session(state, move |conn| Ok(join_game(conn, &code, &player2)?)).await?;

    let player2_name = game
        .player2_name
        .ok_or_else(|| ApiError::InternalServerError("joined game has no player 2".to_string()))?;

    Ok(Json(JoinGameResponse {
        game_id: game.id,
        player2_name,
        game_state: game.game_state,
    }))
}
