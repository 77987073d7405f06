//! Game rows and the queries that create, join and read them.

use redblue_types::{GameState, PlayerName};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::code::generate_join_code;
use crate::error::{is_unique_violation, LobbyError};

/// How many fresh codes `create_game` tries before giving up.
pub const MAX_CODE_ATTEMPTS: u32 = 8;

/// Largest accepted `page_size` for [`list_games`].
pub const MAX_PAGE_SIZE: u32 = 100;

const GAME_COLUMNS: &str = "id, code, player1_name, player2_name, player1_score, player2_score,
            game_state, current_round, created_at";

/// One lobby between two players.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Game {
    /// UUID assigned at creation.
    pub id: String,
    /// Join code handed to the second player.
    pub code: String,
    pub player1_name: String,
    /// Unset until someone joins.
    pub player2_name: Option<String>,
    pub player1_score: i64,
    /// Unset until someone joins.
    pub player2_score: Option<i64>,
    pub game_state: GameState,
    /// 0 while waiting, 1 once the game is active.
    pub current_round: i64,
    /// Creation timestamp as stored by SQLite (`YYYY-MM-DD HH:MM:SS`, UTC).
    pub created_at: String,
}

/// Offset/limit window over the games table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// 1-based page number.
    pub page: u32,
    /// Games per page.
    pub page_size: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 10,
        }
    }
}

impl Page {
    /// Builds a page window, rejecting `page == 0` and sizes outside
    /// `1..=MAX_PAGE_SIZE`.
    pub fn new(page: u32, page_size: u32) -> Result<Self, LobbyError> {
        if page == 0 {
            return Err(LobbyError::InvalidPage("page starts at 1".to_string()));
        }
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(LobbyError::InvalidPage(format!(
                "page_size must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }
        Ok(Self { page, page_size })
    }

    fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.page_size)
    }
}

/// Creates a waiting game for `player1` under a freshly generated join code.
///
/// # Errors
///
/// Returns `LobbyError::CodeExhausted` if every attempt collided with an
/// existing code, or `LobbyError::Database` on any other SQL failure.
pub fn create_game(conn: &Connection, player1: &PlayerName) -> Result<Game, LobbyError> {
    create_game_with(conn, player1, generate_join_code)
}

pub(crate) fn create_game_with(
    conn: &Connection,
    player1: &PlayerName,
    mut next_code: impl FnMut() -> String,
) -> Result<Game, LobbyError> {
    for attempt in 1..=MAX_CODE_ATTEMPTS {
        let id = Uuid::new_v4().to_string();
        let code = next_code();

        let inserted = conn.execute(
            "INSERT INTO games (id, code, player1_name, player1_score, game_state, current_round)
             VALUES (?1, ?2, ?3, 0, ?4, 0)",
            params![id, code, player1.as_str(), GameState::Waiting.as_str()],
        );

        match inserted {
            Ok(_) => {
                tracing::info!(game_id = %id, code = %code, player = %player1, "game created");
                return get_game(conn, &id)?.ok_or(LobbyError::NotFound(id));
            }
            Err(e) if is_unique_violation(&e) => {
                tracing::warn!(attempt, code = %code, "join code collision, drawing again");
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(LobbyError::CodeExhausted(MAX_CODE_ATTEMPTS))
}

/// Looks a game up by id.
pub fn get_game(conn: &Connection, id: &str) -> Result<Option<Game>, LobbyError> {
    let game = conn
        .query_row(
            &format!("SELECT {GAME_COLUMNS} FROM games WHERE id = ?1"),
            [id],
            map_row_to_game,
        )
        .optional()?;
    Ok(game)
}

/// Looks a game up by join code.
pub fn find_game_by_code(conn: &Connection, code: &str) -> Result<Option<Game>, LobbyError> {
    let game = conn
        .query_row(
            &format!("SELECT {GAME_COLUMNS} FROM games WHERE code = ?1"),
            [code],
            map_row_to_game,
        )
        .optional()?;
    Ok(game)
}

/// Lists games in creation order, one page at a time.
pub fn list_games(conn: &Connection, page: Page) -> Result<Vec<Game>, LobbyError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {GAME_COLUMNS} FROM games ORDER BY rowid ASC LIMIT ?1 OFFSET ?2"
    ))?;

    let rows = stmt.query_map(
        params![i64::from(page.page_size), page.offset()],
        map_row_to_game,
    )?;
    let mut games = Vec::new();
    for row in rows {
        games.push(row?);
    }
    Ok(games)
}

/// Seats `player2` in the waiting game identified by `code` and activates it.
///
/// The state check and the write are one conditional UPDATE, so of two
/// concurrent joins to the same game exactly one succeeds.
///
/// # Errors
///
/// - `LobbyError::NotFound` if no game has this code.
/// - `LobbyError::AlreadyActive` if the game is no longer waiting.
pub fn join_game(conn: &Connection, code: &str, player2: &PlayerName) -> Result<Game, LobbyError> {
    let changed = conn.execute(
        "UPDATE games
         SET player2_name = ?1, player2_score = 0, game_state = ?2, current_round = 1
         WHERE code = ?3 AND game_state = ?4",
        params![
            player2.as_str(),
            GameState::Active.as_str(),
            code,
            GameState::Waiting.as_str()
        ],
    )?;

    let game =
        find_game_by_code(conn, code)?.ok_or_else(|| LobbyError::NotFound(code.to_string()))?;

    if changed == 0 {
        tracing::debug!(game_id = %game.id, "join rejected, game not waiting");
        return Err(LobbyError::AlreadyActive(game.id));
    }

    tracing::info!(game_id = %game.id, player = %player2, "player joined game");
    Ok(game)
}

fn map_row_to_game(row: &Row) -> rusqlite::Result<Game> {
    let state_str: String = row.get(6)?;
    let game_state: GameState = state_str.parse().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Game {
        id: row.get(0)?,
        code: row.get(1)?,
        player1_name: row.get(2)?,
        player2_name: row.get(3)?,
        player1_score: row.get(4)?,
        player2_score: row.get(5)?,
        game_state,
        current_round: row.get(7)?,
        created_at: row.get(8)?,
    })
}
