//! Round rows.
//!
//! A round records both players' choices and the score each earned in it.
//! Nothing in the HTTP surface writes rounds yet; they are created here for
//! the move submission flow and read back per game.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{is_unique_violation, LobbyError};
use crate::game::get_game;

/// One scoring unit within a game.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Round {
    pub id: String,
    pub game_id: String,
    /// 1-based position within the game.
    pub round_number: i64,
    pub player1_choice: Option<String>,
    pub player2_choice: Option<String>,
    pub player1_score: Option<i64>,
    pub player2_score: Option<i64>,
}

/// Parameters for recording a round.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewRound {
    pub game_id: String,
    pub round_number: i64,
    pub player1_choice: Option<String>,
    pub player2_choice: Option<String>,
    pub player1_score: Option<i64>,
    pub player2_score: Option<i64>,
}

/// Records a round for an existing game.
///
/// # Errors
///
/// - `LobbyError::NotFound` if the game does not exist.
/// - `LobbyError::RoundExists` if the game already has this round number.
pub fn create_round(conn: &Connection, new: &NewRound) -> Result<Round, LobbyError> {
    if get_game(conn, &new.game_id)?.is_none() {
        return Err(LobbyError::NotFound(new.game_id.clone()));
    }

    let round = Round {
        id: Uuid::new_v4().to_string(),
        game_id: new.game_id.clone(),
        round_number: new.round_number,
        player1_choice: new.player1_choice.clone(),
        player2_choice: new.player2_choice.clone(),
        player1_score: new.player1_score,
        player2_score: new.player2_score,
    };

    conn.execute(
        "INSERT INTO rounds (
            id, game_id, round_number, player1_choice, player2_choice,
            player1_score, player2_score
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            round.id,
            round.game_id,
            round.round_number,
            round.player1_choice,
            round.player2_choice,
            round.player1_score,
            round.player2_score,
        ],
    )
    .map_err(|e| {
        if is_unique_violation(&e) {
            LobbyError::RoundExists {
                game_id: new.game_id.clone(),
                round_number: new.round_number,
            }
        } else {
            LobbyError::Database(e)
        }
    })?;

    tracing::debug!(game_id = %round.game_id, round = round.round_number, "round recorded");
    Ok(round)
}

/// Lists a game's rounds ordered by round number.
pub fn list_rounds(conn: &Connection, game_id: &str) -> Result<Vec<Round>, LobbyError> {
    let mut stmt = conn.prepare(
        "SELECT
            id, game_id, round_number, player1_choice, player2_choice,
            player1_score, player2_score
        FROM rounds WHERE game_id = ?1 ORDER BY round_number ASC",
    )?;

    let rows = stmt.query_map([game_id], map_row_to_round)?;
    let mut rounds = Vec::new();
    for row in rows {
        rounds.push(row?);
    }
    Ok(rounds)
}

fn map_row_to_round(row: &Row) -> rusqlite::Result<Round> {
    Ok(Round {
        id: row.get(0)?,
        game_id: row.get(1)?,
        round_number: row.get(2)?,
        player1_choice: row.get(3)?,
        player2_choice: row.get(4)?,
        player1_score: row.get(5)?,
        player2_score: row.get(6)?,
    })
}
