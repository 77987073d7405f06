//! Error types for lobby operations.

/// Errors that can occur while creating, joining or reading games.
#[derive(Debug, thiserror::Error)]
pub enum LobbyError {
    /// A database operation failed.
    #[error("lobby database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// No game matches the given id or join code.
    #[error("game not found: {0}")]
    NotFound(String),

    /// The game already has its second player.
    #[error("game {0} is already active")]
    AlreadyActive(String),

    /// Pagination parameters out of range.
    #[error("invalid page: {0}")]
    InvalidPage(String),

    /// Every generated join code collided with an existing one.
    #[error("could not allocate a unique join code after {0} attempts")]
    CodeExhausted(u32),

    /// A round with this number is already recorded for the game.
    #[error("round {round_number} already exists for game {game_id}")]
    RoundExists {
        /// Owning game.
        game_id: String,
        /// The duplicated sequence position.
        round_number: i64,
    },
}

/// Returns true when `err` is a UNIQUE constraint violation.
pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}
