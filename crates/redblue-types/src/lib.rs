//! Shared types for the red-blue lobby backend.
//!
//! Holds the game lifecycle flag and the validated player name used by the
//! lobby repository and the HTTP layer. Nothing in here touches storage.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum player name length in characters.
pub const MIN_PLAYER_NAME_LEN: usize = 3;

/// Maximum player name length in characters.
pub const MAX_PLAYER_NAME_LEN: usize = 16;

/// Lifecycle flag of a game.
///
/// A game is `Waiting` from creation until a second player joins, then
/// `Active`. There is no transition back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameState {
    /// Created, waiting for the second player.
    Waiting,
    /// Both players present.
    Active,
}

impl GameState {
    /// Returns the string stored in the `game_state` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::Active => "active",
        }
    }
}

impl std::fmt::Display for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for GameState {
    type Err = ParseGameStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "waiting" => Ok(Self::Waiting),
            "active" => Ok(Self::Active),
            _ => Err(ParseGameStateError(s.to_string())),
        }
    }
}

/// Error returned when parsing an unknown game state string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown game state: {0}")]
pub struct ParseGameStateError(pub String);

/// Reasons a player name is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("Player name should be between 3 and 16 characters long.")]
    TooShort(usize),
    #[error("Player name should be between 3 and 16 characters long.")]
    TooLong(usize),
    #[error(
        "Player name should contain only letters, numbers and special characters ('.' and '_')"
    )]
    InvalidCharacter(char),
}

/// A player name that passed validation.
///
/// Length is 3..=16 characters and every character is in `[a-zA-Z0-9_.]`.
/// The only way to obtain one is [`PlayerName::parse`], so anything holding a
/// `PlayerName` may persist it as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PlayerName(String);

impl PlayerName {
    /// Validates `raw` and wraps it.
    ///
    /// The length rule is checked before the charset rule.
    ///
    /// # Errors
    ///
    /// Returns [`NameError`] describing the first rule the name breaks.
    pub fn parse(raw: &str) -> Result<Self, NameError> {
        let len = raw.chars().count();
        if len < MIN_PLAYER_NAME_LEN {
            return Err(NameError::TooShort(len));
        }
        if len > MAX_PLAYER_NAME_LEN {
            return Err(NameError::TooLong(len));
        }
        if let Some(bad) = raw.chars().find(|c| !is_name_char(*c)) {
            return Err(NameError::InvalidCharacter(bad));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlayerName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_state_round_trip() {
        for state in [GameState::Waiting, GameState::Active] {
            assert_eq!(state.as_str().parse::<GameState>(), Ok(state));
        }
    }

    #[test]
    fn game_state_unknown() {
        assert_eq!(
            "finished".parse::<GameState>(),
            Err(ParseGameStateError("finished".to_string()))
        );
        assert!("WAITING".parse::<GameState>().is_err());
    }

    #[test]
    fn game_state_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&GameState::Active).unwrap(),
            "\"active\""
        );
        let parsed: GameState = serde_json::from_str("\"waiting\"").unwrap();
        assert_eq!(parsed, GameState::Waiting);
    }

    #[test]
    fn accepts_boundary_lengths() {
        assert!(PlayerName::parse("Ann").is_ok());
        assert!(PlayerName::parse("abcdefghijklmnop").is_ok());
        assert_eq!(PlayerName::parse("a.b_C9").unwrap().as_str(), "a.b_C9");
    }

    #[test]
    fn rejects_short_and_long_names() {
        assert_eq!(PlayerName::parse(""), Err(NameError::TooShort(0)));
        assert_eq!(PlayerName::parse("Al"), Err(NameError::TooShort(2)));
        assert_eq!(
            PlayerName::parse("abcdefghijklmnopq"),
            Err(NameError::TooLong(17))
        );
    }

    #[test]
    fn rejects_characters_outside_charset() {
        assert_eq!(
            PlayerName::parse("Ann Lee"),
            Err(NameError::InvalidCharacter(' '))
        );
        assert_eq!(
            PlayerName::parse("bob-1"),
            Err(NameError::InvalidCharacter('-'))
        );
        assert_eq!(
            PlayerName::parse("Zoë123"),
            Err(NameError::InvalidCharacter('ë'))
        );
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        // Four characters, eight bytes: fails on charset, not on length.
        assert_eq!(
            PlayerName::parse("éééé"),
            Err(NameError::InvalidCharacter('é'))
        );
    }
}
