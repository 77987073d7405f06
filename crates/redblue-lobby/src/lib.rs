//! Lobby model for the red-blue game.
//!
//! Implements game creation under a shareable join code, joining a waiting
//! game, paginated listing, and round records. Every function takes a plain
//! `rusqlite::Connection`, so callers decide where the connection comes from
//! (a pooled request session in the server, an in-memory database in tests).
//!
//! # Game lifecycle
//!
//! | State | `current_round` | Set by |
//! |-------|-----------------|--------|
//! | `waiting` | 0 | [`create_game`] |
//! | `active` | 1 | [`join_game`] |

mod code;
mod error;
mod game;
mod round;

pub use code::{
    generate_join_code, is_valid_join_code, normalize_join_code, JOIN_CODE_ALPHABET,
    JOIN_CODE_LEN,
};
pub use error::LobbyError;
pub use game::{
    create_game, find_game_by_code, get_game, join_game, list_games, Game, Page,
    MAX_CODE_ATTEMPTS, MAX_PAGE_SIZE,
};
pub use round::{create_round, list_rounds, NewRound, Round};
