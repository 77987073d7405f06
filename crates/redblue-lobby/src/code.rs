//! Join code generation.
//!
//! Codes are short enough to read out loud and avoid the glyphs people
//! confuse (`0`/`O`, `1`/`I`). The generator does not consult the store;
//! uniqueness comes from the `games.code` constraint, and
//! [`create_game`](crate::create_game) draws again on a collision.

use rand::Rng;

/// Symbols a join code is drawn from.
pub const JOIN_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Number of symbols in a join code.
pub const JOIN_CODE_LEN: usize = 6;

/// Returns a fresh random join code.
pub fn generate_join_code() -> String {
    let mut rng = rand::thread_rng();
    (0..JOIN_CODE_LEN)
        .map(|_| JOIN_CODE_ALPHABET[rng.gen_range(0..JOIN_CODE_ALPHABET.len())] as char)
        .collect()
}

/// Canonical form of a user-typed code: surrounding whitespace removed,
/// letters upper-cased.
pub fn normalize_join_code(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}

/// Whether `code` could have been produced by [`generate_join_code`].
pub fn is_valid_join_code(code: &str) -> bool {
    code.len() == JOIN_CODE_LEN && code.bytes().all(|b| JOIN_CODE_ALPHABET.contains(&b))
}
