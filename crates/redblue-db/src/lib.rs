//! Storage layer for the red-blue lobby backend.
//!
//! Provides SQLite connection pooling (via `r2d2`), WAL-mode initialization,
//! embedded SQL migrations, and the [`Storage`] handle that the HTTP layer
//! receives at startup. The `games` and `rounds` tables are created through
//! versioned migrations managed by this crate.
//!
//! A single local file backs the store. WAL mode lets readers proceed while
//! one writer commits, which is all a lobby needs.

mod migrations;
mod pool;
mod storage;

pub use migrations::{run_migrations, MigrationError};
pub use pool::{create_pool, DbPool, DbRuntimeSettings, PoolError, IN_MEMORY};
pub use storage::{DbError, Session, Storage};
