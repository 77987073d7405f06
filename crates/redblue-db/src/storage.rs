//! The process-wide storage handle.

use r2d2::PooledConnection;
use r2d2_sqlite::SqliteConnectionManager;
use thiserror::Error;

use crate::migrations::{run_migrations, MigrationError};
use crate::pool::{create_pool, DbPool, DbRuntimeSettings, PoolError};

/// A pooled connection checked out for the duration of one request.
pub type Session = PooledConnection<SqliteConnectionManager>;

/// Errors raised while opening or using the store.
#[derive(Debug, Error)]
pub enum DbError {
    #[error(transparent)]
    PoolInit(#[from] PoolError),

    /// No connection could be checked out of the pool.
    #[error("failed to acquire database connection: {0}")]
    Pool(#[from] r2d2::Error),

    #[error(transparent)]
    Migration(#[from] MigrationError),

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Handle to the local relational store.
///
/// Obtained only through [`Storage::initialize`], which opens the pool and
/// brings the schema up to date, so every accessor on a `Storage` operates on
/// an initialized store. Cloning is cheap and shares the same pool.
#[derive(Clone)]
pub struct Storage {
    pool: DbPool,
}

impl Storage {
    /// Opens (creating if absent) the database at `path` and applies pending
    /// migrations.
    ///
    /// Initializing the same file twice is harmless: already-applied
    /// migrations are skipped.
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the pool cannot be built or a migration fails.
    pub fn initialize(path: &str, settings: DbRuntimeSettings) -> Result<Self, DbError> {
        tracing::debug!(path, "initializing storage");

        let pool = create_pool(path, settings)?;
        {
            let conn = pool.get()?;
            let applied = run_migrations(&conn)?;
            if applied > 0 {
                tracing::info!(count = applied, "applied database migrations");
            }
        }

        tracing::debug!(path, "storage initialized");
        Ok(Self { pool })
    }

    /// Checks a connection out of the pool.
    ///
    /// # Errors
    ///
    /// Returns `DbError::Pool` if no connection becomes available within the
    /// pool's timeout.
    pub fn session(&self) -> Result<Session, DbError> {
        Ok(self.pool.get()?)
    }

    /// The underlying connection pool.
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Names of the user tables registered in the store, sorted.
    ///
    /// Internal SQLite tables and the migration ledger are excluded.
    ///
    /// # Errors
    ///
    /// Returns `DbError` if no connection is available or the catalog query
    /// fails.
    pub fn tables(&self) -> Result<Vec<String>, DbError> {
        let conn = self.session()?;
        let mut stmt = conn.prepare(
            "SELECT name FROM sqlite_master
             WHERE type = 'table'
               AND name NOT LIKE 'sqlite_%'
               AND name <> '_redblue_migrations'
             ORDER BY name",
        )?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(names)
    }
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage")
            .field("max_size", &self.pool.max_size())
            .finish()
    }
}
