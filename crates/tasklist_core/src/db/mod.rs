//! SQLite file behind `SqliteKeyValueStore`.
//!
//! The database holds a single `kv_entries(key, value)` table; the task list
//! lives in one row under `TASKS_STORAGE_KEY`. Connections come out of
//! `open_db`/`open_db_in_memory` already migrated, so the key-value layer
//! never sees a missing table.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure while opening or migrating the key-value database.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// `PRAGMA user_version` is ahead of what this build knows how to read.
    SchemaTooNew { found: u32, supported: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "key-value database error: {err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "key-value database has schema version {found}; this build reads up to {supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::SchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
