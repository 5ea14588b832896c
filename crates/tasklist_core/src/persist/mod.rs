//! Persistence adapter contracts and implementations.
//!
//! # Responsibility
//! - Define the load/save contract the task store persists through.
//! - Keep storage and serialization details out of the store.
//!
//! # Invariants
//! - `save` always writes the full task list; there are no partial writes.
//! - `load` rejects malformed or invalid data instead of masking it; the
//!   store decides how to degrade.

pub mod codec;
pub mod kv;
pub mod sqlite_kv;

use crate::db::DbError;
use crate::model::task::{Task, TaskId, TaskValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type PersistResult<T> = Result<T, PersistError>;

/// Errors raised while loading or saving the task list.
#[derive(Debug)]
pub enum PersistError {
    /// Storage backend failure.
    Db(DbError),
    /// Task list could not be serialized.
    Encode(serde_json::Error),
    /// Stored value is not a JSON task list.
    Decode(serde_json::Error),
    /// Stored record decoded but violates task invariants.
    InvalidRecord {
        index: usize,
        source: TaskValidationError,
    },
    /// Stored list contains the same id twice.
    DuplicateId(TaskId),
    /// Backend refused the operation (quota, read-only, offline).
    Unavailable(String),
}

impl Display for PersistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode task list: {err}"),
            Self::Decode(err) => write!(f, "stored task list is malformed: {err}"),
            Self::InvalidRecord { index, source } => {
                write!(f, "stored task #{index} is invalid: {source}")
            }
            Self::DuplicateId(id) => write!(f, "stored task list repeats id {id}"),
            Self::Unavailable(message) => write!(f, "storage unavailable: {message}"),
        }
    }
}

impl Error for PersistError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode(err) | Self::Decode(err) => Some(err),
            Self::InvalidRecord { source, .. } => Some(source),
            Self::DuplicateId(_) | Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for PersistError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for PersistError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Result of loading the stored list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedTasks {
    pub tasks: Vec<Task>,
    /// Records stored without an id that received a fresh one while
    /// decoding. Those ids only become stable once the list is saved back.
    pub backfilled_ids: usize,
}

impl LoadedTasks {
    pub fn needs_resave(&self) -> bool {
        self.backfilled_ids > 0
    }
}

/// Load/save contract for the whole task list.
pub trait TaskPersistence {
    /// Loads the stored list, or an empty list when nothing was saved yet.
    fn load(&self) -> PersistResult<LoadedTasks>;
    /// Replaces the stored list with `tasks`.
    fn save(&mut self, tasks: &[Task]) -> PersistResult<()>;
}

/// Persistence that keeps nothing; every session starts empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPersistence;

impl TaskPersistence for NoPersistence {
    fn load(&self) -> PersistResult<LoadedTasks> {
        Ok(LoadedTasks::default())
    }

    fn save(&mut self, _tasks: &[Task]) -> PersistResult<()> {
        Ok(())
    }
}

impl<P: TaskPersistence + ?Sized> TaskPersistence for &mut P {
    fn load(&self) -> PersistResult<LoadedTasks> {
        (**self).load()
    }

    fn save(&mut self, tasks: &[Task]) -> PersistResult<()> {
        (**self).save(tasks)
    }
}
