//! Key-value backed task persistence.
//!
//! # Responsibility
//! - Model the string key-value store the list is written to.
//! - Store the full task list as JSON under one fixed key.
//!
//! # Invariants
//! - A missing key loads as an empty list.
//! - Each save overwrites the whole value for the key.

use super::codec::{decode_tasks, encode_tasks};
use super::{LoadedTasks, PersistResult, TaskPersistence};
use crate::model::task::Task;
use log::debug;
use std::collections::HashMap;

/// Key under which the task list is stored.
pub const TASKS_STORAGE_KEY: &str = "tasks";

/// String-oriented key-value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> PersistResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> PersistResult<()>;
}

/// Process-local key-value store.
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    entries: HashMap<String, String>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> PersistResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> PersistResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> PersistResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> PersistResult<()> {
        (**self).set(key, value)
    }
}

/// Task persistence writing JSON into a `KeyValueStore`.
#[derive(Debug, Clone)]
pub struct KeyValuePersistence<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> KeyValuePersistence<S> {
    /// Uses the default `TASKS_STORAGE_KEY`.
    pub fn new(store: S) -> Self {
        Self::with_key(store, TASKS_STORAGE_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Borrows the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: KeyValueStore> TaskPersistence for KeyValuePersistence<S> {
    fn load(&self) -> PersistResult<LoadedTasks> {
        match self.store.get(&self.key)? {
            Some(raw) => decode_tasks(&raw),
            None => {
                debug!("event=tasks_load module=persist status=empty key={}", self.key);
                Ok(LoadedTasks::default())
            }
        }
    }

    fn save(&mut self, tasks: &[Task]) -> PersistResult<()> {
        let raw = encode_tasks(tasks)?;
        self.store.set(&self.key, &raw)
    }
}
