//! Task store: the authoritative ordered task collection.
//!
//! # Responsibility
//! - Own the task list for one session and apply user mutations to it.
//! - Save the full list through `TaskPersistence` after every mutation.
//!
//! # Invariants
//! - Insertion order is display order; nothing reorders tasks implicitly.
//! - Ids are unique across every task added while the store exists.
//! - Invalid input never reaches the list (`StoreError::Validation`).
//! - A failed save keeps the in-memory mutation (`StoreError::Persistence`).
//! - Unknown ids on `remove`/`toggle_completed` are no-ops, not errors.
//! - Ids filled in while loading are saved back before `open` returns.
//! - After a failed load nothing is saved until `accept_reset` is called.

use crate::model::task::{new_task_id, NewTask, Priority, Task, TaskId, TaskValidationError};
use crate::persist::{PersistError, TaskPersistence};
use log::{error, info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Error returned by task store mutations.
#[derive(Debug)]
pub enum StoreError {
    /// Input rejected; store state is unchanged.
    Validation(TaskValidationError),
    /// Mutation applied in memory but could not be saved.
    Persistence(PersistError),
    /// Stored tasks could not be loaded; writes are refused until the
    /// caller accepts starting over. Carries the load failure message.
    StorageUnreadable(String),
}

impl StoreError {
    /// Returns `true` when the in-memory state already reflects the request.
    pub fn mutation_applied(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }

    /// Returns `true` when `accept_reset` must run before any change.
    pub fn needs_reset(&self) -> bool {
        matches!(self, Self::StorageUnreadable(_))
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Persistence(err) => write!(f, "change kept but not saved: {err}"),
            Self::StorageUnreadable(reason) => write!(
                f,
                "stored tasks could not be loaded ({reason}); accept a reset before making changes"
            ),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Persistence(err) => Some(err),
            Self::StorageUnreadable(_) => None,
        }
    }
}

impl From<TaskValidationError> for StoreError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<PersistError> for StoreError {
    fn from(value: PersistError) -> Self {
        Self::Persistence(value)
    }
}

/// Ordered task collection bound to a persistence adapter.
pub struct TaskStore<P: TaskPersistence> {
    tasks: Vec<Task>,
    issued_ids: HashSet<TaskId>,
    persistence: P,
    load_error: Option<PersistError>,
    writes_blocked: bool,
}

impl<P: TaskPersistence> TaskStore<P> {
    /// Creates an empty store without reading `persistence`.
    pub fn new(persistence: P) -> Self {
        Self {
            tasks: Vec::new(),
            issued_ids: HashSet::new(),
            persistence,
            load_error: None,
            writes_blocked: false,
        }
    }

    /// Creates a store from the persisted task list.
    ///
    /// Load failures never propagate: the store starts empty, the failure
    /// stays available through `load_error()`, and mutations fail with
    /// `StorageUnreadable` until `accept_reset` is called.
    ///
    /// Records that were stored without an id get one here, and the list is
    /// saved back at once so the same ids come out of the next load. A failed
    /// write-back is logged only; the next mutation saves the list again.
    pub fn open(persistence: P) -> Self {
        let mut store = Self::new(persistence);
        match store.persistence.load() {
            Ok(loaded) => {
                info!(
                    "event=store_open module=store status=ok task_count={} backfilled_ids={}",
                    loaded.tasks.len(),
                    loaded.backfilled_ids
                );
                let needs_resave = loaded.needs_resave();
                store.issued_ids = loaded.tasks.iter().map(|task| task.id).collect();
                store.tasks = loaded.tasks;
                if needs_resave {
                    let _ = store.persist("task_backfill_ids");
                }
            }
            Err(err) => {
                warn!(
                    "event=store_open module=store status=degraded error_code=load_failed error={err}"
                );
                store.load_error = Some(err);
                store.writes_blocked = true;
            }
        }
        store
    }

    /// Gives up on the unreadable stored list and saves the current
    /// (empty) list over it. Unblocks mutations after a failed load.
    ///
    /// `load_error()` keeps reporting the original failure.
    pub fn accept_reset(&mut self) -> StoreResult<()> {
        self.writes_blocked = false;
        self.persist("store_reset")?;
        Ok(())
    }

    /// Returns `true` while mutations are refused after a failed load.
    pub fn needs_reset(&self) -> bool {
        self.writes_blocked
    }

    /// Validates input, appends a new task and saves.
    ///
    /// # Errors
    /// - `Validation` when text is blank or the due date is empty/invalid;
    ///   the store is unchanged.
    /// - `StorageUnreadable` after a failed load, until `accept_reset`.
    /// - `Persistence` when the save fails; the task is still appended and
    ///   can be read back through `all()`.
    pub fn add(
        &mut self,
        text: &str,
        due_date: &str,
        priority: Option<Priority>,
    ) -> StoreResult<Task> {
        let input = NewTask::parse(text, due_date, priority).map_err(|err| {
            info!("event=task_add module=store status=rejected reason=validation");
            err
        })?;
        self.ensure_writable("task_add")?;

        let mut id = new_task_id();
        while self.issued_ids.contains(&id) {
            id = new_task_id();
        }
        self.issued_ids.insert(id);

        let task = Task::with_id(id, input);
        self.tasks.push(task.clone());
        self.persist("task_add")?;
        Ok(task)
    }

    /// Removes the task with `id`.
    ///
    /// Returns `Ok(false)` when no task matched; the list is still saved.
    pub fn remove(&mut self, id: TaskId) -> StoreResult<bool> {
        self.ensure_writable("task_remove")?;
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        let removed = self.tasks.len() != before;
        self.persist("task_remove")?;
        Ok(removed)
    }

    /// Flips `completed` on the task with `id`.
    ///
    /// Returns the new completion state, or `None` when no task matched.
    pub fn toggle_completed(&mut self, id: TaskId) -> StoreResult<Option<bool>> {
        self.ensure_writable("task_toggle")?;
        let toggled = self.tasks.iter_mut().find(|task| task.id == id).map(|task| {
            task.toggle_completed();
            task.completed
        });
        self.persist("task_toggle")?;
        Ok(toggled)
    }

    /// Removes every completed task, keeping the order of the rest.
    ///
    /// Returns how many tasks were removed.
    pub fn clear_completed(&mut self) -> StoreResult<usize> {
        self.ensure_writable("task_clear_completed")?;
        let before = self.tasks.len();
        self.tasks.retain(Task::is_active);
        let cleared = before - self.tasks.len();
        self.persist("task_clear_completed")?;
        Ok(cleared)
    }

    /// Read-only snapshot in insertion order.
    pub fn all(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Error observed by `open`, when the store had to start empty.
    pub fn load_error(&self) -> Option<&PersistError> {
        self.load_error.as_ref()
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    fn ensure_writable(&self, event: &'static str) -> StoreResult<()> {
        if !self.writes_blocked {
            return Ok(());
        }
        warn!("event={event} module=store status=rejected reason=storage_unreadable");
        let reason = self
            .load_error
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        Err(StoreError::StorageUnreadable(reason))
    }

    fn persist(&mut self, event: &'static str) -> Result<(), PersistError> {
        match self.persistence.save(&self.tasks) {
            Ok(()) => {
                info!(
                    "event={event} module=store status=ok task_count={}",
                    self.tasks.len()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event={event} module=store status=error error_code=save_failed task_count={} error={err}",
                    self.tasks.len()
                );
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{StoreError, TaskStore};
    use crate::persist::kv::{
        KeyValuePersistence, KeyValueStore, MemoryKeyValueStore, TASKS_STORAGE_KEY,
    };
    use crate::persist::NoPersistence;

    #[test]
    fn ids_stay_unique_across_rapid_adds() {
        let mut store = TaskStore::new(NoPersistence);
        for index in 0..500 {
            store
                .add(&format!("task {index}"), "2030-01-01", None)
                .expect("add should succeed");
        }

        let mut ids = store.all().iter().map(|task| task.id).collect::<Vec<_>>();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 500);
    }

    #[test]
    fn removed_ids_are_not_reissued() {
        let mut store = TaskStore::new(NoPersistence);
        let first = store.add("first", "2030-01-01", None).expect("add first");
        store.remove(first.id).expect("remove first");
        assert!(store.issued_ids.contains(&first.id));
    }

    #[test]
    fn failed_load_blocks_writes_until_reset() {
        let mut kv = MemoryKeyValueStore::new();
        kv.set(TASKS_STORAGE_KEY, "[oops").expect("seed raw value");

        let mut store = TaskStore::open(KeyValuePersistence::new(&mut kv));
        assert!(store.needs_reset());
        let err = store
            .clear_completed()
            .expect_err("writes must be refused before reset");
        assert!(matches!(err, StoreError::StorageUnreadable(_)));
        assert!(!err.mutation_applied());

        store.accept_reset().expect("reset should save");
        assert!(!store.needs_reset());
        assert!(store.load_error().is_some());
        drop(store);
        assert_eq!(
            kv.get(TASKS_STORAGE_KEY).expect("read raw").as_deref(),
            Some("[]")
        );
    }
}
