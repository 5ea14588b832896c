//! Task list use-case service.
//!
//! # Responsibility
//! - Hold one session's store and selected filter.
//! - Produce the render-ready board (filtered items + counters).
//!
//! # Invariants
//! - All mutations go through `TaskStore`; the service adds no state of its
//!   own besides the filter selection.
//! - Board counters always cover the whole list, not just the filtered view.

use crate::model::task::{Priority, Task, TaskId};
use crate::persist::{PersistError, TaskPersistence};
use crate::store::task_store::{StoreResult, TaskStore};
use crate::view::projection::{filter, stats, FilterMode, TaskStats};
use chrono::NaiveDate;
use log::debug;

/// Everything a UI needs to render the list once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskBoard {
    /// Filter applied to `items`.
    pub filter: FilterMode,
    /// Visible tasks in insertion order.
    pub items: Vec<Task>,
    /// Counters over the full list.
    pub stats: TaskStats,
}

/// Use-case wrapper for one task list session.
pub struct TaskService<P: TaskPersistence> {
    store: TaskStore<P>,
    filter: FilterMode,
}

impl<P: TaskPersistence> TaskService<P> {
    /// Opens the persisted list with the `all` filter selected.
    pub fn open(persistence: P) -> Self {
        Self::from_store(TaskStore::open(persistence))
    }

    pub fn from_store(store: TaskStore<P>) -> Self {
        Self {
            store,
            filter: FilterMode::All,
        }
    }

    pub fn add_task(
        &mut self,
        text: &str,
        due_date: &str,
        priority: Option<Priority>,
    ) -> StoreResult<Task> {
        self.store.add(text, due_date, priority)
    }

    pub fn remove_task(&mut self, id: TaskId) -> StoreResult<bool> {
        self.store.remove(id)
    }

    pub fn toggle_task(&mut self, id: TaskId) -> StoreResult<Option<bool>> {
        self.store.toggle_completed(id)
    }

    pub fn clear_completed(&mut self) -> StoreResult<usize> {
        self.store.clear_completed()
    }

    /// Overwrites an unreadable stored list with the current empty one.
    pub fn accept_reset(&mut self) -> StoreResult<()> {
        self.store.accept_reset()
    }

    pub fn needs_reset(&self) -> bool {
        self.store.needs_reset()
    }

    /// Selects the filter used by subsequent `board` calls.
    pub fn set_filter(&mut self, mode: FilterMode) {
        debug!("event=filter_change module=service mode={mode}");
        self.filter = mode;
    }

    pub fn filter_mode(&self) -> FilterMode {
        self.filter
    }

    /// Builds the filtered list and counters for `reference_date`.
    pub fn board(&self, reference_date: NaiveDate) -> TaskBoard {
        let tasks = self.store.all();
        TaskBoard {
            filter: self.filter,
            items: filter(tasks, self.filter, reference_date)
                .into_iter()
                .cloned()
                .collect(),
            stats: stats(tasks, reference_date),
        }
    }

    pub fn store(&self) -> &TaskStore<P> {
        &self.store
    }

    /// Load failure observed when the session was opened.
    pub fn load_error(&self) -> Option<&PersistError> {
        self.store.load_error()
    }
}
