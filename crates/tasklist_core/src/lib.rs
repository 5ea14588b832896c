//! Core domain logic for the task list.
//! This crate is the single source of truth for task invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod persist;
pub mod service;
pub mod store;
pub mod view;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::task::{
    new_task_id, parse_due_date, NewTask, Priority, Task, TaskId, TaskValidationError,
};
pub use persist::codec::{decode_tasks, encode_tasks};
pub use persist::kv::{
    KeyValuePersistence, KeyValueStore, MemoryKeyValueStore, TASKS_STORAGE_KEY,
};
pub use persist::sqlite_kv::SqliteKeyValueStore;
pub use persist::{LoadedTasks, NoPersistence, PersistError, PersistResult, TaskPersistence};
pub use service::task_service::{TaskBoard, TaskService};
pub use store::task_store::{StoreError, StoreResult, TaskStore};
pub use view::projection::{filter, is_overdue, stats, FilterMode, FilterParseError, TaskStats};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
