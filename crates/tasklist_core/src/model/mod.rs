//! Domain model for the task list.
//!
//! # Responsibility
//! - Define canonical data structures used by store, views and persistence.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - Input validation happens before a `Task` is constructed, never after.

pub mod task;
