//! Task store aggregate.
//!
//! # Responsibility
//! - Own the authoritative task collection and its mutations.
//! - Delegate durability to a `TaskPersistence` adapter.

pub mod task_store;
