//! Read-only projections over a task snapshot.
//!
//! # Invariants
//! - Projections never mutate the store.
//! - Overdue checks take an injected reference date; nothing here reads the
//!   system clock.

pub mod projection;
