//! Core use-case services.
//!
//! # Responsibility
//! - Compose store and view projection into session-level APIs.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod task_service;
