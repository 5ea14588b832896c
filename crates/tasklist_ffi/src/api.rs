//! FFI use-case API for UI-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level task list functions to the UI via FRB.
//! - Keep error semantics simple: envelopes with `ok` + message, never panics.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Every call opens the configured database and runs exactly one use-case.
//! - Task ids cross the boundary as canonical UUID strings.
//! - An unreadable stored list is never overwritten by a regular mutation;
//!   only `task_reset_storage` replaces it.

use chrono::{Local, NaiveDate};
use log::warn;
use std::path::PathBuf;
use std::sync::OnceLock;
use tasklist_core::db::open_db;
use tasklist_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, is_overdue,
    parse_due_date, ping as ping_inner, FilterMode, KeyValuePersistence, Priority,
    SqliteKeyValueStore, StoreError, Task, TaskId, TaskService, TaskStats,
};

const ENTRY_DB_FILE_NAME: &str = "tasklist_entry.sqlite3";
const DB_PATH_ENV: &str = "TASKLIST_DB_PATH";
static ENTRY_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

type SqliteTaskService<'conn> = TaskService<KeyValuePersistence<SqliteKeyValueStore<'conn>>>;

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Task row as shown by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: String,
    pub text: String,
    /// Canonical `YYYY-MM-DD`; localized display is the UI's job.
    pub due_date: String,
    /// `low|medium|high`.
    pub priority: String,
    pub completed: bool,
    /// Precomputed against the board's reference date.
    pub overdue: bool,
    pub created_at_ms: i64,
}

/// Counters shown next to the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskCounters {
    pub total: u32,
    pub completed: u32,
    pub active: u32,
    pub overdue: u32,
}

/// Render payload for one list refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskBoardResponse {
    pub ok: bool,
    /// Filter token actually applied.
    pub filter: String,
    pub items: Vec<TaskItem>,
    pub counters: TaskCounters,
    /// Diagnostics or load-degradation notice; empty when nothing to report.
    pub message: String,
    /// Stored tasks could not be loaded and changes are refused until
    /// `task_reset_storage` is called.
    pub needs_reset: bool,
}

/// Generic action response envelope for task mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskActionResponse {
    /// Whether the change is both applied and saved.
    pub ok: bool,
    /// Affected task id, when one exists.
    pub task_id: Option<String>,
    /// Set when the description field needs correction.
    pub text_error: bool,
    /// Set when the due date field needs correction.
    pub due_date_error: bool,
    /// Human-readable message for diagnostics/UI.
    pub message: String,
    /// See `TaskBoardResponse::needs_reset`.
    pub needs_reset: bool,
}

impl TaskActionResponse {
    fn success(message: impl Into<String>, task_id: Option<TaskId>) -> Self {
        Self {
            ok: true,
            task_id: task_id.map(|id| id.to_string()),
            text_error: false,
            due_date_error: false,
            message: message.into(),
            needs_reset: false,
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            task_id: None,
            text_error: false,
            due_date_error: false,
            message: message.into(),
            needs_reset: false,
        }
    }

    fn from_store_error(operation: &str, err: &StoreError) -> Self {
        let mut response = Self::failure(format!("{operation} failed: {err}"));
        match err {
            StoreError::Validation(validation) => {
                response.text_error = validation.text_missing();
                response.due_date_error = validation.due_date_invalid();
            }
            StoreError::StorageUnreadable(_) => response.needs_reset = true,
            StoreError::Persistence(_) => {}
        }
        response
    }
}

/// Adds a task from the entry form.
///
/// `priority` accepts `low|medium|high`; `None` or empty means `medium`.
///
/// # FFI contract
/// - Never panics.
/// - Validation failures set `text_error`/`due_date_error` per field.
#[flutter_rust_bridge::frb(sync)]
pub fn task_add(text: String, due_date: String, priority: Option<String>) -> TaskActionResponse {
    let priority = match priority.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => match raw.parse::<Priority>() {
            Ok(priority) => Some(priority),
            Err(err) => return TaskActionResponse::failure(format!("task_add failed: {err}")),
        },
    };

    with_task_action(|service| {
        match service.add_task(text.as_str(), due_date.as_str(), priority) {
            Ok(task) => TaskActionResponse::success("Task added.", Some(task.id)),
            Err(err) => TaskActionResponse::from_store_error("task_add", &err),
        }
    })
}

/// Deletes a task. Unknown ids succeed without changes.
#[flutter_rust_bridge::frb(sync)]
pub fn task_remove(task_id: String) -> TaskActionResponse {
    let id = match parse_task_id(&task_id) {
        Ok(id) => id,
        Err(message) => return TaskActionResponse::failure(message),
    };

    with_task_action(|service| match service.remove_task(id) {
        Ok(true) => TaskActionResponse::success("Task removed.", Some(id)),
        Ok(false) => TaskActionResponse::success("Task already removed.", Some(id)),
        Err(err) => TaskActionResponse::from_store_error("task_remove", &err),
    })
}

/// Flips completion of a task. Unknown ids succeed without changes.
#[flutter_rust_bridge::frb(sync)]
pub fn task_toggle(task_id: String) -> TaskActionResponse {
    let id = match parse_task_id(&task_id) {
        Ok(id) => id,
        Err(message) => return TaskActionResponse::failure(message),
    };

    with_task_action(|service| match service.toggle_task(id) {
        Ok(Some(true)) => TaskActionResponse::success("Task completed.", Some(id)),
        Ok(Some(false)) => TaskActionResponse::success("Task reopened.", Some(id)),
        Ok(None) => TaskActionResponse::success("Task not found; nothing changed.", Some(id)),
        Err(err) => TaskActionResponse::from_store_error("task_toggle", &err),
    })
}

/// Removes every completed task.
#[flutter_rust_bridge::frb(sync)]
pub fn task_clear_completed() -> TaskActionResponse {
    with_task_action(|service| match service.clear_completed() {
        Ok(cleared) => TaskActionResponse::success(format!("Cleared {cleared} task(s)."), None),
        Err(err) => TaskActionResponse::from_store_error("task_clear_completed", &err),
    })
}

/// Discards an unreadable stored list so that changes are accepted again.
///
/// # FFI contract
/// - Never panics.
/// - Does nothing when the stored list loads fine.
/// - Replaces the stored value with an empty list otherwise; the old value
///   is lost.
#[flutter_rust_bridge::frb(sync)]
pub fn task_reset_storage() -> TaskActionResponse {
    with_task_action(|service| {
        if !service.needs_reset() {
            return TaskActionResponse::success("Nothing to reset.", None);
        }
        match service.accept_reset() {
            Ok(()) => {
                warn!("event=task_reset_storage module=ffi status=ok");
                TaskActionResponse::success("Stored tasks reset.", None)
            }
            Err(err) => TaskActionResponse::from_store_error("task_reset_storage", &err),
        }
    })
}

/// Returns the filtered list and counters.
///
/// Input semantics:
/// - `filter`: `all|active|pending|completed|overdue|high-priority`.
/// - `reference_date`: `YYYY-MM-DD`; `None` uses the local calendar date.
///
/// # FFI contract
/// - Never panics; failures return `ok=false` with an empty board.
#[flutter_rust_bridge::frb(sync)]
pub fn task_board(filter: String, reference_date: Option<String>) -> TaskBoardResponse {
    let mode = match filter.parse::<FilterMode>() {
        Ok(mode) => mode,
        Err(err) => return empty_board(format!("task_board failed: {err}")),
    };
    let reference = match reference_date.as_deref() {
        Some(raw) => match parse_due_date(raw) {
            Ok(date) => date,
            Err(err) => return empty_board(format!("task_board failed: {err}")),
        },
        None => Local::now().date_naive(),
    };

    with_task_service(|service| {
        service.set_filter(mode);
        let board = service.board(reference);
        let message = match load_failure_notice(service) {
            Some(notice) => {
                warn!("event=task_board module=ffi status=degraded");
                notice
            }
            None => String::new(),
        };
        TaskBoardResponse {
            ok: true,
            filter: board.filter.to_string(),
            items: board
                .items
                .iter()
                .map(|task| to_task_item(task, reference))
                .collect(),
            counters: to_counters(board.stats),
            message,
            needs_reset: service.needs_reset(),
        }
    })
    .unwrap_or_else(empty_board)
}

fn empty_board(message: String) -> TaskBoardResponse {
    TaskBoardResponse {
        ok: false,
        filter: FilterMode::All.to_string(),
        items: Vec::new(),
        counters: to_counters(TaskStats::default()),
        message,
        needs_reset: false,
    }
}

fn parse_task_id(raw: &str) -> Result<TaskId, String> {
    TaskId::parse_str(raw.trim()).map_err(|err| format!("invalid task id `{raw}`: {err}"))
}

fn resolve_entry_db_path() -> PathBuf {
    ENTRY_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(ENTRY_DB_FILE_NAME)
        })
        .clone()
}

fn with_task_service<T>(f: impl FnOnce(&mut SqliteTaskService<'_>) -> T) -> Result<T, String> {
    let db_path = resolve_entry_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("task DB open failed: {err}"))?;
    let persistence = KeyValuePersistence::new(SqliteKeyValueStore::new(&conn));
    let mut service = TaskService::open(persistence);
    Ok(f(&mut service))
}

/// Runs one mutation and attaches the load failure, if the session had one.
///
/// `StorageUnreadable` responses already carry it in their message.
fn with_task_action(
    f: impl FnOnce(&mut SqliteTaskService<'_>) -> TaskActionResponse,
) -> TaskActionResponse {
    with_task_service(|service| {
        let mut response = f(service);
        if let Some(notice) = load_failure_notice(service) {
            if !response.needs_reset {
                response.message = format!("{} {notice}", response.message);
            }
            response.needs_reset = service.needs_reset();
        }
        response
    })
    .unwrap_or_else(TaskActionResponse::failure)
}

fn load_failure_notice(service: &SqliteTaskService<'_>) -> Option<String> {
    let err = service.load_error()?;
    Some(if service.needs_reset() {
        format!("Stored tasks could not be loaded: {err}. Reset storage to make changes.")
    } else {
        format!("Stored tasks could not be loaded: {err}.")
    })
}

fn to_task_item(task: &Task, reference: NaiveDate) -> TaskItem {
    TaskItem {
        id: task.id.to_string(),
        text: task.text.clone(),
        due_date: task.due_date_iso(),
        priority: task.priority.to_string(),
        completed: task.completed,
        overdue: is_overdue(task, reference),
        created_at_ms: task.created_at,
    }
}

fn to_counters(stats: TaskStats) -> TaskCounters {
    let clamp = |value: usize| u32::try_from(value).unwrap_or(u32::MAX);
    TaskCounters {
        total: clamp(stats.total),
        completed: clamp(stats.completed),
        active: clamp(stats.active),
        overdue: clamp(stats.overdue),
    }
}
