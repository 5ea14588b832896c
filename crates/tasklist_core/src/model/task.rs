//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record shared by store, views and persistence.
//! - Validate user input before a `Task` value is constructed.
//!
//! # Invariants
//! - `id` is stable and never reused for another task in the same store.
//! - `text` is trimmed and non-empty.
//! - `due_date` is a calendar date; comparisons never go through display strings.
//! - `completed` starts as `false` and only changes through `toggle_completed`.

use chrono::{NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Canonical textual form accepted for due dates (`YYYY-MM-DD`).
pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

static ISO_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid iso date regex"));

/// Stable identifier for a task.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type TaskId = Uuid;

/// Generates a fresh task id.
///
/// UUID v7 combines a millisecond timestamp with random bits, so ids created
/// within the same millisecond still differ.
pub fn new_task_id() -> TaskId {
    Uuid::now_v7()
}

/// Task importance level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Returns the stable lowercase token used on the wire and in UIs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = TaskValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(TaskValidationError::InvalidPriority(other.to_string())),
        }
    }
}

/// Validation errors for task input and persisted task records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Required input fields were empty. Each flag is `true` when that field
    /// is missing, so callers can show feedback for every field at once.
    MissingFields { text: bool, due_date: bool },
    /// Due date is present but not a real `YYYY-MM-DD` calendar date.
    InvalidDueDate(String),
    /// Priority token is not one of `low|medium|high`.
    InvalidPriority(String),
    /// Persisted record carries a nil id.
    NilId,
    /// Persisted record carries an empty description.
    EmptyText,
}

impl TaskValidationError {
    /// Returns whether the description field needs user correction.
    pub fn text_missing(&self) -> bool {
        matches!(self, Self::MissingFields { text: true, .. } | Self::EmptyText)
    }

    /// Returns whether the due date field needs user correction.
    pub fn due_date_invalid(&self) -> bool {
        matches!(
            self,
            Self::MissingFields { due_date: true, .. } | Self::InvalidDueDate(_)
        )
    }
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingFields { text, due_date } => match (text, due_date) {
                (true, true) => write!(f, "task text and due date are required"),
                (true, false) => write!(f, "task text is required"),
                (false, true) => write!(f, "due date is required"),
                (false, false) => write!(f, "required task fields are missing"),
            },
            Self::InvalidDueDate(value) => {
                write!(f, "invalid due date `{value}`; expected YYYY-MM-DD")
            }
            Self::InvalidPriority(value) => {
                write!(f, "invalid priority `{value}`; expected low|medium|high")
            }
            Self::NilId => write!(f, "task id must not be nil"),
            Self::EmptyText => write!(f, "task text must not be empty"),
        }
    }
}

impl Error for TaskValidationError {}

/// Canonical task record.
///
/// Decoding goes through `persist::codec`, which accepts older record shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    /// Serialized as `YYYY-MM-DD`.
    pub due_date: NaiveDate,
    pub priority: Priority,
    pub completed: bool,
    /// Unix epoch milliseconds. Record-keeping only.
    pub created_at: i64,
}

/// Validated input for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub text: String,
    pub due_date: NaiveDate,
    pub priority: Priority,
}

impl NewTask {
    /// Validates raw form input.
    ///
    /// # Errors
    /// - `MissingFields` when `text` is blank or `due_date` is empty; both
    ///   fields are reported together.
    /// - `InvalidDueDate` when `due_date` is not a canonical calendar date.
    pub fn parse(
        text: &str,
        due_date: &str,
        priority: Option<Priority>,
    ) -> Result<Self, TaskValidationError> {
        let text = text.trim();
        let due_date = due_date.trim();
        if text.is_empty() || due_date.is_empty() {
            return Err(TaskValidationError::MissingFields {
                text: text.is_empty(),
                due_date: due_date.is_empty(),
            });
        }

        Ok(Self {
            text: text.to_string(),
            due_date: parse_due_date(due_date)?,
            priority: priority.unwrap_or_default(),
        })
    }
}

/// Parses a canonical `YYYY-MM-DD` date.
///
/// Localized shapes (`01/02/2025`) and non-padded shapes (`2025-1-2`) are
/// rejected so that every stored date has exactly one textual form.
pub fn parse_due_date(value: &str) -> Result<NaiveDate, TaskValidationError> {
    let trimmed = value.trim();
    if !ISO_DATE_RE.is_match(trimmed) {
        return Err(TaskValidationError::InvalidDueDate(trimmed.to_string()));
    }
    NaiveDate::parse_from_str(trimmed, DUE_DATE_FORMAT)
        .map_err(|_| TaskValidationError::InvalidDueDate(trimmed.to_string()))
}

impl Task {
    /// Creates a new active task with a generated stable ID.
    pub fn new(input: NewTask) -> Self {
        Self::with_id(new_task_id(), input)
    }

    /// Creates a new active task with a caller-provided ID.
    ///
    /// Used when the store needs to regenerate an id or by import paths.
    pub fn with_id(id: TaskId, input: NewTask) -> Self {
        Self {
            id,
            text: input.text,
            due_date: input.due_date,
            priority: input.priority,
            completed: false,
            created_at: Utc::now().timestamp_millis(),
        }
    }

    /// Flips completion state.
    pub fn toggle_completed(&mut self) {
        self.completed = !self.completed;
    }

    /// Returns `true` when the task has not been completed yet.
    pub fn is_active(&self) -> bool {
        !self.completed
    }

    /// Returns the due date in its canonical `YYYY-MM-DD` form.
    pub fn due_date_iso(&self) -> String {
        self.due_date.format(DUE_DATE_FORMAT).to_string()
    }

    /// Checks invariants of a record that did not come through `NewTask`.
    ///
    /// # Errors
    /// - `NilId` when `id` is nil.
    /// - `EmptyText` when `text` is blank.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.id.is_nil() {
            return Err(TaskValidationError::NilId);
        }
        if self.text.trim().is_empty() {
            return Err(TaskValidationError::EmptyText);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_due_date, NewTask, Priority, TaskValidationError};

    #[test]
    fn parse_due_date_accepts_canonical_form() {
        let date = parse_due_date(" 2025-01-31 ").expect("canonical date should parse");
        assert_eq!(date.to_string(), "2025-01-31");
    }

    #[test]
    fn parse_due_date_rejects_localized_and_impossible_dates() {
        for raw in ["01/31/2025", "2025-1-31", "2025-02-30", "tomorrow"] {
            let err = parse_due_date(raw).expect_err("non-canonical date must fail");
            assert!(matches!(err, TaskValidationError::InvalidDueDate(_)), "{raw}");
        }
    }

    #[test]
    fn new_task_reports_every_missing_field() {
        let err = NewTask::parse("  ", "", None).expect_err("blank input must fail");
        assert_eq!(
            err,
            TaskValidationError::MissingFields {
                text: true,
                due_date: true
            }
        );
        assert!(err.text_missing());
        assert!(err.due_date_invalid());
    }

    #[test]
    fn priority_parses_case_insensitively() {
        assert_eq!(
            "HIGH".parse::<Priority>().expect("uppercase token should parse"),
            Priority::High
        );
        assert!("urgent".parse::<Priority>().is_err());
    }
}
