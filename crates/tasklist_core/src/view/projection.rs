//! Filtered lists and counters derived from a task snapshot.
//!
//! `is_overdue` is the only place that compares dates; `filter` and `stats`
//! both go through it.

use crate::model::task::{Priority, Task};
use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// List filter selectable by the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FilterMode {
    #[default]
    All,
    /// Not completed yet. Also accepted as `pending`.
    Active,
    Completed,
    /// Not completed and due before the reference date.
    Overdue,
    HighPriority,
}

impl FilterMode {
    pub const ALL: [FilterMode; 5] = [
        Self::All,
        Self::Active,
        Self::Completed,
        Self::Overdue,
        Self::HighPriority,
    ];

    /// Stable token used by UIs (`data-filter` values).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Overdue => "overdue",
            Self::HighPriority => "high-priority",
        }
    }

    /// Returns whether `task` belongs in this view.
    pub fn matches(self, task: &Task, reference_date: NaiveDate) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.completed,
            Self::Completed => task.completed,
            Self::Overdue => is_overdue(task, reference_date),
            Self::HighPriority => task.priority == Priority::High,
        }
    }
}

impl Display for FilterMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown filter token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterParseError(pub String);

impl Display for FilterParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown filter `{}`; expected all|active|pending|completed|overdue|high-priority",
            self.0
        )
    }
}

impl Error for FilterParseError {}

impl FromStr for FilterMode {
    type Err = FilterParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" | "pending" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "overdue" => Ok(Self::Overdue),
            "high-priority" | "high_priority" | "high" => Ok(Self::HighPriority),
            other => Err(FilterParseError(other.to_string())),
        }
    }
}

/// Aggregate counters shown next to the list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    /// Always `total - completed`.
    pub active: usize,
    pub overdue: usize,
}

/// Returns `true` when `task` is still open and its due date is strictly
/// before `reference_date`.
pub fn is_overdue(task: &Task, reference_date: NaiveDate) -> bool {
    !task.completed && task.due_date < reference_date
}

/// Returns the tasks visible under `mode`, in their original order.
pub fn filter(tasks: &[Task], mode: FilterMode, reference_date: NaiveDate) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|task| mode.matches(task, reference_date))
        .collect()
}

/// Computes the four list counters.
pub fn stats(tasks: &[Task], reference_date: NaiveDate) -> TaskStats {
    let total = tasks.len();
    let completed = tasks.iter().filter(|task| task.completed).count();
    TaskStats {
        total,
        completed,
        active: total - completed,
        overdue: filter(tasks, FilterMode::Overdue, reference_date).len(),
    }
}
