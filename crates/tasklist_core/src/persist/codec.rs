//! JSON codec for the stored task list.
//!
//! The stored value is a JSON array of camelCase task objects, e.g.
//! `[{"id":"…","text":"Buy milk","dueDate":"2099-01-01","priority":"medium",
//! "completed":false,"createdAt":1700000000000}]`.
//!
//! Records written by the browser version may lack `id`, `priority` or
//! `createdAt` and may name the text `description`. Missing ids are filled
//! in and counted, so the caller can save the list back before handing any
//! of those ids out.

use super::{LoadedTasks, PersistError, PersistResult};
use crate::model::task::{new_task_id, Priority, Task, TaskId};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashSet;

/// Stored shape, more lenient than `Task` itself.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredTask {
    id: Option<TaskId>,
    #[serde(alias = "description")]
    text: String,
    due_date: NaiveDate,
    #[serde(default)]
    priority: Priority,
    #[serde(default)]
    completed: bool,
    #[serde(default)]
    created_at: i64,
}

/// Serializes the full task list.
pub fn encode_tasks(tasks: &[Task]) -> PersistResult<String> {
    serde_json::to_string(tasks).map_err(PersistError::Encode)
}

/// Deserializes and validates a stored task list.
///
/// # Errors
/// - `Decode` when `raw` is not a JSON array of task objects.
/// - `InvalidRecord` when a record fails `Task::validate`.
/// - `DuplicateId` when two records share an id.
pub fn decode_tasks(raw: &str) -> PersistResult<LoadedTasks> {
    let stored: Vec<StoredTask> = serde_json::from_str(raw).map_err(PersistError::Decode)?;

    let mut seen = HashSet::with_capacity(stored.len());
    for id in stored.iter().filter_map(|record| record.id) {
        if !seen.insert(id) {
            return Err(PersistError::DuplicateId(id));
        }
    }

    let mut backfilled_ids = 0;
    let mut tasks = Vec::with_capacity(stored.len());
    for (index, record) in stored.into_iter().enumerate() {
        let id = match record.id {
            Some(id) => id,
            None => {
                backfilled_ids += 1;
                let mut fresh = new_task_id();
                while !seen.insert(fresh) {
                    fresh = new_task_id();
                }
                fresh
            }
        };
        let task = Task {
            id,
            text: record.text,
            due_date: record.due_date,
            priority: record.priority,
            completed: record.completed,
            created_at: record.created_at,
        };
        task.validate()
            .map_err(|source| PersistError::InvalidRecord { index, source })?;
        tasks.push(task);
    }

    Ok(LoadedTasks {
        tasks,
        backfilled_ids,
    })
}

#[cfg(test)]
mod tests {
    use super::{decode_tasks, encode_tasks};
    use crate::model::task::Priority;
    use crate::persist::PersistError;

    #[test]
    fn decode_accepts_records_from_the_browser_shape() {
        let raw = r#"[{"description":"Buy milk","dueDate":"2025-03-01","completed":true}]"#;
        let loaded = decode_tasks(raw).expect("browser record should decode");

        assert_eq!(loaded.tasks.len(), 1);
        assert_eq!(loaded.backfilled_ids, 1);
        assert!(loaded.needs_resave());
        let task = &loaded.tasks[0];
        assert_eq!(task.text, "Buy milk");
        assert_eq!(task.priority, Priority::Medium);
        assert!(task.completed);
        assert!(!task.id.is_nil());
    }

    #[test]
    fn decode_of_reencoded_list_keeps_backfilled_ids() {
        let raw = r#"[{"description":"a","dueDate":"2025-03-01"},{"text":"b","dueDate":"2025-03-02"}]"#;
        let first = decode_tasks(raw).expect("legacy list should decode");
        assert_eq!(first.backfilled_ids, 2);

        let reencoded = encode_tasks(&first.tasks).expect("tasks should encode");
        let second = decode_tasks(&reencoded).expect("re-encoded list should decode");
        assert_eq!(second.backfilled_ids, 0);
        assert_eq!(second.tasks, first.tasks);
    }

    #[test]
    fn decode_rejects_non_array_payload() {
        let err = decode_tasks(r#"{"tasks":[]}"#).expect_err("object payload must fail");
        assert!(matches!(err, PersistError::Decode(_)));
    }

    #[test]
    fn decode_rejects_blank_text() {
        let raw = r#"[{"text":"  ","dueDate":"2025-03-01"}]"#;
        let err = decode_tasks(raw).expect_err("blank text must fail");
        assert!(matches!(err, PersistError::InvalidRecord { index: 0, .. }));
    }

    #[test]
    fn decode_rejects_duplicate_ids() {
        let id = "0190c0de-0000-7000-8000-000000000001";
        let raw = format!(
            r#"[{{"id":"{id}","text":"a","dueDate":"2025-03-01"}},{{"id":"{id}","text":"b","dueDate":"2025-03-02"}}]"#
        );
        let err = decode_tasks(&raw).expect_err("repeated id must fail");
        assert!(matches!(err, PersistError::DuplicateId(_)));
    }

    #[test]
    fn empty_list_encodes_as_empty_array() {
        assert_eq!(encode_tasks(&[]).expect("empty list should encode"), "[]");
    }
}
