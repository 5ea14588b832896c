use chrono::NaiveDate;
use tasklist_core::{
    filter, is_overdue, stats, FilterMode, NewTask, Priority, Task, TaskStats,
};

fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("valid test date")
}

fn task(text: &str, due: &str, priority: Priority, completed: bool) -> Task {
    let mut task = Task::new(NewTask::parse(text, due, Some(priority)).expect("valid sample task"));
    task.completed = completed;
    task
}

fn sample() -> Vec<Task> {
    vec![
        task("late open", "2024-12-31", Priority::Low, false),
        task("late done", "2024-12-01", Priority::High, true),
        task("due today", "2025-01-01", Priority::High, false),
        task("future done", "2025-06-01", Priority::Medium, true),
        task("future open", "2025-06-02", Priority::Medium, false),
    ]
}

fn texts(tasks: Vec<&Task>) -> Vec<&str> {
    tasks.into_iter().map(|task| task.text.as_str()).collect()
}

#[test]
fn all_filter_is_identity() {
    let tasks = sample();
    let visible = filter(&tasks, FilterMode::All, date("2025-01-01"));
    assert_eq!(visible.len(), tasks.len());
    assert!(visible.iter().zip(&tasks).all(|(a, b)| std::ptr::eq(*a, b)));
}

#[test]
fn each_filter_selects_expected_tasks_in_order() {
    let tasks = sample();
    let today = date("2025-01-01");

    assert_eq!(
        texts(filter(&tasks, FilterMode::Active, today)),
        vec!["late open", "due today", "future open"]
    );
    assert_eq!(
        texts(filter(&tasks, FilterMode::Completed, today)),
        vec!["late done", "future done"]
    );
    assert_eq!(
        texts(filter(&tasks, FilterMode::Overdue, today)),
        vec!["late open"]
    );
    assert_eq!(
        texts(filter(&tasks, FilterMode::HighPriority, today)),
        vec!["late done", "due today"]
    );
}

#[test]
fn task_due_on_reference_date_is_not_overdue() {
    let due_today = task("due today", "2025-01-01", Priority::Medium, false);
    assert!(!is_overdue(&due_today, date("2025-01-01")));
    assert!(is_overdue(&due_today, date("2025-01-02")));
}

#[test]
fn completed_task_is_never_overdue() {
    let done = task("done", "1999-01-01", Priority::Medium, true);
    assert!(!is_overdue(&done, date("2025-01-01")));
}

#[test]
fn overdue_compares_dates_not_strings() {
    // "2025-10-01" < "2025-9-30" as strings; canonical dates avoid that trap.
    let october = task("october", "2025-10-01", Priority::Medium, false);
    assert!(!is_overdue(&october, date("2025-09-30")));
}

#[test]
fn stats_counts_are_consistent() {
    let tasks = sample();
    assert_eq!(
        stats(&tasks, date("2025-01-01")),
        TaskStats {
            total: 5,
            completed: 2,
            active: 3,
            overdue: 1,
        }
    );
    assert_eq!(stats(&[], date("2025-01-01")), TaskStats::default());
}

#[test]
fn filtering_does_not_mutate_input() {
    let tasks = sample();
    let before = tasks.clone();
    for mode in FilterMode::ALL {
        let _ = filter(&tasks, mode, date("2025-01-01"));
    }
    assert_eq!(tasks, before);
}
