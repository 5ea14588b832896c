//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `tasklist_core` linkage with deterministic output.
//! - Optionally summarize a stored task list: `tasklist_cli [DB_PATH]`.

use chrono::Local;
use std::process::ExitCode;
use tasklist_core::db::open_db;
use tasklist_core::{is_overdue, KeyValuePersistence, SqliteKeyValueStore, TaskService};

fn main() -> ExitCode {
    println!("tasklist_core ping={}", tasklist_core::ping());
    println!("tasklist_core version={}", tasklist_core::core_version());

    let Some(db_path) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };

    let conn = match open_db(&db_path) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("failed to open `{db_path}`: {err}");
            return ExitCode::FAILURE;
        }
    };
    let service = TaskService::open(KeyValuePersistence::new(SqliteKeyValueStore::new(&conn)));
    if let Some(err) = service.load_error() {
        eprintln!("stored tasks could not be loaded: {err}");
        return ExitCode::FAILURE;
    }

    let today = Local::now().date_naive();
    let board = service.board(today);
    for task in &board.items {
        let mark = if task.completed { "x" } else { " " };
        let late = if is_overdue(task, today) { " (overdue)" } else { "" };
        println!(
            "[{mark}] {} due={} priority={}{late} id={}",
            task.text,
            task.due_date_iso(),
            task.priority,
            task.id
        );
    }
    println!(
        "total={} completed={} active={} overdue={}",
        board.stats.total, board.stats.completed, board.stats.active, board.stats.overdue
    );
    ExitCode::SUCCESS
}
