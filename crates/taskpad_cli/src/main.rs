//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `taskpad_core` linkage.
//! - Run one add/status/delete cycle against an in-memory store.
//! - Keep output deterministic apart from generated ids.

use chrono::Utc;
use std::process::ExitCode;
use taskpad_core::{
    MemoryKeyValueRepository, StoreOptions, TaskDraft, TaskListQuery, TaskStatus, TaskStore,
};

fn main() -> ExitCode {
    println!("taskpad_core ping={}", taskpad_core::ping());
    println!("taskpad_core version={}", taskpad_core::core_version());

    match run_store_smoke() {
        Ok(summary) => {
            println!("taskpad_core store_smoke=ok {summary}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("taskpad_core store_smoke=error {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_store_smoke() -> Result<String, taskpad_core::StoreError> {
    let repo = MemoryKeyValueRepository::new();
    let mut store = TaskStore::initialize(&repo, StoreOptions::default());

    let task = store.add_task(TaskDraft::new("smoke", Utc::now()))?;
    store.update_task_status(&task.id, TaskStatus::Completed)?;
    let completed = store
        .list_tasks(&TaskListQuery {
            status: Some(TaskStatus::Completed),
            ..TaskListQuery::default()
        })
        .len();
    store.delete_task(&task.id)?;

    let summary = format!(
        "completed_seen={} remaining={} revision={}",
        completed,
        store.len(),
        store.revision()
    );
    store.shutdown();
    Ok(summary)
}
