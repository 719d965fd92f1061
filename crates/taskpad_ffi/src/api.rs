//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose task store operations to Dart via FRB as sync calls.
//! - Translate typed core results into string-typed envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Each call runs one full read-modify-write cycle over the on-disk blob,
//!   serialized by a process-wide lock.
//! - Dates cross the boundary as RFC 3339 strings; statuses as wire labels.

use chrono::{DateTime, Utc};
use log::warn;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use taskpad_core::db::open_db;
use taskpad_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    PersistMode, SortMode, SqliteKeyValueRepository, StoreOptions, Task, TaskDraft, TaskId,
    TaskListQuery, TaskStatus, TaskStore,
};

const STORE_DB_FILE_NAME: &str = "taskpad.sqlite3";
const STORE_DB_PATH_ENV: &str = "TASKPAD_DB_PATH";
static STORE_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static STORE_LOCK: Mutex<()> = Mutex::new(());

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
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
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
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// String-typed task projection for Dart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub location: String,
    /// RFC 3339 UTC timestamp.
    pub execution_date: String,
    /// Wire label (`pending|in_progress|completed|cancelled`).
    pub status: String,
    /// Human label for the status chip.
    pub status_label: String,
    /// RFC 3339 UTC timestamp.
    pub created_at: String,
}

/// Envelope for list screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListResponse {
    pub items: Vec<TaskItem>,
    pub message: String,
    /// Effective sort label (`date|status`).
    pub applied_sort: String,
}

/// Envelope for single-task actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskActionResponse {
    /// Whether the operation succeeded. A lookup miss still counts as success.
    pub ok: bool,
    /// Affected task after the operation, when one exists.
    pub task: Option<TaskItem>,
    pub message: String,
}

impl TaskActionResponse {
    fn success(message: impl Into<String>, task: Option<&Task>) -> Self {
        Self {
            ok: true,
            task: task.map(to_task_item),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            task: None,
            message: message.into(),
        }
    }
}

/// Lists tasks for the list screen.
///
/// Input semantics:
/// - `sort`: `date` (newest first) or `status`; unknown values fall back to
///   `date`.
/// - `status`: optional wire label filter; an unknown label is an error.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_list(sort: String, status: Option<String>) -> TaskListResponse {
    let sort = SortMode::parse(&sort).unwrap_or_default();
    let status = match status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(label) => match TaskStatus::parse(label) {
            Some(status) => Some(status),
            None => {
                return TaskListResponse {
                    items: Vec::new(),
                    message: format!("tasks_list failed: unknown status `{label}`"),
                    applied_sort: sort.as_str().to_string(),
                };
            }
        },
        None => None,
    };

    let query = TaskListQuery { sort, status };
    match with_task_store(|store| Ok(store.list_tasks(&query))) {
        Ok(tasks) => {
            let message = if tasks.is_empty() {
                "No tasks.".to_string()
            } else {
                format!("Found {} task(s).", tasks.len())
            };
            TaskListResponse {
                items: tasks.iter().map(to_task_item).collect(),
                message,
                applied_sort: sort.as_str().to_string(),
            }
        }
        Err(err) => TaskListResponse {
            items: Vec::new(),
            message: format!("tasks_list failed: {err}"),
            applied_sort: sort.as_str().to_string(),
        },
    }
}

/// Loads one task for the detail screen.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; a missing task returns `ok=false`.
#[flutter_rust_bridge::frb(sync)]
pub fn task_get(id: String) -> TaskActionResponse {
    let id = TaskId::from(id.trim());
    match with_task_store(|store| Ok(store.get_task(&id).cloned())) {
        Ok(Some(task)) => TaskActionResponse::success("Task loaded.", Some(&task)),
        Ok(None) => TaskActionResponse::failure(format!("task_get failed: task not found: {id}")),
        Err(err) => TaskActionResponse::failure(format!("task_get failed: {err}")),
    }
}

/// Creates a task from the add form.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - `title` is trimmed and must not be empty.
/// - `execution_date` must be RFC 3339.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn task_add(
    title: String,
    description: String,
    location: String,
    execution_date: String,
) -> TaskActionResponse {
    let execution_date = match parse_timestamp("execution_date", &execution_date) {
        Ok(value) => value,
        Err(err) => return TaskActionResponse::failure(format!("task_add failed: {err}")),
    };
    let draft = TaskDraft {
        title: title.trim().to_string(),
        description,
        location,
        execution_date,
    };

    match with_task_store(|store| store.add_task(draft).map_err(|err| err.to_string())) {
        Ok(task) => TaskActionResponse::success("Task created.", Some(&task)),
        Err(err) => TaskActionResponse::failure(format!("task_add failed: {err}")),
    }
}

/// Moves a task to another status.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Unknown status labels are rejected; unknown ids are a no-op.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn task_update_status(id: String, status: String) -> TaskActionResponse {
    let Some(next_status) = TaskStatus::parse(&status) else {
        return TaskActionResponse::failure(format!(
            "task_update_status failed: unknown status `{}`",
            status.trim()
        ));
    };
    let id = TaskId::from(id.trim());

    let result = with_task_store(|store| {
        let matched = store
            .update_task_status(&id, next_status)
            .map_err(|err| err.to_string())?;
        Ok(if matched { store.get_task(&id).cloned() } else { None })
    });
    match result {
        Ok(Some(task)) => TaskActionResponse::success("Task status updated.", Some(&task)),
        Ok(None) => not_found_noop(&id),
        Err(err) => TaskActionResponse::failure(format!("task_update_status failed: {err}")),
    }
}

/// Saves the edit form as a full replacement of the stored record.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - `item` must carry every field forward, including `created_at`.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn task_update(item: TaskItem) -> TaskActionResponse {
    let task = match from_task_item(item) {
        Ok(task) => task,
        Err(err) => return TaskActionResponse::failure(format!("task_update failed: {err}")),
    };
    let id = task.id.clone();

    let result = with_task_store(|store| {
        let matched = store.update_task(task).map_err(|err| err.to_string())?;
        Ok(if matched { store.get_task(&id).cloned() } else { None })
    });
    match result {
        Ok(Some(task)) => TaskActionResponse::success("Task updated.", Some(&task)),
        Ok(None) => not_found_noop(&id),
        Err(err) => TaskActionResponse::failure(format!("task_update failed: {err}")),
    }
}

/// Deletes a task.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Unknown ids are a no-op.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn task_delete(id: String) -> TaskActionResponse {
    let id = TaskId::from(id.trim());
    match with_task_store(|store| store.delete_task(&id).map_err(|err| err.to_string())) {
        Ok(true) => TaskActionResponse::success("Task deleted.", None),
        Ok(false) => not_found_noop(&id),
        Err(err) => TaskActionResponse::failure(format!("task_delete failed: {err}")),
    }
}

fn not_found_noop(id: &TaskId) -> TaskActionResponse {
    TaskActionResponse::success(format!("Task {id} not found; nothing changed."), None)
}

fn resolve_store_db_path() -> PathBuf {
    STORE_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(STORE_DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(STORE_DB_FILE_NAME)
        })
        .clone()
}

fn with_task_store<T>(
    f: impl FnOnce(&mut TaskStore<SqliteKeyValueRepository<'_>>) -> Result<T, String>,
) -> Result<T, String> {
    // A poisoned lock only means an earlier call panicked mid-cycle; the blob
    // on disk is still the last committed state.
    let _guard = STORE_LOCK.lock().unwrap_or_else(|poisoned| {
        warn!("event=store_lock module=ffi status=recovered reason=poisoned");
        poisoned.into_inner()
    });

    let db_path = resolve_store_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("task DB open failed: {err}"))?;
    let repo = SqliteKeyValueRepository::try_new(&conn)
        .map_err(|err| format!("task repo init failed: {err}"))?;
    // Per-call stores have no memory that outlives the call, so a failed
    // write must surface instead of being absorbed.
    let options = StoreOptions::default().with_persist_mode(PersistMode::WriteThrough);
    let mut store = TaskStore::initialize(repo, options);
    let result = f(&mut store);
    store.shutdown();
    result
}

fn parse_timestamp(field: &str, value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|err| format!("{field} must be RFC 3339, got `{}`: {err}", value.trim()))
}

fn to_task_item(task: &Task) -> TaskItem {
    TaskItem {
        id: task.id.to_string(),
        title: task.title.clone(),
        description: task.description.clone(),
        location: task.location.clone(),
        execution_date: task.execution_date.to_rfc3339(),
        status: task.status.as_str().to_string(),
        status_label: task.status.display_name().to_string(),
        created_at: task.created_at.to_rfc3339(),
    }
}

fn from_task_item(item: TaskItem) -> Result<Task, String> {
    let status = TaskStatus::parse(&item.status)
        .ok_or_else(|| format!("unknown status `{}`", item.status.trim()))?;
    Ok(Task {
        id: TaskId::from(item.id.trim()),
        title: item.title.trim().to_string(),
        description: item.description,
        location: item.location,
        execution_date: parse_timestamp("execution_date", &item.execution_date)?,
        status,
        created_at: parse_timestamp("created_at", &item.created_at)?,
    })
}
