//! Task store use-case service.
//!
//! # Responsibility
//! - Own the authoritative in-memory task collection.
//! - Apply add/status/edit/delete mutations and write the full collection
//!   back as one blob after each of them.
//! - Restore the collection from the blob at startup.
//!
//! # Invariants
//! - Only this type mutates the collection; readers get shared slices or
//!   copies.
//! - Every mutation, including a lookup miss, issues one full blob write.
//! - A lookup miss is never an error and never changes the collection.
//! - `revision` increases by exactly one per actual collection change.
//! - Loading never fails: unreadable or corrupt blobs become an empty
//!   collection.

use crate::config::{PersistMode, StoreOptions};
use crate::model::task::{Task, TaskDraft, TaskId, TaskStatus, TaskValidationError};
use crate::repo::kv_repo::{KeyValueRepository, RepoError};
use crate::service::task_blob::{decode_tasks, encode_tasks, BlobError};
use crate::service::task_view::{query_tasks, TaskListQuery};
use chrono::Utc;
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type StoreResult<T> = Result<T, StoreError>;

/// Store operation failure.
#[derive(Debug)]
pub enum StoreError {
    /// Input rejected before any state change.
    Validation(TaskValidationError),
    /// Collection could not be encoded for persistence.
    Encode(BlobError),
    /// Storage backend rejected the blob write.
    Repo(RepoError),
}

impl StoreError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_failed",
            Self::Encode(_) => "blob_encode_failed",
            Self::Repo(_) => "storage_write_failed",
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode tasks: {err}"),
            Self::Repo(err) => write!(f, "failed to persist tasks: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<TaskValidationError> for StoreError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<BlobError> for StoreError {
    fn from(value: BlobError) -> Self {
        Self::Encode(value)
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// In-memory task collection backed by a key-value blob.
pub struct TaskStore<R: KeyValueRepository> {
    repo: R,
    options: StoreOptions,
    tasks: Vec<Task>,
    revision: u64,
}

impl<R: KeyValueRepository> TaskStore<R> {
    /// Loads the persisted blob and returns a ready store.
    ///
    /// # Side effects
    /// - Reads one key from `repo`.
    /// - Emits `store_init` events; failures are logged at error level and
    ///   the store starts empty.
    pub fn initialize(repo: R, options: StoreOptions) -> Self {
        let started_at = Instant::now();

        let (tasks, source) = match repo.get_item(&options.storage_key) {
            Ok(None) => (Vec::new(), "empty"),
            Ok(Some(blob)) => match decode_tasks(&blob) {
                Ok(tasks) => (tasks, "blob"),
                Err(err) => {
                    error!(
                        "event=store_init module=store status=error error_code=blob_corrupt blob_bytes={} error={}",
                        blob.len(),
                        err
                    );
                    (Vec::new(), "fallback")
                }
            },
            Err(err) => {
                error!(
                    "event=store_init module=store status=error error_code=storage_read_failed error={}",
                    err
                );
                (Vec::new(), "fallback")
            }
        };

        info!(
            "event=store_init module=store status=ok source={} task_count={} persist_mode={} duration_ms={}",
            source,
            tasks.len(),
            options.persist_mode.as_str(),
            started_at.elapsed().as_millis()
        );

        Self {
            repo,
            options,
            tasks,
            revision: 0,
        }
    }

    /// Current collection in storage order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get_task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| &task.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Number of collection changes since `initialize`.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// Filtered, sorted copy of the collection.
    pub fn list_tasks(&self, query: &TaskListQuery) -> Vec<Task> {
        query_tasks(&self.tasks, query)
    }

    /// Creates a pending task from a validated draft.
    ///
    /// # Errors
    /// - `Validation` when the title is blank; nothing is written.
    /// - `Encode`/`Repo` only in `WriteThrough` mode.
    pub fn add_task(&mut self, draft: TaskDraft) -> StoreResult<Task> {
        reject_invalid("add_task", draft.validate())?;

        let task = Task::from_draft(TaskId::generate(), draft, Utc::now());
        let mut next = self.tasks.clone();
        next.push(task.clone());
        self.commit("add_task", next, true)?;
        Ok(task)
    }

    /// Sets one task's status. Returns whether a task matched `id`.
    pub fn update_task_status(&mut self, id: &TaskId, status: TaskStatus) -> StoreResult<bool> {
        let mut next = self.tasks.clone();
        let matched = match next.iter_mut().find(|task| &task.id == id) {
            Some(task) => {
                task.status = status;
                true
            }
            None => false,
        };
        self.commit("update_task_status", next, matched)?;
        Ok(matched)
    }

    /// Replaces the whole record with the same id. Fields the caller does
    /// not carry forward (`created_at`, `status`) are overwritten as given.
    /// Returns whether a task matched.
    ///
    /// # Errors
    /// - `Validation` when the id matched and the title is blank; nothing
    ///   is written. An unknown id is a lookup miss and skips validation.
    /// - `Encode`/`Repo` only in `WriteThrough` mode.
    pub fn update_task(&mut self, task: Task) -> StoreResult<bool> {
        let mut next = self.tasks.clone();
        let Some(index) = next.iter().position(|existing| existing.id == task.id) else {
            self.commit("update_task", next, false)?;
            return Ok(false);
        };

        reject_invalid("update_task", task.validate())?;
        next[index] = task;
        self.commit("update_task", next, true)?;
        Ok(true)
    }

    /// Removes the task with `id`. Returns whether a task matched.
    pub fn delete_task(&mut self, id: &TaskId) -> StoreResult<bool> {
        let next = self
            .tasks
            .iter()
            .filter(|task| &task.id != id)
            .cloned()
            .collect::<Vec<_>>();
        let matched = next.len() != self.tasks.len();
        self.commit("delete_task", next, matched)?;
        Ok(matched)
    }

    /// Ends the store lifecycle and returns the storage backend.
    pub fn shutdown(self) -> R {
        info!(
            "event=store_shutdown module=store status=ok task_count={} revision={}",
            self.tasks.len(),
            self.revision
        );
        self.repo
    }

    fn commit(
        &mut self,
        operation: &'static str,
        next: Vec<Task>,
        matched: bool,
    ) -> StoreResult<()> {
        let started_at = Instant::now();

        let written = match self.options.persist_mode {
            PersistMode::BestEffort => {
                self.apply(next);
                self.write_blob(&self.tasks)
            }
            PersistMode::WriteThrough => match self.write_blob(&next) {
                Ok(()) => {
                    self.apply(next);
                    Ok(())
                }
                Err(err) => Err(err),
            },
        };

        match written {
            Ok(()) => {
                debug!(
                    "event={} module=store status=ok matched={} task_count={} revision={} duration_ms={}",
                    operation,
                    matched,
                    self.tasks.len(),
                    self.revision,
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event={} module=store status=error error_code={} persist_mode={} matched={} duration_ms={} error={}",
                    operation,
                    err.error_code(),
                    self.options.persist_mode.as_str(),
                    matched,
                    started_at.elapsed().as_millis(),
                    err
                );
                match self.options.persist_mode {
                    PersistMode::BestEffort => Ok(()),
                    PersistMode::WriteThrough => Err(err),
                }
            }
        }
    }

    fn apply(&mut self, next: Vec<Task>) {
        if next != self.tasks {
            self.tasks = next;
            self.revision += 1;
        }
    }

    fn write_blob(&self, tasks: &[Task]) -> StoreResult<()> {
        let blob = encode_tasks(tasks)?;
        self.repo.set_item(&self.options.storage_key, &blob)?;
        Ok(())
    }
}

fn reject_invalid(
    operation: &'static str,
    result: Result<(), TaskValidationError>,
) -> StoreResult<()> {
    result.map_err(|err| {
        warn!(
            "event={} module=store status=rejected error_code=validation_failed error={}",
            operation, err
        );
        StoreError::Validation(err)
    })
}
