//! Core domain logic for Taskpad.
//! This crate is the single source of truth for task invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{PersistMode, StoreOptions, DEFAULT_STORAGE_KEY};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::task::{Task, TaskDraft, TaskId, TaskStatus, TaskValidationError};
pub use repo::kv_repo::{
    KeyValueRepository, MemoryKeyValueRepository, RepoError, RepoResult, SqliteKeyValueRepository,
};
pub use service::task_blob::{decode_tasks, encode_tasks, BlobError};
pub use service::task_store::{StoreError, StoreResult, TaskStore};
pub use service::task_view::{query_tasks, sort_tasks, SortMode, TaskListQuery};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
