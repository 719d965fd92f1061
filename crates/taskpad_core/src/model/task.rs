//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record persisted in the local blob.
//! - Provide status labels shared by storage, sorting and the FFI layer.
//!
//! # Invariants
//! - `id` is never empty and never reassigned once a task exists.
//! - `title` is non-empty after trimming whitespace.
//! - Any status may follow any other status; no transition is rejected.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque task identifier.
///
/// Fresh ids are UUID v4 strings, but any non-empty text read back from
/// storage is accepted so older blobs keep their identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Generates a new random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Task lifecycle state.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Created but not started.
    #[default]
    Pending,
    /// Work is in progress.
    InProgress,
    /// Completed successfully.
    Completed,
    /// No longer actionable.
    Cancelled,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
        TaskStatus::Cancelled,
    ];

    /// Wire label used in storage and across FFI.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a wire label. Surrounding whitespace and case are ignored.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Human-readable label for list and detail screens.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl Display for TaskStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation failures for task records and drafts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    EmptyId,
    EmptyTitle,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "task id cannot be empty"),
            Self::EmptyTitle => write!(f, "title is required"),
        }
    }
}

impl Error for TaskValidationError {}

/// Add-form payload. Identity, status and creation time are assigned by the
/// store, not the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub location: String,
    pub execution_date: DateTime<Utc>,
}

impl TaskDraft {
    /// Creates a draft with empty description and location.
    pub fn new(title: impl Into<String>, execution_date: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            location: String::new(),
            execution_date,
        }
    }

    pub fn validate(&self) -> Result<(), TaskValidationError> {
        validate_title(&self.title)
    }
}

/// Canonical task record.
///
/// Field names are serialized in camelCase to stay compatible with blobs
/// written by earlier app builds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    pub execution_date: DateTime<Utc>,
    #[serde(default)]
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Materializes a draft into a pending task.
    ///
    /// # Invariants
    /// - `status` starts as `TaskStatus::Pending`.
    /// - This constructor does not validate the draft.
    pub fn from_draft(id: TaskId, draft: TaskDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            location: draft.location,
            execution_date: draft.execution_date,
            status: TaskStatus::Pending,
            created_at,
        }
    }

    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.id.is_empty() {
            return Err(TaskValidationError::EmptyId);
        }
        validate_title(&self.title)
    }
}

fn validate_title(title: &str) -> Result<(), TaskValidationError> {
    if title.trim().is_empty() {
        return Err(TaskValidationError::EmptyTitle);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{TaskDraft, TaskId, TaskStatus, TaskValidationError};
    use chrono::Utc;

    #[test]
    fn status_labels_roundtrip_through_parse() {
        for status in TaskStatus::ALL {
            assert_eq!(TaskStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(TaskStatus::parse(" In_Progress "), Some(TaskStatus::InProgress));
        assert_eq!(TaskStatus::parse("done"), None);
    }

    #[test]
    fn generated_ids_are_distinct() {
        let first = TaskId::generate();
        let second = TaskId::generate();
        assert!(!first.is_empty());
        assert_ne!(first, second);
    }

    #[test]
    fn draft_rejects_whitespace_title() {
        let draft = TaskDraft::new("   ", Utc::now());
        assert_eq!(draft.validate(), Err(TaskValidationError::EmptyTitle));
    }
}
