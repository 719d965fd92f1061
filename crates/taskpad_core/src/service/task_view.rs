//! Sorted and filtered task views for list screens.
//!
//! # Invariants
//! - Views are copies; the store collection is never reordered.
//! - Both sort modes are stable for equal keys.

use crate::model::task::{Task, TaskStatus};

/// Ordering applied to a task list view.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    /// Newest `created_at` first.
    #[default]
    CreatedAtDesc,
    /// Lexicographic on the status wire label.
    Status,
}

impl SortMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreatedAtDesc => "date",
            Self::Status => "status",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "date" => Some(Self::CreatedAtDesc),
            "status" => Some(Self::Status),
            _ => None,
        }
    }

    /// The other mode; backs the list screen's sort toggle.
    pub fn toggled(self) -> Self {
        match self {
            Self::CreatedAtDesc => Self::Status,
            Self::Status => Self::CreatedAtDesc,
        }
    }
}

/// Query options for listing tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskListQuery {
    pub sort: SortMode,
    /// Keep only tasks with this status.
    pub status: Option<TaskStatus>,
}

/// Sorts in place with a stable sort.
pub fn sort_tasks(tasks: &mut [Task], mode: SortMode) {
    match mode {
        SortMode::CreatedAtDesc => tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortMode::Status => tasks.sort_by(|a, b| a.status.as_str().cmp(b.status.as_str())),
    }
}

/// Builds a filtered, sorted copy of `tasks`.
pub fn query_tasks(tasks: &[Task], query: &TaskListQuery) -> Vec<Task> {
    let mut view = tasks
        .iter()
        .filter(|task| query.status.map_or(true, |status| task.status == status))
        .cloned()
        .collect::<Vec<_>>();
    sort_tasks(&mut view, query.sort);
    view
}
