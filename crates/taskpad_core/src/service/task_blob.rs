//! Task blob codec.
//!
//! # Responsibility
//! - Encode the full task collection into one JSON text blob.
//! - Decode a stored blob back into tasks, rejecting invalid state.
//!
//! # Invariants
//! - Encode then decode yields an identical collection.
//! - Decoded collections never contain empty or duplicate ids.
//! - A repeated id keeps its first task; later tasks with that id are
//!   re-keyed, never dropped.

use crate::model::task::{Task, TaskId};
use log::warn;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Codec failure for the persisted task blob.
#[derive(Debug)]
pub enum BlobError {
    Json(serde_json::Error),
    EmptyId { index: usize },
}

impl Display for BlobError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "invalid task blob: {err}"),
            Self::EmptyId { index } => write!(f, "task at index {index} has an empty id"),
        }
    }
}

impl Error for BlobError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::EmptyId { .. } => None,
        }
    }
}

impl From<serde_json::Error> for BlobError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Serializes the whole collection as a JSON array.
pub fn encode_tasks(tasks: &[Task]) -> Result<String, BlobError> {
    Ok(serde_json::to_string(tasks)?)
}

/// Parses a stored blob.
///
/// Missing `description`/`location` fields default to empty text and a
/// missing `status` defaults to pending. Tasks sharing an id with an
/// earlier task get a fresh id.
pub fn decode_tasks(blob: &str) -> Result<Vec<Task>, BlobError> {
    let mut tasks: Vec<Task> = serde_json::from_str(blob)?;

    if let Some(index) = tasks.iter().position(|task| task.id.is_empty()) {
        return Err(BlobError::EmptyId { index });
    }

    let mut seen = HashSet::with_capacity(tasks.len());
    let mut rekeyed = 0usize;
    for task in &mut tasks {
        if !seen.insert(task.id.clone()) {
            task.id = TaskId::generate();
            seen.insert(task.id.clone());
            rekeyed += 1;
        }
    }
    if rekeyed > 0 {
        warn!(
            "event=blob_decode module=blob status=rekeyed duplicate_count={} task_count={}",
            rekeyed,
            tasks.len()
        );
    }

    Ok(tasks)
}
