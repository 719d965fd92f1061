//! Store configuration.
//!
//! # Responsibility
//! - Name the storage key the task blob lives under.
//! - Select how a failed blob write interacts with in-memory state.
//!
//! # Invariants
//! - `storage_key` is never empty.

/// Key used by every app build so far for the task blob.
pub const DEFAULT_STORAGE_KEY: &str = "tasks";

/// Ordering between the in-memory update and the blob write.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PersistMode {
    /// Update memory first, then write. A failed write is logged and the
    /// in-memory change is kept, so memory and storage may diverge.
    #[default]
    BestEffort,
    /// Write first and only then update memory. A failed write is returned
    /// to the caller and memory is left as it was.
    WriteThrough,
}

impl PersistMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BestEffort => "best_effort",
            Self::WriteThrough => "write_through",
        }
    }
}

/// Options applied when a `TaskStore` is initialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    pub storage_key: String,
    pub persist_mode: PersistMode,
}

impl StoreOptions {
    /// Builds options for a custom key. Blank keys fall back to
    /// `DEFAULT_STORAGE_KEY`.
    pub fn new(storage_key: impl Into<String>) -> Self {
        let storage_key = storage_key.into();
        let trimmed = storage_key.trim();
        let storage_key = if trimmed.is_empty() {
            DEFAULT_STORAGE_KEY.to_string()
        } else {
            trimmed.to_string()
        };
        Self {
            storage_key,
            persist_mode: PersistMode::default(),
        }
    }

    pub fn with_persist_mode(mut self, persist_mode: PersistMode) -> Self {
        self.persist_mode = persist_mode;
        self
    }
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self::new(DEFAULT_STORAGE_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::{PersistMode, StoreOptions, DEFAULT_STORAGE_KEY};

    #[test]
    fn default_options_use_tasks_key_and_best_effort() {
        let options = StoreOptions::default();
        assert_eq!(options.storage_key, DEFAULT_STORAGE_KEY);
        assert_eq!(options.persist_mode, PersistMode::BestEffort);
    }

    #[test]
    fn blank_key_falls_back_to_default() {
        assert_eq!(StoreOptions::new("  ").storage_key, DEFAULT_STORAGE_KEY);
        assert_eq!(StoreOptions::new(" archive ").storage_key, "archive");
    }
}
