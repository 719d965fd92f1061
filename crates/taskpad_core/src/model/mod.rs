//! Task domain model.
//!
//! # Responsibility
//! - Define the data structures used by core business logic.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - Deletion is a hard removal from the collection.

pub mod task;
