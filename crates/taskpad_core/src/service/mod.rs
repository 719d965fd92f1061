//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate the task collection, its blob codec and list views.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod task_blob;
pub mod task_store;
pub mod task_view;
