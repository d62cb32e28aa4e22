//! Core domain models for the task tracker.
pub mod task;

pub use task::{ParseTaskStatusError, Task, TaskDraft, TaskStatus, TaskValidationError};
