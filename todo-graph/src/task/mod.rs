use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum number of characters allowed in a task title.
pub const MAX_TITLE_LEN: usize = 200;
/// Maximum number of characters allowed in a task description.
pub const MAX_DESCRIPTION_LEN: usize = 1000;

/// A single persisted to-do item.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Task {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// The two states a task can be in. Transitions are free in both
/// directions; every task starts out `Pending`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TaskStatus {
    #[default]
    Pending,
    Completed,
}

impl TaskStatus {
    /// Returns the textual name of the status, which is also how it is
    /// persisted and how it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::Completed => "Completed",
        }
    }

    /// Returns the opposite status.
    pub fn toggled(self) -> Self {
        match self {
            TaskStatus::Pending => TaskStatus::Completed,
            TaskStatus::Completed => TaskStatus::Pending,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a persisted status name is not one of the two
/// known values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown task status '{0}'")]
pub struct ParseTaskStatusError(pub String);

impl FromStr for TaskStatus {
    type Err = ParseTaskStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(TaskStatus::Pending),
            "Completed" => Ok(TaskStatus::Completed),
            other => Err(ParseTaskStatusError(other.to_string())),
        }
    }
}

/// Error type for task boundary validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskValidationError {
    /// The title was empty, or longer than 200 characters, after trimming.
    #[error("title must be between 1 and 200 characters, got {0}")]
    TitleLength(usize),
    /// The description was longer than 1000 characters.
    #[error("description must be at most 1000 characters, got {0}")]
    DescriptionTooLong(usize),
}

/// A validated request to create a task. Constructing a `TaskDraft` is
/// the only way to get title/description past the boundary, so anything
/// downstream can rely on the length invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    title: String,
    description: Option<String>,
}

impl TaskDraft {
    /// Validates the given title and description.
    ///
    /// The title is trimmed and must end up between 1 and 200 characters;
    /// the description, when present, must be at most 1000 characters.
    /// An absent description is distinct from an empty one.
    pub fn new(
        title: impl Into<String>,
        description: Option<String>,
    ) -> Result<Self, TaskValidationError> {
        let title = title.into().trim().to_string();
        let title_len = title.chars().count();
        if title_len == 0 || title_len > MAX_TITLE_LEN {
            return Err(TaskValidationError::TitleLength(title_len));
        }
        if let Some(description) = &description {
            let description_len = description.chars().count();
            if description_len > MAX_DESCRIPTION_LEN {
                return Err(TaskValidationError::DescriptionTooLong(description_len));
            }
        }
        Ok(Self { title, description })
    }

    /// Returns the validated title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the validated description, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}
