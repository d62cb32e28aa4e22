use crate::entities::task;
use crate::events::EventBus;
use chrono::Utc;
use sea_orm::*;
use todo_graph::{ParseTaskStatusError, Task, TaskStatus, TaskValidationError};

/// Error type for TaskService operations.
#[derive(Debug, thiserror::Error)]
pub enum TaskServiceError {
    /// The submitted title or description failed boundary validation.
    #[error(transparent)]
    Validation(#[from] TaskValidationError),
    /// No task exists with the given ID.
    #[error("Task with ID {0} not found")]
    TaskNotFound(i32),
    /// Represents a database error.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
    /// A stored status name did not parse; the row is corrupt.
    #[error("Corrupt task record {id}: {source}")]
    CorruptRecord {
        id: i32,
        source: ParseTaskStatusError,
    },
}

/// Data-access layer for tasks. All writes publish exactly one
/// notification on the matching [`EventBus`] topic.
pub struct TaskService<'a> {
    db: &'a DatabaseConnection,
    events: &'a EventBus,
}

fn to_domain(model: task::Model) -> Result<Task, TaskServiceError> {
    let status: TaskStatus =
        model
            .status
            .parse()
            .map_err(|source| TaskServiceError::CorruptRecord {
                id: model.id,
                source,
            })?;
    Ok(Task {
        id: model.id,
        title: model.title,
        description: model.description,
        status,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

impl<'a> TaskService<'a> {
    pub fn new(db: &'a DatabaseConnection, events: &'a EventBus) -> TaskService<'a> {
        TaskService { db, events }
    }

    /// Creates a new task in the database.
    ///
    /// Validates the title and description before anything is persisted,
    /// forces the status to `Pending`, stamps `created_at` server-side,
    /// and publishes the created task on the `TaskCreated` topic.
    ///
    /// # Arguments
    ///
    /// * `title` - The task title, 1 to 200 characters after trimming.
    /// * `description` - Optional description, at most 1000 characters.
    ///
    /// # Returns
    ///
    /// A `Result` containing the created `Task` if successful, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn create_task(
        &self,
        title: String,
        description: Option<String>,
    ) -> Result<Task, TaskServiceError> {
        let draft = todo_graph::TaskDraft::new(title, description)?;

        let active_model = task::ActiveModel {
            title: ActiveValue::Set(draft.title().to_string()),
            description: ActiveValue::Set(draft.description().map(str::to_string)),
            status: ActiveValue::Set(TaskStatus::Pending.as_str().to_string()),
            created_at: ActiveValue::Set(Utc::now()),
            updated_at: ActiveValue::Set(None),
            ..Default::default()
        };
        let created_model = active_model.insert(self.db).await?;

        let created_task = to_domain(created_model)?;
        self.events.publish_created(created_task.clone());
        Ok(created_task)
    }

    /// Retrieves a task by its ID.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Task` if it exists, or
    /// [`TaskServiceError::TaskNotFound`] otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn get_task_by_id(&self, id: i32) -> Result<Task, TaskServiceError> {
        let model = task::Entity::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or(TaskServiceError::TaskNotFound(id))?;
        to_domain(model)
    }

    /// Retrieves all tasks, newest first.
    ///
    /// Ordered by creation time descending; ties are broken by ID
    /// descending so the order is deterministic.
    #[tracing::instrument(skip(self))]
    pub async fn get_all_tasks(&self) -> Result<Vec<Task>, TaskServiceError> {
        task::Entity::find()
            .order_by_desc(task::Column::CreatedAt)
            .order_by_desc(task::Column::Id)
            .all(self.db)
            .await?
            .into_iter()
            .map(to_domain)
            .collect()
    }

    /// Sets the status of an existing task.
    ///
    /// Only `status` and `updated_at` change; every other column is left
    /// untouched. Publishes the updated task on the `TaskUpdated` topic.
    ///
    /// # Returns
    ///
    /// A `Result` containing the updated `Task` if successful, or
    /// [`TaskServiceError::TaskNotFound`] when the ID is unknown.
    #[tracing::instrument(skip(self))]
    pub async fn update_task_status(
        &self,
        id: i32,
        new_status: TaskStatus,
    ) -> Result<Task, TaskServiceError> {
        let task_to_update = task::Entity::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or(TaskServiceError::TaskNotFound(id))?;

        let mut active_model: task::ActiveModel = task_to_update.into();
        active_model.status = ActiveValue::Set(new_status.as_str().to_string());
        active_model.updated_at = ActiveValue::Set(Some(Utc::now()));
        let updated_model = active_model.update(self.db).await?;

        let updated_task = to_domain(updated_model)?;
        self.events.publish_updated(updated_task.clone());
        Ok(updated_task)
    }
}
