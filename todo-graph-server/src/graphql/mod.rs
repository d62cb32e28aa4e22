use crate::events::EventBus;
use crate::task::{TaskService, TaskServiceError};
use async_graphql::{
    Context, Enum, InputObject, Object, Result, Schema, SimpleObject, Subscription,
};
use chrono::{DateTime, Utc};
use futures::{Stream, StreamExt};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tokio_stream::wrappers::BroadcastStream;

/// The executable schema for the task tracker.
pub type TaskSchema = Schema<QueryRoot, MutationRoot, SubscriptionRoot>;

/// Builds the schema with its injected capabilities: the database
/// connection for the store and the event bus for subscriptions.
pub fn build_schema(db: Arc<DatabaseConnection>, events: EventBus) -> TaskSchema {
    Schema::build(QueryRoot, MutationRoot, SubscriptionRoot)
        .data(db)
        .data(events)
        .finish()
}

fn task_service<'ctx>(ctx: &Context<'ctx>) -> Result<TaskService<'ctx>> {
    let db = ctx.data::<Arc<DatabaseConnection>>()?;
    let events = ctx.data::<EventBus>()?;
    Ok(TaskService::new(db, events))
}

/// Wire representation of a task.
#[derive(Debug, Clone, SimpleObject)]
pub struct Task {
    /// Store-assigned identifier, immutable after creation.
    pub id: i32,
    /// The task title.
    pub title: String,
    /// Optional description of the task.
    pub description: Option<String>,
    /// Current status of the task.
    pub status: TaskStatus,
    /// When the task was created (UTC).
    pub created_at: DateTime<Utc>,
    /// When the status last changed; null until the first change.
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<todo_graph::Task> for Task {
    fn from(task: todo_graph::Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            status: task.status.into(),
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

/// Status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Enum)]
#[graphql(rename_items = "PascalCase")]
pub enum TaskStatus {
    Pending,
    Completed,
}

impl From<todo_graph::TaskStatus> for TaskStatus {
    fn from(status: todo_graph::TaskStatus) -> Self {
        match status {
            todo_graph::TaskStatus::Pending => TaskStatus::Pending,
            todo_graph::TaskStatus::Completed => TaskStatus::Completed,
        }
    }
}

impl From<TaskStatus> for todo_graph::TaskStatus {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Pending => todo_graph::TaskStatus::Pending,
            TaskStatus::Completed => todo_graph::TaskStatus::Completed,
        }
    }
}

#[derive(Debug, InputObject)]
pub struct CreateTaskInput {
    /// The title of the task.
    pub title: String,
    /// Optional description of the task.
    pub description: Option<String>,
}

#[derive(Debug, InputObject)]
pub struct UpdateTaskStatusInput {
    /// The ID of the task to update.
    pub id: i32,
    /// The new status of the task.
    pub status: TaskStatus,
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// All tasks, ordered by creation time descending.
    async fn get_all_tasks(&self, ctx: &Context<'_>) -> Result<Vec<Task>> {
        let service = task_service(ctx)?;
        let tasks = service.get_all_tasks().await?;
        Ok(tasks.into_iter().map(Task::from).collect())
    }

    /// The task with the given ID, or null when no such task exists.
    async fn get_task_by_id(&self, ctx: &Context<'_>, id: i32) -> Result<Option<Task>> {
        let service = task_service(ctx)?;
        match service.get_task_by_id(id).await {
            Ok(task) => Ok(Some(task.into())),
            Err(TaskServiceError::TaskNotFound(_)) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Creates a new task with status `Pending` and publishes it to the
    /// `TaskCreated` topic. Fails with a validation error when the title
    /// or description is out of bounds; nothing is persisted in that case.
    async fn create_task(&self, ctx: &Context<'_>, input: CreateTaskInput) -> Result<Task> {
        let service = task_service(ctx)?;
        let task = service.create_task(input.title, input.description).await?;
        Ok(task.into())
    }

    /// Sets the status of an existing task and publishes the result to
    /// the `TaskUpdated` topic. Resolves to null when the ID is unknown.
    async fn update_task_status(
        &self,
        ctx: &Context<'_>,
        input: UpdateTaskStatusInput,
    ) -> Result<Option<Task>> {
        let service = task_service(ctx)?;
        match service
            .update_task_status(input.id, input.status.into())
            .await
        {
            Ok(task) => Ok(Some(task.into())),
            Err(TaskServiceError::TaskNotFound(_)) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

pub struct SubscriptionRoot;

#[Subscription]
impl SubscriptionRoot {
    /// Streams each task as it is created, from the moment of
    /// subscription onward.
    async fn on_task_created(&self, ctx: &Context<'_>) -> Result<impl Stream<Item = Task>> {
        let events = ctx.data::<EventBus>()?;
        // a lagged receiver yields an error item; drop it and move on
        Ok(BroadcastStream::new(events.subscribe_created())
            .filter_map(|event| async move { event.ok().map(Task::from) }))
    }

    /// Streams each task as its status changes, from the moment of
    /// subscription onward.
    async fn on_task_updated(&self, ctx: &Context<'_>) -> Result<impl Stream<Item = Task>> {
        let events = ctx.data::<EventBus>()?;
        Ok(BroadcastStream::new(events.subscribe_updated())
            .filter_map(|event| async move { event.ok().map(Task::from) }))
    }
}
