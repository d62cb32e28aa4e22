use sea_orm::DatabaseConnection;
use todo_graph::{TaskStatus, TaskValidationError};
use todo_graph_server::events::EventBus;
use todo_graph_server::task::{TaskService, TaskServiceError};

mod common;

pub struct TestContext {
    pub db: DatabaseConnection,
    pub events: EventBus,
}

async fn setup() -> anyhow::Result<TestContext> {
    // Allow multiple calls to init for tests.
    let _ = tracing_subscriber::fmt().try_init();
    let db = common::setup_db().await?;
    Ok(TestContext {
        db,
        events: EventBus::new(),
    })
}

#[tokio::test]
async fn can_create_task() {
    let state = setup().await.expect("Failed to setup test context");
    let service = TaskService::new(&state.db, &state.events);

    let task = service
        .create_task("Buy milk".to_string(), None)
        .await
        .expect("Failed to create task");

    assert_eq!(task.title, "Buy milk");
    assert_eq!(task.description, None);
    assert_eq!(task.status, TaskStatus::Pending);
    assert_eq!(task.updated_at, None);
}

#[tokio::test]
async fn can_create_task_with_description() {
    let state = setup().await.expect("Failed to setup test context");
    let service = TaskService::new(&state.db, &state.events);

    let task = service
        .create_task("Buy milk".to_string(), Some("2 liters".to_string()))
        .await
        .expect("Failed to create task");

    assert_eq!(task.description.as_deref(), Some("2 liters"));
}

#[tokio::test]
async fn create_assigns_fresh_unique_ids() {
    let state = setup().await.expect("Failed to setup test context");
    let service = TaskService::new(&state.db, &state.events);

    let first = service
        .create_task("First".to_string(), None)
        .await
        .expect("Failed to create task");
    let second = service
        .create_task("Second".to_string(), None)
        .await
        .expect("Failed to create task");

    assert_ne!(first.id, second.id);
}

#[tokio::test]
async fn cannot_create_task_with_empty_title() {
    let state = setup().await.expect("Failed to setup test context");
    let service = TaskService::new(&state.db, &state.events);

    let result = service.create_task(String::new(), None).await;
    assert!(matches!(
        result,
        Err(TaskServiceError::Validation(
            TaskValidationError::TitleLength(0)
        ))
    ));

    // Nothing was persisted.
    let tasks = service
        .get_all_tasks()
        .await
        .expect("Failed to get all tasks");
    assert!(tasks.is_empty());
}

#[tokio::test]
async fn cannot_create_task_with_overlong_description() {
    let state = setup().await.expect("Failed to setup test context");
    let service = TaskService::new(&state.db, &state.events);

    let result = service
        .create_task("Buy milk".to_string(), Some("x".repeat(1001)))
        .await;
    assert!(matches!(
        result,
        Err(TaskServiceError::Validation(
            TaskValidationError::DescriptionTooLong(1001)
        ))
    ));
}

#[tokio::test]
async fn create_publishes_exactly_one_created_event() {
    let state = setup().await.expect("Failed to setup test context");
    let service = TaskService::new(&state.db, &state.events);
    let mut created_events = state.events.subscribe_created();

    let task = service
        .create_task("Buy milk".to_string(), None)
        .await
        .expect("Failed to create task");

    let event = created_events.recv().await.expect("Expected one event");
    assert_eq!(event, task);
    assert!(created_events.try_recv().is_err());
}

#[tokio::test]
async fn can_update_task_status() {
    let state = setup().await.expect("Failed to setup test context");
    let service = TaskService::new(&state.db, &state.events);

    let created = service
        .create_task("Buy milk".to_string(), Some("2 liters".to_string()))
        .await
        .expect("Failed to create task");

    let updated = service
        .update_task_status(created.id, TaskStatus::Completed)
        .await
        .expect("Failed to update task");

    // Only status and updated_at change.
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.title, created.title);
    assert_eq!(updated.description, created.description);
    assert_eq!(updated.created_at, created.created_at);
    assert_eq!(updated.status, TaskStatus::Completed);
    let updated_at = updated.updated_at.expect("updated_at should be set");
    assert!(created.created_at <= updated_at);
}

#[tokio::test]
async fn can_update_status_back_to_pending() {
    let state = setup().await.expect("Failed to setup test context");
    let service = TaskService::new(&state.db, &state.events);

    let created = service
        .create_task("Buy milk".to_string(), None)
        .await
        .expect("Failed to create task");
    service
        .update_task_status(created.id, TaskStatus::Completed)
        .await
        .expect("Failed to update task");

    let reverted = service
        .update_task_status(created.id, TaskStatus::Pending)
        .await
        .expect("Failed to update task");

    assert_eq!(reverted.status, TaskStatus::Pending);
    assert!(reverted.updated_at.is_some());
}

#[tokio::test]
async fn update_publishes_exactly_one_updated_event() {
    let state = setup().await.expect("Failed to setup test context");
    let service = TaskService::new(&state.db, &state.events);

    let created = service
        .create_task("Buy milk".to_string(), None)
        .await
        .expect("Failed to create task");

    let mut updated_events = state.events.subscribe_updated();
    let updated = service
        .update_task_status(created.id, TaskStatus::Completed)
        .await
        .expect("Failed to update task");

    let event = updated_events.recv().await.expect("Expected one event");
    assert_eq!(event, updated);
    assert!(updated_events.try_recv().is_err());
}

#[tokio::test]
async fn can_handle_update_when_task_not_found() {
    let state = setup().await.expect("Failed to setup test context");
    let service = TaskService::new(&state.db, &state.events);

    let created = service
        .create_task("Buy milk".to_string(), None)
        .await
        .expect("Failed to create task");

    let missing_id = created.id + 1;
    let result = service
        .update_task_status(missing_id, TaskStatus::Completed)
        .await;
    assert!(matches!(
        result,
        Err(TaskServiceError::TaskNotFound(id)) if id == missing_id
    ));

    // The store is unchanged.
    let task = service
        .get_task_by_id(created.id)
        .await
        .expect("Failed to get task");
    assert_eq!(task, created);
}

#[tokio::test]
async fn can_get_task_by_id() {
    let state = setup().await.expect("Failed to setup test context");
    let service = TaskService::new(&state.db, &state.events);

    let created = service
        .create_task("Buy milk".to_string(), None)
        .await
        .expect("Failed to create task");

    let fetched = service
        .get_task_by_id(created.id)
        .await
        .expect("Failed to get task");
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn can_handle_get_when_task_not_found() {
    let state = setup().await.expect("Failed to setup test context");
    let service = TaskService::new(&state.db, &state.events);

    let result = service.get_task_by_id(404).await;
    assert!(matches!(result, Err(TaskServiceError::TaskNotFound(404))));
}

#[tokio::test]
async fn tasks_are_ordered_newest_first() {
    let state = setup().await.expect("Failed to setup test context");
    let service = TaskService::new(&state.db, &state.events);

    let first = service
        .create_task("First".to_string(), None)
        .await
        .expect("Failed to create task");
    let second = service
        .create_task("Second".to_string(), None)
        .await
        .expect("Failed to create task");
    let third = service
        .create_task("Third".to_string(), None)
        .await
        .expect("Failed to create task");

    let tasks = service
        .get_all_tasks()
        .await
        .expect("Failed to get all tasks");
    let ids: Vec<i32> = tasks.iter().map(|task| task.id).collect();

    // Creation-time descending, ID descending as the deterministic
    // tiebreak when timestamps collide.
    assert_eq!(ids, vec![third.id, second.id, first.id]);
}

#[tokio::test]
async fn can_handle_empty_task_list() {
    let state = setup().await.expect("Failed to setup test context");
    let service = TaskService::new(&state.db, &state.events);

    let tasks = service
        .get_all_tasks()
        .await
        .expect("Failed to get all tasks");
    assert!(tasks.is_empty());
}
