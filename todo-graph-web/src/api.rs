//! GraphQL-over-HTTP plumbing: request-body builders, response-envelope
//! parsing, and the fetch functions the UI calls. Builders and parsers
//! are pure so they can be unit tested without a browser.

use serde::Deserialize;
use serde_json::{Value, json};
use todo_graph::{Task, TaskStatus};

/// GraphQL endpoint of the backing server.
pub const ENDPOINT: &str = "http://localhost:8080/graphql";

const GET_ALL_TASKS_QUERY: &str = "
    query GetAllTasks {
        getAllTasks {
            id
            title
            description
            status
            createdAt
            updatedAt
        }
    }
";

const CREATE_TASK_MUTATION: &str = "
    mutation CreateTask($input: CreateTaskInput!) {
        createTask(input: $input) {
            id
            title
            description
            status
            createdAt
            updatedAt
        }
    }
";

const UPDATE_TASK_STATUS_MUTATION: &str = "
    mutation UpdateTaskStatus($input: UpdateTaskStatusInput!) {
        updateTaskStatus(input: $input) {
            id
            title
            description
            status
            createdAt
            updatedAt
        }
    }
";

/// Error type for API operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The server answered with GraphQL errors.
    #[error("GraphQL errors: {0}")]
    GraphQl(String),
    /// The response body did not match the expected shape.
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    /// The response carried neither data nor errors.
    #[error("response contained neither data nor errors")]
    EmptyResponse,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    data: Option<Value>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

/// Builds the request body for the `getAllTasks` query.
pub fn get_all_tasks_request() -> Value {
    json!({ "query": GET_ALL_TASKS_QUERY })
}

/// Builds the request body for the `createTask` mutation.
pub fn create_task_request(title: &str, description: Option<&str>) -> Value {
    json!({
        "query": CREATE_TASK_MUTATION,
        "variables": { "input": { "title": title, "description": description } },
    })
}

/// Builds the request body for the `updateTaskStatus` mutation.
pub fn update_task_status_request(id: i32, status: TaskStatus) -> Value {
    json!({
        "query": UPDATE_TASK_STATUS_MUTATION,
        "variables": { "input": { "id": id, "status": status.as_str() } },
    })
}

fn unwrap_data(body: &str) -> Result<Value, ApiError> {
    let envelope: Envelope = serde_json::from_str(body)?;
    if let Some(errors) = envelope.errors {
        if !errors.is_empty() {
            let messages: Vec<String> = errors.into_iter().map(|error| error.message).collect();
            return Err(ApiError::GraphQl(messages.join("; ")));
        }
    }
    envelope.data.ok_or(ApiError::EmptyResponse)
}

/// Extracts the task list from a `getAllTasks` response body.
pub fn parse_task_list(body: &str) -> Result<Vec<Task>, ApiError> {
    let data = unwrap_data(body)?;
    Ok(serde_json::from_value(data["getAllTasks"].clone())?)
}

/// Extracts the created task from a `createTask` response body.
pub fn parse_created_task(body: &str) -> Result<Task, ApiError> {
    let data = unwrap_data(body)?;
    Ok(serde_json::from_value(data["createTask"].clone())?)
}

/// Extracts the updated task from an `updateTaskStatus` response body.
/// A null result means the task no longer exists on the server.
pub fn parse_updated_task(body: &str) -> Result<Option<Task>, ApiError> {
    let data = unwrap_data(body)?;
    Ok(serde_json::from_value(data["updateTaskStatus"].clone())?)
}

async fn post(body: &Value) -> Result<String, ApiError> {
    let response = reqwest::Client::new()
        .post(ENDPOINT)
        .json(body)
        .send()
        .await?;
    Ok(response.text().await?)
}

/// Fetches every task from the server.
pub async fn fetch_all_tasks() -> Result<Vec<Task>, ApiError> {
    let body = post(&get_all_tasks_request()).await?;
    parse_task_list(&body)
}

/// Creates a task on the server and returns the persisted record.
pub async fn create_task(title: &str, description: Option<&str>) -> Result<Task, ApiError> {
    let body = post(&create_task_request(title, description)).await?;
    parse_created_task(&body)
}

/// Sets a task's status on the server. Resolves to `None` when the task
/// no longer exists.
pub async fn update_task_status(id: i32, status: TaskStatus) -> Result<Option<Task>, ApiError> {
    let body = post(&update_task_status_request(id, status)).await?;
    parse_updated_task(&body)
}
