use crate::task::{Task, TaskService, TaskServiceError, TaskState};
use axum::{
    Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post, put},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// JSON representation of a Task for API responses.
#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct TaskJson {
    /// Unique identifier assigned by the store
    pub id: u32,
    /// What needs doing
    pub description: String,
    /// Whether the task has been completed
    pub completed: bool,
    /// Creation time as `YYYY-MM-DD HH:MM:SS`
    pub created_at: String,
}

impl From<Task> for TaskJson {
    fn from(task: Task) -> Self {
        Self {
            id: task.id(),
            description: task.description().to_string(),
            completed: task.completed(),
            created_at: task.created_at().format(CREATED_AT_FORMAT).to_string(),
        }
    }
}

/// Request body for creating a task.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTaskRequest {
    /// Task text; surrounding whitespace is trimmed
    #[serde(default)]
    description: Option<String>,
}

/// JSON response carrying a confirmation message.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// JSON response for API errors.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Error type for the task API handlers.
#[derive(Debug, thiserror::Error)]
pub enum TaskApiError {
    #[error(transparent)]
    Service(#[from] TaskServiceError),
    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),
    #[error("Invalid task ID: {0}")]
    InvalidId(#[from] PathRejection),
}

impl IntoResponse for TaskApiError {
    fn into_response(self) -> Response {
        let (status_code, message) = match &self {
            TaskApiError::Service(TaskServiceError::EmptyDescription) => (
                StatusCode::BAD_REQUEST,
                "Task description cannot be empty".to_string(),
            ),
            TaskApiError::Service(TaskServiceError::TaskNotFound(_)) | TaskApiError::InvalidId(_) => {
                (StatusCode::NOT_FOUND, "Task not found".to_string())
            }
            TaskApiError::InvalidBody(rejection) => (StatusCode::BAD_REQUEST, rejection.body_text()),
            TaskApiError::Service(TaskServiceError::Database(err)) => {
                tracing::error!("Task store failure: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status_code, Json(ErrorResponse::new(message))).into_response()
    }
}

/// Handler for GET /api/tasks - Returns every task, newest first.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/tasks",
    responses(
        (status = 200, description = "All tasks, most recently created first", body = Vec<TaskJson>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn get_tasks_handler(
    State(state): State<Arc<TaskState>>,
) -> Result<Json<Vec<TaskJson>>, TaskApiError> {
    let tasks = TaskService::new(&state.db).get_all_tasks().await?;
    Ok(Json(tasks.into_iter().map(TaskJson::from).collect()))
}

/// Handler for POST /add - Creates a task from a JSON body.
#[tracing::instrument(skip(state, payload))]
#[utoipa::path(
    post,
    path = "/add",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created", body = TaskJson),
        (status = 400, description = "Description missing or blank, or body malformed", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn create_task_handler(
    State(state): State<Arc<TaskState>>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TaskJson>), TaskApiError> {
    let Json(request) = payload?;
    let description = request.description.unwrap_or_default();

    let task = TaskService::new(&state.db)
        .create_task(&description)
        .await?;
    Ok((StatusCode::CREATED, Json(TaskJson::from(task))))
}

/// Handler for PUT /complete/{id} - Flips the completion flag of a task.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    put,
    path = "/complete/{id}",
    params(
        ("id" = u32, Path, description = "ID of the task to toggle")
    ),
    responses(
        (status = 200, description = "Task toggled", body = TaskJson),
        (status = 404, description = "Task not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn toggle_task_handler(
    State(state): State<Arc<TaskState>>,
    id: Result<Path<u32>, PathRejection>,
) -> Result<Json<TaskJson>, TaskApiError> {
    let Path(id) = id?;
    let task = TaskService::new(&state.db).toggle_task_by_id(id).await?;
    Ok(Json(TaskJson::from(task)))
}

/// Handler for DELETE /delete/{id} - Removes a task permanently.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    delete,
    path = "/delete/{id}",
    params(
        ("id" = u32, Path, description = "ID of the task to delete")
    ),
    responses(
        (status = 200, description = "Task deleted", body = MessageResponse),
        (status = 404, description = "Task not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn delete_task_handler(
    State(state): State<Arc<TaskState>>,
    id: Result<Path<u32>, PathRejection>,
) -> Result<Json<MessageResponse>, TaskApiError> {
    let Path(id) = id?;
    TaskService::new(&state.db).delete_task_by_id(id).await?;
    Ok(Json(MessageResponse {
        message: "Task deleted successfully".to_string(),
    }))
}

/// Creates and returns the task API router.
pub fn create_task_router(state: TaskState) -> Router {
    Router::new()
        .route("/api/tasks", get(get_tasks_handler))
        .route("/add", post(create_task_handler))
        .route("/complete/{id}", put(toggle_task_handler))
        .route("/delete/{id}", delete(delete_task_handler))
        .with_state(Arc::new(state))
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn error_body(response: Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn can_map_empty_description_to_bad_request() {
        let response = TaskApiError::from(TaskServiceError::EmptyDescription).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            error_body(response).await,
            serde_json::json!({"error": "Task description cannot be empty"})
        );
    }

    #[tokio::test]
    async fn can_map_missing_task_to_not_found() {
        let response = TaskApiError::from(TaskServiceError::TaskNotFound(7)).into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            error_body(response).await,
            serde_json::json!({"error": "Task not found"})
        );
    }

    #[tokio::test]
    async fn can_hide_database_details_behind_internal_server_error() {
        let db_err = sea_orm::DbErr::Custom("disk I/O error".to_string());
        let response = TaskApiError::from(TaskServiceError::Database(db_err)).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            error_body(response).await,
            serde_json::json!({"error": "Internal server error"})
        );
    }

    #[test]
    fn can_format_created_at_like_the_store() {
        let created_at = chrono::NaiveDate::from_ymd_opt(2025, 3, 14)
            .unwrap()
            .and_hms_opt(9, 26, 53)
            .unwrap();
        let task = Task::new(3, "buy milk".to_string(), true, created_at);

        let json = TaskJson::from(task);

        assert_eq!(
            json,
            TaskJson {
                id: 3,
                description: "buy milk".to_string(),
                completed: true,
                created_at: "2025-03-14 09:26:53".to_string(),
            }
        );
    }
}
