use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::task::api::{CreateTaskRequest, ErrorResponse, MessageResponse, TaskJson};

/// OpenAPI description of the JSON task endpoints.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::task::api::get_tasks_handler,
        crate::task::api::create_task_handler,
        crate::task::api::toggle_task_handler,
        crate::task::api::delete_task_handler
    ),
    components(schemas(TaskJson, CreateTaskRequest, MessageResponse, ErrorResponse)),
    tags((name = "Tasks", description = "Create, list, toggle and delete tasks"))
)]
pub struct ApiDoc;

/// Serves Swagger UI at `/swagger-ui` backed by `/api-docs/openapi.json`.
pub fn create_docs_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_document_every_task_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        assert_eq!(
            paths,
            vec!["/add", "/api/tasks", "/complete/{id}", "/delete/{id}"]
        );
    }
}
