use askama::Template;
use axum::http::StatusCode;
use axum::response::Html;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::task::TaskState;
use crate::task::api::create_task_router;

pub mod api;

const PAGE_UNAVAILABLE_MESSAGE: &str =
    "The to-do list could not be displayed right now. Please reload the page.";

/// Custom error type for web handler operations.
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    /// Represents an error during template rendering.
    /// The specific `askama::Error` is captured as the source of this error.
    #[error("Template rendering failed")]
    Template(#[from] askama::Error),
}

impl axum::response::IntoResponse for WebError {
    fn into_response(self) -> axum::response::Response {
        let WebError::Template(source) = &self;
        tracing::error!("{}: {}", self, source);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(format!(
                "<h1>Internal Server Error</h1><p>{}</p>",
                PAGE_UNAVAILABLE_MESSAGE
            )),
        )
            .into_response()
    }
}

/// Builds the full application router on top of an open task store.
pub fn create_app(db: sea_orm::DatabaseConnection) -> axum::Router {
    use axum::Router;

    let task_state = TaskState { db: Arc::new(db) };

    Router::new()
        .route("/", axum::routing::get(index_handler))
        .route("/health", axum::routing::get(health_check_handler))
        .merge(create_task_router(task_state))
        .merge(api::create_docs_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::new()),
        )
}

#[tracing::instrument(skip(config))]
pub async fn start_web_server(config: Config) -> anyhow::Result<()> {
    let server_address = config.server_address();
    let listener = tokio::net::TcpListener::bind(&server_address).await?;
    tracing::info!("Web server running on http://{}", server_address);

    let db = crate::db::connect(&config).await?;
    let app = create_app(db);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tracing::instrument]
pub async fn health_check_handler() -> &'static str {
    "OK"
}

#[tracing::instrument]
pub async fn index_handler() -> Result<Html<String>, WebError> {
    render_page(&IndexTemplate::new())
}

fn render_page<T: Template>(template: &T) -> Result<Html<String>, WebError> {
    template.render().map(Html).map_err(WebError::from)
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    title: &'static str,
}

impl IndexTemplate {
    pub fn new() -> Self {
        Self { title: "To-Do List" }
    }
}
