use sea_orm::DatabaseConnection;
use todo_list::config::Config;

/// Opens a fresh in-memory task store with the schema applied.
///
/// A single pooled connection keeps every query on the same in-memory database.
pub async fn setup_db() -> anyhow::Result<DatabaseConnection> {
    // Allow multiple calls to init for tests.
    let _ = tracing_subscriber::fmt().try_init();
    let config = Config {
        db_url: "sqlite::memory:".to_string(),
        db_max_connections: 1,
        ..Default::default()
    };
    let db = todo_list::db::connect(&config).await?;
    Ok(db)
}
