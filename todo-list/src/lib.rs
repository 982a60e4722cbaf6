pub mod config {
    use serde::Deserialize;

    #[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
    pub struct Config {
        #[serde(default = "default_db_url")]
        pub db_url: String,
        #[serde(default = "default_host")]
        pub host: String,
        #[serde(default = "default_port")]
        pub port: u16,
        #[serde(default = "default_db_max_connections")]
        pub db_max_connections: u32,
    }

    impl Config {
        /// Loads configuration from environment variables, falling back to defaults.
        pub fn from_env() -> anyhow::Result<Self> {
            let settings = config::Config::builder()
                .add_source(config::Environment::default())
                .build()?;

            Self::from_settings(settings)
        }

        fn from_settings(settings: config::Config) -> anyhow::Result<Self> {
            let config: Config = settings.try_deserialize()?;
            Ok(config)
        }

        /// Address the web server binds to.
        pub fn server_address(&self) -> String {
            format!("{}:{}", self.host, self.port)
        }
    }

    impl Default for Config {
        fn default() -> Self {
            Self {
                db_url: default_db_url(),
                host: default_host(),
                port: default_port(),
                db_max_connections: default_db_max_connections(),
            }
        }
    }

    fn default_db_url() -> String {
        "sqlite://tasks.db?mode=rwc".to_string()
    }

    fn default_host() -> String {
        "0.0.0.0".to_string()
    }

    fn default_port() -> u16 {
        5000
    }

    fn default_db_max_connections() -> u32 {
        5
    }

}

pub mod db {
    use migration::MigratorTrait;
    use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

    use crate::config::Config;

    /// Opens the task store described by `config` and makes sure its schema exists.
    #[tracing::instrument(skip(config), fields(db_url = %config.db_url))]
    pub async fn connect(config: &Config) -> Result<DatabaseConnection, DbErr> {
        let mut options = ConnectOptions::new(config.db_url.clone());
        options
            .max_connections(config.db_max_connections)
            .min_connections(1)
            .sqlx_logging(false);

        let db = Database::connect(options).await?;
        ensure_schema(&db).await?;
        Ok(db)
    }

    /// Applies any pending migrations. Safe to call repeatedly.
    #[tracing::instrument(skip(db))]
    pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
        migration::Migrator::up(db, None).await?;
        tracing::info!("Database migrations applied successfully");
        Ok(())
    }
}

pub mod entities;
pub mod task;
pub mod web;
