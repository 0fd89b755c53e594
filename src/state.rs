use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::config::AppConfig;
use crate::users::{InMemoryUserRepository, PgUserRepository, UserRepository};

// Bounds the startup probe as well as every request's wait for a connection.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserRepository>,
}

impl AppState {
    /// Builds the state for the server. A database that is unreachable at
    /// startup is logged, not fatal; storage calls fail until it comes up.
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let db = connect_pool(&config.database_url)?;

        let repo = PgUserRepository::new(db);
        match repo.pool().acquire().await {
            Ok(_) => {
                tracing::info!("database connected");
                if let Err(e) = repo.migrate().await {
                    tracing::warn!(error = %e, "migration failed; continuing");
                }
            }
            Err(e) => tracing::error!(error = %e, "database connection error"),
        }

        Ok(Self::from_parts(config, Arc::new(repo)))
    }

    pub fn from_parts(config: Arc<AppConfig>, users: Arc<dyn UserRepository>) -> Self {
        Self { config, users }
    }

    /// State backed by an in-memory repository.
    pub fn in_memory(repo: InMemoryUserRepository) -> Self {
        let config = Arc::new(AppConfig {
            database_url: String::new(),
            host: "127.0.0.1".into(),
            port: 0,
        });
        Self::from_parts(config, Arc::new(repo))
    }
}

pub fn connect_pool(database_url: &str) -> anyhow::Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect_lazy(database_url)
        .context("invalid DATABASE_URL")
}
