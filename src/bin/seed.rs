use std::process::ExitCode;

use anyhow::Context;
use dafurn_exchange::{
    app,
    config::AppConfig,
    state::connect_pool,
    users::{seed::seed_users, PgUserRepository},
};

async fn run() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    let repo = PgUserRepository::new(connect_pool(&config.database_url)?);
    repo.pool()
        .acquire()
        .await
        .context("connect to database")?;
    tracing::info!("database connected");

    repo.migrate().await.context("run migrations")?;
    seed_users(&repo).await.context("seed users")?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    app::init_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = ?e, "error seeding users");
            ExitCode::FAILURE
        }
    }
}
