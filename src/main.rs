use dafurn_exchange::{app, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    app::init_tracing();

    let app_state = AppState::init().await?;
    let addr = app_state.config.addr()?;

    let router = app::build_app(app_state);
    app::serve(router, addr).await
}
