use std::sync::Arc;

use anyhow::Context;
use mockable::DefaultClock;
use polls::{
    config::Config,
    routes::{AppState, router},
    store::PgStore,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    // Setup database connection
    let store = PgStore::connect(&config.database_url, config.max_connections)
        .await
        .context("connecting to database")?;
    store.migrate().await.context("running migrations")?;

    let state = AppState::new(Arc::new(store), Arc::new(DefaultClock))
        .with_index_limit(config.index_limit);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;
    tracing::info!("Server running on http://{}", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
