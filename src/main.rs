use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use cinema_menu::{
    AppState,
    config::Config,
    controllers,
    database::Database,
    logging,
    schema::Migrator,
};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    logging::init(&config.app);

    info!("Starting Cinema Menu API ({})", config.app.environment);

    // Connect to the database
    let db = Database::new(&config.database.url, config.database.pool_size)
        .await
        .context("failed to connect to database")?;
    info!("Database connected");
    let store = Arc::new(db);

    // Run migrations
    if config.database.run_migrations {
        let ran = Migrator::new(store.clone())
            .run_pending()
            .await
            .context("failed to run migrations")?;
        info!("Applied migrations: {:?}", ran);
    }

    // Create the shared application state
    let app_state = AppState::new(store, config.clone());
    let app = controllers::app(app_state);

    let addr: SocketAddr = format!("{}:{}", config.app.host, config.app.port)
        .parse()
        .context("invalid listen address")?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
