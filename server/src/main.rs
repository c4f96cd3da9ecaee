use anyhow::Context;
use recipes_server::config::{Config, StorageBackend};
use recipes_server::store::{MemoryRecipeStore, PgRecipeStore};
use recipes_server::{api, db, telemetry, AppState};
use std::env;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Check for --openapi flag to dump spec and exit
    if env::args().any(|arg| arg == "--openapi") {
        let spec = api::openapi()
            .to_pretty_json()
            .context("Failed to serialize OpenAPI spec")?;
        println!("{}", spec);
        return Ok(());
    }

    let config = Config::from_env().context("Invalid configuration")?;

    telemetry::init(&config).context("Failed to initialize telemetry")?;

    let store: AppState = match config.storage {
        StorageBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL must be set")?;
            let pool = db::create_pool(database_url)?;
            Arc::new(PgRecipeStore::new(pool))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; recipes are lost on restart");
            Arc::new(MemoryRecipeStore::new())
        }
    };
    tracing::info!(backend = store.backend_name(), "recipe store ready");

    let app = recipes_server::app(store, config.track_query_count);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    let local_addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", local_addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", local_addr);
    tracing::info!(
        "OpenAPI spec available at http://{}/api-docs/openapi.json",
        local_addr
    );

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
