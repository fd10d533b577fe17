#![recursion_limit = "512"]

pub mod api;
pub mod config;
pub mod model;
pub mod store;

// Export API types
pub use api::handlers;
pub use api::routes;

// Export all model types
pub use model::*;

// Export store types
pub use store::{MemoryStore, PostgresStore, Store, TodoStore};

use std::sync::Arc;

use crate::api::handlers::AppState;
use crate::config::{AppConfig, StoreBackend};

/// Connect the configured store and serve until the listener fails
pub async fn run_server(config: &AppConfig) -> anyhow::Result<()> {
    match config.database.backend {
        StoreBackend::Postgres => {
            log::info!("Connecting to PostgreSQL...");
            let database_url = config.database_url()?;
            let postgres_store =
                PostgresStore::new(&database_url, config.max_connections()).await?;

            log::info!("Running database migrations...");
            postgres_store.migrate().await?;

            serve(Arc::new(postgres_store), config).await
        }
        StoreBackend::Memory => {
            log::warn!("Using the in-memory store; todos are lost on restart");
            serve(Arc::new(MemoryStore::new()), config).await
        }
    }
}

async fn serve<S: Store + 'static>(store: Arc<S>, config: &AppConfig) -> anyhow::Result<()> {
    let app = routes::create_router(AppState::new(store, config.auth.client_id_mode));

    let bind_address = config.server_address();
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    log::info!(
        "Todo API running on http://{} (client id mode: {:?})",
        bind_address,
        config.auth.client_id_mode
    );
    log::info!("API documentation available at http://{}/docs", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
