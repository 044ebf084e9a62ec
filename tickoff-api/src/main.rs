//! # tickoff API Server
//!
//! HTTP server for accounts and per-user todo lists.
//!
//! ## Architecture
//!
//! The API server is built with Axum and provides:
//! - Registration and login with Argon2id password hashes
//! - Identity tokens carried in an HttpOnly cookie
//! - Todo CRUD restricted to the owning user
//!
//! Storage is PostgreSQL, or an in-process store when `DB_URL=memory://`.
//!
//! ## Usage
//!
//! ```bash
//! DB_URL=memory:// SECRET_KEY=$(openssl rand -hex 32) cargo run -p tickoff-api
//! ```

use std::sync::Arc;
use tickoff_api::{
    app::{build_router, AppState},
    config::Config,
};
use tickoff_shared::{
    db::{
        migrations::{ensure_database_exists, run_migrations},
        pool::{close_pool, create_pool, DatabaseConfig},
    },
    store::{memory::MemoryStore, postgres::PgStore, Store},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "tickoff_api=debug,tickoff_shared=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "tickoff API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let (store, pool): (Arc<dyn Store>, _) = if config.is_memory_store() {
        tracing::warn!("Using in-memory store; data is lost on shutdown");
        (Arc::new(MemoryStore::new()), None)
    } else {
        ensure_database_exists(&config.database.url).await?;

        let pool = create_pool(DatabaseConfig {
            url: config.database.url.clone(),
            max_connections: config.database.max_connections,
            ..DatabaseConfig::default()
        })
        .await?;

        run_migrations(&pool).await?;

        (Arc::new(PgStore::new(pool.clone())), Some(pool))
    };

    tracing::info!(backend = store.backend(), "Store ready");

    let bind_address = config.bind_address();
    let app = build_router(AppState::new(store, config));

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(pool) = pool {
        close_pool(pool).await;
    }

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl-C
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received, draining connections...");
}
