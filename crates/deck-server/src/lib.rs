//! # deck-server
//!
//! REST server for taskdeck: axum handlers over a rusqlite store.
//!
//! Layering follows repositories → services (validation, rate limit) →
//! handlers (success envelope) → router (correlation middleware, problem
//! details translation). The router is exposed so tests can drive it
//! in-process without binding a port.

pub mod db;
pub mod error;
mod middleware;
pub mod rate_limit;
pub mod repos;
mod routes;
pub mod validate;

use std::sync::Arc;

use deck_config::DeckConfig;

pub use db::Db;
pub use error::ServerError;
pub use routes::SESSION_HEADER;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub config: Arc<DeckConfig>,
}

/// Build the full `/api` router over the given state.
#[must_use]
pub fn router(state: AppState) -> axum::Router {
    routes::router(state)
}

/// Open the database and serve until the process is stopped.
///
/// # Errors
///
/// Returns an error when the database cannot be opened or the listener
/// fails to bind.
pub async fn serve(config: DeckConfig) -> anyhow::Result<()> {
    let bind_addr = config.server.bind_addr.clone();
    let db = Db::open(&config.server.database_path)?;
    let state = AppState {
        db,
        config: Arc::new(config),
    };
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("taskdeck server listening on http://{bind_addr}");
    axum::serve(listener, router(state)).await?;
    Ok(())
}
