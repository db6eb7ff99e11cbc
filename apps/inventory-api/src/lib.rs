//! # Inventory API
//!
//! HTTP facade over the product store, the receipt store, and the ranking
//! feed.
//!
//! ## Startup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ServiceConfig::load ──► init_tracing                                   │
//! │        │                                                                │
//! │        ├──► Database::new      (pool + migrations)                      │
//! │        ├──► ReceiptStore::new  (creates the upload dir)                 │
//! │        └──► RankingFeed::new ──► start()  (ticker task)                 │
//! │                                                                         │
//! │  build_router(AppState) ──► axum::serve ──► shutdown signal             │
//! │                                                │                        │
//! │                             ticker.shutdown() ◄┘ ──► db.close()         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use axum::Router;
use tracing::Level;
use tracing_subscriber::EnvFilter;

pub use config::{ConfigError, ServiceConfig};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use state::AppState;

/// Builds the service router for `state`, nesting the product and receipt
/// routes under `api_base_path`.
pub fn build_router(state: AppState, api_base_path: &str) -> Router {
    routes::router(state, api_base_path)
}

/// Initializes the tracing subscriber for logging.
///
/// ## Log Levels
/// - ERROR: failures returned as 500
/// - WARN: rejected uploads, dropped subscribers
/// - INFO: lifecycle (pool, listener, subscribers joining and leaving)
/// - DEBUG: per-request store operations
///
/// Set `RUST_LOG` to override, e.g. `RUST_LOG=debug,sqlx=info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,inventory=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::TRACE)
        .init();
}
