//! # Inventory Service
//!
//! Binary entry point. See the library docs for the startup sequence.
//!
//! ## Usage
//! ```bash
//! # Defaults: 0.0.0.0:5000, ./inventory.db, ./uploads
//! cargo run -p inventory-api
//!
//! # With a config file and overrides
//! INVENTORY_CONFIG=/etc/inventory.toml INVENTORY_PORT=8080 cargo run -p inventory-api
//! ```

use tokio::net::TcpListener;
use tracing::info;

use inventory_api::{build_router, init_tracing, AppState, ServiceConfig};
use inventory_db::Database;
use inventory_feed::RankingFeed;
use inventory_receipts::ReceiptStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    info!("Starting inventory service v{}", env!("CARGO_PKG_VERSION"));

    let config = ServiceConfig::load(None)?;

    let db = Database::new(config.db_config()).await?;
    let receipts = ReceiptStore::new(
        config.receipts.directory.clone(),
        config.receipts.max_upload_bytes,
    )
    .await?;

    let feed = RankingFeed::new(db.products(), config.feed_config());
    let ticker = feed.start();

    let state = AppState::new(db.clone(), receipts, feed);
    let app = build_router(state, &config.server.api_base_path);

    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, base_path = %config.server.api_base_path, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    ticker.shutdown().await?;
    db.close().await;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
