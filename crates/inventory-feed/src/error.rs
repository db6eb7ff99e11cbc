//! # Feed Error Types

use inventory_db::DbError;
use thiserror::Error;

/// Result type alias for feed operations.
pub type FeedResult<T> = Result<T, FeedError>;

/// Ranking feed errors.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The registry already holds `max_subscribers` connections.
    #[error("Subscriber limit of {capacity} reached")]
    RegistryFull { capacity: usize },

    /// Computing the ranking failed (including its deadline).
    #[error("Ranking query failed: {0}")]
    Database(#[from] DbError),

    /// Snapshot could not be serialized.
    #[error("Snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The ticker task is already gone.
    #[error("Feed ticker is not running")]
    TickerStopped,
}
