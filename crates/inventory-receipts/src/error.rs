//! # Receipt Store Errors

use inventory_core::ValidationError;
use thiserror::Error;

/// Receipt store errors.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// No receipt is stored under this name.
    #[error("Receipt not found: {0}")]
    NotFound(String),

    /// The name can't be used as a single path component.
    #[error("Invalid receipt filename: {0}")]
    InvalidFilename(#[from] ValidationError),

    /// The upload is larger than the configured cap. Nothing was written.
    #[error("Receipt exceeds the {limit} byte upload limit")]
    PayloadTooLarge { limit: usize },

    /// Filesystem failure. A failed write may leave a partial file.
    #[error("Receipt storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The upload body could not be read. The source is the body
    /// stream's own error, so callers can inspect it.
    #[error("Upload failed: {0}")]
    Upload(#[source] BoxError),
}

/// Error type carried by [`ReceiptError::Upload`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type for receipt operations.
pub type ReceiptResult<T> = Result<T, ReceiptError>;
