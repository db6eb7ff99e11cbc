//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Facade                             │
//! │                                                                         │
//! │  Handler  ──  Result<T, ApiError>                                       │
//! │     │                                                                   │
//! │     ├── ValidationError / CoreError ──────────► 400 VALIDATION_ERROR    │
//! │     ├── DbError::ConstraintViolation ─────────► 400 VALIDATION_ERROR    │
//! │     ├── ReceiptError::PayloadTooLarge ────────► 400 PAYLOAD_TOO_LARGE   │
//! │     ├── *::NotFound ──────────────────────────► 404 NOT_FOUND           │
//! │     ├── DbError::DeadlineExceeded ────────────► 500 DEADLINE_EXCEEDED   │
//! │     ├── other DbError ────────────────────────► 500 DATABASE_ERROR      │
//! │     ├── ReceiptError::Io ─────────────────────► 500 STORAGE_ERROR       │
//! │     └── anything else ────────────────────────► 500 INTERNAL            │
//! │                                                                         │
//! │  500s are logged with the underlying error; the body carries only a    │
//! │  generic message.                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{error, warn};

use inventory_core::{CoreError, ValidationError};
use inventory_db::DbError;
use inventory_feed::FeedError;
use inventory_receipts::ReceiptError;

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Error body returned by every failing endpoint.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Product not found: 42"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Upload over the size cap (400)
    PayloadTooLarge,

    /// A store call ran past its deadline (500)
    DeadlineExceeded,

    /// Database operation failed (500)
    DatabaseError,

    /// Receipt filesystem failure (500)
    StorageError,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    /// HTTP status for this code.
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError | ErrorCode::PayloadTooLarge => StatusCode::BAD_REQUEST,
            ErrorCode::DeadlineExceeded
            | ErrorCode::DatabaseError
            | ErrorCode::StorageError
            | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        self.code.status()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

// =============================================================================
// Conversions
// =============================================================================

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::ConstraintViolation(msg) => {
                warn!(error = %msg, "Constraint violation");
                ApiError::validation("Product violates a store constraint")
            }
            DbError::DeadlineExceeded { operation, limit } => {
                error!(operation, ?limit, "Store deadline exceeded");
                ApiError::new(
                    ErrorCode::DeadlineExceeded,
                    "The product store did not answer in time",
                )
            }
            other => {
                error!(error = %other, "Database error");
                ApiError::new(ErrorCode::DatabaseError, "A database error occurred")
            }
        }
    }
}

/// Converts receipt store errors to API errors.
impl From<ReceiptError> for ApiError {
    fn from(err: ReceiptError) -> Self {
        match err {
            ReceiptError::NotFound(name) => ApiError::not_found("Receipt", &name),
            ReceiptError::InvalidFilename(e) => ApiError::validation(e.to_string()),
            ReceiptError::PayloadTooLarge { limit } => {
                warn!(limit, "Receipt upload rejected as too large");
                ApiError::new(
                    ErrorCode::PayloadTooLarge,
                    format!("Receipt exceeds the {} byte upload limit", limit),
                )
            }
            // A multipart read error keeps its own mapping (413 becomes PAYLOAD_TOO_LARGE)
            ReceiptError::Upload(source) => match source.downcast::<MultipartError>() {
                Ok(multipart) => ApiError::from(*multipart),
                Err(other) => ApiError::validation(format!("Upload failed: {}", other)),
            },
            ReceiptError::Io(e) => {
                error!(error = %e, "Receipt storage error");
                ApiError::new(ErrorCode::StorageError, "A storage error occurred")
            }
        }
    }
}

/// Converts core domain errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => ApiError::not_found("Product", &id.to_string()),
            CoreError::IdMismatch { .. } => ApiError::validation(err.to_string()),
            CoreError::Validation(e) => ApiError::from(e),
        }
    }
}

/// Converts validation errors to API errors.
impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Converts ranking feed errors to API errors.
impl From<FeedError> for ApiError {
    fn from(err: FeedError) -> Self {
        match err {
            FeedError::Database(e) => ApiError::from(e),
            other => {
                error!(error = %other, "Ranking feed error");
                ApiError::internal("An internal error occurred")
            }
        }
    }
}

/// Malformed or mistyped JSON bodies.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

/// Missing or malformed multipart content type.
impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

/// Errors while reading multipart fields.
impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            warn!(error = %err, "Multipart body over the request limit");
            return ApiError::new(ErrorCode::PayloadTooLarge, err.body_text());
        }
        ApiError::validation(err.body_text())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Unit Tests
// =============================================================================
