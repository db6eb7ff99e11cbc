//! # Error Types
//!
//! Domain-specific error types for inventory-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  inventory-core errors (this file)                                     │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  inventory-db        └── DbError       - Product store failures        │
//! │  inventory-receipts  └── ReceiptError  - Receipt store failures        │
//! │  inventory-api       └── ApiError      - What HTTP clients see         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → HTTP status            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found.
    #[error("Product not found: {0}")]
    ProductNotFound(i64),

    /// The product ID in a request body does not match the one in the path.
    ///
    /// ## When This Occurs
    /// ```text
    /// PUT /products/7   { "productId": 5, ... }
    ///      │
    ///      ▼
    /// IdMismatch { path_id: 7, body_id: 5 }  → 400, nothing is written
    /// ```
    #[error("Product ID {body_id} in body does not match ID {path_id} in path")]
    IdMismatch { path_id: i64, body_id: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when input doesn't meet requirements.
/// Used for early validation before anything reaches a store.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Invalid format (e.g., a price with three decimals).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::IdMismatch {
            path_id: 7,
            body_id: 5,
        };
        assert_eq!(
            err.to_string(),
            "Product ID 5 in body does not match ID 7 in path"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Negative {
            field: "quantityOnHand".to_string(),
        };
        assert_eq!(err.to_string(), "quantityOnHand must not be negative");

        let err = ValidationError::TooLong {
            field: "sku".to_string(),
            max: 255,
        };
        assert_eq!(err.to_string(), "sku must be at most 255 characters");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "filename".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
