//! # Validation Module
//!
//! Input validation for products and receipt filenames.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP facade                                                  │
//! │  └── JSON decoding, path/body ID agreement                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── quantityOnHand >= 0, pricePerUnit >= 0                            │
//! │  ├── field lengths                                                     │
//! │  └── receipt filenames usable as a single path component               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  └── CHECK (quantity_on_hand >= 0)                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use inventory_core::validation::validate_receipt_filename;
//!
//! assert!(validate_receipt_filename("receipt-001.pdf").is_ok());
//! assert!(validate_receipt_filename("../etc/passwd").is_err());
//! ```

use crate::error::ValidationError;
use crate::types::Product;
use crate::MAX_TEXT_FIELD_LEN;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Product Validation
// =============================================================================

/// Validates a product before it is written.
///
/// ## Rules
/// - `quantityOnHand` must not be negative
/// - `pricePerUnit` must not be negative
/// - Text fields are at most 255 characters
///
/// Empty text fields are allowed.
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    if product.quantity_on_hand < 0 {
        return Err(ValidationError::Negative {
            field: "quantityOnHand".to_string(),
        });
    }

    if product.price_per_unit.is_negative() {
        return Err(ValidationError::Negative {
            field: "pricePerUnit".to_string(),
        });
    }

    for (field, value) in [
        ("manufacturer", &product.manufacturer),
        ("sku", &product.sku),
        ("upc", &product.upc),
        ("productName", &product.product_name),
    ] {
        if value.chars().count() > MAX_TEXT_FIELD_LEN {
            return Err(ValidationError::TooLong {
                field: field.to_string(),
                max: MAX_TEXT_FIELD_LEN,
            });
        }
    }

    Ok(())
}

// =============================================================================
// Receipt Filename Validation
// =============================================================================

/// Validates a receipt filename used as a storage key.
///
/// ## Rules
/// - Must not be empty
/// - Must not be `.` or `..`
/// - Must not contain `/`, `\` or NUL
///
/// The name is otherwise kept verbatim; a later upload with the same name
/// overwrites the earlier file.
pub fn validate_receipt_filename(name: &str) -> ValidationResult<()> {
    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "filename".to_string(),
        });
    }

    if name == "." || name == ".." {
        return Err(ValidationError::InvalidFormat {
            field: "filename".to_string(),
            reason: "must name a file".to_string(),
        });
    }

    if name.contains(|c| matches!(c, '/' | '\\' | '\0')) {
        return Err(ValidationError::InvalidFormat {
            field: "filename".to_string(),
            reason: "must not contain path separators".to_string(),
        });
    }

    if name.chars().count() > MAX_TEXT_FIELD_LEN {
        return Err(ValidationError::TooLong {
            field: "filename".to_string(),
            max: MAX_TEXT_FIELD_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn widget() -> Product {
        Product {
            product_id: 0,
            manufacturer: "Acme".to_string(),
            sku: "A1".to_string(),
            upc: "000".to_string(),
            price_per_unit: Money::from_cents(999),
            quantity_on_hand: 50,
            product_name: "Widget".to_string(),
        }
    }

    #[test]
    fn test_valid_product() {
        assert!(validate_product(&widget()).is_ok());
    }

    #[test]
    fn test_negative_quantity_rejected() {
        let mut p = widget();
        p.quantity_on_hand = -1;
        assert!(matches!(
            validate_product(&p),
            Err(ValidationError::Negative { .. })
        ));
    }

    #[test]
    fn test_negative_price_rejected() {
        let mut p = widget();
        p.price_per_unit = Money::from_cents(-1);
        assert!(validate_product(&p).is_err());
    }

    #[test]
    fn test_long_field_rejected() {
        let mut p = widget();
        p.sku = "S".repeat(256);
        assert!(matches!(
            validate_product(&p),
            Err(ValidationError::TooLong { .. })
        ));
    }

    #[test]
    fn test_receipt_filenames() {
        assert!(validate_receipt_filename("scan 2024-01-01.png").is_ok());
        assert!(validate_receipt_filename("").is_err());
        assert!(validate_receipt_filename("..").is_err());
        assert!(validate_receipt_filename("a/b.txt").is_err());
        assert!(validate_receipt_filename("a\\b.txt").is_err());
    }
}
