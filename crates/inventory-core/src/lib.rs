//! # inventory-core: Pure Business Logic for the Inventory Service
//!
//! This crate holds the domain types and rules shared by every other crate
//! in the workspace. It performs no I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Inventory Service Architecture                     │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 apps/inventory-api (axum)                       │   │
//! │  │   /products   /receipts   /websocket   /health                  │   │
//! │  └────────┬──────────────────┬──────────────────┬──────────────────┘   │
//! │           │                  │                  │                       │
//! │  ┌────────▼───────┐  ┌───────▼──────────┐  ┌────▼────────────┐         │
//! │  │  inventory-db  │  │ inventory-       │  │ inventory-feed  │         │
//! │  │  ProductRepo   │  │ receipts         │  │ top-N pushes    │         │
//! │  └────────┬───────┘  └───────┬──────────┘  └────┬────────────┘         │
//! │           │                  │                  │                       │
//! │  ┌────────▼──────────────────▼──────────────────▼──────────────────┐   │
//! │  │               ★ inventory-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐   │   │
//! │  │   │   types   │  │   money   │  │  sniff    │  │ validation│   │   │
//! │  │   │  Product  │  │   Money   │  │  MIME     │  │   rules   │   │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product)
//! - [`money`] - Decimal price with two fraction digits, stored as cents
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation for products and receipt filenames
//! - [`sniff`] - Content-type detection from leading bytes
//!
//! ## Example Usage
//!
//! ```rust
//! use inventory_core::money::Money;
//!
//! let price: Money = "9.99".parse().unwrap();
//! assert_eq!(price.cents(), 999);
//! assert_eq!(price.to_string(), "9.99");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod sniff;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Number of products in a ranking snapshot.
pub const DEFAULT_TOP_N: u32 = 10;

/// Largest receipt upload accepted (5 MiB).
pub const MAX_RECEIPT_BYTES: usize = 5 << 20;

/// Number of leading bytes inspected when sniffing a content type.
pub const SNIFF_LEN: usize = 512;

/// Maximum length of any free-text product field.
pub const MAX_TEXT_FIELD_LEN: usize = 255;
