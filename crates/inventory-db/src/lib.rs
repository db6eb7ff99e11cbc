//! # inventory-db: Product Store
//!
//! Typed CRUD and ranking queries over a single `products` table.
//! SQLite is the store; sqlx drives it asynchronously.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Inventory Service Data Flow                        │
//! │                                                                         │
//! │  HTTP handler (GET /api/products/7)     Ranking ticker (every 10s)     │
//! │       │                                      │                          │
//! │       ▼                                      ▼                          │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  inventory-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repository   │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ (product.rs)  │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ get / list    │    │ 001_create_  │  │   │
//! │  │   │ DbConfig      │    │ top_n         │    │   products   │  │   │
//! │  │   │               │    │ insert/update │    │              │  │   │
//! │  │   └───────────────┘    │ remove        │    └──────────────┘  │   │
//! │  │                        └───────────────┘                       │   │
//! │  │            every call wrapped in a deadline (15s / 3s)         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use inventory_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./inventory.db")).await?;
//!
//! let id = db.products().insert(&product).await?;
//! let top = db.products().top_n(10).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::product::ProductRepository;
