//! # Repository Module
//!
//! Database repository implementations for the inventory service.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  HTTP handler / ranking ticker                                         │
//! │       │                                                                 │
//! │       │  db.products().top_n(10)                                       │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── get(&self, id)                                                    │
//! │  ├── list(&self)                                                       │
//! │  ├── top_n(&self, n)                                                   │
//! │  ├── insert(&self, product)                                            │
//! │  ├── update(&self, product)                                            │
//! │  └── remove(&self, id)                                                 │
//! │       │                                                                 │
//! │       │  Parameterized SQL, bounded by a deadline                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Product CRUD and ranking

pub mod product;
