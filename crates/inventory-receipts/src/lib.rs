//! # inventory-receipts: Receipt Store
//!
//! Stores uploaded receipt files in one directory, keyed by filename.
//!
//! ## Lifecycle of a Receipt
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  upload (stream of chunks)                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate filename ──► buffer up to the cap ──► over? reject, no write │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  <root>/<filename>   created or truncated, then written                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  download: read first 512 bytes ──► sniff type ──► rewind ──► stream   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No content type is stored. It is derived from the bytes on every
//! download, so the answer never depends on what the uploader claimed.

pub mod error;
pub mod store;

pub use error::{BoxError, ReceiptError, ReceiptResult};
pub use store::{ReceiptDownload, ReceiptStore};
