//! # inventory-feed: Ranking Feed
//!
//! Periodically ranks products by quantity on hand and pushes the result to
//! every open streaming subscriber.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Ranking Feed                                    │
//! │                                                                         │
//! │  ┌──────────────┐  every interval   ┌──────────────────────────────┐   │
//! │  │ Ticker task  │ ────────────────▶ │ ProductRepository::top_n(10) │   │
//! │  │ (feed.rs)    │                   └──────────────┬───────────────┘   │
//! │  └──────────────┘                                  │ serialize once    │
//! │                                                    ▼                   │
//! │                       ┌────────────────────────────────────────────┐   │
//! │                       │       SubscriberRegistry (registry.rs)     │   │
//! │                       │                                            │   │
//! │                       │   id 1 ─▶ [latest]   id 2 ─▶ [latest] ...  │   │
//! │                       │   one slot each; newer replaces older      │   │
//! │                       └──────┬──────────────────┬──────────────────┘   │
//! │                              │                  │                      │
//! │                              ▼                  ▼                      │
//! │                       ┌────────────┐     ┌────────────┐                │
//! │                       │ socket.rs  │     │ socket.rs  │  writer task   │
//! │                       │ writer     │     │ writer     │  per socket,   │
//! │                       └─────┬──────┘     └─────┬──────┘  bounded send  │
//! │                             ▼                  ▼                       │
//! │                          client 1           client 2                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The ticker never waits on a socket. A slow or dead client only ever costs
//! its own writer task.
//!
//! ## Subscriber Lifecycle
//! ```text
//! Connected ──(first snapshot written)──▶ Streaming ──(close/error)──▶ Disconnected
//! ```
//! Disconnected is terminal; IDs are never reused.

pub mod config;
pub mod error;
pub mod feed;
pub mod registry;
pub mod socket;

pub use config::FeedConfig;
pub use error::{FeedError, FeedResult};
pub use feed::{FeedHandle, RankingFeed};
pub use registry::{Snapshot, SubscriberRegistry, SubscriberState, Subscription};
pub use socket::ranking_socket;
