//! # Application State
//!
//! Shared handles passed to every handler. All fields are cheap to clone.

use axum::extract::FromRef;

use inventory_db::{Database, ProductRepository};
use inventory_feed::RankingFeed;
use inventory_receipts::ReceiptStore;

/// State shared by every route.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub receipts: ReceiptStore,
    pub feed: RankingFeed,
}

impl AppState {
    pub fn new(db: Database, receipts: ReceiptStore, feed: RankingFeed) -> Self {
        AppState { db, receipts, feed }
    }

    /// Product repository over the shared pool.
    pub fn products(&self) -> ProductRepository {
        self.db.products()
    }
}

/// Lets `ranking_socket` pull the feed out of the app state.
impl FromRef<AppState> for RankingFeed {
    fn from_ref(state: &AppState) -> Self {
        state.feed.clone()
    }
}
