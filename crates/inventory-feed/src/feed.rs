//! # Ranking Feed
//!
//! Owns the ticker task that computes the ranking and hands it to the
//! subscriber registry.
//!
//! ## Tick
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  interval fires                                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  top_n(10)  (3s deadline) ──✗──▶ log, skip this tick                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  serde_json::to_string(&products)   once per tick                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  registry.broadcast(snapshot)       never awaits a socket              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use inventory_db::ProductRepository;

use crate::config::FeedConfig;
use crate::error::{FeedError, FeedResult};
use crate::registry::{Snapshot, SubscriberRegistry, SubscriberState, Subscription};

// =============================================================================
// Ranking Feed
// =============================================================================

/// Shared handle to the ranking feed. Cheap to clone.
#[derive(Clone)]
pub struct RankingFeed {
    products: ProductRepository,
    registry: Arc<SubscriberRegistry>,
    config: Arc<FeedConfig>,
}

impl RankingFeed {
    /// Creates a feed over `products`. Nothing runs until [`start`](Self::start).
    pub fn new(products: ProductRepository, config: FeedConfig) -> Self {
        RankingFeed {
            products,
            registry: SubscriberRegistry::new(config.max_subscribers),
            config: Arc::new(config),
        }
    }

    /// Feed configuration.
    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// Registers a new subscriber.
    pub async fn subscribe(&self) -> FeedResult<Subscription> {
        self.registry.subscribe().await
    }

    /// Removes a subscriber.
    pub async fn unsubscribe(&self, id: u64) {
        self.registry.unsubscribe(id).await
    }

    /// Records that `id` has received its first snapshot.
    pub async fn mark_streaming(&self, id: u64) {
        self.registry.mark_streaming(id).await
    }

    /// Lifecycle state of `id`.
    pub async fn subscriber_state(&self, id: u64) -> SubscriberState {
        self.registry.state(id).await
    }

    /// Number of open subscribers.
    pub async fn subscriber_count(&self) -> usize {
        self.registry.len().await
    }

    /// Computes and serializes the current ranking.
    ///
    /// Used by every tick, by the initial push on connect, and by the pull
    /// endpoint, so all three produce identical bytes.
    pub async fn snapshot(&self) -> FeedResult<Snapshot> {
        let products = self.products.top_n(self.config.top_n).await?;
        let json = serde_json::to_string(&products)?;
        Ok(Snapshot::from(json))
    }

    /// Runs one tick: compute, then broadcast.
    ///
    /// ## Returns
    /// Number of subscribers the snapshot was handed to.
    pub async fn tick(&self) -> FeedResult<usize> {
        let snapshot = self.snapshot().await?;
        Ok(self.registry.broadcast(snapshot).await)
    }

    /// Spawns the ticker. The first push happens one interval from now.
    pub fn start(&self) -> FeedHandle {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        let feed = self.clone();
        let period = self.config.interval;

        let task = tokio::spawn(async move {
            info!(interval = ?period, top_n = feed.config.top_n, "Ranking feed started");

            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        match feed.tick().await {
                            Ok(delivered) => debug!(delivered, "Ranking tick"),
                            Err(e) => error!(error = %e, "Ranking tick failed"),
                        }
                    }
                    _ = shutdown_rx.recv() => {
                        info!("Ranking feed shutting down");
                        break;
                    }
                }
            }
        });

        FeedHandle { shutdown_tx, task }
    }
}

// =============================================================================
// Feed Handle
// =============================================================================

/// Handle for stopping the ticker task.
pub struct FeedHandle {
    shutdown_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl FeedHandle {
    /// Stops the ticker and waits for it to exit.
    pub async fn shutdown(self) -> FeedResult<()> {
        self.shutdown_tx
            .send(())
            .await
            .map_err(|_| FeedError::TickerStopped)?;
        self.task.await.map_err(|_| FeedError::TickerStopped)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use inventory_core::{Money, Product};
    use inventory_db::{Database, DbConfig};
    use std::time::Duration;

    async fn seeded(quantities: &[i64]) -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        for (i, qty) in quantities.iter().enumerate() {
            let product = Product {
                product_id: 0,
                manufacturer: "Acme".to_string(),
                sku: format!("S{i}"),
                upc: "000".to_string(),
                price_per_unit: Money::from_cents(100),
                quantity_on_hand: *qty,
                product_name: format!("Item {i}"),
            };
            db.products().insert(&product).await.unwrap();
        }
        db
    }

    fn decode(snapshot: &str) -> Vec<Product> {
        serde_json::from_str(snapshot).unwrap()
    }

    #[tokio::test]
    async fn test_tick_pushes_ranking_to_every_subscriber() {
        let db = seeded(&[3, 30, 12]).await;
        let feed = RankingFeed::new(db.products(), FeedConfig::default());

        let mut a = feed.subscribe().await.unwrap();
        let mut b = feed.subscribe().await.unwrap();

        assert_eq!(feed.tick().await.unwrap(), 2);

        for sub in [&mut a, &mut b] {
            let snapshot = sub.rx.borrow_and_update().clone().unwrap();
            let qty: Vec<i64> = decode(&snapshot).iter().map(|p| p.quantity_on_hand).collect();
            assert_eq!(qty, vec![30, 12, 3]);
        }
    }

    #[tokio::test]
    async fn test_snapshot_respects_top_n() {
        let db = seeded(&[1, 2, 3, 4, 5]).await;
        let feed = RankingFeed::new(db.products(), FeedConfig::default().top_n(2));

        let products = decode(&feed.snapshot().await.unwrap());
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].quantity_on_hand, 5);
    }

    #[tokio::test]
    async fn test_empty_store_yields_empty_array() {
        let db = seeded(&[]).await;
        let feed = RankingFeed::new(db.products(), FeedConfig::default());

        assert_eq!(&*feed.snapshot().await.unwrap(), "[]");
    }

    #[tokio::test]
    async fn test_dropped_subscriber_is_removed_on_tick() {
        let db = seeded(&[7]).await;
        let feed = RankingFeed::new(db.products(), FeedConfig::default());

        let mut kept = feed.subscribe().await.unwrap();
        let dropped = feed.subscribe().await.unwrap();
        let dropped_id = dropped.id;
        drop(dropped);

        assert_eq!(feed.tick().await.unwrap(), 1);
        assert!(kept.rx.borrow_and_update().is_some());
        assert_eq!(feed.subscriber_count().await, 1);
        assert_eq!(
            feed.subscriber_state(dropped_id).await,
            SubscriberState::Disconnected
        );
    }

    #[tokio::test]
    async fn test_ticker_pushes_then_shuts_down() {
        let db = seeded(&[4, 9]).await;
        let config = FeedConfig::default().interval(Duration::from_millis(20));
        let feed = RankingFeed::new(db.products(), config);

        let mut sub = feed.subscribe().await.unwrap();
        let handle = feed.start();

        tokio::time::timeout(Duration::from_secs(5), sub.rx.changed())
            .await
            .expect("no snapshot within deadline")
            .unwrap();
        let snapshot = sub.rx.borrow_and_update().clone().unwrap();
        assert_eq!(decode(&snapshot)[0].quantity_on_hand, 9);

        handle.shutdown().await.unwrap();
    }
}
