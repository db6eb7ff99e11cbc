//! # Subscriber Registry
//!
//! Bounded map of open subscribers keyed by connection ID.
//!
//! ## One Slot per Subscriber
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  broadcast(snapshot)                                                   │
//! │       │                                                                 │
//! │       ├── id 1: receiver alive  ──▶ slot = snapshot  (old one dropped) │
//! │       ├── id 2: receiver dropped ──▶ pruned from the map               │
//! │       └── id 3: receiver alive  ──▶ slot = snapshot                    │
//! │                                                                         │
//! │  Nothing here awaits a subscriber. A slow reader simply finds only     │
//! │  the newest snapshot when it next looks.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{watch, RwLock};
use tracing::{debug, info, warn};

use crate::error::{FeedError, FeedResult};

/// A serialized ranking, shared by every subscriber it is pushed to.
pub type Snapshot = Arc<str>;

// =============================================================================
// Subscriber State
// =============================================================================

/// Where a subscriber is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriberState {
    /// Registered; nothing written yet.
    Connected,
    /// At least one snapshot has been written.
    Streaming,
    /// Gone. Terminal.
    Disconnected,
}

struct SubscriberEntry {
    tx: watch::Sender<Option<Snapshot>>,
    state: SubscriberState,
}

/// The receiving half handed to a new subscriber.
#[derive(Debug)]
pub struct Subscription {
    /// Connection ID, unique for the lifetime of the registry.
    pub id: u64,

    /// Latest undelivered snapshot. `None` until the first broadcast.
    pub rx: watch::Receiver<Option<Snapshot>>,
}

// =============================================================================
// Registry
// =============================================================================

/// Registry of open subscribers.
pub struct SubscriberRegistry {
    subscribers: RwLock<HashMap<u64, SubscriberEntry>>,
    next_id: AtomicU64,
    capacity: usize,
}

impl SubscriberRegistry {
    /// Creates an empty registry holding at most `capacity` subscribers.
    pub fn new(capacity: usize) -> Arc<Self> {
        Arc::new(SubscriberRegistry {
            subscribers: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            capacity,
        })
    }

    /// Registers a new subscriber in the `Connected` state.
    pub async fn subscribe(&self) -> FeedResult<Subscription> {
        let mut subscribers = self.subscribers.write().await;

        if subscribers.len() >= self.capacity {
            warn!(capacity = self.capacity, "Subscriber limit reached");
            return Err(FeedError::RegistryFull {
                capacity: self.capacity,
            });
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = watch::channel(None);
        subscribers.insert(
            id,
            SubscriberEntry {
                tx,
                state: SubscriberState::Connected,
            },
        );

        info!(
            subscriber_id = id,
            count = subscribers.len(),
            "Subscriber joined"
        );
        Ok(Subscription { id, rx })
    }

    /// Moves a subscriber to `Streaming`. No-op once it has left.
    pub async fn mark_streaming(&self, id: u64) {
        if let Some(entry) = self.subscribers.write().await.get_mut(&id) {
            entry.state = SubscriberState::Streaming;
        }
    }

    /// Removes a subscriber. Removing an unknown ID does nothing.
    pub async fn unsubscribe(&self, id: u64) {
        let mut subscribers = self.subscribers.write().await;
        if subscribers.remove(&id).is_some() {
            info!(
                subscriber_id = id,
                count = subscribers.len(),
                "Subscriber left"
            );
        }
    }

    /// Current state of `id`. IDs that have left report `Disconnected`.
    pub async fn state(&self, id: u64) -> SubscriberState {
        self.subscribers
            .read()
            .await
            .get(&id)
            .map(|entry| entry.state)
            .unwrap_or(SubscriberState::Disconnected)
    }

    /// Number of open subscribers.
    pub async fn len(&self) -> usize {
        self.subscribers.read().await.len()
    }

    /// True when no subscriber is open.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Hands `snapshot` to every live subscriber and prunes dead ones.
    ///
    /// ## Returns
    /// Number of subscribers the snapshot was handed to.
    pub async fn broadcast(&self, snapshot: Snapshot) -> usize {
        let mut dead = Vec::new();
        let mut delivered = 0;

        {
            let subscribers = self.subscribers.read().await;
            for (id, entry) in subscribers.iter() {
                if entry.tx.is_closed() {
                    dead.push(*id);
                    continue;
                }
                entry.tx.send_replace(Some(snapshot.clone()));
                delivered += 1;
            }
        }

        if !dead.is_empty() {
            let mut subscribers = self.subscribers.write().await;
            for id in &dead {
                subscribers.remove(id);
            }
            warn!(removed = dead.len(), "Pruned disconnected subscribers");
        }

        debug!(delivered, "Snapshot broadcast");
        delivered
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
