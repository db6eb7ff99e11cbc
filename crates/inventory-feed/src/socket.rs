//! # Ranking WebSocket
//!
//! Upgrades a connection and streams ranking snapshots to it.
//!
//! ## Per-Connection Tasks
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ranking_socket (upgrade)                                              │
//! │       │  subscribe ──✗ registry full ──▶ 503, no upgrade                │
//! │       ▼                                                                 │
//! │  ┌──────────────────────────────┐   ┌──────────────────────────────┐   │
//! │  │ writer task                  │   │ reader loop                  │   │
//! │  │ 1. push current snapshot     │   │ Close frame ──▶ stop         │   │
//! │  │ 2. mark Streaming            │   │ read error  ──▶ stop         │   │
//! │  │ 3. loop:                     │   │ stream end  ──▶ stop         │   │
//! │  │    slot changed ──▶ send     │   │ anything else ignored        │   │
//! │  │    ping timer   ──▶ ping     │   └──────────────┬───────────────┘   │
//! │  │ every send has a deadline    │                  │                   │
//! │  └──────────────┬───────────────┘                  │                   │
//! │                 └──────── first to finish ─────────┘                   │
//! │                                  │                                      │
//! │                                  ▼                                      │
//! │                  abort writer, unsubscribe (Disconnected)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{Sink, SinkExt, StreamExt};
use tokio::time::{interval_at, timeout, Instant};
use tracing::{debug, info, warn};

use crate::feed::RankingFeed;
use crate::registry::{Snapshot, Subscription};

/// Clients only send control frames; anything larger is a protocol error.
const MAX_MESSAGE_SIZE: usize = 64 * 1024;

// =============================================================================
// Upgrade Handler
// =============================================================================

/// WebSocket upgrade handler for the ranking feed.
///
/// Mount it with any router whose state yields a [`RankingFeed`] through
/// `FromRef`.
pub async fn ranking_socket(ws: WebSocketUpgrade, State(feed): State<RankingFeed>) -> Response {
    let subscription = match feed.subscribe().await {
        Ok(subscription) => subscription,
        Err(e) => {
            warn!(error = %e, "Refusing ranking subscriber");
            return (StatusCode::SERVICE_UNAVAILABLE, e.to_string()).into_response();
        }
    };

    ws.max_message_size(MAX_MESSAGE_SIZE)
        .on_upgrade(move |socket| handle_socket(socket, feed, subscription))
}

/// Drives one upgraded connection until either side stops.
async fn handle_socket(socket: WebSocket, feed: RankingFeed, subscription: Subscription) {
    let id = subscription.id;
    let (sink, stream) = socket.split();

    let mut writer = tokio::spawn(write_loop(sink, feed.clone(), subscription));

    let reason = tokio::select! {
        reason = read_until_closed(stream, id) => reason,
        _ = &mut writer => "write failed",
    };

    writer.abort();
    feed.unsubscribe(id).await;
    info!(subscriber_id = id, reason, "Ranking socket closed");
}

// =============================================================================
// Writer
// =============================================================================

async fn write_loop(
    mut sink: SplitSink<WebSocket, Message>,
    feed: RankingFeed,
    subscription: Subscription,
) {
    let Subscription { id, mut rx } = subscription;
    let write_timeout = feed.config().write_timeout;
    let ping_every = feed.config().ping_interval;

    // Initial push so a new client doesn't wait a whole interval
    match feed.snapshot().await {
        Ok(snapshot) => {
            if send_snapshot(&mut sink, &snapshot, write_timeout).await.is_err() {
                return;
            }
            feed.mark_streaming(id).await;
        }
        Err(e) => warn!(subscriber_id = id, error = %e, "Initial snapshot failed"),
    }

    let mut ping = interval_at(Instant::now() + ping_every, ping_every);

    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let latest = rx.borrow_and_update().clone();
                if let Some(snapshot) = latest {
                    if send_snapshot(&mut sink, &snapshot, write_timeout).await.is_err() {
                        break;
                    }
                    feed.mark_streaming(id).await;
                }
            }
            _ = ping.tick() => {
                if send_with_deadline(&mut sink, Message::Ping(Bytes::new()), write_timeout)
                    .await
                    .is_err()
                {
                    break;
                }
            }
        }
    }

    debug!(subscriber_id = id, "Ranking writer stopped");
}

async fn send_snapshot<S>(sink: &mut S, snapshot: &Snapshot, limit: Duration) -> Result<(), ()>
where
    S: Sink<Message> + Unpin,
    S::Error: std::fmt::Display,
{
    send_with_deadline(sink, Message::Text(snapshot.to_string().into()), limit).await
}

/// Sends one frame, giving up after `limit`.
async fn send_with_deadline<S>(sink: &mut S, msg: Message, limit: Duration) -> Result<(), ()>
where
    S: Sink<Message> + Unpin,
    S::Error: std::fmt::Display,
{
    match timeout(limit, sink.send(msg)).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => {
            debug!(error = %e, "WebSocket send failed");
            Err(())
        }
        Err(_) => {
            warn!(?limit, "WebSocket send timed out");
            Err(())
        }
    }
}

// =============================================================================
// Reader
// =============================================================================

/// Reads until the client closes or the connection fails.
async fn read_until_closed(mut stream: SplitStream<WebSocket>, id: u64) -> &'static str {
    loop {
        match stream.next().await {
            Some(Ok(Message::Close(_))) => return "client closed",
            Some(Ok(_)) => {}
            Some(Err(e)) => {
                warn!(subscriber_id = id, error = %e, "WebSocket read error");
                return "read error";
            }
            None => return "stream ended",
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
