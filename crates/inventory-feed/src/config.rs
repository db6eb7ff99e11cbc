//! # Feed Configuration

use std::time::Duration;

use inventory_core::DEFAULT_TOP_N;

/// Default time between ranking pushes.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(10);

/// Default cap on simultaneously open subscribers.
pub const DEFAULT_MAX_SUBSCRIBERS: usize = 1024;

/// Default deadline for one write to one socket.
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(2);

/// Ping interval to keep idle connections alive.
pub const DEFAULT_PING_INTERVAL: Duration = Duration::from_secs(30);

/// Ranking feed configuration.
///
/// ## Example
/// ```rust
/// use inventory_feed::FeedConfig;
/// use std::time::Duration;
///
/// let config = FeedConfig::default().interval(Duration::from_secs(5)).top_n(3);
/// assert_eq!(config.top_n, 3);
/// ```
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Time between pushes.
    pub interval: Duration,

    /// Products per snapshot.
    pub top_n: u32,

    /// Subscribers beyond this are turned away.
    pub max_subscribers: usize,

    /// A socket write taking longer than this disconnects the subscriber.
    pub write_timeout: Duration,

    /// Keepalive ping period.
    pub ping_interval: Duration,
}

impl Default for FeedConfig {
    fn default() -> Self {
        FeedConfig {
            interval: DEFAULT_INTERVAL,
            top_n: DEFAULT_TOP_N,
            max_subscribers: DEFAULT_MAX_SUBSCRIBERS,
            write_timeout: DEFAULT_WRITE_TIMEOUT,
            ping_interval: DEFAULT_PING_INTERVAL,
        }
    }
}

impl FeedConfig {
    /// Sets the push interval.
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Sets the snapshot size.
    pub fn top_n(mut self, n: u32) -> Self {
        self.top_n = n;
        self
    }

    /// Sets the subscriber cap.
    pub fn max_subscribers(mut self, max: usize) -> Self {
        self.max_subscribers = max;
        self
    }

    /// Sets the per-write deadline.
    pub fn write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FeedConfig::default();
        assert_eq!(config.interval, Duration::from_secs(10));
        assert_eq!(config.top_n, 10);
        assert_eq!(config.max_subscribers, 1024);
    }
}
