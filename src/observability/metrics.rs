//! Metrics registry for tokenrelay
//!
//! - Counters only
//! - Monotonic increase
//! - Reset only on process start

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Metrics registry containing all operational counters
///
/// # Thread Safety
///
/// All counters use atomic operations for thread-safe increments.
/// Uses Relaxed ordering for minimal overhead (eventual consistency is fine for metrics).
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Channels registered for a token
    subscriptions_opened: AtomicU64,
    /// Opens that evicted an earlier subscriber for the same token
    subscriptions_replaced: AtomicU64,
    /// Entries removed by a matching close
    subscriptions_closed: AtomicU64,
    /// Publishes that reached a live subscriber
    publishes_delivered: AtomicU64,
    /// Publishes with no subscriber
    publishes_missed: AtomicU64,
    /// Entries evicted because the transport was already gone
    stale_channels_evicted: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new metrics registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment subscriptions opened
    pub fn increment_subscriptions_opened(&self) {
        self.subscriptions_opened.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment subscriptions replaced
    pub fn increment_subscriptions_replaced(&self) {
        self.subscriptions_replaced.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment subscriptions closed
    pub fn increment_subscriptions_closed(&self) {
        self.subscriptions_closed.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment delivered publishes
    pub fn increment_publishes_delivered(&self) {
        self.publishes_delivered.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment missed publishes
    pub fn increment_publishes_missed(&self) {
        self.publishes_missed.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment stale channel evictions
    pub fn increment_stale_channels_evicted(&self) {
        self.stale_channels_evicted.fetch_add(1, Ordering::Relaxed);
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            subscriptions_opened: self.subscriptions_opened.load(Ordering::Relaxed),
            subscriptions_replaced: self.subscriptions_replaced.load(Ordering::Relaxed),
            subscriptions_closed: self.subscriptions_closed.load(Ordering::Relaxed),
            publishes_delivered: self.publishes_delivered.load(Ordering::Relaxed),
            publishes_missed: self.publishes_missed.load(Ordering::Relaxed),
            stale_channels_evicted: self.stale_channels_evicted.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub subscriptions_opened: u64,
    pub subscriptions_replaced: u64,
    pub subscriptions_closed: u64,
    pub publishes_delivered: u64,
    pub publishes_missed: u64,
    pub stale_channels_evicted: u64,
}
