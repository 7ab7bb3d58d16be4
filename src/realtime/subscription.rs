//! # Subscription Management
//!
//! Token-keyed registry of waiting subscribers.
//!
//! Exactly zero or one subscription exists per token. The registry owns the
//! sending half of every registered channel; the receiving half carries a
//! close hook back into the registry so a departing peer frees its entry.
//!
//! All mutations go through one write lock, so `open`, `publish` and `close`
//! for the same token never interleave.
//!
//! Verified status outlives the subscription but is bounded: only the most
//! recently verified tokens are remembered, oldest forgotten first.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, RwLock, Weak};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::channel::{self, ChannelHandle, ChannelId, ChannelSender};
use super::errors::{RealtimeError, RealtimeResult};
use super::event::{Notification, PublishResult};
use crate::observability::{Event, MetricsRegistry};

/// Verification status of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    /// No notification has been delivered for the token
    Pending,
    /// A notification reached a live subscriber
    Verified,
}

/// A registered subscriber
#[derive(Debug)]
struct Subscription {
    sender: ChannelSender,
    created_at: DateTime<Utc>,
}

/// Default number of verified tokens remembered for status queries
pub const DEFAULT_VERIFIED_CAPACITY: usize = 10_000;

/// Tokens with at least one delivered notification, oldest evicted first
#[derive(Debug)]
struct VerifiedTokens {
    members: HashSet<String>,
    order: VecDeque<String>,
    capacity: usize,
}

impl VerifiedTokens {
    fn new(capacity: usize) -> Self {
        Self {
            members: HashSet::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    fn insert(&mut self, token: &str) {
        if !self.members.insert(token.to_string()) {
            return;
        }
        self.order.push_back(token.to_string());

        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.members.remove(&oldest);
            }
        }
    }

    fn contains(&self, token: &str) -> bool {
        self.members.contains(token)
    }

    fn len(&self) -> usize {
        self.members.len()
    }
}

#[derive(Debug)]
struct RegistryState {
    /// Live subscriptions by token
    by_token: HashMap<String, Subscription>,

    verified: VerifiedTokens,
}

#[derive(Debug)]
struct RegistryInner {
    state: RwLock<RegistryState>,
    metrics: Arc<MetricsRegistry>,
}

/// Registry of active subscriptions
///
/// Cloning is cheap and every clone addresses the same table.
#[derive(Debug, Clone)]
pub struct SubscriptionRegistry {
    inner: Arc<RegistryInner>,
}

impl Default for SubscriptionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SubscriptionRegistry {
    /// Create a new registry with its own metrics
    pub fn new() -> Self {
        Self::with_metrics(Arc::new(MetricsRegistry::new()))
    }

    /// Create a registry reporting into shared metrics
    pub fn with_metrics(metrics: Arc<MetricsRegistry>) -> Self {
        Self::with_limits(metrics, DEFAULT_VERIFIED_CAPACITY)
    }

    /// Create a registry remembering at most `verified_capacity` verified tokens
    pub fn with_limits(metrics: Arc<MetricsRegistry>, verified_capacity: usize) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                state: RwLock::new(RegistryState {
                    by_token: HashMap::new(),
                    verified: VerifiedTokens::new(verified_capacity),
                }),
                metrics,
            }),
        }
    }

    /// Metrics this registry reports into
    pub fn metrics(&self) -> &Arc<MetricsRegistry> {
        &self.inner.metrics
    }

    /// Register a new channel for `token`
    ///
    /// Replaces any existing subscription for the token. The evicted
    /// subscriber is not told; its stream ends without yielding.
    pub fn open(&self, token: &str) -> RealtimeResult<ChannelHandle> {
        if token.is_empty() {
            warn!(event = %Event::SubscriptionRejected, "empty token");
            return Err(RealtimeError::InvalidInput("Missing token".into()));
        }

        let (sender, mut handle) = channel::open();
        let channel_id = sender.id();

        let replaced = {
            let mut state = self.inner.state.write()
                .map_err(|_| RealtimeError::Internal("Lock poisoned".into()))?;

            state
                .by_token
                .insert(
                    token.to_string(),
                    Subscription {
                        sender,
                        created_at: Utc::now(),
                    },
                )
                .map(|previous| previous.sender.id())
        };

        let weak: Weak<RegistryInner> = Arc::downgrade(&self.inner);
        let hook_token = token.to_string();
        handle.on_close(move |id| {
            if let Some(inner) = weak.upgrade() {
                SubscriptionRegistry { inner }.close(&hook_token, &id);
            }
        });

        self.inner.metrics.increment_subscriptions_opened();
        if let Some(previous) = replaced {
            self.inner.metrics.increment_subscriptions_replaced();
            info!(
                event = %Event::SubscriptionReplaced,
                token,
                %channel_id,
                previous_channel_id = %previous,
                "subscription replaced"
            );
        } else {
            info!(event = %Event::SubscriptionOpened, token, %channel_id, "subscription opened");
        }

        Ok(handle)
    }

    /// Push one `verified` notification to the subscriber for `token`
    ///
    /// A miss is a normal outcome. A dead transport evicts the entry and
    /// also reports a miss.
    pub fn publish(&self, token: &str) -> PublishResult {
        let mut state = match self.inner.state.write() {
            Ok(state) => state,
            Err(_) => {
                warn!(token, "registry lock poisoned; publish dropped");
                self.inner.metrics.increment_publishes_missed();
                return PublishResult::missed();
            }
        };

        let attempt = state
            .by_token
            .get(token)
            .map(|sub| (sub.sender.id(), sub.sender.send(Notification::verified())));

        match attempt {
            None => {
                drop(state);
                self.inner.metrics.increment_publishes_missed();
                debug!(event = %Event::PublishMissed, token, "no subscriber");
                PublishResult::missed()
            }
            Some((channel_id, Ok(()))) => {
                state.verified.insert(token);
                drop(state);
                self.inner.metrics.increment_publishes_delivered();
                info!(event = %Event::PublishDelivered, token, %channel_id, "notification delivered");
                PublishResult::delivered()
            }
            Some((channel_id, Err(_))) => {
                state.by_token.remove(token);
                drop(state);
                self.inner.metrics.increment_stale_channels_evicted();
                self.inner.metrics.increment_publishes_missed();
                warn!(event = %Event::StaleChannelEvicted, token, %channel_id, "subscriber transport closed");
                PublishResult::missed()
            }
        }
    }

    /// Remove the entry for `token` if it is still bound to `channel_id`
    ///
    /// Returns whether an entry was removed. Stale or repeated closes are
    /// no-ops, so a late close never removes a newer subscription.
    pub fn close(&self, token: &str, channel_id: &ChannelId) -> bool {
        let removed = {
            let Ok(mut state) = self.inner.state.write() else {
                return false;
            };

            let matches = state
                .by_token
                .get(token)
                .is_some_and(|sub| sub.sender.id() == *channel_id);
            if matches {
                state.by_token.remove(token)
            } else {
                None
            }
        };

        match removed {
            Some(sub) => {
                self.inner.metrics.increment_subscriptions_closed();
                let lifetime_ms = (Utc::now() - sub.created_at).num_milliseconds();
                info!(
                    event = %Event::SubscriptionClosed,
                    token,
                    %channel_id,
                    lifetime_ms,
                    "subscription closed"
                );
                true
            }
            None => false,
        }
    }

    /// Verification status of `token`
    ///
    /// `Verified` only once a publish actually reached a subscriber.
    pub fn status(&self, token: &str) -> VerificationStatus {
        match self.inner.state.read() {
            Ok(state) if state.verified.contains(token) => VerificationStatus::Verified,
            _ => VerificationStatus::Pending,
        }
    }

    /// Whether a subscriber is registered for `token`
    pub fn contains(&self, token: &str) -> bool {
        self.inner
            .state
            .read()
            .map(|s| s.by_token.contains_key(token))
            .unwrap_or(false)
    }

    /// Channel currently registered for `token`
    pub fn channel_id(&self, token: &str) -> Option<ChannelId> {
        self.inner
            .state
            .read()
            .ok()
            .and_then(|s| s.by_token.get(token).map(|sub| sub.sender.id()))
    }

    /// Number of verified tokens currently remembered
    pub fn verified_count(&self) -> usize {
        self.inner.state.read().map(|s| s.verified.len()).unwrap_or(0)
    }

    /// Get subscription count
    pub fn len(&self) -> usize {
        self.inner.state.read().map(|s| s.by_token.len()).unwrap_or(0)
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
