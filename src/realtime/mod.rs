//! # tokenrelay Real-Time Module
//!
//! Token-keyed pub/sub core: a subscriber waits on a channel for one token,
//! a later publish for the same token pushes a single `verified` signal.
//!
//! ## Architecture
//!
//! - **Subscriptions**: token → channel registry, owns subscriber lifecycle
//! - **Channel**: per-subscriber transport (open, send, close hook)
//! - **Event**: the notification and publish outcome types
//!
//! Delivery is best-effort. A publish with no registered subscriber is a
//! normal miss, not an error.

pub mod channel;
pub mod errors;
pub mod event;
pub mod subscription;

pub use channel::{ChannelHandle, ChannelId, ChannelSender};
pub use errors::{RealtimeError, RealtimeResult};
pub use event::{Notification, NotificationKind, PublishResult};
pub use subscription::{SubscriptionRegistry, VerificationStatus, DEFAULT_VERIFIED_CAPACITY};
