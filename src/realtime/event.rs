//! # Notifications
//!
//! The single signal pushed to a waiting subscriber.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// The out-of-band action for the token was performed
    Verified,
}

impl NotificationKind {
    /// Wire name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Verified => "verified",
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A notification delivered through a channel
///
/// The core carries no payload; the act of delivery is the signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Notification kind
    pub kind: NotificationKind,

    /// When the notification was produced
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    /// Create a `verified` notification
    pub fn verified() -> Self {
        Self {
            kind: NotificationKind::Verified,
            timestamp: Utc::now(),
        }
    }

    /// SSE `data:` field for this notification
    pub fn sse_data(&self) -> &'static str {
        self.kind.as_str()
    }
}

/// Outcome of a publish attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PublishResult {
    /// Whether a live subscriber was found and pushed to
    pub delivered: bool,
}

impl PublishResult {
    /// A successful push
    pub fn delivered() -> Self {
        Self { delivered: true }
    }

    /// No subscriber, or its transport was gone
    pub fn missed() -> Self {
        Self { delivered: false }
    }
}
