//! Observability events for tokenrelay
//!
//! Every lifecycle transition worth logging has a typed event.
//! Events are rendered as UPPER_SNAKE names in the `event` log field.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Boot & Lifecycle
    /// Startup begins
    BootStart,
    /// Configuration loaded
    ConfigLoaded,
    /// Listener bound, ready for requests
    Serving,
    /// Shutdown signal received
    ShutdownStart,
    /// Server stopped
    ShutdownComplete,

    // Subscriptions
    /// Channel registered for a token
    SubscriptionOpened,
    /// Earlier subscriber for the same token evicted by a new open
    SubscriptionReplaced,
    /// Entry removed by its own channel closing
    SubscriptionClosed,
    /// Subscribe rejected for malformed input
    SubscriptionRejected,

    // Publishing
    /// Notification pushed to a live subscriber
    PublishDelivered,
    /// No subscriber registered for the token
    PublishMissed,
    /// Subscriber transport found dead during publish
    StaleChannelEvicted,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BootStart => "TOKENRELAY_STARTUP_BEGIN",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::Serving => "TOKENRELAY_SERVING",
            Event::ShutdownStart => "SHUTDOWN_START",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",

            Event::SubscriptionOpened => "SUBSCRIPTION_OPENED",
            Event::SubscriptionReplaced => "SUBSCRIPTION_REPLACED",
            Event::SubscriptionClosed => "SUBSCRIPTION_CLOSED",
            Event::SubscriptionRejected => "SUBSCRIPTION_REJECTED",

            Event::PublishDelivered => "PUBLISH_DELIVERED",
            Event::PublishMissed => "PUBLISH_MISSED",
            Event::StaleChannelEvicted => "STALE_CHANNEL_EVICTED",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_events_have_string_representation() {
        let events = [
            Event::BootStart,
            Event::ConfigLoaded,
            Event::Serving,
            Event::ShutdownStart,
            Event::ShutdownComplete,
            Event::SubscriptionOpened,
            Event::SubscriptionReplaced,
            Event::SubscriptionClosed,
            Event::SubscriptionRejected,
            Event::PublishDelivered,
            Event::PublishMissed,
            Event::StaleChannelEvicted,
        ];

        for event in events {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_event_display() {
        assert_eq!(format!("{}", Event::PublishDelivered), "PUBLISH_DELIVERED");
        assert_eq!(format!("{}", Event::BootStart), "TOKENRELAY_STARTUP_BEGIN");
    }
}
