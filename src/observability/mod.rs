//! Observability subsystem for tokenrelay
//!
//! This module provides:
//! - Structured logging through `tracing`
//! - Typed lifecycle events
//! - Monotonic counters
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on notification delivery
//! 3. Observability failure never crashes the server
//!
//! # Usage
//!
//! ```ignore
//! use tokenrelay::observability::{init_logging, log_event, Event, LogFormat, MetricsRegistry};
//!
//! init_logging(LogFormat::Json, "info")?;
//! log_event(Event::BootStart);
//!
//! let metrics = MetricsRegistry::new();
//! metrics.increment_publishes_delivered();
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{init_logging, LogFormat};
pub use metrics::{MetricsRegistry, MetricsSnapshot};

use std::fmt;

/// Observability error
///
/// Observability errors are never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservabilityError {
    message: String,
}

impl ObservabilityError {
    /// Create a new observability error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Get the message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Error code string
    pub fn code(&self) -> &'static str {
        "TOKENRELAY_OBSERVABILITY_FAILED"
    }
}

impl fmt::Display for ObservabilityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message)
    }
}

impl std::error::Error for ObservabilityError {}

/// Result type for observability operations
pub type ObservabilityResult<T> = Result<T, ObservabilityError>;

/// Log a lifecycle event at INFO
pub fn log_event(event: Event) {
    tracing::info!(event = event.as_str());
}
