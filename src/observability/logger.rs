//! Structured logging initialisation for tokenrelay
//!
//! - `json`: one JSON object per line, for log aggregation
//! - `pretty`: human-readable lines, for local development
//!
//! `RUST_LOG` overrides the configured filter when set.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt as tracing_fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::{ObservabilityError, ObservabilityResult};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Newline-delimited JSON
    Json,
    /// Human-readable output
    Pretty,
}

impl LogFormat {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Json => "json",
            LogFormat::Pretty => "pretty",
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LogFormat {
    type Err = ObservabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            other => Err(ObservabilityError::new(format!(
                "Unknown log format '{}'. Expected 'json' or 'pretty'.",
                other
            ))),
        }
    }
}

/// Build the filter: `RUST_LOG` first, then the configured directive
fn build_filter(directive: &str) -> ObservabilityResult<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(directive)
        .map_err(|e| ObservabilityError::new(format!("Invalid log filter '{}': {}", directive, e)))
}

/// Install the global tracing subscriber
///
/// Fails if a subscriber is already installed or the filter does not parse.
pub fn init_logging(format: LogFormat, directive: &str) -> ObservabilityResult<()> {
    let filter = build_filter(directive)?;

    let result = match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_fmt::layer().json().with_target(true))
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_fmt::layer().with_target(true))
            .try_init(),
    };

    result.map_err(|e| ObservabilityError::new(format!("Failed to install logger: {}", e)))
}
