//! HTTP Server Configuration
//!
//! Configuration for the relay server: bind address, route prefix, CORS,
//! SSE keep-alive, verified-status retention and logging. Loaded from a JSON file; every field has a
//! default so an empty object is a valid config.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::observability::LogFormat;

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpServerConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 3000)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Prefix for token routes (default: "/task")
    #[serde(default = "default_route_prefix")]
    pub route_prefix: String,

    /// CORS allowed origins (empty = any origin)
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Interval between SSE keep-alive comments, in seconds (default: 15)
    #[serde(default = "default_keep_alive_secs")]
    pub keep_alive_secs: u64,

    /// Most recently verified tokens kept for status queries (default: 10000)
    #[serde(default = "default_verified_capacity")]
    pub verified_capacity: usize,

    /// Log filter directive (default: "info")
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Log output format (default: json)
    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_route_prefix() -> String {
    "/task".to_string()
}

fn default_keep_alive_secs() -> u64 {
    15
}

fn default_verified_capacity() -> usize {
    crate::realtime::DEFAULT_VERIFIED_CAPACITY
}

fn default_log_filter() -> String {
    "info".to_string()
}

fn default_log_format() -> LogFormat {
    LogFormat::Json
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            route_prefix: default_route_prefix(),
            cors_origins: Vec::new(),
            keep_alive_secs: default_keep_alive_secs(),
            verified_capacity: default_verified_capacity(),
            log_filter: default_log_filter(),
            log_format: default_log_format(),
        }
    }
}

impl HttpServerConfig {
    /// Create a new config with specified port
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// Load configuration from a JSON file and validate it
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {}", path.display(), e))?;

        let config: HttpServerConfig = serde_json::from_str(&content)
            .map_err(|e| format!("Invalid config JSON: {}", e))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate field ranges and formats
    pub fn validate(&self) -> Result<(), String> {
        if self.host.is_empty() {
            return Err("host must not be empty".to_string());
        }

        if self.port == 0 {
            return Err("port must be > 0".to_string());
        }

        if !self.route_prefix.starts_with('/') {
            return Err(format!(
                "route_prefix '{}' must start with '/'",
                self.route_prefix
            ));
        }

        if self.route_prefix.len() > 1 && self.route_prefix.ends_with('/') {
            return Err(format!(
                "route_prefix '{}' must not end with '/'",
                self.route_prefix
            ));
        }

        if self.keep_alive_secs == 0 {
            return Err("keep_alive_secs must be >= 1".to_string());
        }

        if self.verified_capacity == 0 {
            return Err("verified_capacity must be >= 1".to_string());
        }

        Ok(())
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// SSE keep-alive interval
    pub fn keep_alive(&self) -> Duration {
        Duration::from_secs(self.keep_alive_secs)
    }
}
