//! # Real-Time Errors
//!
//! Error types for the notification core.

use thiserror::Error;

/// Result type for real-time operations
pub type RealtimeResult<T> = Result<T, RealtimeError>;

/// Real-time errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RealtimeError {
    /// Token missing or empty
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Push attempted on a transport that already terminated
    #[error("Channel closed")]
    ChannelClosed,

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RealtimeError {
    /// Stable error code reported to HTTP clients
    pub fn code(&self) -> &'static str {
        match self {
            RealtimeError::InvalidInput(_) => "TOKENRELAY_INVALID_INPUT",
            RealtimeError::ChannelClosed => "TOKENRELAY_CHANNEL_CLOSED",
            RealtimeError::Internal(_) => "TOKENRELAY_INTERNAL",
        }
    }

    /// HTTP status this error maps to
    pub fn status_code(&self) -> u16 {
        match self {
            RealtimeError::InvalidInput(_) => 400,
            RealtimeError::ChannelClosed => 410,
            RealtimeError::Internal(_) => 500,
        }
    }

    /// Whether the caller caused this error
    pub fn is_client_error(&self) -> bool {
        matches!(self, RealtimeError::InvalidInput(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(RealtimeError::InvalidInput("x".into()).status_code(), 400);
        assert_eq!(RealtimeError::ChannelClosed.status_code(), 410);
        assert_eq!(RealtimeError::Internal("x".into()).status_code(), 500);
    }

    #[test]
    fn test_only_invalid_input_is_client_error() {
        assert!(RealtimeError::InvalidInput("Missing token".into()).is_client_error());
        assert!(!RealtimeError::ChannelClosed.is_client_error());
        assert!(!RealtimeError::Internal("Lock poisoned".into()).is_client_error());
    }

    #[test]
    fn test_error_display() {
        let err = RealtimeError::InvalidInput("Missing token".into());
        assert_eq!(err.to_string(), "Invalid input: Missing token");
        assert_eq!(err.code(), "TOKENRELAY_INVALID_INPUT");
    }
}
