//! Error types for the client layer
//!
//! # Error Categories
//!
//! - **Transport errors** - the signaling channel failed or closed; the
//!   session cannot continue on this connection
//! - **Protocol errors** - a frame could not be decoded or encoded; the
//!   frame is dropped and the session carries on
//! - **Session errors** - local validation failures and media negotiation
//!   failures from `bluffline-session-core`
//! - **Configuration errors** - invalid settings, fix before retrying
//! - **Shutdown** - the session task is gone
//!
//! ```rust,no_run
//! # use bluffline_client_core::{ClientManager, ClientError};
//! # async fn example(client: ClientManager) {
//! match client.call("bob").await {
//!     Ok(state) => println!("Now {}", state),
//!     Err(e) if e.is_validation_error() => eprintln!("Fix your input: {}", e),
//!     Err(e) => eprintln!("Call failed ({}): {}", e.category(), e),
//! }
//! # }
//! ```

use bluffline_protocol_core::ProtocolError;
use bluffline_session_core::SessionError;
use thiserror::Error;

/// Result type for client operations
pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// Errors that can occur in client operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    /// Could not reach the coordinator
    #[error("Failed to connect to {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    /// The signaling channel failed while sending or receiving
    #[error("Transport error: {reason}")]
    TransportFailed { reason: String },

    /// The coordinator closed the channel
    #[error("Connection closed")]
    ConnectionClosed,

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Invalid configuration for {field}: {reason}")]
    InvalidConfiguration { field: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(#[from] bluffline_infra_common::Error),

    /// The session task has stopped
    #[error("Client has been shut down")]
    ClientStopped,
}

impl ClientError {
    /// Create a transport error
    pub fn transport(reason: impl Into<String>) -> Self {
        Self::TransportFailed { reason: reason.into() }
    }

    /// Create an invalid configuration error
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Check if the session can continue after this error
    pub fn is_recoverable(&self) -> bool {
        match self {
            // Recoverable errors
            ClientError::Protocol(_) | ClientError::Session(_) => true,

            // Non-recoverable errors
            ClientError::ConnectionFailed { .. }
            | ClientError::TransportFailed { .. }
            | ClientError::ConnectionClosed
            | ClientError::InvalidConfiguration { .. }
            | ClientError::Config(_)
            | ClientError::ClientStopped => false,
        }
    }

    /// Local input was rejected and nothing was sent
    pub fn is_validation_error(&self) -> bool {
        matches!(self, ClientError::Session(e) if e.is_validation_error())
    }

    /// Get error category for logging/metrics
    pub fn category(&self) -> &'static str {
        match self {
            ClientError::ConnectionFailed { .. }
            | ClientError::TransportFailed { .. }
            | ClientError::ConnectionClosed => "network",
            ClientError::Protocol(_) => "protocol",
            ClientError::Session(e) => e.category(),
            ClientError::InvalidConfiguration { .. } | ClientError::Config(_) => "configuration",
            ClientError::ClientStopped => "shutdown",
        }
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for ClientError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        ClientError::transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        assert_eq!(ClientError::ConnectionClosed.category(), "network");
        assert_eq!(ClientError::from(SessionError::EmptyPeer).category(), "input");
        assert_eq!(ClientError::from(ProtocolError::MissingId).category(), "protocol");
        assert_eq!(ClientError::invalid_config("event_buffer", "must be > 0").category(), "configuration");
    }

    #[test]
    fn test_recoverability() {
        assert!(ClientError::from(SessionError::EmptyName).is_recoverable());
        assert!(ClientError::from(SessionError::EmptyName).is_validation_error());
        assert!(!ClientError::transport("reset").is_recoverable());
        assert!(!ClientError::ClientStopped.is_validation_error());
    }
}
