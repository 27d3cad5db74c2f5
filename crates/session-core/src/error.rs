//! Session and media error types
//!
//! Two kinds of failure leave a session usable:
//!
//! - **Validation errors** (empty name or peer, decision from a describer,
//!   operation not allowed in the current state) are rejected before any
//!   message is sent and leave the state unchanged.
//! - **Media negotiation failures** dispose the half-built media handle and
//!   put the session back to the idle state (`Registered` or `PostCall`)
//!   it was in before the call. A failure after the coordinator answered
//!   carries the stop message that releases the coordinator's side.
//!
//! Protocol anomalies are not errors. They are reported through
//! [`Outcome::anomalies`](crate::session::Outcome) and never fail an
//! operation.

use bluffline_protocol_core::ClientMessage;
use thiserror::Error;

use crate::state::SessionState;

/// Result alias for session operations
pub type SessionResult<T> = std::result::Result<T, SessionError>;

/// Result alias for media adapter operations
pub type MediaResult<T> = std::result::Result<T, MediaError>;

/// Errors returned by [`Session`](crate::Session) operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// `register` was called with an empty name
    #[error("You must enter your username")]
    EmptyName,

    /// `call` or `play` was called with an empty peer
    #[error("You must specify a peer name")]
    EmptyPeer,

    /// The operation has no transition from the current state
    #[error("Cannot {operation} in state {state}")]
    InvalidState {
        operation: &'static str,
        state: SessionState,
    },

    /// Only the interrogator may log a decision
    #[error("Only the interrogator can submit a decision")]
    NotInterrogator,

    /// The media adapter failed; the session was reverted to its idle state
    #[error("Media negotiation failed: {reason}")]
    MediaNegotiationFailed {
        reason: String,
        /// Stop message to send if the coordinator had already answered
        stop: Option<ClientMessage>,
    },
}

impl SessionError {
    /// Local input or state check failed; nothing was sent
    pub fn is_validation_error(&self) -> bool {
        !matches!(self, SessionError::MediaNegotiationFailed { .. })
    }

    /// Get error category for logging/metrics
    pub fn category(&self) -> &'static str {
        match self {
            SessionError::EmptyName | SessionError::EmptyPeer => "input",
            SessionError::InvalidState { .. } => "state",
            SessionError::NotInterrogator => "role",
            SessionError::MediaNegotiationFailed { .. } => "media",
        }
    }
}

impl From<MediaError> for SessionError {
    fn from(err: MediaError) -> Self {
        SessionError::MediaNegotiationFailed {
            reason: err.to_string(),
            stop: None,
        }
    }
}

/// Errors reported by a [`MediaEngine`](crate::media::MediaEngine) or its handles
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MediaError {
    #[error("Failed to acquire media: {0}")]
    AcquireFailed(String),

    #[error("Failed to create offer: {0}")]
    OfferFailed(String),

    #[error("Failed to apply answer: {0}")]
    AnswerFailed(String),

    #[error("Failed to add remote candidate: {0}")]
    CandidateFailed(String),

    #[error("Media handle already disposed")]
    Disposed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors() {
        assert!(SessionError::EmptyName.is_validation_error());
        assert!(SessionError::NotInterrogator.is_validation_error());
        let media: SessionError = MediaError::OfferFailed("no camera".into()).into();
        assert!(!media.is_validation_error());
        assert_eq!(media.category(), "media");
        assert!(media.to_string().contains("no camera"));
    }

    #[test]
    fn test_invalid_state_message() {
        let err = SessionError::InvalidState {
            operation: "start game",
            state: SessionState::InCall,
        };
        assert_eq!(err.to_string(), "Cannot start game in state IN_CALL");
    }
}
