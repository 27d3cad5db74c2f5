//! Signaling protocol for Bluffline sessions
//!
//! This crate defines the messages a participant exchanges with the
//! coordination point and the JSON codec that puts them on the wire.
//! It knows nothing about session state; see `bluffline-session-core` for
//! the state machine that consumes these messages.
//!
//! # Example
//!
//! ```
//! use bluffline_protocol_core::prelude::*;
//!
//! let frame = encode_client(&ClientMessage::Register { name: "alice".into() }).unwrap();
//! assert_eq!(frame, r#"{"id":"register","name":"alice"}"#);
//!
//! let inbound = decode_server(r#"{"id":"registerResponse","response":"accepted"}"#).unwrap();
//! assert!(matches!(
//!     inbound,
//!     InboundMessage::Known(ServerMessage::RegisterResponse { response: ResponseStatus::Accepted, .. })
//! ));
//! ```

pub mod codec;
pub mod error;
pub mod message;

pub use codec::{decode_client, decode_server, encode_client, encode_server};
pub use error::{ProtocolError, ProtocolResult};
pub use message::{
    AssignedRole, CallResponse, ClientMessage, Decision, IceCandidate, InboundMessage,
    ResponseStatus, ServerMessage,
};

/// Re-export of common types
pub mod prelude {
    pub use crate::codec::*;
    pub use crate::error::*;
    pub use crate::message::*;
}
