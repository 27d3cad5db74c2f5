//! Signaling transports
//!
//! A transport moves JSON text frames between the client and the
//! coordination point. The session task owns the transport exclusively, so
//! implementations need `Send` but not `Sync`.

use async_trait::async_trait;

use crate::error::ClientResult;

pub mod channel;
pub mod websocket;

pub use channel::{ChannelPeer, ChannelTransport};
pub use websocket::WebSocketTransport;

/// Bidirectional text frame channel to the coordinator
#[async_trait]
pub trait SignalingTransport: Send {
    /// Send one frame
    async fn send(&mut self, frame: String) -> ClientResult<()>;

    /// Wait for the next frame
    ///
    /// Returns `None` once the peer has closed the channel. Must be
    /// cancel-safe: dropping the future before it completes loses no frame.
    async fn recv(&mut self) -> Option<ClientResult<String>>;

    /// Close the channel; further sends fail
    async fn close(&mut self) -> ClientResult<()>;
}
