//! Async participant client for Bluffline
//!
//! Hosts one [`Session`](bluffline_session_core::Session) per client in its
//! own tokio task, moves protocol frames over a [`SignalingTransport`] and
//! publishes what happens as [`ClientEvent`]s.
//!
//! ```text
//!   ClientManager ──mpsc──▶ SessionActor ──frames──▶ SignalingTransport ──▶ coordinator
//!        ▲                     │  ▲                        │
//!        └──── broadcast ◀─────┘  └────── frames ◀─────────┘
//!             ClientEvent
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use bluffline_client_core::{ClientBuilder, ClientEvent};
//! use bluffline_session_core::MockMediaEngine;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ClientBuilder::new()
//!         .coordinator_url("ws://127.0.0.1:8080/call")
//!         .media_engine(Arc::new(MockMediaEngine::new()))
//!         .build()
//!         .await?;
//!
//!     let mut events = client.subscribe_events();
//!     client.register("alice").await?;
//!
//!     while let Ok(event) = events.recv().await {
//!         match event {
//!             ClientEvent::IncomingCall { from } => {
//!                 println!("{} is calling", from);
//!                 client.accept_call().await?;
//!             }
//!             ClientEvent::StateChanged { directive, .. } => println!("{}", directive.text),
//!             ClientEvent::ConnectionClosed { .. } => break,
//!             _ => {}
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod events;
pub mod transport;

pub use client::{ClientBuilder, ClientManager, SessionSnapshot};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use events::{ClientEvent, EventFilter, EventPriority};
pub use transport::{ChannelTransport, SignalingTransport, WebSocketTransport};

/// Re-export of common types
pub mod prelude {
    pub use crate::client::{ClientBuilder, ClientManager, SessionSnapshot};
    pub use crate::config::ClientConfig;
    pub use crate::error::{ClientError, ClientResult};
    pub use crate::events::{ClientEvent, EventFilter, EventPriority};
    pub use crate::transport::{ChannelPeer, ChannelTransport, SignalingTransport};
    pub use bluffline_protocol_core::{Decision, IceCandidate};
    pub use bluffline_session_core::{MediaEngine, MockMediaEngine, Role, SessionState};
}
