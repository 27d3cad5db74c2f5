//! # bluffline - participant client for a two-player interrogation game
//!
//! Two participants register with a coordination point, set up a
//! peer-to-peer video call and play a scripted game: one describes an image,
//! the other questions them and decides twice whether they are telling the
//! truth. Recorded sessions can be played back.
//!
//! ## Crates
//!
//! - [`protocol`]: JSON signaling messages and their codec
//! - [`session`]: the per-participant state machine, role policy and media contract
//! - [`client`]: the async client that drives a session over a WebSocket
//! - [`infra`]: logging and configuration loading
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use bluffline::prelude::*;
//!
//! # async fn run() -> Result<(), ClientError> {
//! setup_logging(&LoggingConfig::default())?;
//!
//! let client = ClientBuilder::new()
//!     .config(ClientConfig::from_file("bluffline.toml")?)
//!     .media_engine(Arc::new(MockMediaEngine::new()))
//!     .build()
//!     .await?;
//!
//! client.call("bob").await?;
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![warn(rust_2018_idioms)]

pub use bluffline_client_core as client;
pub use bluffline_infra_common as infra;
pub use bluffline_protocol_core as protocol;
pub use bluffline_session_core as session;

/// Common imports for bluffline applications
pub mod prelude {
    pub use crate::client::{
        ChannelTransport, ClientBuilder, ClientConfig, ClientError, ClientEvent, ClientManager,
        ClientResult, EventFilter, EventPriority, SessionSnapshot, SignalingTransport,
        WebSocketTransport,
    };
    pub use crate::infra::{setup_logging, LoggingConfig};
    pub use crate::protocol::{AssignedRole, ClientMessage, Decision, IceCandidate, ServerMessage};
    pub use crate::session::{
        Anomaly, AnomalyKind, DecisionRound, MediaEngine, MediaHandle, MediaMode, MockMediaEngine,
        PhaseDirective, RequiredAction, Role, SessionState,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Description of this crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
