//! Client builder
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use bluffline_client_core::ClientBuilder;
//! use bluffline_session_core::MockMediaEngine;
//!
//! # tokio_test::block_on(async {
//! let client = ClientBuilder::new()
//!     .coordinator_url("ws://127.0.0.1:8080/call")
//!     .display_name("alice")
//!     .media_engine(Arc::new(MockMediaEngine::new()))
//!     .build()
//!     .await
//!     .expect("Failed to build client");
//! # })
//! ```

use std::sync::Arc;

use bluffline_session_core::{MediaEngine, Session};
use tokio::sync::{broadcast, mpsc};
use tracing::info;

use super::actor::SessionActor;
use super::manager::ClientManager;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::transport::{SignalingTransport, WebSocketTransport};

/// Fluent builder for [`ClientManager`]
///
/// A media engine is required. If a display name is configured the client
/// sends `register` as soon as the session task is running.
#[derive(Default)]
pub struct ClientBuilder {
    config: ClientConfig,
    media_engine: Option<Arc<dyn MediaEngine>>,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn coordinator_url(mut self, url: impl Into<String>) -> Self {
        self.config.coordinator_url = url.into();
        self
    }

    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.config.display_name = Some(name.into());
        self
    }

    pub fn command_buffer(mut self, capacity: usize) -> Self {
        self.config.command_buffer = capacity;
        self
    }

    pub fn event_buffer(mut self, capacity: usize) -> Self {
        self.config.event_buffer = capacity;
        self
    }

    pub fn media_engine(mut self, engine: Arc<dyn MediaEngine>) -> Self {
        self.media_engine = Some(engine);
        self
    }

    /// Connect to the configured coordinator over WebSocket
    pub async fn build(self) -> ClientResult<ClientManager> {
        self.config.validate()?;
        let transport = WebSocketTransport::connect(&self.config.coordinator_url).await?;
        self.build_with_transport(transport).await
    }

    /// Start the session task on an already connected transport
    pub async fn build_with_transport<T>(self, transport: T) -> ClientResult<ClientManager>
    where
        T: SignalingTransport + 'static,
    {
        self.config.validate()?;
        let engine = self
            .media_engine
            .ok_or_else(|| ClientError::invalid_config("media_engine", "a media engine is required"))?;

        let (command_tx, command_rx) = mpsc::channel(self.config.command_buffer);
        let (event_tx, _) = broadcast::channel(self.config.event_buffer);

        let session = Session::new(engine);
        info!(session = %session.id(), "Starting client session");
        let actor = SessionActor::new(session, transport, command_rx, event_tx.clone());
        tokio::spawn(actor.run());

        let client = ClientManager::new(command_tx, event_tx);
        if let Some(name) = self.config.display_name {
            client.register(name).await?;
        }
        Ok(client)
    }
}
