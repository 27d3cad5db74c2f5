//! Cloneable handle to a running session task

use bluffline_protocol_core::{Decision, IceCandidate};
use bluffline_session_core::{SessionState, Trigger};
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::debug;

use super::types::{Command, SessionSnapshot};
use crate::error::{ClientError, ClientResult};
use crate::events::ClientEvent;

/// Handle used by the application to drive one participant session
///
/// Every operation is queued to the session task and answered once the
/// transition has run and its messages have been handed to the transport.
/// Operations return the state the session is in afterwards. Once the task
/// has stopped, every operation fails with [`ClientError::ClientStopped`].
#[derive(Debug, Clone)]
pub struct ClientManager {
    commands: mpsc::Sender<Command>,
    events: broadcast::Sender<ClientEvent>,
}

impl ClientManager {
    pub(crate) fn new(commands: mpsc::Sender<Command>, events: broadcast::Sender<ClientEvent>) -> Self {
        Self { commands, events }
    }

    /// Register with the coordinator under `name`
    pub async fn register(&self, name: impl Into<String>) -> ClientResult<SessionState> {
        self.apply(Trigger::Register { name: name.into() }).await
    }

    /// Call another registered participant
    pub async fn call(&self, peer: impl Into<String>) -> ClientResult<SessionState> {
        self.apply(Trigger::Call { peer: peer.into() }).await
    }

    /// Play back a recorded session of `target`
    pub async fn play(&self, target: impl Into<String>) -> ClientResult<SessionState> {
        self.apply(Trigger::Play { target: target.into() }).await
    }

    pub async fn accept_call(&self) -> ClientResult<SessionState> {
        self.apply(Trigger::AcceptCall).await
    }

    pub async fn decline_call(&self) -> ClientResult<SessionState> {
        self.apply(Trigger::DeclineCall).await
    }

    pub async fn confirm_video(&self) -> ClientResult<SessionState> {
        self.apply(Trigger::ConfirmVideo).await
    }

    pub async fn start_game(&self) -> ClientResult<SessionState> {
        self.apply(Trigger::StartGame).await
    }

    /// Log the interrogator's decision for the current round
    pub async fn submit_decision(&self, decision: Decision) -> ClientResult<SessionState> {
        self.apply(Trigger::SubmitDecision(decision)).await
    }

    /// End the current call or playback
    pub async fn stop(&self) -> ClientResult<SessionState> {
        self.apply(Trigger::Stop).await
    }

    /// Forward a candidate gathered by the local media stack
    pub async fn add_local_candidate(&self, candidate: IceCandidate) -> ClientResult<SessionState> {
        self.apply(Trigger::LocalCandidate(candidate)).await
    }

    /// Current state, role, peer and directive
    pub async fn snapshot(&self) -> ClientResult<SessionSnapshot> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Snapshot { reply }).await?;
        response.await.map_err(|_| ClientError::ClientStopped)
    }

    pub async fn state(&self) -> ClientResult<SessionState> {
        Ok(self.snapshot().await?.state)
    }

    /// Subscribe to client events
    pub fn subscribe_events(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }

    /// Whether the session task is still running
    pub fn is_running(&self) -> bool {
        !self.commands.is_closed()
    }

    /// Stop any active call, close the transport and end the session task
    pub async fn shutdown(&self) -> ClientResult<()> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Shutdown { reply }).await?;
        response.await.map_err(|_| ClientError::ClientStopped)
    }

    async fn apply(&self, trigger: Trigger) -> ClientResult<SessionState> {
        debug!(event = ?trigger.event_type(), "Queueing command");
        let (reply, response) = oneshot::channel();
        self.send(Command::Apply { trigger, reply }).await?;
        response.await.map_err(|_| ClientError::ClientStopped)?
    }

    async fn send(&self, command: Command) -> ClientResult<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| ClientError::ClientStopped)
    }
}
