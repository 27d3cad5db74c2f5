//! The per-session task
//!
//! One [`SessionActor`] owns a [`Session`] and its transport. Commands and
//! inbound frames are taken one at a time from a single `select!`, so no two
//! transitions ever interleave.

use bluffline_protocol_core::{decode_server, encode_client, ClientMessage, ServerMessage};
use bluffline_session_core::{Outcome, Session, SessionError, SessionState, Trigger};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, info, warn};

use super::types::{Command, SessionSnapshot};
use crate::error::ClientResult;
use crate::events::ClientEvent;
use crate::transport::SignalingTransport;

pub(crate) struct SessionActor<T: SignalingTransport> {
    session: Session,
    transport: T,
    commands: mpsc::Receiver<Command>,
    events: broadcast::Sender<ClientEvent>,
}

impl<T: SignalingTransport> SessionActor<T> {
    pub(crate) fn new(
        session: Session,
        transport: T,
        commands: mpsc::Receiver<Command>,
        events: broadcast::Sender<ClientEvent>,
    ) -> Self {
        Self {
            session,
            transport,
            commands,
            events,
        }
    }

    pub(crate) async fn run(mut self) {
        info!(session = %self.session.id(), "Session task started");

        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(Command::Apply { trigger, reply }) => {
                        let result = self.apply(trigger).await;
                        let _ = reply.send(result);
                    }
                    Some(Command::Snapshot { reply }) => {
                        let _ = reply.send(self.snapshot());
                    }
                    Some(Command::Shutdown { reply }) => {
                        self.commands.close();
                        self.shutdown().await;
                        let _ = reply.send(());
                        break;
                    }
                    None => {
                        debug!("All client handles dropped");
                        self.shutdown().await;
                        break;
                    }
                },
                frame = self.transport.recv() => match frame {
                    Some(Ok(text)) => self.handle_frame(&text).await,
                    Some(Err(err)) => {
                        error!(error = %err, "Signaling transport failed");
                        self.connection_lost(Some(err.to_string())).await;
                        break;
                    }
                    None => {
                        self.connection_lost(None).await;
                        break;
                    }
                },
            }
        }

        info!(session = %self.session.id(), state = %self.session.state(), "Session task stopped");
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.session.id().clone(),
            state: self.session.state(),
            role: self.session.role(),
            name: self.session.name().map(str::to_string),
            peer: self.session.peer().map(str::to_string),
            has_media: self.session.has_media(),
            directive: self.session.directive(),
        }
    }

    /// Run a user trigger and send what it produced
    async fn apply(&mut self, trigger: Trigger) -> ClientResult<SessionState> {
        let before = self.session.state();
        match self.session.process(trigger).await {
            Ok(outcome) => {
                self.deliver(outcome).await?;
                Ok(self.session.state())
            }
            Err(err) => {
                self.session_failed(before, &err).await;
                Err(err.into())
            }
        }
    }

    async fn handle_frame(&mut self, text: &str) {
        let inbound = match decode_server(text) {
            Ok(inbound) => inbound,
            Err(err) => {
                warn!(error = %err, "Dropping undecodable frame");
                self.publish(ClientEvent::Error { error: err.into() });
                return;
            }
        };

        debug!(id = %inbound.id(), state = %self.session.state(), "Received message");
        let before = self.session.state();
        match self.session.handle_message(inbound).await {
            Ok(outcome) => {
                if let Err(err) = self.deliver(outcome).await {
                    self.publish(ClientEvent::Error { error: err });
                }
            }
            Err(err) => self.session_failed(before, &err).await,
        }
    }

    /// Send the outbound messages, then publish notifications and anomalies
    async fn deliver(&mut self, outcome: Outcome) -> ClientResult<()> {
        let Outcome {
            previous,
            state,
            messages,
            notifications,
            anomalies,
        } = outcome;

        let mut sent = Ok(());
        for message in &messages {
            if let Err(err) = self.send_message(message).await {
                sent = Err(err);
                break;
            }
        }

        for notification in notifications {
            let event = match ClientEvent::from(notification) {
                ClientEvent::StateChanged { directive, .. } => ClientEvent::StateChanged {
                    previous,
                    current: state,
                    directive,
                },
                other => other,
            };
            self.publish(event);
        }

        for anomaly in anomalies {
            self.publish(ClientEvent::ProtocolAnomaly { anomaly });
        }

        sent
    }

    async fn send_message(&mut self, message: &ClientMessage) -> ClientResult<()> {
        let frame = encode_client(message)?;
        debug!(id = %message.id(), "Sending message");
        self.transport.send(frame).await.map_err(|err| {
            error!(id = %message.id(), error = %err, "Failed to send message");
            err
        })
    }

    /// Release the coordinator's side of a failed negotiation and report it
    async fn session_failed(&mut self, before: SessionState, err: &SessionError) {
        if let SessionError::MediaNegotiationFailed { reason, stop } = err {
            if let Some(stop) = stop {
                if let Err(err) = self.send_message(stop).await {
                    self.publish(ClientEvent::Error { error: err });
                }
            }
            self.publish(ClientEvent::MediaFailed { reason: reason.clone() });
        }
        let current = self.session.state();
        if current != before {
            self.publish(ClientEvent::StateChanged {
                previous: before,
                current,
                directive: self.session.directive(),
            });
        }
    }

    /// The coordinator is gone: release media locally without sending anything
    async fn connection_lost(&mut self, reason: Option<String>) {
        let state = self.session.state();
        if state.is_registered() && !state.is_idle() {
            info!(state = %state, "Connection lost mid-session, tearing down locally");
            match self
                .session
                .process(Trigger::Message(ServerMessage::StopCommunication))
                .await
            {
                Ok(mut outcome) => {
                    outcome.messages.clear();
                    if let Err(err) = self.deliver(outcome).await {
                        debug!(error = %err, "Teardown events not delivered");
                    }
                }
                Err(err) => warn!(error = %err, "Local teardown failed"),
            }
        }
        self.publish(ClientEvent::ConnectionClosed { reason });
    }

    /// Stop any active call or playback, then close the transport
    async fn shutdown(&mut self) {
        let state = self.session.state();
        if state.is_registered() && !state.is_idle() {
            if let Err(err) = self.apply(Trigger::Stop).await {
                warn!(error = %err, "Stop during shutdown failed");
            }
        }
        if let Err(err) = self.transport.close().await {
            debug!(error = %err, "Transport close failed");
        }
    }

    fn publish(&self, event: ClientEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}
