//! Events published by a running client
//!
//! Subscribe with [`ClientManager::subscribe_events`](crate::ClientManager::subscribe_events).
//! Events are delivered over a `tokio::sync::broadcast` channel, so slow
//! subscribers may observe `RecvError::Lagged` and miss events.

use bluffline_session_core::{
    Anomaly, AnomalyKind, DecisionRound, Notification, PhaseDirective, Role, SessionState,
};

use crate::error::ClientError;

/// Event priority levels for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventPriority {
    /// Low priority events (anomalies that were ignored)
    Low,
    /// Normal priority events (state changes, role and phase updates)
    Normal,
    /// High priority events (incoming calls, decision prompts, rejections)
    High,
    /// Critical priority events (media failures, lost connection)
    Critical,
}

/// Client event types
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    /// Session state changed
    StateChanged {
        previous: SessionState,
        current: SessionState,
        /// What the user should do in the new state
        directive: PhaseDirective,
    },
    RegistrationRejected { reason: String },
    IncomingCall { from: String },
    CallRejected { reason: Option<String> },
    PlaybackRejected { error: Option<String> },
    RoleAssigned { role: Role },
    /// Describer only
    ImageToMemorize { src: String },
    /// Interrogator only
    DecisionRequested { round: DecisionRound },
    /// Interrogator only
    Hint { text: String },
    CallEnded { remote: bool },
    PlaybackEnded,
    /// Non-fatal protocol anomaly
    ProtocolAnomaly { anomaly: Anomaly },
    /// Media negotiation failed and the session fell back to its idle state
    MediaFailed { reason: String },
    /// Any other error while processing a frame or command
    Error { error: ClientError },
    /// The signaling channel is gone; the client stops
    ConnectionClosed { reason: Option<String> },
}

impl ClientEvent {
    /// Get the priority of this event
    pub fn priority(&self) -> EventPriority {
        match self {
            ClientEvent::ProtocolAnomaly { anomaly } if anomaly.kind == AnomalyKind::UnexpectedStop => {
                EventPriority::High
            }
            ClientEvent::ProtocolAnomaly { .. } => EventPriority::Low,

            ClientEvent::StateChanged { .. }
            | ClientEvent::RoleAssigned { .. }
            | ClientEvent::ImageToMemorize { .. }
            | ClientEvent::Hint { .. }
            | ClientEvent::CallEnded { .. }
            | ClientEvent::PlaybackEnded => EventPriority::Normal,

            ClientEvent::RegistrationRejected { .. }
            | ClientEvent::IncomingCall { .. }
            | ClientEvent::CallRejected { .. }
            | ClientEvent::PlaybackRejected { .. }
            | ClientEvent::DecisionRequested { .. }
            | ClientEvent::Error { .. } => EventPriority::High,

            ClientEvent::MediaFailed { .. } | ClientEvent::ConnectionClosed { .. } => {
                EventPriority::Critical
            }
        }
    }

    /// Check if this event passes the given filter
    pub fn passes_filter(&self, filter: &EventFilter) -> bool {
        if let Some(min_priority) = filter.min_priority {
            if self.priority() < min_priority {
                return false;
            }
        }
        if let Some(states) = &filter.states {
            if let ClientEvent::StateChanged { current, .. } = self {
                if !states.contains(current) {
                    return false;
                }
            }
        }
        true
    }
}

impl From<Notification> for ClientEvent {
    fn from(notification: Notification) -> Self {
        match notification {
            Notification::RegistrationRejected { reason } => ClientEvent::RegistrationRejected { reason },
            Notification::IncomingCall { from } => ClientEvent::IncomingCall { from },
            Notification::CallRejected { reason } => ClientEvent::CallRejected { reason },
            Notification::PlaybackRejected { error } => ClientEvent::PlaybackRejected { error },
            Notification::RoleAssigned { role } => ClientEvent::RoleAssigned { role },
            Notification::Directive(directive) => ClientEvent::StateChanged {
                previous: directive.state,
                current: directive.state,
                directive,
            },
            Notification::ImageToMemorize { src } => ClientEvent::ImageToMemorize { src },
            Notification::DecisionRequested { round } => ClientEvent::DecisionRequested { round },
            Notification::Hint { text } => ClientEvent::Hint { text },
            Notification::CallEnded { remote } => ClientEvent::CallEnded { remote },
            Notification::PlaybackEnded => ClientEvent::PlaybackEnded,
        }
    }
}

/// Filter for subscribers that only care about some events
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Minimum event priority level
    pub min_priority: Option<EventPriority>,
    /// Only state changes into these states
    pub states: Option<Vec<SessionState>>,
}

impl EventFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_priority(mut self, priority: EventPriority) -> Self {
        self.min_priority = Some(priority);
        self
    }

    pub fn with_states(mut self, states: Vec<SessionState>) -> Self {
        self.states = Some(states);
        self
    }
}
