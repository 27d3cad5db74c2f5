//! What a single transition produced
//!
//! Sessions do no I/O of their own. Each operation returns an [`Outcome`]
//! listing the messages to send, the notifications for the user and any
//! protocol anomalies, in the order they were produced.

use std::fmt;

use bluffline_protocol_core::ClientMessage;
use serde::Serialize;

use crate::policy::{DecisionRound, PhaseDirective};
use crate::state::{Role, SessionState};

/// Protocol anomaly categories
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize)]
pub enum AnomalyKind {
    /// Known message with no transition from the current state
    UnexpectedMessage,
    /// Message id outside the protocol
    UnrecognizedMessage,
    /// `roleAssignment` outside `WaitingForPeerConfirm`; applied anyway
    RoleAssignmentOutOfState,
    /// Stop from a state with no defined stop message, or before registration
    UnexpectedStop,
    /// The coordinator sent a hint to the describer
    HintForDescriber,
}

impl fmt::Display for AnomalyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AnomalyKind::UnexpectedMessage => "unexpected message",
            AnomalyKind::UnrecognizedMessage => "unrecognized message",
            AnomalyKind::RoleAssignmentOutOfState => "role assignment out of state",
            AnomalyKind::UnexpectedStop => "unexpected stop",
            AnomalyKind::HintForDescriber => "hint sent to describer",
        };
        f.write_str(name)
    }
}

/// A non-fatal protocol anomaly
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Anomaly {
    pub kind: AnomalyKind,
    /// State when the anomaly was seen
    pub state: SessionState,
    pub detail: String,
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in {}: {}", self.kind, self.state, self.detail)
    }
}

/// Something the user should be told about
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Notification {
    RegistrationRejected { reason: String },
    IncomingCall { from: String },
    CallRejected { reason: Option<String> },
    PlaybackRejected { error: Option<String> },
    RoleAssigned { role: Role },
    /// What to do in the state just entered
    Directive(PhaseDirective),
    ImageToMemorize { src: String },
    DecisionRequested { round: DecisionRound },
    Hint { text: String },
    CallEnded { remote: bool },
    PlaybackEnded,
}

/// Everything one operation produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub previous: SessionState,
    pub state: SessionState,
    /// Messages to send to the coordinator, in order
    pub messages: Vec<ClientMessage>,
    pub notifications: Vec<Notification>,
    pub anomalies: Vec<Anomaly>,
}

impl Outcome {
    pub(crate) fn new(state: SessionState) -> Self {
        Self {
            previous: state,
            state,
            messages: Vec::new(),
            notifications: Vec::new(),
            anomalies: Vec::new(),
        }
    }

    pub fn state_changed(&self) -> bool {
        self.previous != self.state
    }

    /// Whether a message with this wire id was emitted
    pub fn sent(&self, id: &str) -> bool {
        self.messages.iter().any(|m| m.id() == id)
    }

    pub fn has_anomaly(&self, kind: AnomalyKind) -> bool {
        self.anomalies.iter().any(|a| a.kind == kind)
    }

    /// The directive for the state entered, if the state changed
    pub fn directive(&self) -> Option<&PhaseDirective> {
        self.notifications.iter().find_map(|n| match n {
            Notification::Directive(directive) => Some(directive),
            _ => None,
        })
    }
}
