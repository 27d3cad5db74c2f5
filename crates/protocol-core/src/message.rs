//! Signaling message definitions
//!
//! Every frame on the wire is a JSON object with a string `id` naming the
//! message plus id-specific fields. Client and server ids are disjoint, so
//! each direction gets its own enum. Field names are camelCase on the wire.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of a register, call or play request
///
/// The coordinator sends `"accepted"` on success. Anything else is a
/// rejection and the original text is kept (it sometimes carries the
/// reason, e.g. `"rejected: empty user name"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResponseStatus {
    Accepted,
    Rejected(String),
}

impl ResponseStatus {
    pub fn rejected() -> Self {
        ResponseStatus::Rejected("rejected".to_string())
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, ResponseStatus::Accepted)
    }
}

impl From<String> for ResponseStatus {
    fn from(value: String) -> Self {
        if value == "accepted" {
            ResponseStatus::Accepted
        } else {
            ResponseStatus::Rejected(value)
        }
    }
}

impl From<ResponseStatus> for String {
    fn from(status: ResponseStatus) -> Self {
        match status {
            ResponseStatus::Accepted => "accepted".to_string(),
            ResponseStatus::Rejected(text) => text,
        }
    }
}

/// Role handed out by the coordinator in `roleAssignment`
///
/// Only `"interrogator"` is matched; any other value means describer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AssignedRole {
    Interrogator,
    Describer,
}

impl From<String> for AssignedRole {
    fn from(value: String) -> Self {
        if value == "interrogator" {
            AssignedRole::Interrogator
        } else {
            AssignedRole::Describer
        }
    }
}

impl From<AssignedRole> for String {
    fn from(role: AssignedRole) -> Self {
        match role {
            AssignedRole::Interrogator => "interrogator".to_string(),
            AssignedRole::Describer => "describer".to_string(),
        }
    }
}

/// The interrogator's verdict on the describer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Truth,
    Bluff,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Truth => write!(f, "truth"),
            Decision::Bluff => write!(f, "bluff"),
        }
    }
}

/// Answer to an `incomingCall`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallResponse {
    Accept,
    Reject,
}

/// A trickled ICE candidate, passed through opaquely
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IceCandidate {
    pub candidate: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdp_mid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdp_m_line_index: Option<u16>,
}

impl IceCandidate {
    pub fn new(candidate: impl Into<String>) -> Self {
        Self {
            candidate: candidate.into(),
            sdp_mid: None,
            sdp_m_line_index: None,
        }
    }
}

/// Messages sent by a participant to the coordinator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "id", rename_all = "camelCase")]
pub enum ClientMessage {
    Register {
        name: String,
    },
    #[serde(rename_all = "camelCase")]
    Call {
        from: String,
        to: String,
        sdp_offer: String,
    },
    #[serde(rename_all = "camelCase")]
    IncomingCallResponse {
        from: String,
        call_response: CallResponse,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sdp_offer: Option<String>,
    },
    Stop,
    StopPlay,
    #[serde(rename_all = "camelCase")]
    Play {
        user: String,
        sdp_offer: String,
    },
    ConfirmVideo,
    StartGame,
    FirstDecision {
        decision: Decision,
    },
    SecondDecision {
        decision: Decision,
    },
    OnIceCandidate {
        candidate: IceCandidate,
    },
}

impl ClientMessage {
    /// Every id a client may send
    pub const IDS: &'static [&'static str] = &[
        "register",
        "call",
        "incomingCallResponse",
        "stop",
        "stopPlay",
        "play",
        "confirmVideo",
        "startGame",
        "firstDecision",
        "secondDecision",
        "onIceCandidate",
    ];

    /// The wire id of this message
    pub fn id(&self) -> &'static str {
        match self {
            ClientMessage::Register { .. } => "register",
            ClientMessage::Call { .. } => "call",
            ClientMessage::IncomingCallResponse { .. } => "incomingCallResponse",
            ClientMessage::Stop => "stop",
            ClientMessage::StopPlay => "stopPlay",
            ClientMessage::Play { .. } => "play",
            ClientMessage::ConfirmVideo => "confirmVideo",
            ClientMessage::StartGame => "startGame",
            ClientMessage::FirstDecision { .. } => "firstDecision",
            ClientMessage::SecondDecision { .. } => "secondDecision",
            ClientMessage::OnIceCandidate { .. } => "onIceCandidate",
        }
    }

    /// Busy rejection sent automatically when a call arrives mid-activity
    pub fn busy(from: impl Into<String>) -> Self {
        ClientMessage::IncomingCallResponse {
            from: from.into(),
            call_response: CallResponse::Reject,
            message: Some("busy".to_string()),
            sdp_offer: None,
        }
    }
}

/// Messages sent by the coordinator to a participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "id", rename_all = "camelCase")]
pub enum ServerMessage {
    RegisterResponse {
        response: ResponseStatus,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    CallResponse {
        response: ResponseStatus,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sdp_answer: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    IncomingCall {
        from: String,
    },
    #[serde(rename_all = "camelCase")]
    StartCommunication {
        sdp_answer: String,
    },
    StopCommunication,
    #[serde(rename_all = "camelCase")]
    PlayResponse {
        response: ResponseStatus,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sdp_answer: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    PlayEnd,
    RoleAssignment {
        role: AssignedRole,
    },
    StartReviewingImage {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        src: Option<String>,
    },
    StartFirstInterrogation,
    GetFirstDecision,
    Hint {
        hint: String,
    },
    StartSecondInterrogation,
    GetSecondDecision,
    StartPostGame,
    IceCandidate {
        candidate: IceCandidate,
    },
}

impl ServerMessage {
    /// Every id the coordinator may send
    pub const IDS: &'static [&'static str] = &[
        "registerResponse",
        "callResponse",
        "incomingCall",
        "startCommunication",
        "stopCommunication",
        "playResponse",
        "playEnd",
        "roleAssignment",
        "startReviewingImage",
        "startFirstInterrogation",
        "getFirstDecision",
        "hint",
        "startSecondInterrogation",
        "getSecondDecision",
        "startPostGame",
        "iceCandidate",
    ];

    /// The wire id of this message
    pub fn id(&self) -> &'static str {
        match self {
            ServerMessage::RegisterResponse { .. } => "registerResponse",
            ServerMessage::CallResponse { .. } => "callResponse",
            ServerMessage::IncomingCall { .. } => "incomingCall",
            ServerMessage::StartCommunication { .. } => "startCommunication",
            ServerMessage::StopCommunication => "stopCommunication",
            ServerMessage::PlayResponse { .. } => "playResponse",
            ServerMessage::PlayEnd => "playEnd",
            ServerMessage::RoleAssignment { .. } => "roleAssignment",
            ServerMessage::StartReviewingImage { .. } => "startReviewingImage",
            ServerMessage::StartFirstInterrogation => "startFirstInterrogation",
            ServerMessage::GetFirstDecision => "getFirstDecision",
            ServerMessage::Hint { .. } => "hint",
            ServerMessage::StartSecondInterrogation => "startSecondInterrogation",
            ServerMessage::GetSecondDecision => "getSecondDecision",
            ServerMessage::StartPostGame => "startPostGame",
            ServerMessage::IceCandidate { .. } => "iceCandidate",
        }
    }
}

/// A decoded coordinator frame
///
/// Frames with an id outside [`ServerMessage::IDS`] are kept as
/// `Unrecognized` so the session can report them without failing.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    Known(ServerMessage),
    Unrecognized {
        id: String,
        raw: serde_json::Value,
    },
}

impl InboundMessage {
    pub fn id(&self) -> &str {
        match self {
            InboundMessage::Known(message) => message.id(),
            InboundMessage::Unrecognized { id, .. } => id,
        }
    }
}

impl From<ServerMessage> for InboundMessage {
    fn from(message: ServerMessage) -> Self {
        InboundMessage::Known(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_status_is_lenient() {
        assert_eq!(ResponseStatus::from("accepted".to_string()), ResponseStatus::Accepted);
        assert_eq!(
            ResponseStatus::from("rejected: empty user name".to_string()),
            ResponseStatus::Rejected("rejected: empty user name".to_string())
        );
        assert!(!ResponseStatus::rejected().is_accepted());
    }

    #[test]
    fn test_unknown_role_means_describer() {
        assert_eq!(AssignedRole::from("interrogator".to_string()), AssignedRole::Interrogator);
        assert_eq!(AssignedRole::from("describer".to_string()), AssignedRole::Describer);
        assert_eq!(AssignedRole::from("DESCRIBER".to_string()), AssignedRole::Describer);
    }

    #[test]
    fn test_ids_match_variants() {
        assert_eq!(ClientMessage::Stop.id(), "stop");
        assert_eq!(ClientMessage::busy("bob").id(), "incomingCallResponse");
        assert_eq!(ServerMessage::StartPostGame.id(), "startPostGame");
        assert!(ServerMessage::IDS.contains(&ServerMessage::PlayEnd.id()));
        assert!(ClientMessage::IDS.iter().all(|id| !ServerMessage::IDS.contains(id)));
    }
}
