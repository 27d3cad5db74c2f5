use std::fmt;

use bluffline_protocol_core::AssignedRole;
use serde::{Deserialize, Serialize};

/// Session identifier
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new() -> Self {
        Self(format!("session-{}", uuid::Uuid::new_v4()))
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Participant session states
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum SessionState {
    NotRegistered,
    Registering,
    Registered,
    Calling,
    Incoming,
    /// Incoming call accepted, waiting for `startCommunication`
    IncomingAccepted,
    InCall,
    PlayRequest,
    InPlayback,
    WaitingForPeerConfirm,
    WaitingForStart,
    WaitingForPeerStart,
    ReviewingImage,
    FirstInterrogation,
    FirstResponse,
    SecondInterrogation,
    SecondResponse,
    PostSurvey,
    PostCall,
}

impl SessionState {
    pub const ALL: [SessionState; 19] = [
        SessionState::NotRegistered,
        SessionState::Registering,
        SessionState::Registered,
        SessionState::Calling,
        SessionState::Incoming,
        SessionState::IncomingAccepted,
        SessionState::InCall,
        SessionState::PlayRequest,
        SessionState::InPlayback,
        SessionState::WaitingForPeerConfirm,
        SessionState::WaitingForStart,
        SessionState::WaitingForPeerStart,
        SessionState::ReviewingImage,
        SessionState::FirstInterrogation,
        SessionState::FirstResponse,
        SessionState::SecondInterrogation,
        SessionState::SecondResponse,
        SessionState::PostSurvey,
        SessionState::PostCall,
    ];

    /// Registered and free to place or take a call
    pub fn is_idle(&self) -> bool {
        matches!(self, SessionState::Registered | SessionState::PostCall)
    }

    /// Whether registration has completed
    pub fn is_registered(&self) -> bool {
        !matches!(self, SessionState::NotRegistered | SessionState::Registering)
    }

    /// States of the scripted game, from role assignment to the survey
    pub fn is_in_game(&self) -> bool {
        matches!(
            self,
            SessionState::WaitingForStart
                | SessionState::WaitingForPeerStart
                | SessionState::ReviewingImage
                | SessionState::FirstInterrogation
                | SessionState::FirstResponse
                | SessionState::SecondInterrogation
                | SessionState::SecondResponse
                | SessionState::PostSurvey
        )
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::NotRegistered => "NOT_REGISTERED",
            SessionState::Registering => "REGISTERING",
            SessionState::Registered => "REGISTERED",
            SessionState::Calling => "CALLING",
            SessionState::Incoming => "INCOMING",
            SessionState::IncomingAccepted => "INCOMING_ACCEPTED",
            SessionState::InCall => "IN_CALL",
            SessionState::PlayRequest => "PLAY_REQUEST",
            SessionState::InPlayback => "IN_PLAYBACK",
            SessionState::WaitingForPeerConfirm => "WAITING_FOR_PEER_CONFIRM",
            SessionState::WaitingForStart => "WAITING_FOR_START",
            SessionState::WaitingForPeerStart => "WAITING_FOR_PEER_START",
            SessionState::ReviewingImage => "REVIEWING_IMAGE",
            SessionState::FirstInterrogation => "FIRST_INTERROGATION",
            SessionState::FirstResponse => "FIRST_RESPONSE",
            SessionState::SecondInterrogation => "SECOND_INTERROGATION",
            SessionState::SecondResponse => "SECOND_RESPONSE",
            SessionState::PostSurvey => "POST_SURVEY",
            SessionState::PostCall => "POST_CALL",
        };
        f.write_str(name)
    }
}

/// The local participant's part in the game
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Default, Serialize, Deserialize)]
pub enum Role {
    #[default]
    None,
    Interrogator,
    Describer,
}

impl Role {
    pub fn is_interrogator(&self) -> bool {
        matches!(self, Role::Interrogator)
    }
}

impl From<AssignedRole> for Role {
    fn from(role: AssignedRole) -> Self {
        match role {
            AssignedRole::Interrogator => Role::Interrogator,
            AssignedRole::Describer => Role::Describer,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::None => write!(f, "NONE"),
            Role::Interrogator => write!(f, "INTERROGATOR"),
            Role::Describer => write!(f, "DESCRIBER"),
        }
    }
}
