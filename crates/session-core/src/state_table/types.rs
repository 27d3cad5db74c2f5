use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

use serde::Serialize;

use crate::media::MediaMode;
use crate::outcome::AnomalyKind;
use crate::state::SessionState;

/// Key for looking up transitions in the state table
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize)]
pub struct StateKey {
    pub state: SessionState,
    pub event: EventType,
}

/// Everything that can drive a transition
///
/// User actions and coordinator messages share one namespace. Responses
/// are split by outcome (`CallAccepted` / `CallRejected`) so the table can
/// route them without guards.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize)]
pub enum EventType {
    // User actions
    Register,
    Call,
    Play,
    AcceptCall,
    DeclineCall,
    ConfirmVideo,
    StartGame,
    SubmitDecision,
    UserStop,

    // Media adapter
    LocalIceCandidate,

    // Coordinator messages
    RegisterAccepted,
    RegisterRejected,
    CallAccepted,
    CallRejected,
    IncomingCall,
    StartCommunication,
    StopCommunication,
    PlayAccepted,
    PlayRejected,
    PlayEnd,
    RoleAssignment,
    StartReviewingImage,
    StartFirstInterrogation,
    GetFirstDecision,
    Hint,
    StartSecondInterrogation,
    GetSecondDecision,
    StartPostGame,
    RemoteIceCandidate,
}

impl EventType {
    /// Whether the event comes from the local user
    ///
    /// A user action with no transition is a local error; a coordinator
    /// message with no transition is a protocol anomaly.
    pub fn is_user_action(&self) -> bool {
        matches!(
            self,
            EventType::Register
                | EventType::Call
                | EventType::Play
                | EventType::AcceptCall
                | EventType::DeclineCall
                | EventType::ConfirmVideo
                | EventType::StartGame
                | EventType::SubmitDecision
                | EventType::UserStop
        )
    }

    /// Human readable verb phrase for error messages
    pub fn operation(&self) -> &'static str {
        match self {
            EventType::Register => "register",
            EventType::Call => "call",
            EventType::Play => "play",
            EventType::AcceptCall => "accept a call",
            EventType::DeclineCall => "decline a call",
            EventType::ConfirmVideo => "confirm video",
            EventType::StartGame => "start the game",
            EventType::SubmitDecision => "submit a decision",
            EventType::UserStop => "stop",
            EventType::LocalIceCandidate => "send a local candidate",
            _ => "handle message",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Conditions that must hold for a transition to run
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize)]
pub enum Guard {
    /// Registration name is not empty
    NameNotEmpty,
    /// Call or playback target is not empty
    PeerNotEmpty,
    /// Local role is interrogator
    IsInterrogator,
    /// No decision sent since the last decision prompt
    DecisionPending,
}

/// Actions to execute during a transition, in order
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize)]
pub enum Action {
    // Outbound messages
    SendRegister,
    SendCall,
    SendPlay,
    SendAccept,
    SendDecline,
    SendBusyReject,
    SendConfirmVideo,
    SendStartGame,
    SendDecision,
    SendLocalCandidate,
    /// Stop message chosen by the stop mapping; skipped when nothing is active
    SendStop,

    // Media
    /// Dispose any live handle, acquire a new one and create an offer
    StartNegotiation(MediaMode),
    ApplyRemoteAnswer,
    AddRemoteCandidate,
    DisposeMedia,

    // Session data
    RememberName,
    RememberPeer,
    AssignRole,
    /// Forget peer and role
    ClearCall,

    // User notifications
    SurfaceRegistrationRejected,
    SurfaceIncomingCall,
    SurfaceCallRejected,
    SurfacePlaybackRejected,
    SurfaceImage,
    SurfaceDecisionPrompt,
    SurfaceHint,
    SurfaceCallEnded,
    SurfacePlaybackEnded,

    ReportAnomaly(AnomalyKind),
}

/// Transition definition: what happens when an event occurs in a state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transition {
    /// Conditions that must be true for this transition
    pub guards: Vec<Guard>,

    /// Actions to execute
    pub actions: Vec<Action>,

    /// Next state (if changing)
    pub next_state: Option<SessionState>,
}

impl Transition {
    pub fn sends(&self, action: Action) -> bool {
        self.actions.contains(&action)
    }
}

/// Master state table containing all transitions
#[derive(Debug, Clone, Default)]
pub struct MasterStateTable {
    transitions: HashMap<StateKey, Transition>,
    /// Wildcard transitions that apply to any state without an exact entry
    wildcard_transitions: HashMap<EventType, Transition>,
}

impl MasterStateTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: StateKey, transition: Transition) {
        self.transitions.insert(key, transition);
    }

    /// Insert a wildcard transition that applies to any state
    pub fn insert_wildcard(&mut self, event: EventType, transition: Transition) {
        self.wildcard_transitions.insert(event, transition);
    }

    /// Exact match first, then the wildcard for the event
    pub fn get(&self, state: SessionState, event: EventType) -> Option<&Transition> {
        self.transitions
            .get(&StateKey { state, event })
            .or_else(|| self.wildcard_transitions.get(&event))
    }

    pub fn has_transition(&self, state: SessionState, event: EventType) -> bool {
        self.get(state, event).is_some()
    }

    pub fn transition_count(&self) -> usize {
        self.transitions.len() + self.wildcard_transitions.len()
    }

    /// States reachable from `NotRegistered`
    pub fn reachable_states(&self) -> HashSet<SessionState> {
        let mut seen = HashSet::from([SessionState::NotRegistered]);
        let mut queue = VecDeque::from([SessionState::NotRegistered]);

        while let Some(state) = queue.pop_front() {
            let exact = self
                .transitions
                .iter()
                .filter(|(key, _)| key.state == state)
                .map(|(_, t)| t);
            for transition in exact.chain(self.wildcard_transitions.values()) {
                if let Some(next) = transition.next_state {
                    if seen.insert(next) {
                        queue.push_back(next);
                    }
                }
            }
        }
        seen
    }

    /// Check the structural properties the session relies on
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        let reachable = self.reachable_states();
        for state in SessionState::ALL {
            if !reachable.contains(&state) {
                errors.push(format!("State {:?} is unreachable", state));
            }
        }

        // Every registered state must be able to tear down to PostCall
        for state in SessionState::ALL.iter().filter(|s| s.is_registered()) {
            for event in [EventType::UserStop, EventType::StopCommunication] {
                match self.get(*state, event) {
                    Some(t) if t.next_state == Some(SessionState::PostCall) => {}
                    _ => errors.push(format!("State {:?} has no {:?} teardown", state, event)),
                }
            }
        }

        // Incoming calls outside idle states must be rejected as busy
        for state in SessionState::ALL {
            let busy = self
                .get(state, EventType::IncomingCall)
                .map(|t| t.sends(Action::SendBusyReject) && t.next_state.is_none())
                .unwrap_or(false);
            if state.is_idle() == busy {
                errors.push(format!("State {:?} handles incoming calls incorrectly", state));
            }
        }

        // Decisions are gated on the interrogator role, once per prompt
        for (key, transition) in &self.transitions {
            if transition.sends(Action::SendDecision) && !transition.guards.contains(&Guard::IsInterrogator) {
                errors.push(format!("Decision in {:?} is not guarded by role", key.state));
            }
            if transition.sends(Action::SendDecision) && !transition.guards.contains(&Guard::DecisionPending) {
                errors.push(format!("Decision in {:?} may be sent more than once", key.state));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
