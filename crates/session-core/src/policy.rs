//! Role policy: what the local participant should be doing right now
//!
//! Both participants receive the same broadcasts. What each one has to do
//! differs only by role, so the mapping lives here as a pure function of
//! `(state, role)`. The session composes it after each transition and keeps
//! it out of the state table.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::state::{Role, SessionState};

/// Length of the image review phase
pub const IMAGE_REVIEW_DURATION: Duration = Duration::from_secs(30);

/// Length of each questioning round
pub const INTERROGATION_DURATION: Duration = Duration::from_secs(120);

/// Which of the two decisions is being asked for
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum DecisionRound {
    First,
    Second,
}

/// The local action expected from the user
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum RequiredAction {
    Register,
    PlaceCall,
    AnswerIncomingCall,
    ConfirmVideo,
    StartGame,
    MemorizeImage,
    WatchDescriber,
    Question,
    AnswerQuestions,
    LogDecision(DecisionRound),
    AwaitDecision,
    CompleteSurvey,
    WatchPlayback,
    /// Nothing to do until the coordinator moves things along
    None,
}

/// Presentation hints for one state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseDirective {
    pub state: SessionState,
    pub role: Role,
    pub text: &'static str,
    /// Countdown to show; the coordinator owns the real timer
    pub duration: Option<Duration>,
    pub required: RequiredAction,
}

/// Directive for `state` as seen by a participant holding `role`
pub fn directive(state: SessionState, role: Role) -> PhaseDirective {
    let describer = role == Role::Describer;
    let interrogator = role.is_interrogator();

    let (text, duration, required) = match state {
        SessionState::NotRegistered => (
            "Please register with your name in the control panel below",
            None,
            RequiredAction::Register,
        ),
        SessionState::Registering => (
            "Waiting for registration response from server",
            None,
            RequiredAction::None,
        ),
        SessionState::Registered => (
            "Please enter your peer's name and call",
            None,
            RequiredAction::PlaceCall,
        ),
        SessionState::Calling => ("Attempting call", None, RequiredAction::None),
        SessionState::Incoming => ("Incoming call", None, RequiredAction::AnswerIncomingCall),
        SessionState::IncomingAccepted => ("Connecting call", None, RequiredAction::None),
        SessionState::InCall => (
            "Please click confirm when peer video begins",
            None,
            RequiredAction::ConfirmVideo,
        ),
        SessionState::PlayRequest => ("Requesting playback", None, RequiredAction::None),
        SessionState::InPlayback => ("Playing recorded session", None, RequiredAction::WatchPlayback),
        SessionState::WaitingForPeerConfirm => {
            ("Waiting for your peer to confirm", None, RequiredAction::None)
        }
        SessionState::WaitingForStart => ("Click start when ready", None, RequiredAction::StartGame),
        SessionState::WaitingForPeerStart => {
            ("Waiting for your peer to click start", None, RequiredAction::None)
        }
        SessionState::ReviewingImage if describer => (
            "You have 30 seconds to memorize the image below",
            Some(IMAGE_REVIEW_DURATION),
            RequiredAction::MemorizeImage,
        ),
        SessionState::ReviewingImage => (
            "Describer has 30 seconds to view their image.",
            Some(IMAGE_REVIEW_DURATION),
            RequiredAction::WatchDescriber,
        ),
        SessionState::FirstInterrogation if describer => (
            "You have two minutes of being questioned",
            Some(INTERROGATION_DURATION),
            RequiredAction::AnswerQuestions,
        ),
        SessionState::FirstInterrogation => (
            "You have two minutes to question",
            Some(INTERROGATION_DURATION),
            RequiredAction::Question,
        ),
        SessionState::FirstResponse => (
            "INTERROGATOR should now log their first decision now, DESCRIBER please wait.",
            None,
            decision_action(interrogator, DecisionRound::First),
        ),
        SessionState::SecondInterrogation if describer => (
            "You have two more minutes of being questioned",
            Some(INTERROGATION_DURATION),
            RequiredAction::AnswerQuestions,
        ),
        SessionState::SecondInterrogation => (
            "You have two more minutes to question",
            Some(INTERROGATION_DURATION),
            RequiredAction::Question,
        ),
        SessionState::SecondResponse => (
            "INTERROGATOR should now log their second decision",
            None,
            decision_action(interrogator, DecisionRound::Second),
        ),
        SessionState::PostSurvey => (
            "Thank you for playing! Please answer the post-game questions",
            None,
            RequiredAction::CompleteSurvey,
        ),
        SessionState::PostCall => (
            "Interrogation Ended. Your videos are recorded. Thank you very much for your participation!",
            None,
            RequiredAction::None,
        ),
    };

    PhaseDirective {
        state,
        role,
        text,
        duration,
        required,
    }
}

fn decision_action(interrogator: bool, round: DecisionRound) -> RequiredAction {
    if interrogator {
        RequiredAction::LogDecision(round)
    } else {
        RequiredAction::AwaitDecision
    }
}

/// Only the describer is shown the image
pub fn shows_image(role: Role) -> bool {
    role == Role::Describer
}

/// Only the interrogator is shown hints
pub fn shows_hint(role: Role) -> bool {
    role.is_interrogator()
}

/// Only the interrogator logs decisions
pub fn may_decide(role: Role) -> bool {
    role.is_interrogator()
}

/// Decision round asked for in `state`, if any
pub fn decision_round(state: SessionState) -> Option<DecisionRound> {
    match state {
        SessionState::FirstResponse => Some(DecisionRound::First),
        SessionState::SecondResponse => Some(DecisionRound::Second),
        _ => None,
    }
}
