//! Which stop message a local teardown sends

use bluffline_protocol_core::ClientMessage;
use serde::{Deserialize, Serialize};

use crate::state::SessionState;

/// Stop message id
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum StopKind {
    /// `stop{}`, ends a live call or game
    Stop,
    /// `stopPlay{}`, ends playback or abandons an unanswered call
    StopPlay,
}

/// Result of mapping a state to a stop message
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub struct StopMapping {
    pub kind: StopKind,
    /// The state has no defined stop; `kind` is the fallback
    pub unexpected: bool,
}

impl StopKind {
    /// Total mapping from the state at the moment of the stop
    ///
    /// States without a defined stop fall back to `stop{}` and are flagged
    /// so the caller can report them.
    pub fn for_state(state: SessionState) -> StopMapping {
        match state {
            SessionState::InPlayback | SessionState::Calling => StopMapping {
                kind: StopKind::StopPlay,
                unexpected: false,
            },
            SessionState::InCall | SessionState::SecondResponse | SessionState::PostSurvey => {
                StopMapping {
                    kind: StopKind::Stop,
                    unexpected: false,
                }
            }
            _ => StopMapping {
                kind: StopKind::Stop,
                unexpected: true,
            },
        }
    }

    /// Stop for a negotiation whose remote answer could not be applied
    ///
    /// Outbound calls and playback requests are released with `stopPlay{}`,
    /// an accepted incoming call with `stop{}`.
    pub fn after_failed_answer(state: SessionState) -> StopKind {
        match state {
            SessionState::Calling | SessionState::PlayRequest => StopKind::StopPlay,
            _ => StopKind::Stop,
        }
    }

    pub fn message(self) -> ClientMessage {
        match self {
            StopKind::Stop => ClientMessage::Stop,
            StopKind::StopPlay => ClientMessage::StopPlay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playback_and_calling_use_stop_play() {
        for state in [SessionState::InPlayback, SessionState::Calling] {
            let mapping = StopKind::for_state(state);
            assert_eq!(mapping.kind, StopKind::StopPlay);
            assert!(!mapping.unexpected);
        }
    }

    #[test]
    fn test_call_states_use_stop() {
        for state in [SessionState::InCall, SessionState::SecondResponse, SessionState::PostSurvey] {
            assert_eq!(
                StopKind::for_state(state),
                StopMapping {
                    kind: StopKind::Stop,
                    unexpected: false
                }
            );
        }
    }

    #[test]
    fn test_failed_answer_stops() {
        assert_eq!(StopKind::after_failed_answer(SessionState::Calling), StopKind::StopPlay);
        assert_eq!(StopKind::after_failed_answer(SessionState::PlayRequest), StopKind::StopPlay);
        assert_eq!(StopKind::after_failed_answer(SessionState::IncomingAccepted), StopKind::Stop);
    }

    #[test]
    fn test_mapping_is_total() {
        for state in SessionState::ALL {
            let mapping = StopKind::for_state(state);
            let defined = matches!(
                state,
                SessionState::InPlayback
                    | SessionState::Calling
                    | SessionState::InCall
                    | SessionState::SecondResponse
                    | SessionState::PostSurvey
            );
            assert_eq!(mapping.unexpected, !defined, "state {}", state);
        }
        assert_eq!(StopKind::for_state(SessionState::FirstInterrogation).kind.message(), ClientMessage::Stop);
    }
}
