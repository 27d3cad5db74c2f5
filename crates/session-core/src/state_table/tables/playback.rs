use crate::media::MediaMode;
use crate::state::SessionState;
use crate::state_table::{Action, EventType, Guard, StateTableBuilder, Transition};

/// Playback of a recorded session
pub fn add_playback_transitions(builder: &mut StateTableBuilder) {
    builder.add_transitions(
        &[SessionState::Registered, SessionState::PostCall],
        EventType::Play,
        Transition {
            guards: vec![Guard::PeerNotEmpty],
            actions: vec![
                Action::RememberPeer,
                Action::StartNegotiation(MediaMode::RecvOnly),
                Action::SendPlay,
            ],
            next_state: Some(SessionState::PlayRequest),
        },
    );

    builder.add_transition(
        SessionState::PlayRequest,
        EventType::PlayAccepted,
        Transition {
            guards: vec![],
            actions: vec![Action::ApplyRemoteAnswer],
            next_state: Some(SessionState::InPlayback),
        },
    );

    // Rejection lands in PostCall, not Registered
    builder.add_transition(
        SessionState::PlayRequest,
        EventType::PlayRejected,
        Transition {
            guards: vec![],
            actions: vec![Action::DisposeMedia, Action::ClearCall, Action::SurfacePlaybackRejected],
            next_state: Some(SessionState::PostCall),
        },
    );

    builder.add_transition(
        SessionState::InPlayback,
        EventType::PlayEnd,
        Transition {
            guards: vec![],
            actions: vec![Action::DisposeMedia, Action::ClearCall, Action::SurfacePlaybackEnded],
            next_state: Some(SessionState::PostCall),
        },
    );
}
