use crate::media::MediaMode;
use crate::state::SessionState;
use crate::state_table::{Action, EventType, Guard, StateTableBuilder, Transition};

const IDLE: [SessionState; 2] = [SessionState::Registered, SessionState::PostCall];

/// Registration plus outbound and inbound call setup
pub fn add_call_transitions(builder: &mut StateTableBuilder) {
    // NotRegistered -> Registering: user registers
    builder.add_transition(
        SessionState::NotRegistered,
        EventType::Register,
        Transition {
            guards: vec![Guard::NameNotEmpty],
            actions: vec![Action::RememberName, Action::SendRegister],
            next_state: Some(SessionState::Registering),
        },
    );

    builder.add_transition(
        SessionState::Registering,
        EventType::RegisterAccepted,
        Transition {
            guards: vec![],
            actions: vec![],
            next_state: Some(SessionState::Registered),
        },
    );

    builder.add_transition(
        SessionState::Registering,
        EventType::RegisterRejected,
        Transition {
            guards: vec![],
            actions: vec![Action::SurfaceRegistrationRejected],
            next_state: Some(SessionState::NotRegistered),
        },
    );

    // Idle -> Calling: user places a call
    builder.add_transitions(
        &IDLE,
        EventType::Call,
        Transition {
            guards: vec![Guard::PeerNotEmpty],
            actions: vec![
                Action::RememberPeer,
                Action::StartNegotiation(MediaMode::SendRecv),
                Action::SendCall,
            ],
            next_state: Some(SessionState::Calling),
        },
    );

    builder.add_transition(
        SessionState::Calling,
        EventType::CallAccepted,
        Transition {
            guards: vec![],
            actions: vec![Action::ApplyRemoteAnswer],
            next_state: Some(SessionState::InCall),
        },
    );

    // A rejected call is stopped locally, which still tells the coordinator
    builder.add_transition(
        SessionState::Calling,
        EventType::CallRejected,
        Transition {
            guards: vec![],
            actions: vec![
                Action::SendStop,
                Action::DisposeMedia,
                Action::ClearCall,
                Action::SurfaceCallRejected,
            ],
            next_state: Some(SessionState::Registered),
        },
    );

    // Idle -> Incoming: prompt the user
    builder.add_transitions(
        &IDLE,
        EventType::IncomingCall,
        Transition {
            guards: vec![],
            actions: vec![Action::RememberPeer, Action::SurfaceIncomingCall],
            next_state: Some(SessionState::Incoming),
        },
    );

    builder.add_transition(
        SessionState::Incoming,
        EventType::AcceptCall,
        Transition {
            guards: vec![],
            actions: vec![Action::StartNegotiation(MediaMode::SendRecv), Action::SendAccept],
            next_state: Some(SessionState::IncomingAccepted),
        },
    );

    builder.add_transition(
        SessionState::Incoming,
        EventType::DeclineCall,
        Transition {
            guards: vec![],
            actions: vec![Action::SendDecline, Action::DisposeMedia, Action::ClearCall],
            next_state: Some(SessionState::Registered),
        },
    );

    builder.add_transition(
        SessionState::IncomingAccepted,
        EventType::StartCommunication,
        Transition {
            guards: vec![],
            actions: vec![Action::ApplyRemoteAnswer],
            next_state: Some(SessionState::InCall),
        },
    );
}
