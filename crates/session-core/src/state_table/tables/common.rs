use crate::outcome::AnomalyKind;
use crate::state::SessionState;
use crate::state_table::{Action, EventType, StateTableBuilder, Transition};

const UNREGISTERED: [SessionState; 2] = [SessionState::NotRegistered, SessionState::Registering];

/// Transitions that apply in any state: teardown, busy rejection, ICE and hints
pub fn add_common_transitions(builder: &mut StateTableBuilder) {
    // Any state: a call arriving while not idle is rejected as busy
    builder.add_wildcard(
        EventType::IncomingCall,
        Transition {
            guards: vec![],
            actions: vec![Action::SendBusyReject],
            next_state: None,
        },
    );

    // Any state -> PostCall: local stop notifies the coordinator
    builder.add_wildcard(
        EventType::UserStop,
        Transition {
            guards: vec![],
            actions: vec![
                Action::SendStop,
                Action::DisposeMedia,
                Action::ClearCall,
                Action::SurfaceCallEnded,
            ],
            next_state: Some(SessionState::PostCall),
        },
    );

    // Any state -> PostCall: remote stop never sends one back
    builder.add_wildcard(
        EventType::StopCommunication,
        Transition {
            guards: vec![],
            actions: vec![Action::DisposeMedia, Action::ClearCall, Action::SurfaceCallEnded],
            next_state: Some(SessionState::PostCall),
        },
    );

    // Nothing to tear down before registration
    for event in [EventType::UserStop, EventType::StopCommunication] {
        builder.add_transitions(
            &UNREGISTERED,
            event,
            Transition {
                guards: vec![],
                actions: vec![Action::ReportAnomaly(AnomalyKind::UnexpectedStop)],
                next_state: None,
            },
        );
    }

    // Role assignments are applied even out of order
    builder.add_wildcard(
        EventType::RoleAssignment,
        Transition {
            guards: vec![],
            actions: vec![
                Action::ReportAnomaly(AnomalyKind::RoleAssignmentOutOfState),
                Action::AssignRole,
            ],
            next_state: Some(SessionState::WaitingForStart),
        },
    );

    builder.add_wildcard(
        EventType::Hint,
        Transition {
            guards: vec![],
            actions: vec![Action::SurfaceHint],
            next_state: None,
        },
    );

    builder.add_wildcard(
        EventType::RemoteIceCandidate,
        Transition {
            guards: vec![],
            actions: vec![Action::AddRemoteCandidate],
            next_state: None,
        },
    );

    builder.add_wildcard(
        EventType::LocalIceCandidate,
        Transition {
            guards: vec![],
            actions: vec![Action::SendLocalCandidate],
            next_state: None,
        },
    );
}
