use crate::state::SessionState;
use crate::state_table::{Action, EventType, Guard, StateTableBuilder, Transition};

/// Video confirmation, role assignment and the two questioning rounds
pub fn add_game_transitions(builder: &mut StateTableBuilder) {
    builder.add_transition(
        SessionState::InCall,
        EventType::ConfirmVideo,
        Transition {
            guards: vec![],
            actions: vec![Action::SendConfirmVideo],
            next_state: Some(SessionState::WaitingForPeerConfirm),
        },
    );

    builder.add_transition(
        SessionState::WaitingForPeerConfirm,
        EventType::RoleAssignment,
        Transition {
            guards: vec![],
            actions: vec![Action::AssignRole],
            next_state: Some(SessionState::WaitingForStart),
        },
    );

    builder.add_transition(
        SessionState::WaitingForStart,
        EventType::StartGame,
        Transition {
            guards: vec![],
            actions: vec![Action::SendStartGame],
            next_state: Some(SessionState::WaitingForPeerStart),
        },
    );

    // The peer may press start first, so review can begin from either state
    builder.add_transitions(
        &[SessionState::WaitingForStart, SessionState::WaitingForPeerStart],
        EventType::StartReviewingImage,
        Transition {
            guards: vec![],
            actions: vec![Action::SurfaceImage],
            next_state: Some(SessionState::ReviewingImage),
        },
    );

    builder.add_transition(
        SessionState::ReviewingImage,
        EventType::StartFirstInterrogation,
        Transition {
            guards: vec![],
            actions: vec![],
            next_state: Some(SessionState::FirstInterrogation),
        },
    );

    builder.add_transition(
        SessionState::FirstInterrogation,
        EventType::GetFirstDecision,
        Transition {
            guards: vec![],
            actions: vec![Action::SurfaceDecisionPrompt],
            next_state: Some(SessionState::FirstResponse),
        },
    );

    builder.add_transitions(
        &[SessionState::FirstResponse, SessionState::SecondResponse],
        EventType::SubmitDecision,
        Transition {
            guards: vec![Guard::IsInterrogator, Guard::DecisionPending],
            actions: vec![Action::SendDecision],
            next_state: None,
        },
    );

    builder.add_transition(
        SessionState::FirstResponse,
        EventType::StartSecondInterrogation,
        Transition {
            guards: vec![],
            actions: vec![],
            next_state: Some(SessionState::SecondInterrogation),
        },
    );

    builder.add_transition(
        SessionState::SecondInterrogation,
        EventType::GetSecondDecision,
        Transition {
            guards: vec![],
            actions: vec![Action::SurfaceDecisionPrompt],
            next_state: Some(SessionState::SecondResponse),
        },
    );

    builder.add_transition(
        SessionState::SecondResponse,
        EventType::StartPostGame,
        Transition {
            guards: vec![],
            actions: vec![],
            next_state: Some(SessionState::PostSurvey),
        },
    );
}
