#![allow(dead_code)]

use std::sync::Arc;

use bluffline_protocol_core::{AssignedRole, ResponseStatus, ServerMessage};
use bluffline_session_core::prelude::*;

pub const ME: &str = "alice";
pub const PEER: &str = "bob";

pub fn accepted_register() -> Trigger {
    Trigger::Message(ServerMessage::RegisterResponse {
        response: ResponseStatus::Accepted,
        message: None,
    })
}

pub fn accepted_call(answer: &str) -> Trigger {
    Trigger::Message(ServerMessage::CallResponse {
        response: ResponseStatus::Accepted,
        sdp_answer: Some(answer.to_string()),
        message: None,
    })
}

pub fn incoming_call(from: &str) -> Trigger {
    Trigger::Message(ServerMessage::IncomingCall { from: from.to_string() })
}

/// Game steps after the call is up, paired with the state each one reaches
fn game_steps(role: AssignedRole) -> Vec<(SessionState, Trigger)> {
    vec![
        (SessionState::WaitingForPeerConfirm, Trigger::ConfirmVideo),
        (
            SessionState::WaitingForStart,
            Trigger::Message(ServerMessage::RoleAssignment { role }),
        ),
        (SessionState::WaitingForPeerStart, Trigger::StartGame),
        (
            SessionState::ReviewingImage,
            Trigger::Message(ServerMessage::StartReviewingImage {
                src: Some("img/1.jpg".to_string()),
            }),
        ),
        (
            SessionState::FirstInterrogation,
            Trigger::Message(ServerMessage::StartFirstInterrogation),
        ),
        (SessionState::FirstResponse, Trigger::Message(ServerMessage::GetFirstDecision)),
        (
            SessionState::SecondInterrogation,
            Trigger::Message(ServerMessage::StartSecondInterrogation),
        ),
        (SessionState::SecondResponse, Trigger::Message(ServerMessage::GetSecondDecision)),
        (SessionState::PostSurvey, Trigger::Message(ServerMessage::StartPostGame)),
    ]
}

/// Triggers that take a fresh session to `target`
pub fn path_to(target: SessionState, role: AssignedRole) -> Vec<Trigger> {
    let mut steps = Vec::new();
    if target == SessionState::NotRegistered {
        return steps;
    }
    steps.push(Trigger::Register { name: ME.to_string() });
    if target == SessionState::Registering {
        return steps;
    }
    steps.push(accepted_register());

    match target {
        SessionState::Registered => {}
        SessionState::Incoming => steps.push(incoming_call(PEER)),
        SessionState::IncomingAccepted => {
            steps.push(incoming_call(PEER));
            steps.push(Trigger::AcceptCall);
        }
        SessionState::PlayRequest => steps.push(Trigger::Play { target: PEER.to_string() }),
        SessionState::InPlayback => {
            steps.push(Trigger::Play { target: PEER.to_string() });
            steps.push(Trigger::Message(ServerMessage::PlayResponse {
                response: ResponseStatus::Accepted,
                sdp_answer: Some("play-answer".to_string()),
                error: None,
            }));
        }
        SessionState::Calling => steps.push(Trigger::Call { peer: PEER.to_string() }),
        SessionState::PostCall => {
            steps.push(Trigger::Call { peer: PEER.to_string() });
            steps.push(accepted_call("answer"));
            steps.push(Trigger::Message(ServerMessage::StopCommunication));
        }
        _ => {
            steps.push(Trigger::Call { peer: PEER.to_string() });
            steps.push(accepted_call("answer"));
            if target != SessionState::InCall {
                for (reached, step) in game_steps(role) {
                    steps.push(step);
                    if reached == target {
                        break;
                    }
                }
            }
        }
    }
    steps
}

/// A session (and its media engine) parked in `target`
pub async fn session_in(target: SessionState, role: AssignedRole) -> (Session, MockMediaEngine) {
    let engine = MockMediaEngine::new();
    let mut session = Session::new(Arc::new(engine.clone()));
    for step in path_to(target, role) {
        session
            .process(step.clone())
            .await
            .unwrap_or_else(|e| panic!("step {:?} towards {} failed: {}", step, target, e));
    }
    assert_eq!(session.state(), target, "failed to reach {}", target);
    (session, engine)
}
