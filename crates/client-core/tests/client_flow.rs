//! End-to-end flows through the session task over an in-memory transport

mod common;

use std::sync::Arc;

use bluffline_client_core::prelude::*;
use bluffline_protocol_core::{AssignedRole, ClientMessage, ResponseStatus, ServerMessage};
use bluffline_session_core::{AnomalyKind, DecisionRound, RequiredAction};
use common::*;
use pretty_assertions::assert_eq;

#[tokio::test]
async fn full_game_as_interrogator() -> anyhow::Result<()> {
    let (client, mut coordinator, engine) = start_client().await?;
    let mut events = client.subscribe_events();

    assert_eq!(client.register("alice").await?, SessionState::Registering);
    assert_eq!(
        coordinator.expect().await,
        ClientMessage::Register { name: "alice".into() }
    );
    coordinator.accept_register();
    wait_for_state(&mut events, SessionState::Registered).await;

    assert_eq!(client.call("bob").await?, SessionState::Calling);
    assert_eq!(
        coordinator.expect().await,
        ClientMessage::Call {
            from: "alice".into(),
            to: "bob".into(),
            sdp_offer: "mock-offer-1".into(),
        }
    );
    coordinator.accept_call("answer-1");
    wait_for_state(&mut events, SessionState::InCall).await;

    assert_eq!(client.confirm_video().await?, SessionState::WaitingForPeerConfirm);
    assert_eq!(coordinator.expect().await, ClientMessage::ConfirmVideo);

    coordinator.send(ServerMessage::RoleAssignment {
        role: AssignedRole::Interrogator,
    });
    let event = wait_for(&mut events, |e| matches!(e, ClientEvent::RoleAssigned { .. })).await;
    assert_eq!(event, ClientEvent::RoleAssigned { role: Role::Interrogator });

    assert_eq!(client.start_game().await?, SessionState::WaitingForPeerStart);
    assert_eq!(coordinator.expect().await, ClientMessage::StartGame);

    coordinator.send(ServerMessage::StartReviewingImage { src: None });
    let event = wait_for(&mut events, |e| {
        matches!(e, ClientEvent::StateChanged { current: SessionState::ReviewingImage, .. })
    })
    .await;
    match event {
        ClientEvent::StateChanged { previous, directive, .. } => {
            assert_eq!(previous, SessionState::WaitingForPeerStart);
            assert_eq!(directive.required, RequiredAction::WatchDescriber);
        }
        other => panic!("unexpected event {:?}", other),
    }

    coordinator.send(ServerMessage::StartFirstInterrogation);
    coordinator.send(ServerMessage::GetFirstDecision);
    let event = wait_for(&mut events, |e| matches!(e, ClientEvent::DecisionRequested { .. })).await;
    assert_eq!(event, ClientEvent::DecisionRequested { round: DecisionRound::First });

    assert_eq!(
        client.submit_decision(Decision::Truth).await?,
        SessionState::FirstResponse
    );
    assert_eq!(
        coordinator.expect().await,
        ClientMessage::FirstDecision {
            decision: Decision::Truth
        }
    );

    coordinator.send(ServerMessage::Hint { hint: "look at the hat".into() });
    let event = wait_for(&mut events, |e| matches!(e, ClientEvent::Hint { .. })).await;
    assert_eq!(event, ClientEvent::Hint { text: "look at the hat".into() });

    coordinator.send(ServerMessage::StartSecondInterrogation);
    coordinator.send(ServerMessage::GetSecondDecision);
    let event = wait_for(&mut events, |e| matches!(e, ClientEvent::DecisionRequested { .. })).await;
    assert_eq!(event, ClientEvent::DecisionRequested { round: DecisionRound::Second });

    client.submit_decision(Decision::Bluff).await?;
    assert_eq!(
        coordinator.expect().await,
        ClientMessage::SecondDecision {
            decision: Decision::Bluff
        }
    );

    coordinator.send(ServerMessage::StartPostGame);
    wait_for_state(&mut events, SessionState::PostSurvey).await;

    assert_eq!(client.stop().await?, SessionState::PostCall);
    assert_eq!(coordinator.expect().await, ClientMessage::Stop);
    assert_eq!(engine.live_handles().await, 0);

    let snapshot = client.snapshot().await?;
    assert_eq!(snapshot.role, Role::None);
    assert!(!snapshot.has_media);
    assert_eq!(snapshot.name.as_deref(), Some("alice"));
    Ok(())
}

#[tokio::test]
async fn describer_sees_image_but_cannot_decide() -> anyhow::Result<()> {
    let (client, mut coordinator, _engine, mut events) = client_in_call().await?;

    client.confirm_video().await?;
    coordinator.expect().await;
    coordinator.send(ServerMessage::RoleAssignment {
        role: AssignedRole::Describer,
    });
    wait_for_state(&mut events, SessionState::WaitingForStart).await;

    coordinator.send(ServerMessage::StartReviewingImage {
        src: Some("img/7.jpg".into()),
    });
    let event = wait_for(&mut events, |e| matches!(e, ClientEvent::ImageToMemorize { .. })).await;
    assert_eq!(event, ClientEvent::ImageToMemorize { src: "img/7.jpg".into() });

    coordinator.send(ServerMessage::StartFirstInterrogation);
    coordinator.send(ServerMessage::GetFirstDecision);
    wait_for_state(&mut events, SessionState::FirstResponse).await;

    let err = client.submit_decision(Decision::Truth).await.unwrap_err();
    assert!(err.is_validation_error());
    assert_eq!(err.category(), "role");

    coordinator.send(ServerMessage::Hint { hint: "secret".into() });
    let event = wait_for(&mut events, |e| matches!(e, ClientEvent::ProtocolAnomaly { .. })).await;
    match event {
        ClientEvent::ProtocolAnomaly { anomaly } => assert_eq!(anomaly.kind, AnomalyKind::HintForDescriber),
        other => panic!("unexpected event {:?}", other),
    }
    coordinator.assert_silent();
    Ok(())
}

#[tokio::test]
async fn busy_client_rejects_second_caller() -> anyhow::Result<()> {
    let (client, mut coordinator, _engine, _events) = client_in_call().await?;

    coordinator.send(ServerMessage::IncomingCall { from: "carol".into() });
    assert_eq!(coordinator.expect().await, ClientMessage::busy("carol"));
    assert_eq!(client.state().await?, SessionState::InCall);
    Ok(())
}

#[tokio::test]
async fn incoming_call_accepted() -> anyhow::Result<()> {
    let (client, mut coordinator, _engine, mut events) = registered_client().await?;

    coordinator.send(ServerMessage::IncomingCall { from: "bob".into() });
    let event = wait_for(&mut events, |e| matches!(e, ClientEvent::IncomingCall { .. })).await;
    assert_eq!(event, ClientEvent::IncomingCall { from: "bob".into() });
    assert_eq!(event.priority(), EventPriority::High);

    assert_eq!(client.accept_call().await?, SessionState::IncomingAccepted);
    match coordinator.expect().await {
        ClientMessage::IncomingCallResponse {
            from,
            call_response,
            sdp_offer,
            ..
        } => {
            assert_eq!(from, "bob");
            assert_eq!(call_response, bluffline_protocol_core::CallResponse::Accept);
            assert_eq!(sdp_offer.as_deref(), Some("mock-offer-1"));
        }
        other => panic!("unexpected message {:?}", other),
    }

    coordinator.send(ServerMessage::StartCommunication {
        sdp_answer: "answer".into(),
    });
    wait_for_state(&mut events, SessionState::InCall).await;

    coordinator.send(ServerMessage::StopCommunication);
    let event = wait_for(&mut events, |e| matches!(e, ClientEvent::CallEnded { .. })).await;
    assert_eq!(event, ClientEvent::CallEnded { remote: true });
    coordinator.assert_silent();
    Ok(())
}

#[tokio::test]
async fn registration_rejected_surfaces_reason() -> anyhow::Result<()> {
    let (client, mut coordinator, _engine) = start_client().await?;
    let mut events = client.subscribe_events();

    client.register("alice").await?;
    coordinator.expect().await;
    coordinator.send(ServerMessage::RegisterResponse {
        response: ResponseStatus::Rejected("rejected: user alice already registered".into()),
        message: Some("User alice already registered".into()),
    });

    let event = wait_for(&mut events, |e| matches!(e, ClientEvent::RegistrationRejected { .. })).await;
    assert_eq!(
        event,
        ClientEvent::RegistrationRejected {
            reason: "User alice already registered".into()
        }
    );
    assert_eq!(client.state().await?, SessionState::NotRegistered);
    Ok(())
}

#[tokio::test]
async fn invalid_input_sends_nothing() -> anyhow::Result<()> {
    let (client, mut coordinator, _engine, _events) = registered_client().await?;

    let err = client.call("  ").await.unwrap_err();
    assert!(err.is_validation_error());
    assert!(err.is_recoverable());

    let err = client.start_game().await.unwrap_err();
    assert_eq!(err.category(), "state");

    coordinator.assert_silent();
    assert_eq!(client.state().await?, SessionState::Registered);
    Ok(())
}

#[tokio::test]
async fn media_failure_reverts_to_registered() -> anyhow::Result<()> {
    let (client, mut coordinator, engine) = start_client_with(MockMediaEngine::new().with_offer_failure()).await?;
    let mut events = client.subscribe_events();
    client.register("alice").await?;
    coordinator.expect().await;
    coordinator.accept_register();
    wait_for_state(&mut events, SessionState::Registered).await;

    let err = client.call("bob").await.unwrap_err();
    assert_eq!(err.category(), "media");
    assert!(!err.is_validation_error());

    let event = wait_for(&mut events, |e| matches!(e, ClientEvent::MediaFailed { .. })).await;
    assert_eq!(event.priority(), EventPriority::Critical);

    coordinator.assert_silent();
    assert_eq!(client.state().await?, SessionState::Registered);
    assert_eq!(engine.live_handles().await, 0);
    Ok(())
}

#[tokio::test]
async fn local_candidates_are_forwarded() -> anyhow::Result<()> {
    let (client, mut coordinator, _engine, _events) = client_in_call().await?;

    let candidate = IceCandidate {
        candidate: "candidate:1 1 UDP 2122252543 10.0.0.2 50000 typ host".into(),
        sdp_mid: Some("0".into()),
        sdp_m_line_index: Some(0),
    };
    client.add_local_candidate(candidate.clone()).await?;
    assert_eq!(coordinator.expect().await, ClientMessage::OnIceCandidate { candidate });
    Ok(())
}

#[tokio::test]
async fn undecodable_frames_are_reported_and_skipped() -> anyhow::Result<()> {
    let (client, coordinator, _engine, mut events) = registered_client().await?;

    coordinator.send_raw("this is not json");
    let event = wait_for(&mut events, |e| matches!(e, ClientEvent::Error { .. })).await;
    match event {
        ClientEvent::Error { error } => {
            assert_eq!(error.category(), "protocol");
            assert!(error.is_recoverable());
        }
        other => panic!("unexpected event {:?}", other),
    }

    coordinator.send_raw(r#"{"id":"presenterResponse","response":"accepted"}"#);
    let event = wait_for(&mut events, |e| matches!(e, ClientEvent::ProtocolAnomaly { .. })).await;
    match event {
        ClientEvent::ProtocolAnomaly { anomaly } => {
            assert_eq!(anomaly.kind, AnomalyKind::UnrecognizedMessage);
            assert_eq!(anomaly.state, SessionState::Registered);
        }
        other => panic!("unexpected event {:?}", other),
    }

    assert_eq!(client.state().await?, SessionState::Registered);
    Ok(())
}

#[tokio::test]
async fn lost_connection_tears_down_locally() -> anyhow::Result<()> {
    let (client, coordinator, engine, mut events) = client_in_call().await?;
    assert_eq!(engine.live_handles().await, 1);

    drop(coordinator);
    let event = wait_for(&mut events, |e| matches!(e, ClientEvent::CallEnded { .. })).await;
    assert_eq!(event, ClientEvent::CallEnded { remote: true });
    wait_for(&mut events, |e| matches!(e, ClientEvent::ConnectionClosed { .. })).await;

    assert_eq!(engine.live_handles().await, 0);
    assert_eq!(client.register("alice").await, Err(ClientError::ClientStopped));
    Ok(())
}

#[tokio::test]
async fn shutdown_stops_the_active_call() -> anyhow::Result<()> {
    let (client, mut coordinator, engine, _events) = client_in_call().await?;

    client.shutdown().await?;
    assert_eq!(coordinator.expect().await, ClientMessage::Stop);
    coordinator.expect_closed().await;
    assert_eq!(engine.live_handles().await, 0);

    assert!(!client.is_running());
    assert_eq!(client.stop().await, Err(ClientError::ClientStopped));
    Ok(())
}

#[tokio::test]
async fn builder_registers_configured_name() -> anyhow::Result<()> {
    let (transport, peer) = ChannelTransport::pair();
    let mut coordinator = Coordinator::new(peer);
    let config = ClientConfig::new().with_display_name("alice");

    let client = ClientBuilder::new()
        .config(config)
        .media_engine(Arc::new(MockMediaEngine::new()))
        .build_with_transport(transport)
        .await?;

    assert_eq!(
        coordinator.expect().await,
        ClientMessage::Register { name: "alice".into() }
    );
    assert_eq!(client.state().await?, SessionState::Registering);
    Ok(())
}

#[tokio::test]
async fn builder_requires_media_engine() {
    let (transport, _peer) = ChannelTransport::pair();
    let err = ClientBuilder::new().build_with_transport(transport).await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidConfiguration { ref field, .. } if field == "media_engine"));
}

#[tokio::test]
async fn answer_failure_releases_the_coordinator() -> anyhow::Result<()> {
    let (client, mut coordinator, engine) = start_client_with(MockMediaEngine::new().with_answer_failure()).await?;
    let mut events = client.subscribe_events();
    client.register("alice").await?;
    coordinator.expect().await;
    coordinator.accept_register();
    wait_for_state(&mut events, SessionState::Registered).await;

    client.call("bob").await?;
    coordinator.expect().await;
    coordinator.accept_call("answer-1");

    assert_eq!(coordinator.expect().await, ClientMessage::StopPlay);
    wait_for(&mut events, |e| matches!(e, ClientEvent::MediaFailed { .. })).await;
    let event = wait_for(&mut events, |e| matches!(e, ClientEvent::StateChanged { .. })).await;
    match event {
        ClientEvent::StateChanged { previous, current, .. } => {
            assert_eq!(previous, SessionState::Calling);
            assert_eq!(current, SessionState::Registered);
        }
        other => panic!("unexpected event {:?}", other),
    }
    assert_eq!(engine.live_handles().await, 0);
    Ok(())
}

#[tokio::test]
async fn rejected_call_sends_stop_play() -> anyhow::Result<()> {
    let (client, mut coordinator, _engine, mut events) = registered_client().await?;

    client.call("bob").await?;
    coordinator.expect().await;
    coordinator.send(ServerMessage::CallResponse {
        response: ResponseStatus::Rejected("rejected: user bob is not registered".into()),
        sdp_answer: None,
        message: Some("user bob is not registered".into()),
    });

    let event = wait_for(&mut events, |e| matches!(e, ClientEvent::CallRejected { .. })).await;
    assert_eq!(
        event,
        ClientEvent::CallRejected {
            reason: Some("user bob is not registered".into())
        }
    );
    assert_eq!(coordinator.expect().await, ClientMessage::StopPlay);
    Ok(())
}

#[tokio::test]
async fn second_decision_in_a_round_is_refused() -> anyhow::Result<()> {
    let (client, mut coordinator, _engine, mut events) = client_in_call().await?;

    client.confirm_video().await?;
    coordinator.expect().await;
    coordinator.send(ServerMessage::RoleAssignment {
        role: AssignedRole::Interrogator,
    });
    wait_for(&mut events, |e| matches!(e, ClientEvent::RoleAssigned { .. })).await;
    client.start_game().await?;
    coordinator.expect().await;
    coordinator.send(ServerMessage::StartReviewingImage { src: None });
    coordinator.send(ServerMessage::StartFirstInterrogation);
    coordinator.send(ServerMessage::GetFirstDecision);
    wait_for(&mut events, |e| matches!(e, ClientEvent::DecisionRequested { .. })).await;

    client.submit_decision(Decision::Truth).await?;
    assert_eq!(
        coordinator.expect().await,
        ClientMessage::FirstDecision {
            decision: Decision::Truth
        }
    );

    let err = client.submit_decision(Decision::Bluff).await.unwrap_err();
    assert_eq!(err.category(), "state");
    coordinator.assert_silent();
    Ok(())
}
