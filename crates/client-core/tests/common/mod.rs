#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use bluffline_client_core::prelude::*;
use bluffline_client_core::ClientResult;
use bluffline_protocol_core::{decode_client, encode_server, ClientMessage, ResponseStatus, ServerMessage};
use tokio::sync::broadcast;
use tokio::time::timeout;

const WAIT: Duration = Duration::from_secs(2);

/// Plays the coordinator on the far side of a [`ChannelTransport`]
pub struct Coordinator {
    peer: ChannelPeer,
}

impl Coordinator {
    pub fn new(peer: ChannelPeer) -> Self {
        Self { peer }
    }

    /// Next message sent by the client
    pub async fn expect(&mut self) -> ClientMessage {
        let frame = timeout(WAIT, self.peer.recv())
            .await
            .expect("timed out waiting for a client message")
            .expect("client closed the transport");
        decode_client(&frame).expect("client sent an undecodable frame")
    }

    /// Nothing has been sent by the client so far
    pub fn assert_silent(&mut self) {
        if let Some(frame) = self.peer.try_recv() {
            panic!("unexpected frame from client: {}", frame);
        }
    }

    /// Wait for the client to close its side
    pub async fn expect_closed(&mut self) {
        let next = timeout(WAIT, self.peer.recv())
            .await
            .expect("timed out waiting for the transport to close");
        assert!(next.is_none(), "expected close, got {:?}", next);
    }

    pub fn send(&self, message: ServerMessage) {
        let frame = encode_server(&message).expect("encode server message");
        self.peer.send(frame).expect("client transport dropped");
    }

    pub fn send_raw(&self, frame: &str) {
        self.peer.send(frame).expect("client transport dropped");
    }

    pub fn accept_register(&self) {
        self.send(ServerMessage::RegisterResponse {
            response: ResponseStatus::Accepted,
            message: None,
        });
    }

    pub fn accept_call(&self, answer: &str) {
        self.send(ServerMessage::CallResponse {
            response: ResponseStatus::Accepted,
            sdp_answer: Some(answer.to_string()),
            message: None,
        });
    }
}

/// A client on an in-memory transport with a shared mock media engine
pub async fn start_client() -> ClientResult<(ClientManager, Coordinator, MockMediaEngine)> {
    start_client_with(MockMediaEngine::new()).await
}

pub async fn start_client_with(
    engine: MockMediaEngine,
) -> ClientResult<(ClientManager, Coordinator, MockMediaEngine)> {
    let (transport, peer) = ChannelTransport::pair();
    let client = ClientBuilder::new()
        .media_engine(Arc::new(engine.clone()))
        .build_with_transport(transport)
        .await?;
    Ok((client, Coordinator::new(peer), engine))
}

/// Wait for the first event matching `predicate`
pub async fn wait_for<F>(events: &mut broadcast::Receiver<ClientEvent>, mut predicate: F) -> ClientEvent
where
    F: FnMut(&ClientEvent) -> bool,
{
    timeout(WAIT, async {
        loop {
            let event = events.recv().await.expect("event channel closed");
            if predicate(&event) {
                return event;
            }
        }
    })
    .await
    .expect("timed out waiting for event")
}

pub async fn wait_for_state(events: &mut broadcast::Receiver<ClientEvent>, state: SessionState) {
    wait_for(events, |e| matches!(e, ClientEvent::StateChanged { current, .. } if *current == state)).await;
}

/// Register as `alice` and wait for the coordinator's acceptance
pub async fn registered_client() -> ClientResult<(
    ClientManager,
    Coordinator,
    MockMediaEngine,
    broadcast::Receiver<ClientEvent>,
)> {
    let (client, mut coordinator, engine) = start_client().await?;
    let mut events = client.subscribe_events();
    client.register("alice").await?;
    coordinator.expect().await;
    coordinator.accept_register();
    wait_for_state(&mut events, SessionState::Registered).await;
    Ok((client, coordinator, engine, events))
}

/// A registered client with an established call to `bob`
pub async fn client_in_call() -> ClientResult<(
    ClientManager,
    Coordinator,
    MockMediaEngine,
    broadcast::Receiver<ClientEvent>,
)> {
    let (client, mut coordinator, engine, mut events) = registered_client().await?;
    client.call("bob").await?;
    coordinator.expect().await;
    coordinator.accept_call("answer");
    wait_for_state(&mut events, SessionState::InCall).await;
    Ok((client, coordinator, engine, events))
}
