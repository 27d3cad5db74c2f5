use async_trait::async_trait;
use tokio::sync::mpsc;

use super::SignalingTransport;
use crate::error::{ClientError, ClientResult};

/// In-memory transport over a pair of tokio channels
///
/// [`pair`](ChannelTransport::pair) returns the client side and a
/// [`ChannelPeer`] that plays the coordinator. Used by tests and by
/// embedders that relay frames themselves.
pub struct ChannelTransport {
    outbound: Option<mpsc::UnboundedSender<String>>,
    inbound: mpsc::UnboundedReceiver<String>,
}

/// Coordinator side of a [`ChannelTransport`]
pub struct ChannelPeer {
    outbound: mpsc::UnboundedSender<String>,
    inbound: mpsc::UnboundedReceiver<String>,
}

impl ChannelTransport {
    pub fn pair() -> (ChannelTransport, ChannelPeer) {
        let (to_peer, from_client) = mpsc::unbounded_channel();
        let (to_client, from_peer) = mpsc::unbounded_channel();
        (
            ChannelTransport {
                outbound: Some(to_peer),
                inbound: from_peer,
            },
            ChannelPeer {
                outbound: to_client,
                inbound: from_client,
            },
        )
    }
}

#[async_trait]
impl SignalingTransport for ChannelTransport {
    async fn send(&mut self, frame: String) -> ClientResult<()> {
        let sender = self.outbound.as_ref().ok_or(ClientError::ConnectionClosed)?;
        sender.send(frame).map_err(|_| ClientError::ConnectionClosed)
    }

    async fn recv(&mut self) -> Option<ClientResult<String>> {
        self.inbound.recv().await.map(Ok)
    }

    async fn close(&mut self) -> ClientResult<()> {
        self.outbound = None;
        self.inbound.close();
        Ok(())
    }
}

impl ChannelPeer {
    /// Deliver a frame to the client
    pub fn send(&self, frame: impl Into<String>) -> ClientResult<()> {
        self.outbound
            .send(frame.into())
            .map_err(|_| ClientError::ConnectionClosed)
    }

    /// Next frame sent by the client, `None` once the client closed
    pub async fn recv(&mut self) -> Option<String> {
        self.inbound.recv().await
    }

    /// Frame already sent by the client, without waiting
    pub fn try_recv(&mut self) -> Option<String> {
        self.inbound.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_frames_flow_both_ways() {
        let (mut transport, mut peer) = ChannelTransport::pair();

        transport.send("hello".to_string()).await.unwrap();
        assert_eq!(peer.recv().await.as_deref(), Some("hello"));

        peer.send("world").unwrap();
        assert_eq!(transport.recv().await.unwrap().unwrap(), "world");
    }

    #[tokio::test]
    async fn test_dropping_peer_closes_transport() {
        let (mut transport, peer) = ChannelTransport::pair();
        drop(peer);
        assert!(transport.recv().await.is_none());
        assert_eq!(
            transport.send("late".to_string()).await,
            Err(ClientError::ConnectionClosed)
        );
    }

    #[tokio::test]
    async fn test_close_ends_peer_stream() {
        let (mut transport, mut peer) = ChannelTransport::pair();
        transport.close().await.unwrap();
        assert!(peer.recv().await.is_none());
        assert!(transport.send("x".to_string()).await.is_err());
    }
}
