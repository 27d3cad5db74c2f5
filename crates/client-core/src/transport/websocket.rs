use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, trace};

use super::SignalingTransport;
use crate::error::{ClientError, ClientResult};

/// WebSocket connection to the coordinator
///
/// Only text frames carry protocol messages. Ping/pong is answered by
/// tungstenite itself; binary frames are ignored.
pub struct WebSocketTransport {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    url: String,
    closed: bool,
}

impl WebSocketTransport {
    /// Open a connection to `url` (`ws://` or `wss://`)
    pub async fn connect(url: &str) -> ClientResult<Self> {
        let parsed = url::Url::parse(url).map_err(|e| ClientError::ConnectionFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let (stream, response) = connect_async(parsed.as_str()).await.map_err(|e| ClientError::ConnectionFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        info!(url = %url, status = %response.status(), "Connected to coordinator");
        Ok(Self {
            stream,
            url: url.to_string(),
            closed: false,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl SignalingTransport for WebSocketTransport {
    async fn send(&mut self, frame: String) -> ClientResult<()> {
        if self.closed {
            return Err(ClientError::ConnectionClosed);
        }
        trace!(frame = %frame, "Sending frame");
        self.stream.send(Message::Text(frame)).await?;
        Ok(())
    }

    async fn recv(&mut self) -> Option<ClientResult<String>> {
        if self.closed {
            return None;
        }
        loop {
            match self.stream.next().await? {
                Ok(Message::Text(text)) => {
                    trace!(frame = %text, "Received frame");
                    return Some(Ok(text));
                }
                Ok(Message::Close(frame)) => {
                    debug!(?frame, "Coordinator closed the connection");
                    self.closed = true;
                    return None;
                }
                Ok(Message::Binary(data)) => {
                    debug!(bytes = data.len(), "Ignoring binary frame");
                }
                Ok(_) => {}
                Err(err) => return Some(Err(err.into())),
            }
        }
    }

    async fn close(&mut self) -> ClientResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.stream.close(None).await?;
        Ok(())
    }
}
