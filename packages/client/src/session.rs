//! WebSocket client session management.

use futures_util::{
    SinkExt, StreamExt,
    stream::{SplitSink, SplitStream},
};
use hiroba_shared::protocol::{ChatMessage, decode_chat_message, encode_chat_message};
use tokio::{net::TcpStream, sync::mpsc, task::JoinHandle};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{
        self,
        client::IntoClientRequest,
        http::{HeaderValue, header::ORIGIN},
        protocol::Message,
    },
};

use crate::{
    domain::{Composer, MessageLog},
    error::ClientError,
};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// One connection to the relay plus the log of everything received on it.
///
/// Outgoing frames go through an unbounded channel to a writer task; incoming
/// chat messages are delivered on the receiver returned by [`ClientSession::connect`]
/// and recorded with [`ClientSession::on_receive`].
pub struct ClientSession {
    outbound: mpsc::UnboundedSender<Message>,
    log: MessageLog,
    reader: Option<JoinHandle<()>>,
    writer: Option<JoinHandle<()>>,
}

impl ClientSession {
    /// Create a session that writes frames to `outbound` without owning a socket.
    pub fn new(outbound: mpsc::UnboundedSender<Message>) -> Self {
        Self {
            outbound,
            log: MessageLog::new(),
            reader: None,
            writer: None,
        }
    }

    /// Open a WebSocket connection to `url`, presenting `origin` in the handshake.
    ///
    /// # Errors
    ///
    /// * `InvalidRequest` - `url` or `origin` cannot form a handshake request
    /// * `ConnectionError` - the relay is unreachable or refused the upgrade
    pub async fn connect(
        url: &str,
        origin: &str,
    ) -> Result<(Self, mpsc::UnboundedReceiver<ChatMessage>), ClientError> {
        let mut request =
            url.into_client_request().map_err(|e| ClientError::InvalidRequest(e.to_string()))?;
        let origin =
            HeaderValue::from_str(origin).map_err(|e| ClientError::InvalidRequest(e.to_string()))?;
        request.headers_mut().insert(ORIGIN, origin);

        let (ws_stream, _response) = connect_async(request).await.map_err(|e| match e {
            tungstenite::Error::Http(response) => ClientError::ConnectionError(format!(
                "relay refused the upgrade with HTTP {}",
                response.status()
            )),
            other => ClientError::ConnectionError(other.to_string()),
        })?;
        tracing::info!("Connected to relay at {}", url);

        let (write, read) = ws_stream.split();
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel::<Message>();
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel::<ChatMessage>();

        let mut session = Self::new(outbound_tx);
        session.writer = Some(tokio::spawn(write_loop(write, outbound_rx)));
        session.reader = Some(tokio::spawn(read_loop(read, inbound_tx)));

        Ok((session, inbound_rx))
    }

    /// Send the composer's current text, then clear it.
    ///
    /// Returns `Ok(false)` without emitting anything when the text is empty.
    pub fn submit(&mut self, composer: &mut Composer) -> Result<bool, ClientError> {
        let Some(message) = composer.compose() else {
            return Ok(false);
        };

        let frame =
            encode_chat_message(&message).map_err(|e| ClientError::Encode(e.to_string()))?;
        self.outbound
            .send(Message::Text(frame.into()))
            .map_err(|_| ClientError::SessionClosed)?;

        composer.clear_text();
        Ok(true)
    }

    /// Append a received message to the log.
    pub fn on_receive(&mut self, message: ChatMessage) -> &ChatMessage {
        self.log.push(message)
    }

    /// Every message received so far, in arrival order
    pub fn messages(&self) -> &[ChatMessage] {
        self.log.as_slice()
    }

    /// Send a close frame and wait for queued frames to be flushed.
    pub async fn close(mut self) {
        let _ = self.outbound.send(Message::Close(None));
        if let Some(writer) = self.writer.take() {
            let _ = writer.await;
        }
    }
}

impl Drop for ClientSession {
    fn drop(&mut self) {
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
    }
}

async fn write_loop(
    mut write: SplitSink<WsStream, Message>,
    mut outbound: mpsc::UnboundedReceiver<Message>,
) {
    while let Some(message) = outbound.recv().await {
        let is_close = matches!(message, Message::Close(_));
        if let Err(e) = write.send(message).await {
            tracing::warn!("Failed to send message: {}", e);
            break;
        }
        if is_close {
            break;
        }
    }
}

async fn read_loop(mut read: SplitStream<WsStream>, inbound: mpsc::UnboundedSender<ChatMessage>) {
    while let Some(frame) = read.next().await {
        match frame {
            Ok(Message::Text(text)) => match decode_chat_message(text.as_str()) {
                Ok(Some(message)) => {
                    if inbound.send(message).is_err() {
                        break;
                    }
                }
                Ok(None) => tracing::debug!("Ignoring frame with an unknown event"),
                Err(e) => tracing::warn!("Dropping malformed chat message: {}", e),
            },
            Ok(Message::Close(_)) => {
                tracing::info!("Relay closed the connection");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!("WebSocket read error: {}", e);
                break;
            }
        }
    }
}
