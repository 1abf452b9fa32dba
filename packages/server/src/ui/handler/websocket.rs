//! WebSocket connection handlers.

use std::{sync::Arc, time::Duration};

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{domain::ConnectionId, ui::state::AppState, usecase::RelayError};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, StatusCode> {
    let origin = headers
        .get(header::ORIGIN)
        .and_then(|value| value.to_str().ok());
    if !state.origin_policy.permits(origin) {
        tracing::warn!(
            "Rejecting WebSocket connection from origin {:?}",
            origin.unwrap_or("<none>")
        );
        return Err(StatusCode::FORBIDDEN);
    }

    // Create a queue for this client to receive broadcasts
    let (tx, rx) = mpsc::channel(state.outbound_buffer.max(1));

    // Register before the upgrade response goes out, so the client is part of
    // the broadcast set as soon as its handshake completes. If the upgrade
    // fails, `rx` is dropped and the next broadcast removes the entry.
    let connection_id = state.connect_client_usecase.execute(tx).await;
    tracing::info!(
        "Connection '{}' registered ({} active)",
        connection_id,
        state.connect_client_usecase.count_clients().await
    );

    let max_message_size = state.max_message_size;
    Ok(ws
        .max_message_size(max_message_size)
        .on_upgrade(move |socket| handle_socket(socket, state, connection_id, rx)))
}

/// Spawns a task that receives frames from the rx queue and pushes them to the WebSocket sender.
///
/// This function handles the outbound message flow: broadcasts (via rx queue)
/// are written to this client's WebSocket connection. The loop ends when the
/// queue is closed (the connection was evicted) or a write fails or stalls
/// past `send_timeout`.
///
/// # Arguments
///
/// * `rx` - Queue receiver for broadcast frames
/// * `sender` - WebSocket sink to send frames to this client
/// * `connection_id` - Connection the sink belongs to (for logging)
/// * `send_timeout` - Bound on a single socket write
///
/// # Returns
///
/// A `JoinHandle` for the spawned task
fn pusher_loop(
    mut rx: mpsc::Receiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
    connection_id: ConnectionId,
    send_timeout: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            let write = sender.send(Message::Text(frame.into()));
            match tokio::time::timeout(send_timeout, write).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    tracing::debug!("Failed to write to '{}': {}", connection_id, e);
                    break;
                }
                Err(_) => {
                    tracing::warn!(
                        "Write to '{}' stalled for {:?}, closing connection",
                        connection_id,
                        send_timeout
                    );
                    break;
                }
            }
        }

        let _ = tokio::time::timeout(send_timeout, sender.close()).await;
    })
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    connection_id: ConnectionId,
    rx: mpsc::Receiver<String>,
) {
    let (sender, mut receiver) = socket.split();

    let state_clone = state.clone();

    // Spawn a task to receive frames from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on '{}': {}", connection_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::debug!("Received text from '{}': {}", connection_id, text);

                    match state_clone
                        .relay_message_usecase
                        .execute(&connection_id, text.as_str())
                    {
                        Ok(()) => {}
                        Err(RelayError::DispatcherClosed) => {
                            tracing::error!(
                                "Broadcast dispatcher is gone, closing '{}'",
                                connection_id
                            );
                            break;
                        }
                        Err(e) => {
                            tracing::warn!("Dropping frame from '{}': {}", connection_id, e);
                        }
                    }
                }
                Message::Binary(data) => {
                    tracing::debug!(
                        "Ignoring {} bytes of binary data from '{}'",
                        data.len(),
                        connection_id
                    );
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", connection_id);
                    break;
                }
                _ => {}
            }
        }
    });

    // Spawn a task to write broadcasts to this client
    let mut send_task = pusher_loop(rx, sender, connection_id, state.send_timeout);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    if state
        .disconnect_client_usecase
        .execute(&connection_id)
        .await
    {
        tracing::info!(
            "Connection '{}' disconnected and removed from the broadcast set",
            connection_id
        );
    } else {
        tracing::info!(
            "Connection '{}' disconnected (already evicted)",
            connection_id
        );
    }
}
