//! WebSocket handler for real-time updates.

use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{
        ws::{close_code, CloseFrame, Message, Utf8Bytes, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt, Sink, Stream};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::registry::{ClientConnection, ConnectionId};
use crate::state::AppState;

/// Why a connection ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disconnect {
    /// The registry dropped the connection's queue.
    QueueClosed,
    /// A socket write failed.
    SendFailed,
    /// A socket write did not finish within the send timeout.
    SendTimedOut,
    /// The client closed the socket or stopped reading from it.
    ClientGone,
}

/// WebSocket upgrade handler.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Handle individual WebSocket connection.
async fn handle_socket(mut socket: WebSocket, state: AppState) {
    let (tx, rx) = mpsc::channel::<Arc<str>>(state.config.effective_queue_capacity());
    let connection = Arc::new(ClientConnection::new(tx));
    let conn_id = connection.id;

    if !state.publisher.connect(connection).await {
        warn!(%conn_id, "Closing WebSocket client without initial state");
        close_unavailable(conn_id, &mut socket).await;
        return;
    }
    info!(
        %conn_id,
        connections = state.registry.connection_count(),
        "WebSocket client connected"
    );

    let (sender, receiver) = socket.split();
    serve_connection(&state, conn_id, rx, sender, receiver).await;
}

/// Pump one registered connection until either side stops, then unregister it.
pub async fn serve_connection<S, R, E>(
    state: &AppState,
    conn_id: ConnectionId,
    rx: mpsc::Receiver<Arc<str>>,
    sender: S,
    receiver: R,
) -> Disconnect
where
    S: Sink<Message> + Unpin,
    S::Error: Display,
    R: Stream<Item = Result<Message, E>> + Unpin,
{
    let reason = tokio::select! {
        reason = write_queue(conn_id, rx, sender, state.config.send_timeout) => reason,
        reason = read_until_close(conn_id, receiver) => reason,
    };

    state.registry.unregister(conn_id).await;
    info!(
        %conn_id,
        ?reason,
        connections = state.registry.connection_count(),
        "WebSocket client disconnected"
    );
    reason
}

/// Drain the connection's queue onto the socket, one bounded write at a time.
async fn write_queue<S>(
    conn_id: ConnectionId,
    mut rx: mpsc::Receiver<Arc<str>>,
    mut sender: S,
    send_timeout: Duration,
) -> Disconnect
where
    S: Sink<Message> + Unpin,
    S::Error: Display,
{
    while let Some(msg) = rx.recv().await {
        debug!(%conn_id, bytes = msg.len(), "Sending snapshot to WebSocket client");
        let write = sender.send(Message::Text(msg.to_string().into()));
        match tokio::time::timeout(send_timeout, write).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                debug!(%conn_id, error = %e, "WebSocket send failed, client disconnected");
                return Disconnect::SendFailed;
            }
            Err(_) => {
                warn!(%conn_id, ?send_timeout, "WebSocket send timed out, dropping client");
                return Disconnect::SendTimedOut;
            }
        }
    }
    Disconnect::QueueClosed
}

/// Inbound messages only tell us the client is still there.
async fn read_until_close<R, E>(conn_id: ConnectionId, mut receiver: R) -> Disconnect
where
    R: Stream<Item = Result<Message, E>> + Unpin,
{
    while let Some(Ok(msg)) = receiver.next().await {
        match msg {
            Message::Text(text) => {
                debug!(%conn_id, "Ignoring message from WebSocket client: {}", text.as_str());
            }
            Message::Close(_) => {
                debug!(%conn_id, "WebSocket client sent close frame");
                break;
            }
            _ => {}
        }
    }
    Disconnect::ClientGone
}

/// Tell the client its initial state could not be produced.
async fn close_unavailable<S>(conn_id: ConnectionId, sender: &mut S)
where
    S: Sink<Message> + Unpin,
    S::Error: Display,
{
    let frame = CloseFrame {
        code: close_code::ERROR,
        reason: Utf8Bytes::from_static("Initial state unavailable"),
    };
    if let Err(e) = sender.send(Message::Close(Some(frame))).await {
        debug!(%conn_id, error = %e, "Failed to send close frame");
    }
}
