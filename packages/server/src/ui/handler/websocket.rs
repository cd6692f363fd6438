//! WebSocket connection handlers.
//!
//! A connection carries no identity at upgrade time; the client announces it
//! with a `join` frame once authenticated. Malformed frames are logged and
//! dropped without terminating the connection.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, Timestamp, UserId},
    infrastructure::dto::websocket::{
        ClientMessage, MessageType, PresenceMessage, PresenceSnapshotMessage, PresenceStatus,
        TypingMessage,
    },
    ui::state::AppState,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives frames from the rx channel and pushes them to
/// the WebSocket sender.
///
/// This is the outbound half of a connection: everything the realtime layer
/// delivers to this connection flows through the channel.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection = ConnectionId::generate();
    let (sender, mut receiver) = socket.split();

    // Create the channel this connection's frames are pushed through
    let (tx, rx) = mpsc::unbounded_channel();
    state
        .message_pusher
        .register_connection(connection, tx)
        .await;
    tracing::info!("Connection '{}' established", connection);

    let mut send_task = pusher_loop(rx, sender);

    let state_clone = state.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error on '{}': {}", connection, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    handle_text_frame(&state_clone, connection, &text).await;
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping from '{}'", connection);
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", connection);
                    break;
                }
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Teardown runs unconditionally; the registry tolerates connections that
    // never announced an identity.
    match state.disconnect_connection_usecase.execute(connection).await {
        Some(outcome) if outcome.went_offline => {
            tracing::info!(
                "Connection '{}' disconnected; '{}' went offline",
                connection,
                outcome.user
            );
            let presence = PresenceMessage {
                r#type: MessageType::Presence,
                user_id: outcome.user.into_string(),
                status: PresenceStatus::Offline,
                last_seen: Some(outcome.disconnected_at.to_rfc3339()),
                timestamp: outcome.disconnected_at.to_rfc3339(),
            };
            let json = serde_json::to_string(&presence).unwrap();
            state
                .disconnect_connection_usecase
                .broadcast_presence(&json)
                .await;
        }
        Some(outcome) => {
            tracing::info!(
                "Connection '{}' disconnected; '{}' still online on another device",
                connection,
                outcome.user
            );
        }
        None => {
            tracing::info!(
                "Connection '{}' disconnected before announcing an identity",
                connection
            );
        }
    }
}

/// Dispatch one inbound text frame.
///
/// Total over its input: malformed frames and invalid identities are logged
/// and ignored, never surfaced to the peer.
async fn handle_text_frame(state: &Arc<AppState>, connection: ConnectionId, text: &str) {
    let frame = match serde_json::from_str::<ClientMessage>(text) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::warn!("Dropping malformed frame from '{}': {}", connection, e);
            return;
        }
    };

    match frame {
        ClientMessage::Join { user_id } => {
            let user = match UserId::new(user_id) {
                Ok(user) => user,
                Err(e) => {
                    tracing::warn!("Dropping join with invalid user id from '{}': {}", connection, e);
                    return;
                }
            };
            handle_join(state, connection, user).await;
        }
        ClientMessage::Typing {
            from_user_id,
            to_user_id,
            is_typing,
        } => {
            let (from, to) = match (UserId::new(from_user_id), UserId::new(to_user_id)) {
                (Ok(from), Ok(to)) => (from, to),
                _ => {
                    tracing::warn!("Dropping typing frame with empty identity from '{}'", connection);
                    return;
                }
            };
            handle_typing(state, from, to, is_typing).await;
        }
    }
}

async fn handle_join(state: &Arc<AppState>, connection: ConnectionId, user: UserId) {
    let user_str = user.as_str().to_string();
    let outcome = state
        .announce_identity_usecase
        .execute(connection, user)
        .await;

    // 1. Offline broadcast for a re-announced previous identity
    if let Some(previous) = outcome.previous_offline {
        let presence = PresenceMessage {
            r#type: MessageType::Presence,
            user_id: previous.into_string(),
            status: PresenceStatus::Offline,
            last_seen: Some(outcome.announced_at.to_rfc3339()),
            timestamp: outcome.announced_at.to_rfc3339(),
        };
        let json = serde_json::to_string(&presence).unwrap();
        state.announce_identity_usecase.broadcast_presence(&json).await;
    }

    // 2. Snapshot to the joining connection, before any presence emission
    //    for this join
    let snapshot = PresenceSnapshotMessage::from(outcome.snapshot);
    let snapshot_json = serde_json::to_string(&snapshot).unwrap();
    state
        .announce_identity_usecase
        .send_snapshot(&connection, &snapshot_json)
        .await;
    tracing::info!("Sent presence snapshot to '{}'", connection);

    // 3. Online broadcast if this was the identity's first connection
    if outcome.went_online {
        let presence = PresenceMessage {
            r#type: MessageType::Presence,
            user_id: user_str.clone(),
            status: PresenceStatus::Online,
            last_seen: None,
            timestamp: outcome.announced_at.to_rfc3339(),
        };
        let json = serde_json::to_string(&presence).unwrap();
        state.announce_identity_usecase.broadcast_presence(&json).await;
        tracing::info!("Broadcasted online presence for '{}'", user_str);
    }
}

async fn handle_typing(state: &Arc<AppState>, from: UserId, to: UserId, is_typing: bool) {
    let now = Timestamp::new(state.clock.now_utc_millis());
    let frame = TypingMessage {
        r#type: MessageType::Typing,
        from_user_id: from.as_str().to_string(),
        to_user_id: to.as_str().to_string(),
        is_typing,
        timestamp: now.to_rfc3339(),
    };
    let json = serde_json::to_string(&frame).unwrap();

    let delivered = state.send_typing_usecase.execute(&from, &to, &json).await;
    tracing::debug!(
        "Typing signal from '{}' to '{}' delivered to {} connection(s)",
        from,
        to,
        delivered
    );
}
