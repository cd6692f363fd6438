//! WebSocket-backed `MessagePusher` implementation.
//!
//! The UI layer creates one unbounded channel per accepted connection and
//! registers the sender here; the receiver side feeds the socket writer
//! task. This keeps "accepting a socket" and "pushing a frame" in separate
//! layers.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, MessagePushError, MessagePusher, PusherChannel};

/// Pushes frames to live connections through their writer channels.
pub struct WebSocketMessagePusher {
    /// connection → sender for its writer task
    connections: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>,
}

impl WebSocketMessagePusher {
    pub fn new() -> Self {
        Self {
            connections: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl Default for WebSocketMessagePusher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_connection(&self, connection: ConnectionId, sender: PusherChannel) {
        let mut connections = self.connections.lock().await;
        connections.insert(connection, sender);
        tracing::debug!("Connection '{}' registered to MessagePusher", connection);
    }

    async fn unregister_connection(&self, connection: &ConnectionId) {
        let mut connections = self.connections.lock().await;
        connections.remove(connection);
        tracing::debug!("Connection '{}' unregistered from MessagePusher", connection);
    }

    async fn push_to(
        &self,
        connection: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError> {
        let connections = self.connections.lock().await;

        if let Some(sender) = connections.get(connection) {
            sender
                .send(content.to_string())
                .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
            tracing::debug!("Pushed frame to connection '{}'", connection);
            Ok(())
        } else {
            Err(MessagePushError::ConnectionNotFound(connection.to_string()))
        }
    }

    async fn push_many(&self, targets: Vec<ConnectionId>, content: &str) {
        let connections = self.connections.lock().await;

        for target in targets {
            if let Some(sender) = connections.get(&target) {
                // Partial failure is tolerated: a closing connection drops
                // its frames.
                if let Err(e) = sender.send(content.to_string()) {
                    tracing::warn!("Failed to push frame to connection '{}': {}", target, e);
                } else {
                    tracing::debug!("Pushed frame to connection '{}'", target);
                }
            } else {
                tracing::warn!("Connection '{}' not found during push, skipping", target);
            }
        }
    }

    async fn broadcast_all(&self, content: &str) {
        let connections = self.connections.lock().await;

        for (connection, sender) in connections.iter() {
            if let Err(e) = sender.send(content.to_string()) {
                tracing::warn!("Failed to broadcast to connection '{}': {}", connection, e);
            }
        }
    }
}
