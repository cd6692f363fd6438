//! Message pushing abstraction.
//!
//! The realtime layer never touches sockets directly; it pushes serialized
//! frames through this trait. The WebSocket implementation lives in the
//! infrastructure layer.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::error::MessagePushError;
use super::value_object::ConnectionId;

/// Channel through which frames reach one connection's socket writer task.
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// Push-side of the transport: fire-and-forget delivery to open connections.
///
/// Delivery is best-effort by design: there is no acknowledgement, no retry,
/// and no queueing for absent connections.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// Register a connection's sender. Called on transport connect, before
    /// any identity is announced.
    async fn register_connection(&self, connection: ConnectionId, sender: PusherChannel);

    /// Remove a connection's sender. Called on transport disconnect.
    async fn unregister_connection(&self, connection: &ConnectionId);

    /// Push one frame to one connection.
    async fn push_to(
        &self,
        connection: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError>;

    /// Push one frame to each of `targets`, tolerating partial failure.
    async fn push_many(&self, targets: Vec<ConnectionId>, content: &str);

    /// Push one frame to every registered connection.
    async fn broadcast_all(&self, content: &str);
}
