//! UseCase: identity announcement (`join`).
//!
//! A connection authenticates out-of-band, then announces its logical user
//! identity. The announcement subscribes the connection to its room,
//! increments the registry, and resolves any previously announced identity
//! as a leave first. The caller delivers the resulting frames in order:
//! offline broadcast for the previous identity (if its count hit zero),
//! snapshot to the joining connection, online broadcast (if this was the
//! identity's first connection).

use std::sync::Arc;

use aizu_shared::time::Clock;

use crate::domain::{
    ConnectionId, HubRepository, MessagePusher, PresenceEdge, PresenceSnapshot, Timestamp, UserId,
};

/// What an announcement changed, for the handler to translate into frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnounceOutcome {
    /// Previous identity of this connection, when re-announcing dropped its
    /// last connection
    pub previous_offline: Option<UserId>,
    /// The announced identity crossed the 0→1 edge
    pub went_online: bool,
    /// Snapshot for the joining connection, taken after the join
    pub snapshot: PresenceSnapshot,
    /// Instant the announcement was processed
    pub announced_at: Timestamp,
}

/// Identity announcement usecase.
pub struct AnnounceIdentityUseCase {
    repository: Arc<dyn HubRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl AnnounceIdentityUseCase {
    pub fn new(
        repository: Arc<dyn HubRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            clock,
        }
    }

    /// Announce `user` on `connection`.
    ///
    /// Total: every input yields an outcome, nothing is surfaced to the
    /// remote peer as an error.
    pub async fn execute(&self, connection: ConnectionId, user: UserId) -> AnnounceOutcome {
        let now = Timestamp::new(self.clock.now_utc_millis());
        let outcome = self.repository.join(connection, user.clone(), now).await;

        let previous_offline = match outcome.previous {
            Some((prev, PresenceEdge::WentOffline)) => {
                tracing::info!(
                    "Connection '{}' re-announced as '{}'; '{}' went offline",
                    connection,
                    user,
                    prev
                );
                Some(prev)
            }
            Some((prev, _)) => {
                tracing::info!(
                    "Connection '{}' re-announced as '{}'; '{}' still online elsewhere",
                    connection,
                    user,
                    prev
                );
                None
            }
            None => None,
        };

        AnnounceOutcome {
            previous_offline,
            went_online: outcome.edge == PresenceEdge::WentOnline,
            snapshot: outcome.snapshot,
            announced_at: now,
        }
    }

    /// Push the presence snapshot frame to the joining connection.
    ///
    /// A push failure only means the connection is already closing; the
    /// disconnect handler will clean it up.
    pub async fn send_snapshot(&self, connection: &ConnectionId, json: &str) {
        if let Err(e) = self.message_pusher.push_to(connection, json).await {
            tracing::warn!("Failed to send snapshot to '{}': {}", connection, e);
        }
    }

    /// Broadcast a presence frame to every connected session.
    pub async fn broadcast_presence(&self, json: &str) {
        self.message_pusher.broadcast_all(json).await;
    }
}
