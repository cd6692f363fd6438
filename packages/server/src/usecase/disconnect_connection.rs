//! UseCase: connection teardown.
//!
//! A transport disconnect is the only cancellation signal. Teardown runs
//! unconditionally from the disconnect handler and never fails, even if the
//! registry state was already cleared.

use std::sync::Arc;

use aizu_shared::time::Clock;

use crate::domain::{ConnectionId, HubRepository, MessagePusher, PresenceEdge, Timestamp, UserId};

/// What a disconnect changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisconnectOutcome {
    /// Identity the connection was announced as
    pub user: UserId,
    /// The identity crossed the 1→0 edge
    pub went_offline: bool,
    /// Instant the disconnect was processed (the last-seen value on an
    /// offline edge)
    pub disconnected_at: Timestamp,
}

/// Connection teardown usecase.
pub struct DisconnectConnectionUseCase {
    repository: Arc<dyn HubRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl DisconnectConnectionUseCase {
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

    /// Tear down `connection`.
    ///
    /// Returns `None` when the connection never announced an identity (it
    /// still gets unregistered from the pusher).
    pub async fn execute(&self, connection: ConnectionId) -> Option<DisconnectOutcome> {
        let now = Timestamp::new(self.clock.now_utc_millis());
        let outcome = self.repository.leave(&connection, now).await;

        self.message_pusher.unregister_connection(&connection).await;

        outcome.map(|leave| DisconnectOutcome {
            user: leave.user,
            went_offline: leave.edge == PresenceEdge::WentOffline,
            disconnected_at: now,
        })
    }

    /// Broadcast a presence frame to every remaining connection.
    pub async fn broadcast_presence(&self, json: &str) {
        self.message_pusher.broadcast_all(json).await;
    }
}
