//! In-memory `HubRepository` implementation.
//!
//! All realtime state lives behind one async mutex; every wire event mutates
//! it under a single lock acquisition, which serializes transitions the same
//! way a single-threaded reactor would. Presence is therefore process-local:
//! a multi-instance deployment needs a shared implementation of
//! `HubRepository` (out of scope here).

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, Hub, HubRepository, JoinOutcome, LeaveOutcome, PresenceSnapshot, Timestamp,
    UserId,
};

/// Process-local hub state behind a single lock.
pub struct InMemoryHubRepository {
    hub: Arc<Mutex<Hub>>,
}

impl InMemoryHubRepository {
    pub fn new(hub: Arc<Mutex<Hub>>) -> Self {
        Self { hub }
    }
}

#[async_trait]
impl HubRepository for InMemoryHubRepository {
    async fn join(&self, connection: ConnectionId, user: UserId, now: Timestamp) -> JoinOutcome {
        let mut hub = self.hub.lock().await;
        hub.join(connection, user, now)
    }

    async fn leave(&self, connection: &ConnectionId, now: Timestamp) -> Option<LeaveOutcome> {
        let mut hub = self.hub.lock().await;
        hub.leave(connection, now)
    }

    async fn members_of(&self, user: &UserId) -> Vec<ConnectionId> {
        let hub = self.hub.lock().await;
        hub.members_of(user)
    }

    async fn snapshot(&self, now: Timestamp) -> PresenceSnapshot {
        let hub = self.hub.lock().await;
        hub.snapshot(now)
    }
}
