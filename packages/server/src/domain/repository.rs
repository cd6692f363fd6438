//! Repository trait for the realtime hub state.
//!
//! The usecase layer depends on this trait, not on the concrete in-memory
//! implementation. It is also the seam a shared presence store (for
//! multi-instance deployment) would plug into.

use async_trait::async_trait;

use super::entity::{JoinOutcome, LeaveOutcome, PresenceSnapshot};
use super::value_object::{ConnectionId, Timestamp, UserId};

/// Access to the process-local hub state.
///
/// Each method is one atomic state transition; implementations must not let
/// two transitions interleave (the in-memory implementation serializes them
/// behind a single lock).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HubRepository: Send + Sync {
    /// Announce `user` on `connection` (subscribe + registry increment,
    /// resolving any previous identity first).
    async fn join(&self, connection: ConnectionId, user: UserId, now: Timestamp) -> JoinOutcome;

    /// Drop `connection` (unsubscribe + registry decrement). `None` if the
    /// connection never announced an identity.
    async fn leave(&self, connection: &ConnectionId, now: Timestamp) -> Option<LeaveOutcome>;

    /// Connections subscribed to `user`'s room.
    async fn members_of(&self, user: &UserId) -> Vec<ConnectionId>;

    /// Current presence snapshot.
    async fn snapshot(&self, now: Timestamp) -> PresenceSnapshot;
}
