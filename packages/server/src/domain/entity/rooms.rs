//! Room membership: user identity → subscribed connections.

use std::collections::{HashMap, HashSet};

use crate::domain::value_object::{ConnectionId, UserId};

/// Maps a user identity to the set of transport connections eligible to
/// receive events addressed to that identity, plus the reverse mapping from
/// connection to its last-announced identity.
///
/// Invariant: a room with no members is removed, and the two maps always
/// agree (every subscribed connection appears in exactly one room).
#[derive(Debug, Default, Clone)]
pub struct Rooms {
    /// user → subscribed connections
    members: HashMap<UserId, HashSet<ConnectionId>>,
    /// connection → announced identity
    identities: HashMap<ConnectionId, UserId>,
}

impl Rooms {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `connection` to the room for `user`.
    ///
    /// A connection already subscribed elsewhere must be unsubscribed first;
    /// this method replaces the reverse mapping but does not clean up the old
    /// room (the `Hub` aggregate owns that sequencing).
    pub fn subscribe(&mut self, connection: ConnectionId, user: UserId) {
        self.members
            .entry(user.clone())
            .or_default()
            .insert(connection);
        self.identities.insert(connection, user);
    }

    /// Remove `connection` from whatever room it was subscribed to.
    ///
    /// Returns the identity it was announced as, if any.
    pub fn unsubscribe(&mut self, connection: &ConnectionId) -> Option<UserId> {
        let user = self.identities.remove(connection)?;
        if let Some(room) = self.members.get_mut(&user) {
            room.remove(connection);
            if room.is_empty() {
                self.members.remove(&user);
            }
        }
        Some(user)
    }

    /// The identity `connection` last announced, if any.
    pub fn identity_of(&self, connection: &ConnectionId) -> Option<&UserId> {
        self.identities.get(connection)
    }

    /// Connections currently subscribed to `user`'s room (empty if none).
    pub fn members_of(&self, user: &UserId) -> Vec<ConnectionId> {
        self.members
            .get(user)
            .map(|room| room.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Number of connections subscribed to `user`'s room.
    pub fn member_count(&self, user: &UserId) -> usize {
        self.members.get(user).map(HashSet::len).unwrap_or(0)
    }
}
