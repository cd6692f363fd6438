//! Connection registry: per-user live connection counts and last-seen
//! bookkeeping.

use std::collections::HashMap;

use crate::domain::value_object::{Timestamp, UserId};

/// Externally observable result of a registry mutation.
///
/// A presence event fires only on the 0→1 and 1→0 edges; intermediate count
/// changes (the multi-device case) are silent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceEdge {
    /// Connection count went 0→1
    WentOnline,
    /// Connection count went 1→0
    WentOffline,
    /// Count changed without crossing zero, or the user was not tracked
    Unchanged,
}

/// Tracks, per user identity, how many live connections currently claim that
/// identity, plus the last-seen instant for users whose count reached zero.
///
/// Invariants:
/// - no zero or negative count is ever stored (absence denotes offline)
/// - a user never appears in both the online map and the last-seen map
#[derive(Debug, Default, Clone)]
pub struct Roster {
    /// user → live connection count (always ≥ 1)
    online: HashMap<UserId, usize>,
    /// user → instant the last connection went away
    last_seen: HashMap<UserId, Timestamp>,
}

impl Roster {
    /// Upper bound on retained last-seen records. The oldest record is
    /// evicted when a new user would exceed the bound.
    pub const MAX_LAST_SEEN_ENTRIES: usize = 1024;

    pub fn new() -> Self {
        Self::default()
    }

    /// Register one more connection for `user`.
    ///
    /// Concurrent joins of the same identity from different connections are
    /// the multi-device case, not an error.
    pub fn join(&mut self, user: &UserId) -> PresenceEdge {
        // A user who is online has no last-seen instant.
        self.last_seen.remove(user);

        let count = self.online.entry(user.clone()).or_insert(0);
        *count += 1;

        if *count == 1 {
            PresenceEdge::WentOnline
        } else {
            PresenceEdge::Unchanged
        }
    }

    /// Drop one connection for `user`, recording `now` as last-seen if it
    /// was the final one.
    ///
    /// An untracked user is a no-op: disconnect events must never fail even
    /// if the registry state was already cleared.
    pub fn leave(&mut self, user: &UserId, now: Timestamp) -> PresenceEdge {
        match self.online.get_mut(user) {
            None => PresenceEdge::Unchanged,
            Some(count) if *count > 1 => {
                *count -= 1;
                PresenceEdge::Unchanged
            }
            Some(_) => {
                self.online.remove(user);
                self.record_last_seen(user.clone(), now);
                PresenceEdge::WentOffline
            }
        }
    }

    /// Whether `user` currently has at least one live connection.
    pub fn is_online(&self, user: &UserId) -> bool {
        self.online.contains_key(user)
    }

    /// Live connection count for `user` (0 if untracked).
    pub fn connection_count(&self, user: &UserId) -> usize {
        self.online.get(user).copied().unwrap_or(0)
    }

    /// Currently online identities, sorted for consistent ordering.
    pub fn online_users(&self) -> Vec<UserId> {
        let mut users: Vec<UserId> = self.online.keys().cloned().collect();
        users.sort();
        users
    }

    /// Accumulated last-seen records, sorted by user for consistent ordering.
    pub fn last_seen_entries(&self) -> Vec<(UserId, Timestamp)> {
        let mut entries: Vec<(UserId, Timestamp)> = self
            .last_seen
            .iter()
            .map(|(user, ts)| (user.clone(), *ts))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    fn record_last_seen(&mut self, user: UserId, now: Timestamp) {
        if self.last_seen.len() >= Self::MAX_LAST_SEEN_ENTRIES
            && !self.last_seen.contains_key(&user)
        {
            // Evict the stalest record to keep the map bounded.
            if let Some(oldest) = self
                .last_seen
                .iter()
                .min_by_key(|(_, ts)| **ts)
                .map(|(u, _)| u.clone())
            {
                self.last_seen.remove(&oldest);
            }
        }
        self.last_seen.insert(user, now);
    }
}
