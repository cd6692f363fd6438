//! The `Hub` aggregate: roster + rooms under one state transition.
//!
//! Wire events mutate registry counts and room membership together; keeping
//! both behind one aggregate means a join or leave can never observe the two
//! structures out of sync.

use crate::domain::value_object::{ConnectionId, Timestamp, UserId};

use super::rooms::Rooms;
use super::roster::{PresenceEdge, Roster};

/// Point-in-time dump of presence state, sent to a newly joined connection.
///
/// This is the only catch-up mechanism; there is no historical event log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceSnapshot {
    /// Currently online identities, sorted
    pub online_user_ids: Vec<UserId>,
    /// Accumulated last-seen records, sorted by user
    pub last_seen_by_user: Vec<(UserId, Timestamp)>,
    /// Instant the snapshot was taken
    pub taken_at: Timestamp,
}

/// Result of announcing an identity on a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOutcome {
    /// Previous identity of this connection and the edge its leave produced,
    /// when the connection re-announced a different identity
    pub previous: Option<(UserId, PresenceEdge)>,
    /// Edge produced by the join itself
    pub edge: PresenceEdge,
    /// Snapshot taken after the join, for delivery to the joining connection
    pub snapshot: PresenceSnapshot,
}

/// Result of a connection going away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveOutcome {
    /// Identity the connection was announced as
    pub user: UserId,
    /// Edge produced by the leave
    pub edge: PresenceEdge,
}

/// Process-local realtime state: who is connected, from how many devices,
/// and which connections receive events for which identity.
#[derive(Debug, Default, Clone)]
pub struct Hub {
    roster: Roster,
    rooms: Rooms,
}

impl Hub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Announce `user` on `connection`.
    ///
    /// Re-announcing a different identity is a leave of the old identity
    /// followed by a join of the new one, as two independent transitions.
    /// Re-announcing the same identity leaves counts untouched and only
    /// refreshes the snapshot.
    pub fn join(&mut self, connection: ConnectionId, user: UserId, now: Timestamp) -> JoinOutcome {
        let mut previous = None;

        if let Some(prev) = self.rooms.identity_of(&connection).cloned() {
            if prev == user {
                return JoinOutcome {
                    previous: None,
                    edge: PresenceEdge::Unchanged,
                    snapshot: self.snapshot(now),
                };
            }
            self.rooms.unsubscribe(&connection);
            let prev_edge = self.roster.leave(&prev, now);
            previous = Some((prev, prev_edge));
        }

        self.rooms.subscribe(connection, user.clone());
        let edge = self.roster.join(&user);

        JoinOutcome {
            previous,
            edge,
            snapshot: self.snapshot(now),
        }
    }

    /// Drop `connection`, resolving its last-announced identity.
    ///
    /// Returns `None` when the connection never announced one; never fails.
    pub fn leave(&mut self, connection: &ConnectionId, now: Timestamp) -> Option<LeaveOutcome> {
        let user = self.rooms.unsubscribe(connection)?;
        let edge = self.roster.leave(&user, now);
        Some(LeaveOutcome { user, edge })
    }

    /// Connections subscribed to `user`'s room.
    pub fn members_of(&self, user: &UserId) -> Vec<ConnectionId> {
        self.rooms.members_of(user)
    }

    /// Identity announced on `connection`, if any.
    pub fn identity_of(&self, connection: &ConnectionId) -> Option<&UserId> {
        self.rooms.identity_of(connection)
    }

    /// Current presence snapshot.
    pub fn snapshot(&self, now: Timestamp) -> PresenceSnapshot {
        PresenceSnapshot {
            online_user_ids: self.roster.online_users(),
            last_seen_by_user: self.roster.last_seen_entries(),
            taken_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str) -> UserId {
        UserId::new(id.to_string()).unwrap()
    }

    fn ts(millis: i64) -> Timestamp {
        Timestamp::new(millis)
    }

    #[test]
    fn test_join_subscribes_and_goes_online() {
        // given:
        let mut hub = Hub::new();
        let conn = ConnectionId::generate();

        // when:
        let outcome = hub.join(conn, user("alice"), ts(1000));

        // then:
        assert_eq!(outcome.previous, None);
        assert_eq!(outcome.edge, PresenceEdge::WentOnline);
        assert_eq!(hub.members_of(&user("alice")), vec![conn]);
        assert_eq!(outcome.snapshot.online_user_ids, vec![user("alice")]);
    }

    #[test]
    fn test_snapshot_excludes_joining_user_from_last_seen() {
        // given: alice was online once and went offline
        let mut hub = Hub::new();
        let c1 = ConnectionId::generate();
        hub.join(c1, user("alice"), ts(1000));
        hub.leave(&c1, ts(2000));

        // when: she joins again from a new connection
        let c2 = ConnectionId::generate();
        let outcome = hub.join(c2, user("alice"), ts(3000));

        // then: she appears online, not offline, immediately after her join
        assert_eq!(outcome.snapshot.online_user_ids, vec![user("alice")]);
        assert!(
            !outcome
                .snapshot
                .last_seen_by_user
                .iter()
                .any(|(u, _)| *u == user("alice"))
        );
    }

    #[test]
    fn test_snapshot_carries_full_last_seen_map() {
        // given: bob came and went before alice joins
        let mut hub = Hub::new();
        let bob_conn = ConnectionId::generate();
        hub.join(bob_conn, user("bob"), ts(1000));
        hub.leave(&bob_conn, ts(1500));

        // when:
        let outcome = hub.join(ConnectionId::generate(), user("alice"), ts(2000));

        // then:
        assert_eq!(outcome.snapshot.online_user_ids, vec![user("alice")]);
        assert_eq!(
            outcome.snapshot.last_seen_by_user,
            vec![(user("bob"), ts(1500))]
        );
        assert_eq!(outcome.snapshot.taken_at, ts(2000));
    }

    #[test]
    fn test_reannounce_different_identity_is_leave_plus_join() {
        // given: a connection announced as alice
        let mut hub = Hub::new();
        let conn = ConnectionId::generate();
        hub.join(conn, user("alice"), ts(1000));

        // when: the same connection re-announces as bob
        let outcome = hub.join(conn, user("bob"), ts(2000));

        // then: alice went offline, bob went online, rooms reflect the swap
        assert_eq!(
            outcome.previous,
            Some((user("alice"), PresenceEdge::WentOffline))
        );
        assert_eq!(outcome.edge, PresenceEdge::WentOnline);
        assert_eq!(hub.members_of(&user("alice")), vec![]);
        assert_eq!(hub.members_of(&user("bob")), vec![conn]);
        assert_eq!(
            outcome.snapshot.last_seen_by_user,
            vec![(user("alice"), ts(2000))]
        );
    }

    #[test]
    fn test_reannounce_same_identity_keeps_counts() {
        // given:
        let mut hub = Hub::new();
        let conn = ConnectionId::generate();
        hub.join(conn, user("alice"), ts(1000));

        // when: the join frame is repeated
        let outcome = hub.join(conn, user("alice"), ts(2000));

        // then: no edges, membership unchanged, snapshot still delivered
        assert_eq!(outcome.previous, None);
        assert_eq!(outcome.edge, PresenceEdge::Unchanged);
        assert_eq!(hub.members_of(&user("alice")), vec![conn]);

        // and the later disconnect still produces exactly one offline edge
        let leave = hub.leave(&conn, ts(3000)).unwrap();
        assert_eq!(leave.edge, PresenceEdge::WentOffline);
    }

    #[test]
    fn test_two_devices_one_offline_edge() {
        // given: alice on two connections
        let mut hub = Hub::new();
        let c1 = ConnectionId::generate();
        let c2 = ConnectionId::generate();
        hub.join(c1, user("alice"), ts(1000));
        hub.join(c2, user("alice"), ts(1001));

        // when: the first device disconnects
        let first = hub.leave(&c1, ts(2000)).unwrap();

        // then: silent
        assert_eq!(first.edge, PresenceEdge::Unchanged);

        // when: the second device disconnects
        let second = hub.leave(&c2, ts(3000)).unwrap();

        // then: exactly one offline edge
        assert_eq!(second.user, user("alice"));
        assert_eq!(second.edge, PresenceEdge::WentOffline);
    }

    #[test]
    fn test_leave_before_announce_is_none() {
        // given: a connection that never announced an identity
        let mut hub = Hub::new();
        let conn = ConnectionId::generate();

        // when:
        let outcome = hub.leave(&conn, ts(1000));

        // then:
        assert_eq!(outcome, None);
    }
}
