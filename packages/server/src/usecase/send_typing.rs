//! UseCase: typing indicator delivery.
//!
//! Typing signals are routed to the addressee's room only, never echoed to
//! the sender. Self-typing is not a protocol error, just suppressed.

use std::sync::Arc;

use crate::domain::{HubRepository, MessagePusher, UserId};

/// Typing signal usecase.
pub struct SendTypingUseCase {
    repository: Arc<dyn HubRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl SendTypingUseCase {
    pub fn new(repository: Arc<dyn HubRepository>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// Deliver `json` to `to`'s room.
    ///
    /// Returns the number of connections the frame was pushed to. Zero is
    /// not an error: the addressee may legitimately be offline, and
    /// self-addressed signals are suppressed.
    pub async fn execute(&self, from: &UserId, to: &UserId, json: &str) -> usize {
        if from == to {
            tracing::debug!("Suppressing self-addressed typing signal from '{}'", from);
            return 0;
        }

        let members = self.repository.members_of(to).await;
        if members.is_empty() {
            tracing::debug!("No live connections for '{}', dropping typing signal", to);
            return 0;
        }

        let delivered = members.len();
        self.message_pusher.push_many(members, json).await;
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use tokio::sync::{Mutex, mpsc};

    use crate::domain::{ConnectionId, Hub, Timestamp};
    use crate::infrastructure::message_pusher::WebSocketMessagePusher;
    use crate::infrastructure::repository::InMemoryHubRepository;

    fn user(id: &str) -> UserId {
        UserId::new(id.to_string()).unwrap()
    }

    struct Fixture {
        repository: Arc<InMemoryHubRepository>,
        pusher: Arc<WebSocketMessagePusher>,
        usecase: SendTypingUseCase,
    }

    fn create_fixture() -> Fixture {
        let repository = Arc::new(InMemoryHubRepository::new(Arc::new(Mutex::new(Hub::new()))));
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = SendTypingUseCase::new(repository.clone(), pusher.clone());
        Fixture {
            repository,
            pusher,
            usecase,
        }
    }

    async fn connect(fixture: &Fixture, id: &str) -> mpsc::UnboundedReceiver<String> {
        let connection = ConnectionId::generate();
        let (tx, rx) = mpsc::unbounded_channel();
        fixture.pusher.register_connection(connection, tx).await;
        fixture
            .repository
            .join(connection, user(id), Timestamp::new(1000))
            .await;
        rx
    }

    #[tokio::test]
    async fn test_typing_reaches_addressee_room_only() {
        // given: alice and bob connected
        let fixture = create_fixture();
        let mut alice_rx = connect(&fixture, "alice").await;
        let mut bob_rx = connect(&fixture, "bob").await;

        // when: alice types to bob
        let delivered = fixture
            .usecase
            .execute(&user("alice"), &user("bob"), "typing-frame")
            .await;

        // then: bob got it, alice did not
        assert_eq!(delivered, 1);
        assert_eq!(bob_rx.recv().await, Some("typing-frame".to_string()));
        assert_eq!(alice_rx.try_recv().ok(), None);
    }

    #[tokio::test]
    async fn test_typing_reaches_all_addressee_devices() {
        // given: bob on two devices
        let fixture = create_fixture();
        let mut rx1 = connect(&fixture, "bob").await;
        let mut rx2 = connect(&fixture, "bob").await;

        // when:
        let delivered = fixture
            .usecase
            .execute(&user("alice"), &user("bob"), "typing-frame")
            .await;

        // then:
        assert_eq!(delivered, 2);
        assert_eq!(rx1.recv().await, Some("typing-frame".to_string()));
        assert_eq!(rx2.recv().await, Some("typing-frame".to_string()));
    }

    #[tokio::test]
    async fn test_self_typing_is_suppressed() {
        // given: alice connected
        let fixture = create_fixture();
        let mut alice_rx = connect(&fixture, "alice").await;

        // when: alice types to herself
        let delivered = fixture
            .usecase
            .execute(&user("alice"), &user("alice"), "typing-frame")
            .await;

        // then: nothing delivered
        assert_eq!(delivered, 0);
        assert_eq!(alice_rx.try_recv().ok(), None);
    }

    #[tokio::test]
    async fn test_typing_to_offline_user_is_noop() {
        // given: nobody connected as bob
        let fixture = create_fixture();

        // when:
        let delivered = fixture
            .usecase
            .execute(&user("alice"), &user("bob"), "typing-frame")
            .await;

        // then:
        assert_eq!(delivered, 0);
    }
}
