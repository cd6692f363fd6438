//! WebSocket-backed event fan-out.
//!
//! Translates a committed message mutation into one or two room deliveries:
//! the sender's room (so the sender's other devices and open tabs stay in
//! sync) and, when present and different, the receiver's room. Each delivery
//! is independent and best-effort.

use std::sync::Arc;

use async_trait::async_trait;

use aizu_shared::time::Clock;

use crate::domain::{
    HubRepository, MessageEvent, MessageEventKind, MessagePusher, RealtimeNotifier, Timestamp,
};
use crate::infrastructure::dto::websocket::MessageEventMessage;

/// The concrete Event Fan-out API.
pub struct WebSocketRealtimeNotifier {
    repository: Arc<dyn HubRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl WebSocketRealtimeNotifier {
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

    async fn deliver(&self, kind: MessageEventKind, event: MessageEvent) {
        let now = Timestamp::new(self.clock.now_utc_millis());
        let frame = MessageEventMessage::from_event(kind, &event, now);
        let json = match serde_json::to_string(&frame) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Failed to serialize message event frame: {}", e);
                return;
            }
        };

        for target in event.targets() {
            let members = self.repository.members_of(target).await;
            if members.is_empty() {
                // Recipient may legitimately be offline; they catch up by
                // re-fetching history from the message store.
                tracing::debug!("No live connections for '{}', skipping delivery", target);
                continue;
            }
            self.message_pusher.push_many(members, &json).await;
        }
    }
}

#[async_trait]
impl RealtimeNotifier for WebSocketRealtimeNotifier {
    async fn message_created(&self, event: MessageEvent) {
        self.deliver(MessageEventKind::Created, event).await;
    }

    async fn message_updated(&self, event: MessageEvent) {
        self.deliver(MessageEventKind::Updated, event).await;
    }

    async fn message_deleted(&self, event: MessageEvent) {
        self.deliver(MessageEventKind::Deleted, event).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use tokio::sync::{Mutex, mpsc};

    use aizu_shared::time::FixedClock;

    use crate::domain::{ConnectionId, Hub, MessageRecord, UserId};
    use crate::infrastructure::message_pusher::WebSocketMessagePusher;
    use crate::infrastructure::repository::InMemoryHubRepository;

    fn user(id: &str) -> UserId {
        UserId::new(id.to_string()).unwrap()
    }

    fn event(sender: &str, receiver: Option<&str>) -> MessageEvent {
        MessageEvent {
            sender: user(sender),
            receiver: receiver.map(user),
            record: MessageRecord {
                id: "m1".to_string(),
                conversation_id: "c1".to_string(),
                text: Some("hello".to_string()),
                media_url: None,
                audio_url: None,
                edited: false,
                created_at: Timestamp::new(1000),
                updated_at: None,
            },
        }
    }

    struct Fixture {
        repository: Arc<InMemoryHubRepository>,
        pusher: Arc<WebSocketMessagePusher>,
        notifier: WebSocketRealtimeNotifier,
    }

    fn create_fixture() -> Fixture {
        let repository = Arc::new(InMemoryHubRepository::new(Arc::new(Mutex::new(Hub::new()))));
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let notifier = WebSocketRealtimeNotifier::new(
            repository.clone(),
            pusher.clone(),
            Arc::new(FixedClock::new(1672531200000)),
        );
        Fixture {
            repository,
            pusher,
            notifier,
        }
    }

    async fn connect(
        fixture: &Fixture,
        id: &str,
    ) -> (ConnectionId, mpsc::UnboundedReceiver<String>) {
        let connection = ConnectionId::generate();
        let (tx, rx) = mpsc::unbounded_channel();
        fixture.pusher.register_connection(connection, tx).await;
        fixture
            .repository
            .join(connection, user(id), Timestamp::new(1000))
            .await;
        (connection, rx)
    }

    #[tokio::test]
    async fn test_created_event_reaches_both_parties() {
        // given: u1 and u2 are connected
        let fixture = create_fixture();
        let (_c1, mut rx1) = connect(&fixture, "u1").await;
        let (_c2, mut rx2) = connect(&fixture, "u2").await;

        // when:
        fixture.notifier.message_created(event("u1", Some("u2"))).await;

        // then: both rooms got the frame
        let f1 = rx1.recv().await.unwrap();
        let f2 = rx2.recv().await.unwrap();
        assert!(f1.contains(r#""type":"message:new""#));
        assert_eq!(f1, f2);
    }

    #[tokio::test]
    async fn test_created_event_with_offline_receiver_reaches_sender_only() {
        // given: only u1 is connected
        let fixture = create_fixture();
        let (_c1, mut rx1) = connect(&fixture, "u1").await;

        // when:
        fixture.notifier.message_created(event("u1", Some("u2"))).await;

        // then: u1 still got the frame, the empty room was absorbed silently
        assert!(rx1.recv().await.unwrap().contains(r#""senderId":"u1""#));
    }

    #[tokio::test]
    async fn test_event_reaches_all_sender_devices() {
        // given: u1 on two connections
        let fixture = create_fixture();
        let (_c1, mut rx1) = connect(&fixture, "u1").await;
        let (_c2, mut rx2) = connect(&fixture, "u1").await;

        // when:
        fixture.notifier.message_updated(event("u1", None)).await;

        // then:
        assert!(rx1.recv().await.unwrap().contains(r#""type":"message:updated""#));
        assert!(rx2.recv().await.unwrap().contains(r#""type":"message:updated""#));
    }

    #[tokio::test]
    async fn test_deleted_event_without_receiver() {
        // given:
        let fixture = create_fixture();
        let (_c1, mut rx1) = connect(&fixture, "u1").await;

        // when:
        fixture.notifier.message_deleted(event("u1", None)).await;

        // then:
        assert!(rx1.recv().await.unwrap().contains(r#""type":"message:deleted""#));
    }

    #[tokio::test]
    async fn test_event_with_nobody_connected_is_noop() {
        // given:
        let fixture = create_fixture();

        // when / then: no panic, nothing to deliver
        fixture.notifier.message_created(event("u1", Some("u2"))).await;
    }
}
