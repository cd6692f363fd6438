//! The event fan-out seam between the CRUD layer and the realtime layer.
//!
//! The CRUD layer calls this trait after a mutation has been durably
//! committed by the external store; it has no visibility into registry or
//! room internals. Deployments without a realtime layer inject
//! [`NoopRealtimeNotifier`].

use async_trait::async_trait;

use super::event::MessageEvent;

/// Notification of committed message mutations.
///
/// All methods are total: delivery is fire-and-forget and an empty room is
/// silently absorbed, so there is nothing for the caller to handle.
#[async_trait]
pub trait RealtimeNotifier: Send + Sync {
    async fn message_created(&self, event: MessageEvent);

    async fn message_updated(&self, event: MessageEvent);

    async fn message_deleted(&self, event: MessageEvent);
}

/// Default implementation that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRealtimeNotifier;

#[async_trait]
impl RealtimeNotifier for NoopRealtimeNotifier {
    async fn message_created(&self, _event: MessageEvent) {}

    async fn message_updated(&self, _event: MessageEvent) {}

    async fn message_deleted(&self, _event: MessageEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MessageRecord, Timestamp, UserId};

    #[tokio::test]
    async fn test_noop_notifier_absorbs_events() {
        // given: a caller wired without a realtime layer
        let notifier: &dyn RealtimeNotifier = &NoopRealtimeNotifier;
        let event = MessageEvent {
            sender: UserId::new("u1".to_string()).unwrap(),
            receiver: None,
            record: MessageRecord {
                id: "m1".to_string(),
                conversation_id: "c1".to_string(),
                text: None,
                media_url: None,
                audio_url: None,
                edited: false,
                created_at: Timestamp::new(1000),
                updated_at: None,
            },
        };

        // when / then: every operation is a silent no-op
        notifier.message_created(event.clone()).await;
        notifier.message_updated(event.clone()).await;
        notifier.message_deleted(event).await;
    }
}
