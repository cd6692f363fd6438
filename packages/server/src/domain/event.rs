//! Domain events handed to the realtime layer by the CRUD collaborator.
//!
//! Events describe mutations that are already durably committed by the
//! external message store; the realtime layer only fans them out.

use crate::domain::value_object::{Timestamp, UserId};

/// Which lifecycle transition a message event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageEventKind {
    Created,
    Updated,
    Deleted,
}

/// Wire-shaped record of the message the event is about.
///
/// The CRUD layer resolves media to signed URLs before handing the event
/// over; nothing here is fetched or validated by the realtime layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRecord {
    pub id: String,
    pub conversation_id: String,
    pub text: Option<String>,
    pub media_url: Option<String>,
    pub audio_url: Option<String>,
    pub edited: bool,
    pub created_at: Timestamp,
    pub updated_at: Option<Timestamp>,
}

/// A committed message mutation, addressed to the two parties of a
/// conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEvent {
    /// Originating user
    pub sender: UserId,
    /// Receiving user; deletion may not always resolve one
    pub receiver: Option<UserId>,
    pub record: MessageRecord,
}

impl MessageEvent {
    /// Target identities for fan-out: the sender's room always, the
    /// receiver's room when present and different from the sender.
    pub fn targets(&self) -> Vec<&UserId> {
        let mut targets = vec![&self.sender];
        if let Some(receiver) = &self.receiver
            && receiver != &self.sender
        {
            targets.push(receiver);
        }
        targets
    }
}
