//! Conversion logic between DTOs and domain types.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::domain::{
    MessageEvent, MessageEventKind, MessageRecord, PresenceSnapshot, Timestamp, UserId,
    UserIdError,
};
use crate::infrastructure::dto::http as http_dto;
use crate::infrastructure::dto::websocket as dto;

/// Errors turning an HTTP event request into a domain event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventConversionError {
    #[error("invalid sender id: {0}")]
    InvalidSender(UserIdError),

    #[error("invalid receiver id: {0}")]
    InvalidReceiver(UserIdError),

    #[error("invalid timestamp '{0}': expected RFC 3339")]
    InvalidTimestamp(String),
}

// ========================================
// Domain → DTO
// ========================================

impl From<PresenceSnapshot> for dto::PresenceSnapshotMessage {
    fn from(snapshot: PresenceSnapshot) -> Self {
        let last_seen_by_user: BTreeMap<String, String> = snapshot
            .last_seen_by_user
            .into_iter()
            .map(|(user, ts)| (user.into_string(), ts.to_rfc3339()))
            .collect();

        Self {
            r#type: dto::MessageType::PresenceSnapshot,
            online_user_ids: snapshot
                .online_user_ids
                .into_iter()
                .map(UserId::into_string)
                .collect(),
            last_seen_by_user,
            timestamp: snapshot.taken_at.to_rfc3339(),
        }
    }
}

impl From<&MessageRecord> for dto::MessageRecordDto {
    fn from(record: &MessageRecord) -> Self {
        Self {
            id: record.id.clone(),
            conversation_id: record.conversation_id.clone(),
            text: record.text.clone(),
            media_url: record.media_url.clone(),
            audio_url: record.audio_url.clone(),
            edited: record.edited,
            created_at: record.created_at.to_rfc3339(),
            updated_at: record.updated_at.map(|ts| ts.to_rfc3339()),
        }
    }
}

impl From<MessageEventKind> for dto::MessageType {
    fn from(kind: MessageEventKind) -> Self {
        match kind {
            MessageEventKind::Created => dto::MessageType::MessageNew,
            MessageEventKind::Updated => dto::MessageType::MessageUpdated,
            MessageEventKind::Deleted => dto::MessageType::MessageDeleted,
        }
    }
}

impl dto::MessageEventMessage {
    /// Build the wire frame for a lifecycle event.
    pub fn from_event(kind: MessageEventKind, event: &MessageEvent, now: Timestamp) -> Self {
        Self {
            r#type: kind.into(),
            sender_id: event.sender.as_str().to_string(),
            receiver_id: event.receiver.as_ref().map(|r| r.as_str().to_string()),
            message: (&event.record).into(),
            timestamp: now.to_rfc3339(),
        }
    }
}

// ========================================
// DTO → Domain
// ========================================

impl From<http_dto::MessageEventKindDto> for MessageEventKind {
    fn from(kind: http_dto::MessageEventKindDto) -> Self {
        match kind {
            http_dto::MessageEventKindDto::Created => MessageEventKind::Created,
            http_dto::MessageEventKindDto::Updated => MessageEventKind::Updated,
            http_dto::MessageEventKindDto::Deleted => MessageEventKind::Deleted,
        }
    }
}

impl TryFrom<dto::MessageRecordDto> for MessageRecord {
    type Error = EventConversionError;

    fn try_from(dto: dto::MessageRecordDto) -> Result<Self, Self::Error> {
        let created_at = parse_timestamp(&dto.created_at)?;
        let updated_at = dto
            .updated_at
            .as_deref()
            .map(parse_timestamp)
            .transpose()?;

        Ok(Self {
            id: dto.id,
            conversation_id: dto.conversation_id,
            text: dto.text,
            media_url: dto.media_url,
            audio_url: dto.audio_url,
            edited: dto.edited,
            created_at,
            updated_at,
        })
    }
}

impl http_dto::MessageEventRequestDto {
    /// Resolve the request into a domain event, validating identities and
    /// timestamps.
    pub fn into_domain(self) -> Result<(MessageEventKind, MessageEvent), EventConversionError> {
        let sender =
            UserId::new(self.sender_id).map_err(EventConversionError::InvalidSender)?;
        let receiver = self
            .receiver_id
            .map(UserId::new)
            .transpose()
            .map_err(EventConversionError::InvalidReceiver)?;
        let record = MessageRecord::try_from(self.message)?;

        Ok((
            self.kind.into(),
            MessageEvent {
                sender,
                receiver,
                record,
            },
        ))
    }
}

fn parse_timestamp(value: &str) -> Result<Timestamp, EventConversionError> {
    aizu_shared::time::parse_rfc3339(value)
        .map(Timestamp::new)
        .ok_or_else(|| EventConversionError::InvalidTimestamp(value.to_string()))
}
