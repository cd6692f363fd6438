//! WebSocket wire frames.
//!
//! All frames are JSON with a `type` discriminator. Field names are
//! camelCase and timestamps are RFC 3339 strings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Discriminator for server→client frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageType {
    #[serde(rename = "presence:snapshot")]
    PresenceSnapshot,
    #[serde(rename = "presence")]
    Presence,
    #[serde(rename = "typing")]
    Typing,
    #[serde(rename = "message:new")]
    MessageNew,
    #[serde(rename = "message:updated")]
    MessageUpdated,
    #[serde(rename = "message:deleted")]
    MessageDeleted,
}

/// Client→server frames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientMessage {
    /// Announce the connection's logical user identity
    #[serde(rename_all = "camelCase")]
    Join { user_id: String },
    /// Typing indicator addressed to one peer
    #[serde(rename_all = "camelCase")]
    Typing {
        from_user_id: String,
        to_user_id: String,
        is_typing: bool,
    },
}

/// One-time presence catch-up, sent to the joining connection only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceSnapshotMessage {
    pub r#type: MessageType,
    pub online_user_ids: Vec<String>,
    /// user → RFC 3339 last-seen instant (BTreeMap keeps the JSON stable)
    pub last_seen_by_user: BTreeMap<String, String>,
    pub timestamp: String,
}

/// Presence status carried on edge broadcasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PresenceStatus {
    Online,
    Offline,
}

/// Broadcast to every connection on each online/offline edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceMessage {
    pub r#type: MessageType,
    pub user_id: String,
    pub status: PresenceStatus,
    /// Present only on Offline edges (an online user has no last-seen)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<String>,
    pub timestamp: String,
}

/// Typing indicator, delivered only to the addressee's room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingMessage {
    pub r#type: MessageType,
    pub from_user_id: String,
    pub to_user_id: String,
    pub is_typing: bool,
    pub timestamp: String,
}

/// Message payload carried on lifecycle frames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRecordDto {
    pub id: String,
    pub conversation_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    pub edited: bool,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Message lifecycle frame (`message:new` / `message:updated` /
/// `message:deleted`), fanned out to sender and receiver rooms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageEventMessage {
    pub r#type: MessageType,
    pub sender_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver_id: Option<String>,
    pub message: MessageRecordDto,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_frame_deserializes() {
        // given:
        let json = r#"{"type":"join","userId":"alice"}"#;

        // when:
        let msg: ClientMessage = serde_json::from_str(json).unwrap();

        // then:
        assert_eq!(
            msg,
            ClientMessage::Join {
                user_id: "alice".to_string()
            }
        );
    }

    #[test]
    fn test_typing_frame_deserializes() {
        // given:
        let json = r#"{"type":"typing","fromUserId":"alice","toUserId":"bob","isTyping":true}"#;

        // when:
        let msg: ClientMessage = serde_json::from_str(json).unwrap();

        // then:
        assert_eq!(
            msg,
            ClientMessage::Typing {
                from_user_id: "alice".to_string(),
                to_user_id: "bob".to_string(),
                is_typing: true,
            }
        );
    }

    #[test]
    fn test_unknown_frame_type_is_an_error() {
        // given:
        let json = r#"{"type":"dance","userId":"alice"}"#;

        // when / then: malformed frames surface as parse errors, which the
        // handler logs and drops
        assert!(serde_json::from_str::<ClientMessage>(json).is_err());
    }

    #[test]
    fn test_presence_message_omits_last_seen_when_online() {
        // given:
        let msg = PresenceMessage {
            r#type: MessageType::Presence,
            user_id: "alice".to_string(),
            status: PresenceStatus::Online,
            last_seen: None,
            timestamp: "2023-01-01T00:00:00+00:00".to_string(),
        };

        // when:
        let json = serde_json::to_string(&msg).unwrap();

        // then:
        assert!(json.contains(r#""type":"presence""#));
        assert!(json.contains(r#""status":"Online""#));
        assert!(!json.contains("lastSeen"));
    }

    #[test]
    fn test_presence_message_carries_last_seen_when_offline() {
        // given:
        let msg = PresenceMessage {
            r#type: MessageType::Presence,
            user_id: "alice".to_string(),
            status: PresenceStatus::Offline,
            last_seen: Some("2023-01-01T00:00:00+00:00".to_string()),
            timestamp: "2023-01-01T00:00:00+00:00".to_string(),
        };

        // when:
        let json = serde_json::to_string(&msg).unwrap();

        // then:
        assert!(json.contains(r#""status":"Offline""#));
        assert!(json.contains(r#""lastSeen":"2023-01-01T00:00:00+00:00""#));
    }

    #[test]
    fn test_snapshot_message_shape() {
        // given:
        let mut last_seen = BTreeMap::new();
        last_seen.insert(
            "bob".to_string(),
            "2023-01-01T00:00:00+00:00".to_string(),
        );
        let msg = PresenceSnapshotMessage {
            r#type: MessageType::PresenceSnapshot,
            online_user_ids: vec!["alice".to_string()],
            last_seen_by_user: last_seen,
            timestamp: "2023-01-01T00:00:01+00:00".to_string(),
        };

        // when:
        let json = serde_json::to_string(&msg).unwrap();

        // then:
        assert!(json.contains(r#""type":"presence:snapshot""#));
        assert!(json.contains(r#""onlineUserIds":["alice"]"#));
        assert!(json.contains(r#""lastSeenByUser":{"bob":"#));
    }

    #[test]
    fn test_message_event_frame_type_tags() {
        // given:
        let record = MessageRecordDto {
            id: "m1".to_string(),
            conversation_id: "c1".to_string(),
            text: Some("hi".to_string()),
            media_url: None,
            audio_url: None,
            edited: false,
            created_at: "2023-01-01T00:00:00+00:00".to_string(),
            updated_at: None,
        };
        let msg = MessageEventMessage {
            r#type: MessageType::MessageNew,
            sender_id: "u1".to_string(),
            receiver_id: Some("u2".to_string()),
            message: record,
            timestamp: "2023-01-01T00:00:01+00:00".to_string(),
        };

        // when:
        let json = serde_json::to_string(&msg).unwrap();

        // then:
        assert!(json.contains(r#""type":"message:new""#));
        assert!(json.contains(r#""senderId":"u1""#));
        assert!(json.contains(r#""receiverId":"u2""#));
        assert!(!json.contains("mediaUrl"));
    }
}
