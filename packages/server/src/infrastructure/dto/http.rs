//! HTTP API DTOs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::websocket::MessageRecordDto;

/// Response body of `GET /api/presence`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceViewDto {
    pub online_user_ids: Vec<String>,
    pub last_seen_by_user: BTreeMap<String, String>,
    pub timestamp: String,
}

/// Lifecycle kind in `POST /api/events/message` requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageEventKindDto {
    Created,
    Updated,
    Deleted,
}

/// Request body of `POST /api/events/message`: a mutation the CRUD layer has
/// already committed to the external store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageEventRequestDto {
    pub kind: MessageEventKindDto,
    pub sender_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver_id: Option<String>,
    pub message: MessageRecordDto,
}
