//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};

use crate::{
    domain::{MessageEventKind, Timestamp},
    infrastructure::dto::http::{MessageEventRequestDto, PresenceViewDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Current presence state (ops/debug surface)
pub async fn get_presence(State(state): State<Arc<AppState>>) -> Json<PresenceViewDto> {
    let now = Timestamp::new(state.clock.now_utc_millis());
    let snapshot = state.repository.snapshot(now).await;

    let view = PresenceViewDto {
        online_user_ids: snapshot
            .online_user_ids
            .into_iter()
            .map(|user| user.into_string())
            .collect(),
        last_seen_by_user: snapshot
            .last_seen_by_user
            .into_iter()
            .map(|(user, ts)| (user.into_string(), ts.to_rfc3339()))
            .collect(),
        timestamp: snapshot.taken_at.to_rfc3339(),
    };
    Json(view)
}

/// Event fan-out seam for the CRUD layer.
///
/// The caller has already committed the mutation to the message store;
/// delivery here is fire-and-forget, so the response is 202 regardless of
/// how many connections the frames reached.
pub async fn publish_message_event(
    State(state): State<Arc<AppState>>,
    Json(request): Json<MessageEventRequestDto>,
) -> StatusCode {
    match request.into_domain() {
        Ok((kind, event)) => {
            match kind {
                MessageEventKind::Created => state.notifier.message_created(event).await,
                MessageEventKind::Updated => state.notifier.message_updated(event).await,
                MessageEventKind::Deleted => state.notifier.message_deleted(event).await,
            }
            StatusCode::ACCEPTED
        }
        Err(e) => {
            tracing::warn!("Rejecting message event: {}", e);
            StatusCode::UNPROCESSABLE_ENTITY
        }
    }
}
