//! Server state shared across handlers.

use std::sync::Arc;

use aizu_shared::time::Clock;

use crate::domain::{HubRepository, MessagePusher, RealtimeNotifier};
use crate::usecase::{AnnounceIdentityUseCase, DisconnectConnectionUseCase, SendTypingUseCase};

/// Shared application state
pub struct AppState {
    /// UseCase for identity announcements
    pub announce_identity_usecase: Arc<AnnounceIdentityUseCase>,
    /// UseCase for connection teardown
    pub disconnect_connection_usecase: Arc<DisconnectConnectionUseCase>,
    /// UseCase for typing indicators
    pub send_typing_usecase: Arc<SendTypingUseCase>,
    /// MessagePusher (connection registration and frame delivery)
    pub message_pusher: Arc<dyn MessagePusher>,
    /// Repository (presence snapshots for the HTTP surface)
    pub repository: Arc<dyn HubRepository>,
    /// Event fan-out seam used by the HTTP event endpoint
    pub notifier: Arc<dyn RealtimeNotifier>,
    /// Wall clock for handler-built frames
    pub clock: Arc<dyn Clock>,
}
