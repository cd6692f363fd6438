//! Server execution logic.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use aizu_shared::time::Clock;

use crate::domain::{HubRepository, MessagePusher, RealtimeNotifier};
use crate::usecase::{AnnounceIdentityUseCase, DisconnectConnectionUseCase, SendTypingUseCase};

use super::{
    handler::{get_presence, health_check, publish_message_event, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Realtime presence server.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     announce_identity_usecase,
///     disconnect_connection_usecase,
///     send_typing_usecase,
///     message_pusher,
///     repository,
///     notifier,
///     clock,
/// );
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    announce_identity_usecase: Arc<AnnounceIdentityUseCase>,
    disconnect_connection_usecase: Arc<DisconnectConnectionUseCase>,
    send_typing_usecase: Arc<SendTypingUseCase>,
    message_pusher: Arc<dyn MessagePusher>,
    repository: Arc<dyn HubRepository>,
    notifier: Arc<dyn RealtimeNotifier>,
    clock: Arc<dyn Clock>,
}

impl Server {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        announce_identity_usecase: Arc<AnnounceIdentityUseCase>,
        disconnect_connection_usecase: Arc<DisconnectConnectionUseCase>,
        send_typing_usecase: Arc<SendTypingUseCase>,
        message_pusher: Arc<dyn MessagePusher>,
        repository: Arc<dyn HubRepository>,
        notifier: Arc<dyn RealtimeNotifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            announce_identity_usecase,
            disconnect_connection_usecase,
            send_typing_usecase,
            message_pusher,
            repository,
            notifier,
            clock,
        }
    }

    /// Build the axum router. Exposed so tests can serve the app on an
    /// ephemeral port.
    pub fn router(&self) -> Router {
        let app_state = Arc::new(AppState {
            announce_identity_usecase: self.announce_identity_usecase.clone(),
            disconnect_connection_usecase: self.disconnect_connection_usecase.clone(),
            send_typing_usecase: self.send_typing_usecase.clone(),
            message_pusher: self.message_pusher.clone(),
            repository: self.repository.clone(),
            notifier: self.notifier.clone(),
            clock: self.clock.clone(),
        });

        Router::new()
            // WebSocket endpoint
            .route("/ws", get(websocket_handler))
            // HTTP endpoints
            .route("/api/health", get(health_check))
            .route("/api/presence", get(get_presence))
            .route("/api/events/message", post(publish_message_event))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state)
    }

    /// Run the realtime server.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address
    /// or if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.router();

        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        tracing::info!(
            "Realtime presence server listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
