//! Realtime presence and event fan-out server.
//!
//! Tracks which users are online, routes presence/typing frames, and pushes
//! message events from the CRUD layer to live WebSocket connections.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin aizu-server
//! cargo run --bin aizu-server -- --host 0.0.0.0 --port 3000
//! ```

use std::sync::Arc;

use aizu_server::{
    domain::Hub,
    infrastructure::{
        message_pusher::WebSocketMessagePusher, notifier::WebSocketRealtimeNotifier,
        repository::InMemoryHubRepository,
    },
    ui::Server,
    usecase::{AnnounceIdentityUseCase, DisconnectConnectionUseCase, SendTypingUseCase},
};
use aizu_shared::{logger::setup_logger, time::SystemClock};
use clap::Parser;
use tokio::sync::Mutex;

#[derive(Parser, Debug)]
#[command(name = "aizu-server")]
#[command(about = "Realtime presence and event fan-out server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Repository
    // 2. MessagePusher
    // 3. Clock
    // 4. UseCases / Notifier
    // 5. Server

    // 1. Create Repository (in-memory hub)
    let hub = Arc::new(Mutex::new(Hub::new()));
    let repository = Arc::new(InMemoryHubRepository::new(hub));

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    // 3. Wall clock
    let clock = Arc::new(SystemClock);

    // 4. Create UseCases and the fan-out notifier
    let announce_identity_usecase = Arc::new(AnnounceIdentityUseCase::new(
        repository.clone(),
        message_pusher.clone(),
        clock.clone(),
    ));
    let disconnect_connection_usecase = Arc::new(DisconnectConnectionUseCase::new(
        repository.clone(),
        message_pusher.clone(),
        clock.clone(),
    ));
    let send_typing_usecase = Arc::new(SendTypingUseCase::new(
        repository.clone(),
        message_pusher.clone(),
    ));
    let notifier = Arc::new(WebSocketRealtimeNotifier::new(
        repository.clone(),
        message_pusher.clone(),
        clock.clone(),
    ));

    // 5. Create and run the server
    let server = Server::new(
        announce_identity_usecase,
        disconnect_connection_usecase,
        send_typing_usecase,
        message_pusher,
        repository,
        notifier,
        clock,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
