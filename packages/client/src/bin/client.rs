//! CLI presence client with reconnection support.
//!
//! Connects to the realtime presence server, announces an identity, and
//! displays presence, typing and message frames as they arrive. Typing
//! indicators can be sent from the prompt with `/typing <user> on|off`.
//! Automatically reconnects on disconnection (max 5 attempts with 5 second
//! interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin aizu-client -- --user-id alice
//! cargo run --bin aizu-client -- -U bob -u ws://127.0.0.1:8080/ws
//! ```

use clap::Parser;

use aizu_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "aizu-client")]
#[command(about = "CLI presence client for the Aizu realtime server", long_about = None)]
struct Args {
    /// User identity to announce on the connection
    #[arg(short = 'U', long)]
    user_id: String,

    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    // Run the client
    if let Err(e) = aizu_client::run_client(args.url, args.user_id).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
