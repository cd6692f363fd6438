//! UI layer: axum router, WebSocket and HTTP handlers.

pub mod handler;
pub mod server;
pub mod signal;
pub mod state;

pub use server::Server;
