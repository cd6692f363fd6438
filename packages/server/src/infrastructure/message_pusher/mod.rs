//! Message pusher implementations.
//!
//! - `websocket`: pushes frames through per-connection unbounded channels
//!   owned by the WebSocket writer tasks.

pub mod websocket;

pub use websocket::WebSocketMessagePusher;
