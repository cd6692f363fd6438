//! Request handlers.

pub mod http;
pub mod websocket;

pub use http::{get_presence, health_check, publish_message_event};
pub use websocket::websocket_handler;
