//! `RealtimeNotifier` implementations.

pub mod websocket;

pub use websocket::WebSocketRealtimeNotifier;
