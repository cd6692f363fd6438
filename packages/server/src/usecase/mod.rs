//! UseCase layer: orchestration between the wire handlers and the domain.

pub mod announce_identity;
pub mod disconnect_connection;
pub mod send_typing;

pub use announce_identity::{AnnounceIdentityUseCase, AnnounceOutcome};
pub use disconnect_connection::{DisconnectConnectionUseCase, DisconnectOutcome};
pub use send_typing::SendTypingUseCase;
