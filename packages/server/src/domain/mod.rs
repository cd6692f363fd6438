//! Domain layer: value objects, entities, and the traits the outer layers
//! implement.

pub mod entity;
pub mod error;
pub mod event;
pub mod notifier;
pub mod pusher;
pub mod repository;
pub mod value_object;

pub use entity::{Hub, JoinOutcome, LeaveOutcome, PresenceEdge, PresenceSnapshot, Rooms, Roster};
pub use error::{MessagePushError, UserIdError};
pub use event::{MessageEvent, MessageEventKind, MessageRecord};
pub use notifier::{NoopRealtimeNotifier, RealtimeNotifier};
pub use pusher::{MessagePusher, PusherChannel};
pub use repository::HubRepository;
pub use value_object::{ConnectionId, Timestamp, UserId};

#[cfg(test)]
pub use pusher::MockMessagePusher;
#[cfg(test)]
pub use repository::MockHubRepository;
