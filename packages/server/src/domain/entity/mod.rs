//! Domain entities.
//!
//! `Roster` and `Rooms` are pure in-memory structures with no side effects;
//! `Hub` composes them so one join/leave is a single atomic state transition.

pub mod hub;
pub mod rooms;
pub mod roster;

pub use hub::{Hub, JoinOutcome, LeaveOutcome, PresenceSnapshot};
pub use rooms::Rooms;
pub use roster::{PresenceEdge, Roster};
