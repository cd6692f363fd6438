//! In-memory repository implementations.

pub mod hub;

pub use hub::InMemoryHubRepository;
