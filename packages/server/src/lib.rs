//! Realtime presence and event fan-out server for the Aizu chat application.
//!
//! This crate owns the one stateful part of the system: which users are
//! connected (possibly from several devices), when their online/offline
//! status flips, and how message lifecycle events reach the two parties of
//! a conversation. The CRUD backend, persistence, and auth are external
//! collaborators.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
