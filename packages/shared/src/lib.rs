//! Shared utilities for the Aizu realtime chat layer.
//!
//! Everything in here is used by both the server and the client binaries:
//! logging setup and time helpers.

pub mod logger;
pub mod time;
