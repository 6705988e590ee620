//! Shared types for the triage daemon and its clients.

pub mod chat;
pub mod triage;

pub use chat::*;
pub use triage::*;
