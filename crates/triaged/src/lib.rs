//! Triage daemon library - exposes modules for testing.

pub mod config;
pub mod llm;
pub mod routes;
pub mod server;
pub mod triage;
