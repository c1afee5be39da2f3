//! Mission Telemetry Server Library
//!
//! Exposes server components for integration testing.

pub mod api;
pub mod config;
pub mod mailbox;
pub mod manager;
pub mod mission;
pub mod state;
