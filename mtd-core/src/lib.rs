//! Mission Telemetry Core Library
//!
//! This crate provides the channel model, rolling history, alert state
//! machine, CSV exporter and the adapter trait shared by every telemetry
//! source.

pub mod adapter;
pub mod alerts;
pub mod error;
pub mod export;
pub mod history;
pub mod model;
pub mod series;
pub mod units;

pub use adapter::SourceAdapter;
pub use alerts::{AlertMonitor, AlertRecord, Severity, Status};
pub use error::{ExportError, MissionError};
pub use history::ChannelHistory;
pub use model::{Channel, DataAvailability, DataMode, DataSource, LiveState, Snapshot, Vehicle};
pub use series::RollingSeries;
