//! Error types surfaced to the display shell

use crate::model::{DataMode, DataSource};
use std::path::PathBuf;
use thiserror::Error;

/// Rejected selection or mode change
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MissionError {
    #[error("unknown data source: {0}")]
    UnknownSource(String),

    #[error("unknown vehicle '{vehicle}' for source {data_source}")]
    UnknownVehicle {
        vehicle: String,
        data_source: DataSource,
    },

    #[error("unknown data mode: {0}")]
    UnknownMode(String),

    #[error("{mode} data is not available for {vehicle}")]
    ModeUnavailable { mode: DataMode, vehicle: String },
}

/// CSV export failed to reach disk. In-memory state is untouched.
#[derive(Debug, Error)]
#[error("Failed to export CSV to {}: {source}", path.display())]
pub struct ExportError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}
