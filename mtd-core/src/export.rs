//! CSV export of the aligned channel histories

use crate::error::ExportError;
use crate::history::ChannelHistory;
use crate::model::Channel;
use chrono::{TimeZone, Utc};
use std::fmt::Write as _;
use std::path::Path;

pub const CSV_HEADER: &str = "timestamp,battery,temperature,signal,velocity";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Result of an export request
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ExportOutcome {
    Written { rows: usize },
    /// The active vehicle has no historical data
    Disabled,
}

/// Render the history as CSV, formatting timestamps in `tz`
pub fn render_csv<Tz: TimeZone>(history: &ChannelHistory, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let mut out = String::with_capacity(64 * (history.len() + 1));
    out.push_str(CSV_HEADER);
    out.push('\n');

    let timestamps = history.get(Channel::Battery);
    for i in 0..history.len() {
        let Some(ms) = timestamps.timestamp(i) else {
            break;
        };
        let when = Utc
            .timestamp_millis_opt(ms)
            .single()
            .map(|t| t.with_timezone(tz).format(TIMESTAMP_FORMAT).to_string())
            .unwrap_or_default();
        out.push_str(&when);
        for channel in Channel::ALL {
            let value = history.get(channel).value(i).unwrap_or_default();
            let _ = write!(out, ",{value:.2}");
        }
        out.push('\n');
    }
    out
}

/// Write the CSV to `path`; returns the number of data rows
pub fn write_csv<Tz: TimeZone>(
    history: &ChannelHistory,
    tz: &Tz,
    path: &Path,
) -> Result<usize, ExportError>
where
    Tz::Offset: std::fmt::Display,
{
    let csv = render_csv(history, tz);
    std::fs::write(path, csv).map_err(|source| ExportError {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(history.len())
}
