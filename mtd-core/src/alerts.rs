//! Threshold alerts over the live state
//!
//! Each condition is a level; an [`AlertRecord`] is emitted only when a
//! condition goes from false to true. The overall [`Status`] is recomputed
//! from the current levels on every evaluation.

use crate::model::{Channel, LiveState};
use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Nominal,
    AttentionRequired,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Nominal => write!(f, "STATUS: NOMINAL"),
            Status::AttentionRequired => write!(f, "STATUS: ATTENTION REQUIRED"),
        }
    }
}

/// Threshold predicates tracked by the monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    BatteryCritical,
    TemperatureHigh,
    SignalLow,
}

impl Condition {
    pub const ALL: [Condition; 3] = [
        Condition::BatteryCritical,
        Condition::TemperatureHigh,
        Condition::SignalLow,
    ];

    pub const fn channel(self) -> Channel {
        match self {
            Condition::BatteryCritical => Channel::Battery,
            Condition::TemperatureHigh => Channel::Temperature,
            Condition::SignalLow => Channel::Signal,
        }
    }

    pub fn holds(self, value: f64) -> bool {
        match self {
            Condition::BatteryCritical => value < 25.0,
            Condition::TemperatureHigh => value > 70.0,
            Condition::SignalLow => value < 10.0,
        }
    }

    pub const fn severity(self) -> Severity {
        match self {
            Condition::BatteryCritical => Severity::Critical,
            _ => Severity::Warning,
        }
    }

    fn message(self, value: f64) -> String {
        match self {
            Condition::BatteryCritical => format!("CRITICAL: Battery voltage low ({value:.2} V)"),
            Condition::TemperatureHigh => format!("WARN: Thermal spike detected ({value:.2} C)"),
            Condition::SignalLow => format!("WARN: Signal strength low ({value:.2} dB)"),
        }
    }

    const fn slot(self) -> usize {
        match self {
            Condition::BatteryCritical => 0,
            Condition::TemperatureHigh => 1,
            Condition::SignalLow => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertRecord {
    pub timestamp: DateTime<Utc>,
    pub severity: Severity,
    pub condition: Condition,
    pub message: String,
}

impl AlertRecord {
    /// `[HH:MM:SS] message` in local time
    pub fn display_line(&self) -> String {
        format!(
            "[{}] {}",
            self.timestamp.with_timezone(&Local).format("%H:%M:%S"),
            self.message
        )
    }
}

/// Edge-triggered alert state machine with an append-only log.
///
/// The log is not capped; it grows for the life of the process.
#[derive(Debug, Clone, Default)]
pub struct AlertMonitor {
    active: [bool; 3],
    log: Vec<AlertRecord>,
}

impl AlertMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update condition levels from `state`; returns the alerts raised by
    /// this evaluation (rising edges only).
    pub fn evaluate(&mut self, state: &LiveState, now: DateTime<Utc>) -> Vec<AlertRecord> {
        let mut raised = Vec::new();
        for condition in Condition::ALL {
            let value = state.get(condition.channel());
            let holds = condition.holds(value);
            let was_active = std::mem::replace(&mut self.active[condition.slot()], holds);
            if holds && !was_active {
                raised.push(AlertRecord {
                    timestamp: now,
                    severity: condition.severity(),
                    condition,
                    message: condition.message(value),
                });
            }
        }
        self.log.extend(raised.iter().cloned());
        raised
    }

    pub fn is_active(&self, condition: Condition) -> bool {
        self.active[condition.slot()]
    }

    pub fn status(&self) -> Status {
        if self.active.iter().any(|a| *a) {
            Status::AttentionRequired
        } else {
            Status::Nominal
        }
    }

    /// Alert log, newest first
    pub fn log(&self) -> impl Iterator<Item = &AlertRecord> + '_ {
        self.log.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }
}
