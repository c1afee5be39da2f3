//! Mission state: simulation, snapshot fusion, history and alerts
//!
//! [`Mission`] is the synchronous heart of the server. One call to
//! [`Mission::tick`] is a complete state transition; the async drivers in
//! [`crate::manager`] only decide when it runs and which snapshot it sees.

use chrono::{DateTime, Local, TimeZone, Utc};
use mtd_adapters::Simulator;
use mtd_core::{
    alerts::{AlertMonitor, AlertRecord, Status},
    error::{ExportError, MissionError},
    export::{self, ExportOutcome},
    history::ChannelHistory,
    model::{DataMode, DataSource, LiveState, Snapshot, Vehicle},
};
use rand::rngs::StdRng;
use rand::Rng;
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

/// Per-tick summary broadcast to stream subscribers
#[derive(Debug, Clone, Serialize)]
pub struct TickUpdate {
    pub timestamp: DateTime<Utc>,
    pub live: LiveState,
    pub status: Status,
    pub mode: DataMode,
    pub source: DataSource,
    /// Alerts raised by this tick (rising edges only)
    pub raised: Vec<AlertRecord>,
}

/// Read-only view of the current selection and live values
#[derive(Debug, Clone, Serialize)]
pub struct MissionView {
    pub live: LiveState,
    pub status: Status,
    pub status_text: String,
    pub mode: DataMode,
    pub source: DataSource,
    pub source_label: &'static str,
    pub vehicle: Vehicle,
    pub availability_message: &'static str,
    pub export_enabled: bool,
    pub history_len: usize,
    pub alert_count: usize,
}

pub struct Mission<R: Rng = StdRng> {
    simulator: Simulator<R>,
    live: LiveState,
    history: ChannelHistory,
    alerts: AlertMonitor,
    mode: DataMode,
    source: DataSource,
    vehicle: Vehicle,
}

impl<R: Rng> Mission<R> {
    /// Start a mission on `source`, backfilling a month of history ending at
    /// `now`
    pub fn new(mut simulator: Simulator<R>, source: DataSource, now: DateTime<Utc>) -> Self {
        let mut history = ChannelHistory::hourly();
        history.seed(simulator.rng_mut(), now.timestamp_millis());

        // Every source catalog is non-empty
        let vehicle = source.vehicles()[0];
        Self {
            simulator,
            live: LiveState::default(),
            history,
            alerts: AlertMonitor::new(),
            mode: vehicle.availability.default_mode(),
            source,
            vehicle,
        }
    }

    /// Advance one tick: simulate, fuse `snapshot` when in real-time mode,
    /// record history, evaluate alerts
    pub fn tick(&mut self, now: DateTime<Utc>, snapshot: Option<&Snapshot>) -> TickUpdate {
        self.simulator.step(&mut self.live);
        if self.mode == DataMode::Realtime {
            if let Some(snapshot) = snapshot {
                self.live.overlay(snapshot);
            }
        }
        self.history.record(&self.live, now.timestamp_millis());

        let raised = self.alerts.evaluate(&self.live, now);
        for alert in &raised {
            warn!("{}", alert.message);
        }

        TickUpdate {
            timestamp: now,
            live: self.live,
            status: self.alerts.status(),
            mode: self.mode,
            source: self.source,
            raised,
        }
    }

    /// Switch the active source. Keeps the current vehicle if the new catalog
    /// lists it, otherwise selects the first entry.
    pub fn select_source(&mut self, source: DataSource) -> Vehicle {
        let catalog = source.vehicles();
        if !catalog.contains(&self.vehicle) {
            self.vehicle = catalog[0];
        }
        if !self.vehicle.availability.supports(self.mode) {
            self.mode = self.vehicle.availability.default_mode();
        }
        if self.source != source {
            info!("Source switched: {} -> {}", self.source, source);
        }
        self.source = source;
        self.vehicle
    }

    /// Select a vehicle from the current source's catalog; its default mode
    /// becomes active
    pub fn select_vehicle(&mut self, id: &str) -> Result<Vehicle, MissionError> {
        let vehicle = self
            .source
            .vehicles()
            .into_iter()
            .find(|v| v.id == id)
            .ok_or_else(|| MissionError::UnknownVehicle {
                vehicle: id.to_string(),
                data_source: self.source,
            })?;
        self.vehicle = vehicle;
        self.mode = vehicle.availability.default_mode();
        info!("Vehicle selected: {} ({} mode)", vehicle, self.mode);
        Ok(vehicle)
    }

    pub fn set_mode(&mut self, mode: DataMode) -> Result<(), MissionError> {
        if !self.vehicle.availability.supports(mode) {
            return Err(MissionError::ModeUnavailable {
                mode,
                vehicle: self.vehicle.name.to_string(),
            });
        }
        self.mode = mode;
        Ok(())
    }

    pub fn export_enabled(&self) -> bool {
        self.vehicle.availability.supports_historical()
    }

    /// Export history as CSV with local-time timestamps
    pub fn export_csv(&self, path: &Path) -> Result<ExportOutcome, ExportError> {
        self.export_csv_in(path, &Local)
    }

    pub fn export_csv_in<Tz: TimeZone>(
        &self,
        path: &Path,
        tz: &Tz,
    ) -> Result<ExportOutcome, ExportError>
    where
        Tz::Offset: std::fmt::Display,
    {
        if !self.export_enabled() {
            info!("Export skipped: {} has no historical data", self.vehicle.name);
            return Ok(ExportOutcome::Disabled);
        }
        let rows = export::write_csv(&self.history, tz, path)?;
        info!("Exported {} rows to {}", rows, path.display());
        Ok(ExportOutcome::Written { rows })
    }

    pub fn live(&self) -> &LiveState {
        &self.live
    }

    pub fn history(&self) -> &ChannelHistory {
        &self.history
    }

    pub fn alerts(&self) -> &AlertMonitor {
        &self.alerts
    }

    pub fn status(&self) -> Status {
        self.alerts.status()
    }

    pub fn mode(&self) -> DataMode {
        self.mode
    }

    pub fn source(&self) -> DataSource {
        self.source
    }

    pub fn vehicle(&self) -> Vehicle {
        self.vehicle
    }

    pub fn view(&self) -> MissionView {
        let status = self.status();
        MissionView {
            live: self.live,
            status,
            status_text: status.to_string(),
            mode: self.mode,
            source: self.source,
            source_label: self.source.label(),
            vehicle: self.vehicle,
            availability_message: self.vehicle.availability.message(),
            export_enabled: self.export_enabled(),
            history_len: self.history.len(),
            alert_count: self.alerts.len(),
        }
    }

    #[cfg(test)]
    pub(crate) fn live_mut(&mut self) -> &mut LiveState {
        &mut self.live
    }

    /// Select a vehicle outside the shipped catalogs
    #[cfg(test)]
    pub(crate) fn force_vehicle(&mut self, vehicle: Vehicle) {
        self.vehicle = vehicle;
    }
}
