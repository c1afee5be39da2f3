//! Application state management

use crate::config::Settings;
use crate::mailbox::SnapshotMailbox;
use crate::mission::{Mission, MissionView, TickUpdate};
use anyhow::{Context, Result};
use chrono::Utc;
use mtd_adapters::{Adapter, AdapterSettings, Fetcher, Simulator};
use mtd_core::{
    error::{ExportError, MissionError},
    export::ExportOutcome,
    model::{DataMode, DataSource, Vehicle},
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{broadcast, watch, RwLock};
use tracing::debug;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Live values, series, alerts and selection
    pub mission: Arc<RwLock<Mission>>,

    /// Latest provider snapshot, written by the poll worker
    pub mailbox: SnapshotMailbox,

    /// Active source as seen by the poll worker
    source_tx: watch::Sender<DataSource>,

    fetcher: Fetcher,
    adapter_settings: AdapterSettings,

    /// Broadcast channel for per-tick updates
    /// Multiple consumers can subscribe to receive updates
    pub telemetry_tx: broadcast::Sender<TickUpdate>,

    /// Relative export paths resolve against this directory
    pub export_dir: PathBuf,
}

impl AppState {
    pub fn new(settings: &Settings) -> Result<Self> {
        let simulator = match settings.seed {
            Some(seed) => Simulator::seeded(seed),
            None => Simulator::new(),
        };
        let mission = Mission::new(simulator, settings.initial_source, Utc::now());
        let fetcher = Fetcher::new(settings.connect_timeout(), settings.read_timeout())
            .context("failed to build HTTP client")?;

        Ok(Self::with_mission(
            mission,
            fetcher,
            settings.adapter_settings(),
            settings.export_dir(),
        ))
    }

    pub fn with_mission(
        mission: Mission,
        fetcher: Fetcher,
        adapter_settings: AdapterSettings,
        export_dir: PathBuf,
    ) -> Self {
        // Create broadcast channel with capacity for 100 updates
        let (telemetry_tx, _) = broadcast::channel(100);
        let (source_tx, _) = watch::channel(mission.source());

        Self {
            mission: Arc::new(RwLock::new(mission)),
            mailbox: SnapshotMailbox::new(),
            source_tx,
            fetcher,
            adapter_settings,
            telemetry_tx,
            export_dir,
        }
    }

    /// Subscribe to per-tick updates
    pub fn subscribe(&self) -> broadcast::Receiver<TickUpdate> {
        self.telemetry_tx.subscribe()
    }

    /// One tick. The mailbox is read under the mission lock so a concurrent
    /// source switch cannot interleave between read and fusion.
    pub async fn tick(&self) -> TickUpdate {
        let update = {
            let mut mission = self.mission.write().await;
            let snapshot = self.mailbox.latest();
            mission.tick(Utc::now(), snapshot.as_ref())
        };
        // Ignore error if no receivers (they'll get the next update)
        let _ = self.telemetry_tx.send(update.clone());
        update
    }

    /// One poll of the active source's provider. Returns whether a snapshot
    /// was published.
    pub async fn poll(&self) -> bool {
        let source = *self.source_tx.borrow();
        let adapter = Adapter::for_source(source, &self.adapter_settings);
        let Some(snapshot) = self.fetcher.fetch_snapshot(&adapter).await else {
            return false;
        };

        // A switch after this check can still let one stale snapshot through
        if *self.source_tx.borrow() != source {
            debug!("Discarding {} snapshot after source switch", source);
            return false;
        }
        self.mailbox.publish(snapshot);
        true
    }

    pub async fn select_source(&self, source: DataSource) -> Vehicle {
        let mut mission = self.mission.write().await;
        let vehicle = mission.select_source(source);
        self.source_tx.send_replace(source);
        self.mailbox.clear();
        vehicle
    }

    pub async fn select_vehicle(&self, id: &str) -> Result<Vehicle, MissionError> {
        self.mission.write().await.select_vehicle(id)
    }

    pub async fn set_mode(&self, mode: DataMode) -> Result<(), MissionError> {
        self.mission.write().await.set_mode(mode)
    }

    pub async fn view(&self) -> MissionView {
        self.mission.read().await.view()
    }

    /// Export history to `path`, or to a timestamped file in the export
    /// directory when no path is given
    pub async fn export_csv(&self, path: Option<&Path>) -> Result<(ExportOutcome, PathBuf), ExportError> {
        let path = self.resolve_export_path(path);
        let mission = self.mission.read().await;
        // A disabled export must not touch the filesystem
        if mission.export_enabled() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|source| ExportError {
                    path: path.clone(),
                    source,
                })?;
            }
        }
        let outcome = mission.export_csv(&path)?;
        Ok((outcome, path))
    }

    fn resolve_export_path(&self, path: Option<&Path>) -> PathBuf {
        match path {
            Some(p) if p.is_absolute() => p.to_path_buf(),
            Some(p) => self.export_dir.join(p),
            None => self.export_dir.join(format!(
                "mission-telemetry-{}.csv",
                Utc::now().format("%Y%m%d-%H%M%S")
            )),
        }
    }

    #[cfg(test)]
    pub(crate) fn active_source(&self) -> DataSource {
        *self.source_tx.borrow()
    }
}
