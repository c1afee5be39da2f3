//! Latest-snapshot mailbox shared by the poll and tick drivers

use mtd_core::model::Snapshot;
use tokio::sync::watch;

/// Single-slot mailbox. The poller overwrites; the ticker reads without
/// consuming, so one fetched snapshot keeps feeding ticks until replaced or
/// cleared.
#[derive(Debug, Clone)]
pub struct SnapshotMailbox {
    tx: watch::Sender<Option<Snapshot>>,
}

impl SnapshotMailbox {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx }
    }

    pub fn publish(&self, snapshot: Snapshot) {
        self.tx.send_replace(Some(snapshot));
    }

    pub fn latest(&self) -> Option<Snapshot> {
        *self.tx.borrow()
    }

    pub fn clear(&self) {
        self.tx.send_replace(None);
    }
}

impl Default for SnapshotMailbox {
    fn default() -> Self {
        Self::new()
    }
}
