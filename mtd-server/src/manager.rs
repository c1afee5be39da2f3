//! Tick and poll drivers
//!
//! This module handles:
//! - Advancing the mission once per tick interval
//! - Polling the active source's provider once per poll interval
//! - Stopping both loops when the shutdown token fires
//!
//! The two loops are independent tasks. A slow poll never delays a tick; the
//! only thing they share is the snapshot mailbox.

use crate::state::AppState;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Spawn both drivers. Await the handles after cancelling `shutdown`.
pub fn spawn(
    state: AppState,
    tick_every: Duration,
    poll_every: Duration,
    shutdown: CancellationToken,
) -> (JoinHandle<()>, JoinHandle<()>) {
    let ticker = tokio::spawn(run_ticks(state.clone(), tick_every, shutdown.clone()));
    let poller = tokio::spawn(run_polls(state, poll_every, shutdown));
    (ticker, poller)
}

/// Tick loop. The first tick fires one period after start.
pub async fn run_ticks(state: AppState, every: Duration, shutdown: CancellationToken) {
    let mut timer = interval(every);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // Consume the immediate first tick
    timer.tick().await;

    info!("Tick driver started ({:?})", every);
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = timer.tick() => {
                state.tick().await;
            }
        }
    }
    info!("Tick driver stopped");
}

/// Poll loop. The first poll runs immediately; the next one is scheduled only
/// after the previous fetch finished or timed out.
pub async fn run_polls(state: AppState, every: Duration, shutdown: CancellationToken) {
    let mut timer = interval(every);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!("Poll worker started ({:?})", every);
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = timer.tick() => {}
        }

        tokio::select! {
            _ = shutdown.cancelled() => break,
            published = state.poll() => {
                if published {
                    debug!("Snapshot published");
                }
            }
        }
    }
    info!("Poll worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    fn state() -> AppState {
        let settings = Settings {
            seed: Some(5),
            ..Settings::default()
        };
        AppState::new(&settings).unwrap()
    }

    #[tokio::test]
    async fn test_ticker_advances_and_stops_on_shutdown() {
        let state = state();
        let mut rx = state.subscribe();
        let shutdown = CancellationToken::new();
        let (ticker, poller) = spawn(
            state.clone(),
            Duration::from_millis(10),
            Duration::from_millis(10),
            shutdown.clone(),
        );

        for _ in 0..3 {
            rx.recv().await.unwrap();
        }

        shutdown.cancel();
        ticker.await.unwrap();
        poller.await.unwrap();
    }
}
