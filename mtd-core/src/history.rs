//! Lock-step histories for all four channels

use crate::model::{Channel, LiveState};
use crate::series::RollingSeries;
use crate::units::Bounds;
use rand::Rng;

/// Random-walk parameters used to backfill a channel at startup
#[derive(Debug, Clone, Copy)]
pub struct SeedProfile {
    pub start: f64,
    pub step_variance: f64,
    pub bounds: Bounds,
}

impl SeedProfile {
    pub const fn for_channel(channel: Channel) -> Self {
        match channel {
            Channel::Battery => Self {
                start: 100.0,
                step_variance: 0.3,
                bounds: Bounds::new(40.0, 100.0),
            },
            Channel::Temperature => Self {
                start: 22.0,
                step_variance: 1.2,
                bounds: Bounds::new(-40.0, 95.0),
            },
            Channel::Signal => Self {
                start: 35.0,
                step_variance: 1.5,
                bounds: Bounds::new(0.0, 60.0),
            },
            Channel::Velocity => Self {
                start: 1200.0,
                step_variance: 20.0,
                bounds: Bounds::new(800.0, 2400.0),
            },
        }
    }
}

/// One [`RollingSeries`] per channel, always written together so the
/// series share length and timestamps.
#[derive(Debug, Clone)]
pub struct ChannelHistory {
    series: [RollingSeries; 4],
}

impl ChannelHistory {
    pub fn new(max_points: usize, step_ms: i64) -> Self {
        Self {
            series: std::array::from_fn(|_| RollingSeries::new(max_points, step_ms)),
        }
    }

    pub fn hourly() -> Self {
        Self {
            series: std::array::from_fn(|_| RollingSeries::hourly()),
        }
    }

    /// Backfill every channel with a synthetic month ending at `anchor_ms`
    pub fn seed<R: Rng>(&mut self, rng: &mut R, anchor_ms: i64) {
        for channel in Channel::ALL {
            let profile = SeedProfile::for_channel(channel);
            self.series[channel.index()].seed(
                rng,
                profile.start,
                profile.step_variance,
                profile.bounds,
                anchor_ms,
            );
        }
    }

    pub fn record(&mut self, state: &LiveState, timestamp_ms: i64) {
        for channel in Channel::ALL {
            self.series[channel.index()].add_or_update(state.get(channel), timestamp_ms);
        }
    }

    pub fn get(&self, channel: Channel) -> &RollingSeries {
        &self.series[channel.index()]
    }

    /// Number of aligned rows
    pub fn len(&self) -> usize {
        self.series[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::HOUR_MS;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_seeded_history_is_aligned() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut history = ChannelHistory::hourly();
        history.seed(&mut rng, 50 * HOUR_MS + 17);

        assert_eq!(history.len(), 720);
        for channel in Channel::ALL {
            let series = history.get(channel);
            assert_eq!(series.len(), 720);
            assert_eq!(series.timestamp(719), Some(50 * HOUR_MS));
            let bounds = SeedProfile::for_channel(channel).bounds;
            assert!(series.iter().all(|p| bounds.contains(p.value)));
        }
    }

    #[test]
    fn test_record_writes_every_channel() {
        let mut history = ChannelHistory::new(10, HOUR_MS);
        let state = LiveState {
            battery: 80.0,
            temperature: 12.5,
            signal: 20.0,
            velocity: 900.0,
        };
        history.record(&state, 0);
        history.record(&state, 2 * HOUR_MS);

        assert_eq!(history.len(), 3);
        assert_eq!(history.get(Channel::Temperature).value(2), Some(12.5));
        assert_eq!(history.get(Channel::Velocity).timestamp(1), Some(HOUR_MS));
    }
}
