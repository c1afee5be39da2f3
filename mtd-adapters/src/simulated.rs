//! Simulated source: synthetic per-tick telemetry
//!
//! The [`Simulator`] advances every channel once per tick: the battery drains
//! slowly with occasional recharge events, the other channels random-walk with
//! Gaussian noise. [`SimulatedAdapter`] is the matching no-op adapter; the
//! simulated source never fetches anything.

use mtd_core::{
    adapter::SourceAdapter,
    model::{Channel, DataSource, LiveState, Snapshot},
    units::Bounds,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Velocity range the simulator's own random walk is held to
pub const SIMULATED_VELOCITY: Bounds = Bounds::new(800.0, 2400.0);

/// Per-tick noise parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseModel {
    /// Upper bound of the uniform per-tick battery drain
    pub battery_drain: f64,
    /// Below this level a recharge may happen
    pub recharge_below: f64,
    pub recharge_probability: f64,
    pub recharge_level: f64,
    pub temperature_sigma: f64,
    pub signal_sigma: f64,
    pub velocity_sigma: f64,
}

impl Default for NoiseModel {
    fn default() -> Self {
        Self {
            battery_drain: 0.4,
            recharge_below: 5.0,
            recharge_probability: 0.3,
            recharge_level: 95.0,
            temperature_sigma: 1.2,
            signal_sigma: 1.5,
            velocity_sigma: 20.0,
        }
    }
}

pub struct Simulator<R: Rng = StdRng> {
    rng: R,
    noise: NoiseModel,
}

impl Simulator<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic simulator for reproducible runs
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for Simulator<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Simulator<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            noise: NoiseModel::default(),
        }
    }

    pub fn with_noise(mut self, noise: NoiseModel) -> Self {
        self.noise = noise;
        self
    }

    pub fn noise(&self) -> &NoiseModel {
        &self.noise
    }

    /// Shared RNG, also used to seed histories
    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Advance `state` by one tick of noise
    pub fn step(&mut self, state: &mut LiveState) {
        let n = self.noise;

        let drain = self.rng.gen::<f64>() * n.battery_drain;
        state.set(Channel::Battery, state.battery - drain);
        if state.battery < n.recharge_below && self.rng.gen::<f64>() < n.recharge_probability {
            state.set(Channel::Battery, n.recharge_level);
        }

        let temperature = state.temperature + self.gaussian(n.temperature_sigma);
        state.set(Channel::Temperature, temperature);

        let signal = state.signal + self.gaussian(n.signal_sigma);
        state.set(Channel::Signal, signal);

        let velocity = SIMULATED_VELOCITY.clamp(state.velocity + self.gaussian(n.velocity_sigma));
        state.set(Channel::Velocity, velocity);
    }

    fn gaussian(&mut self, sigma: f64) -> f64 {
        let z: f64 = self.rng.sample(StandardNormal);
        z * sigma
    }
}

/// No-op adapter for the simulated source and for catalog-only providers
#[derive(Debug, Clone, Copy)]
pub struct SimulatedAdapter {
    source: DataSource,
}

impl SimulatedAdapter {
    pub fn new() -> Self {
        Self::standing_in_for(DataSource::Simulated)
    }

    /// No-op adapter reporting `source` as its binding
    pub fn standing_in_for(source: DataSource) -> Self {
        Self { source }
    }
}

impl Default for SimulatedAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceAdapter for SimulatedAdapter {
    fn source(&self) -> DataSource {
        self.source
    }

    fn request_url(&self) -> Option<String> {
        None
    }

    fn parse(&self, _body: &str) -> Option<Snapshot> {
        None
    }
}
