//! Type-safe wrappers for physical units
//!
//! Adapters normalize provider payloads into these before building a
//! [`Snapshot`](crate::model::Snapshot), so a knots reading can never be
//! mistaken for metres per second.
//!
//! All unit types serialize with 2 decimal places, matching the display and
//! export precision.

use serde::{Deserialize, Serialize};

/// Round f64 to 2 decimal places for compact JSON serialization
fn round2<S: serde::Serializer>(val: &f64, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64((*val * 100.0).round() / 100.0)
}

/// Knots to metres per second
pub const KNOTS_TO_MS: f64 = 0.514444;

/// Metres per second
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetersPerSecond(#[serde(serialize_with = "round2")] pub f64);

/// Nautical miles per hour
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Knots(#[serde(serialize_with = "round2")] pub f64);

impl Knots {
    pub fn to_meters_per_second(self) -> MetersPerSecond {
        MetersPerSecond(self.0 * KNOTS_TO_MS)
    }
}

impl From<Knots> for MetersPerSecond {
    fn from(knots: Knots) -> Self {
        knots.to_meters_per_second()
    }
}

/// Celsius
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Celsius(#[serde(serialize_with = "round2")] pub f64);

/// Decibels (signal strength)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Decibels(#[serde(serialize_with = "round2")] pub f64);

/// Meters (altitude)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Meters(#[serde(serialize_with = "round2")] pub f64);

impl Meters {
    pub fn as_kilometers(&self) -> f64 {
        self.0 / 1000.0
    }
}

/// Inclusive value range for a channel or a random walk
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Clamp `value` into the range. NaN collapses to `min`.
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.min;
        }
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}
