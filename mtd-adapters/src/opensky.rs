//! Flight adapter: OpenSky Network ADS-B state vectors
//!
//! Only the first entry of the `states` array is used. Velocity comes
//! straight from the state vector; temperature and signal are estimated from
//! barometric altitude when the aircraft reports one.

use mtd_core::{
    adapter::SourceAdapter,
    model::{DataSource, Snapshot},
    units::*,
};
use serde_json::Value;

pub const OPENSKY_STATES_URL: &str = "https://opensky-network.org/api/states/all";

/// Minimum number of fields in a state vector
const STATE_VECTOR_LEN: usize = 14;
const BARO_ALTITUDE: usize = 7;
const VELOCITY: usize = 9;

/// ISA lapse rate, °C per km
const LAPSE_RATE_C_PER_KM: f64 = 6.5;
const SEA_LEVEL_TEMP_C: f64 = 15.0;

#[derive(Debug, Clone)]
pub struct OpenSkyAdapter {
    url: String,
}

impl OpenSkyAdapter {
    pub fn new() -> Self {
        Self::with_url(OPENSKY_STATES_URL)
    }

    pub fn with_url(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl Default for OpenSkyAdapter {
    fn default() -> Self {
        Self::new()
    }
}

/// First state vector in an OpenSky `/states/all` response
pub fn first_state(body: &str) -> Option<Vec<Value>> {
    let mut doc: Value = serde_json::from_str(body).ok()?;
    match doc.get_mut("states")?.as_array_mut()?.first_mut()?.take() {
        Value::Array(state) => Some(state),
        _ => None,
    }
}

/// Numbers may arrive as JSON numbers or numeric strings
fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl SourceAdapter for OpenSkyAdapter {
    fn source(&self) -> DataSource {
        DataSource::Opensky
    }

    fn request_url(&self) -> Option<String> {
        Some(self.url.clone())
    }

    fn parse(&self, body: &str) -> Option<Snapshot> {
        let state = first_state(body)?;
        if state.len() < STATE_VECTOR_LEN {
            return None;
        }

        let velocity = number(&state[VELOCITY])?;
        let mut snapshot = Snapshot::default().with_velocity(MetersPerSecond(velocity));

        // Null altitude is fine; anything else that is not a number spoils the row
        let altitude = match &state[BARO_ALTITUDE] {
            Value::Null => None,
            other => Some(Meters(number(other)?)),
        };

        if let Some(altitude) = altitude {
            let km = altitude.as_kilometers();
            snapshot = snapshot
                .with_temperature(Celsius(
                    (SEA_LEVEL_TEMP_C - km * LAPSE_RATE_C_PER_KM).clamp(-60.0, 40.0),
                ))
                .with_signal(Decibels((60.0 - km).clamp(5.0, 60.0)));
        }
        Some(snapshot)
    }
}
