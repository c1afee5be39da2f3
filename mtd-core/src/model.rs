//! Mission telemetry data model
//!
//! Defines the four telemetry channels, the live per-tick state, the partial
//! snapshots produced by source adapters, and the static source/vehicle
//! catalogs the display shell picks from.
//!
//! Every value written into [`LiveState`] is clamped to its channel bounds.
//! Out-of-range readings are never rejected.

use crate::error::MissionError;
use crate::units::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Channels
// =============================================================================

/// One of the four scalar telemetry quantities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Battery,
    Temperature,
    Signal,
    Velocity,
}

impl Channel {
    /// All channels, in export column order
    pub const ALL: [Channel; 4] = [
        Channel::Battery,
        Channel::Temperature,
        Channel::Signal,
        Channel::Velocity,
    ];

    /// Physical bounds every stored value must respect
    pub const fn bounds(self) -> Bounds {
        match self {
            Channel::Battery => Bounds::new(0.0, 100.0),
            Channel::Temperature => Bounds::new(-40.0, 95.0),
            Channel::Signal => Bounds::new(0.0, 60.0),
            Channel::Velocity => Bounds::new(0.0, 2400.0),
        }
    }

    /// Column / JSON key
    pub const fn key(self) -> &'static str {
        match self {
            Channel::Battery => "battery",
            Channel::Temperature => "temperature",
            Channel::Signal => "signal",
            Channel::Velocity => "velocity",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Channel::Battery => "Battery Voltage",
            Channel::Temperature => "Thermal Temp",
            Channel::Signal => "Signal Strength",
            Channel::Velocity => "Velocity",
        }
    }

    pub const fn unit(self) -> &'static str {
        match self {
            Channel::Battery => "V",
            Channel::Temperature => "C",
            Channel::Signal => "dB",
            Channel::Velocity => "m/s",
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Channel::Battery => 0,
            Channel::Temperature => 1,
            Channel::Signal => 2,
            Channel::Velocity => 3,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label(), self.unit())
    }
}

// =============================================================================
// Live state and snapshots
// =============================================================================

/// The four current scalar values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LiveState {
    pub battery: f64,
    pub temperature: f64,
    pub signal: f64,
    pub velocity: f64,
}

impl Default for LiveState {
    fn default() -> Self {
        Self {
            battery: 100.0,
            temperature: 22.0,
            signal: 35.0,
            velocity: 1200.0,
        }
    }
}

impl LiveState {
    pub fn get(&self, channel: Channel) -> f64 {
        match channel {
            Channel::Battery => self.battery,
            Channel::Temperature => self.temperature,
            Channel::Signal => self.signal,
            Channel::Velocity => self.velocity,
        }
    }

    /// Write a value, clamped to the channel bounds
    pub fn set(&mut self, channel: Channel, value: f64) {
        let value = channel.bounds().clamp(value);
        match channel {
            Channel::Battery => self.battery = value,
            Channel::Temperature => self.temperature = value,
            Channel::Signal => self.signal = value,
            Channel::Velocity => self.velocity = value,
        }
    }

    /// Overlay the fields a snapshot supplied. Absent fields keep their value.
    pub fn overlay(&mut self, snapshot: &Snapshot) {
        if let Some(MetersPerSecond(v)) = snapshot.velocity {
            self.set(Channel::Velocity, v);
        }
        if let Some(Celsius(t)) = snapshot.temperature {
            self.set(Channel::Temperature, t);
        }
        if let Some(Decibels(s)) = snapshot.signal {
            self.set(Channel::Signal, s);
        }
    }

    pub fn is_within_bounds(&self) -> bool {
        Channel::ALL
            .iter()
            .all(|c| c.bounds().contains(self.get(*c)))
    }
}

/// Partial telemetry reading from one adapter invocation
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub velocity: Option<MetersPerSecond>,
    pub temperature: Option<Celsius>,
    pub signal: Option<Decibels>,
}

impl Snapshot {
    pub fn with_velocity(mut self, velocity: MetersPerSecond) -> Self {
        self.velocity = Some(velocity);
        self
    }

    pub fn with_temperature(mut self, temperature: Celsius) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_signal(mut self, signal: Decibels) -> Self {
        self.signal = Some(signal);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.velocity.is_none() && self.temperature.is_none() && self.signal.is_none()
    }
}

// =============================================================================
// Modes, availability, sources, vehicles
// =============================================================================

/// What the display shows and whether snapshots are fused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataMode {
    Realtime,
    Historical,
}

impl fmt::Display for DataMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataMode::Realtime => write!(f, "Real-Time"),
            DataMode::Historical => write!(f, "Historical"),
        }
    }
}

impl FromStr for DataMode {
    type Err = MissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "realtime" | "real-time" | "real_time" => Ok(DataMode::Realtime),
            "historical" => Ok(DataMode::Historical),
            other => Err(MissionError::UnknownMode(other.to_string())),
        }
    }
}

/// Which modes a vehicle's data supports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataAvailability {
    RealtimeOnly,
    HistoricalOnly,
    Both,
}

impl DataAvailability {
    pub fn supports_realtime(self) -> bool {
        matches!(self, DataAvailability::RealtimeOnly | DataAvailability::Both)
    }

    pub fn supports_historical(self) -> bool {
        matches!(self, DataAvailability::HistoricalOnly | DataAvailability::Both)
    }

    pub fn supports(self, mode: DataMode) -> bool {
        match mode {
            DataMode::Realtime => self.supports_realtime(),
            DataMode::Historical => self.supports_historical(),
        }
    }

    /// Mode enabled when a vehicle with this availability is selected
    pub fn default_mode(self) -> DataMode {
        if self.supports_realtime() {
            DataMode::Realtime
        } else {
            DataMode::Historical
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            DataAvailability::Both => "This vehicle supports Real-Time and Historical data.",
            DataAvailability::RealtimeOnly => "This vehicle supports Real-Time data only.",
            DataAvailability::HistoricalOnly => "This vehicle supports Historical data only.",
        }
    }
}

/// Telemetry providers the shell can select
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DataSource {
    Simulated,
    IssTle,
    Opensky,
    Aishub,
    SpaceTrack,
    N2yo,
    AdsbExchange,
    Marinetraffic,
    Fleetmon,
    Noaa,
    OpenMeteo,
    NasaOpen,
    NasaInsight,
}

impl DataSource {
    pub const ALL: [DataSource; 13] = [
        DataSource::Simulated,
        DataSource::IssTle,
        DataSource::Opensky,
        DataSource::Aishub,
        DataSource::SpaceTrack,
        DataSource::N2yo,
        DataSource::AdsbExchange,
        DataSource::Marinetraffic,
        DataSource::Fleetmon,
        DataSource::Noaa,
        DataSource::OpenMeteo,
        DataSource::NasaOpen,
        DataSource::NasaInsight,
    ];

    /// Stable identifier used by the control API and configuration
    pub const fn key(self) -> &'static str {
        match self {
            DataSource::Simulated => "simulated",
            DataSource::IssTle => "iss-tle",
            DataSource::Opensky => "opensky",
            DataSource::Aishub => "aishub",
            DataSource::SpaceTrack => "space-track",
            DataSource::N2yo => "n2yo",
            DataSource::AdsbExchange => "adsb-exchange",
            DataSource::Marinetraffic => "marinetraffic",
            DataSource::Fleetmon => "fleetmon",
            DataSource::Noaa => "noaa",
            DataSource::OpenMeteo => "open-meteo",
            DataSource::NasaOpen => "nasa-open",
            DataSource::NasaInsight => "nasa-insight",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            DataSource::Simulated => "Simulated (Demo)",
            DataSource::IssTle => "ISS TLE (Celestrak)",
            DataSource::Opensky => "OpenSky (ADS-B)",
            DataSource::Aishub => "AIS Hub",
            DataSource::SpaceTrack => "Space-Track",
            DataSource::N2yo => "N2YO",
            DataSource::AdsbExchange => "ADS-B Exchange (RapidAPI)",
            DataSource::Marinetraffic => "MarineTraffic",
            DataSource::Fleetmon => "FleetMon",
            DataSource::Noaa => "NOAA",
            DataSource::OpenMeteo => "Open-Meteo",
            DataSource::NasaOpen => "NASA Open APIs",
            DataSource::NasaInsight => "NASA InSight (Archived)",
        }
    }

    /// Vehicles selectable while this source is active
    pub fn vehicles(self) -> Vec<Vehicle> {
        match self {
            DataSource::IssTle => vec![ISS],
            DataSource::Opensky => vec![AIRCRAFT],
            DataSource::Aishub => vec![VESSEL],
            _ => vec![ISS, AIRCRAFT, VESSEL, MARS_INSIGHT, DEEP_SPACE_PROBE],
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DataSource {
    type Err = MissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase().replace('_', "-");
        DataSource::ALL
            .into_iter()
            .find(|source| source.key() == needle)
            .ok_or_else(|| MissionError::UnknownSource(s.to_string()))
    }
}

/// Static vehicle descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Vehicle {
    pub id: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub availability: DataAvailability,
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.name, self.category)
    }
}

pub const ISS: Vehicle = Vehicle {
    id: "iss",
    name: "ISS (International Space Station)",
    category: "Satellite",
    availability: DataAvailability::Both,
};

pub const AIRCRAFT: Vehicle = Vehicle {
    id: "adsb-aircraft",
    name: "Commercial Aircraft (ADS-B)",
    category: "Aircraft",
    availability: DataAvailability::Both,
};

pub const VESSEL: Vehicle = Vehicle {
    id: "ais-vessel",
    name: "Cargo Vessel (AIS)",
    category: "Ship",
    availability: DataAvailability::Both,
};

pub const MARS_INSIGHT: Vehicle = Vehicle {
    id: "mars-insight",
    name: "Mars InSight Lander",
    category: "Planetary Lander",
    availability: DataAvailability::HistoricalOnly,
};

pub const DEEP_SPACE_PROBE: Vehicle = Vehicle {
    id: "deep-space-probe",
    name: "Deep-Space Probe (Public Archive)",
    category: "Spacecraft",
    availability: DataAvailability::HistoricalOnly,
};
