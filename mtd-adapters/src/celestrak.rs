//! Orbital adapter: ISS two-line element set from Celestrak
//!
//! Velocity is derived from the TLE mean motion assuming a circular orbit at
//! a fixed altitude. Temperature and signal are fixed figures for that orbit.

use mtd_core::{
    adapter::SourceAdapter,
    model::{DataSource, Snapshot},
    units::*,
};
use std::f64::consts::PI;

pub const CELESTRAK_ISS_URL: &str =
    "https://celestrak.org/NORAD/elements/gp.php?NAME=ISS%20(ZARYA)&FORMAT=TLE";

const EARTH_RADIUS_KM: f64 = 6371.0;
const ASSUMED_ALTITUDE_KM: f64 = 420.0;
const SECONDS_PER_DAY: f64 = 86_400.0;
const ORBIT_TEMPERATURE_C: f64 = -10.0;

/// Mean motion (revolutions per day) occupies columns 53-63 of TLE line 2
const MEAN_MOTION_COLUMNS: std::ops::Range<usize> = 52..63;

#[derive(Debug, Clone)]
pub struct CelestrakAdapter {
    url: String,
}

impl CelestrakAdapter {
    pub fn new() -> Self {
        Self::with_url(CELESTRAK_ISS_URL)
    }

    /// Fetch the TLE from a mirror instead of Celestrak
    pub fn with_url(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl Default for CelestrakAdapter {
    fn default() -> Self {
        Self::new()
    }
}

/// Orbital speed in m/s for a circular orbit completing `mean_motion`
/// revolutions per day at the assumed altitude
pub fn orbital_speed(mean_motion: f64) -> Option<MetersPerSecond> {
    if !(mean_motion.is_finite() && mean_motion > 0.0) {
        return None;
    }
    let period_seconds = SECONDS_PER_DAY / mean_motion;
    let radius_m = (EARTH_RADIUS_KM + ASSUMED_ALTITUDE_KM) * 1000.0;
    Some(MetersPerSecond(2.0 * PI * radius_m / period_seconds))
}

/// Extract the mean motion from a 3-line TLE record (name, line 1, line 2)
pub fn parse_mean_motion(tle: &str) -> Option<f64> {
    let line2 = tle.lines().nth(2)?.trim();
    line2.get(MEAN_MOTION_COLUMNS)?.trim().parse().ok()
}

impl SourceAdapter for CelestrakAdapter {
    fn source(&self) -> DataSource {
        DataSource::IssTle
    }

    fn request_url(&self) -> Option<String> {
        Some(self.url.clone())
    }

    fn parse(&self, body: &str) -> Option<Snapshot> {
        let speed = orbital_speed(parse_mean_motion(body)?)?;
        let signal = (60.0 - ASSUMED_ALTITUDE_KM * 0.08).clamp(5.0, 60.0);
        Some(
            Snapshot::default()
                .with_velocity(speed)
                .with_temperature(Celsius(ORBIT_TEMPERATURE_C))
                .with_signal(Decibels(signal)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ISS_TLE: &str = "ISS (ZARYA)\n\
1 25544U 98067A   24001.50000000  .00016717  00000-0  10270-3 0  9005\n\
2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.50000000 12345\n";

    #[test]
    fn test_parse_mean_motion() {
        assert_eq!(parse_mean_motion(ISS_TLE), Some(15.5));
    }

    #[test]
    fn test_parse_snapshot() {
        let snapshot = CelestrakAdapter::new().parse(ISS_TLE).unwrap();
        let expected = 2.0 * PI * 6_791_000.0 / (86_400.0 / 15.5);
        let v = snapshot.velocity.unwrap().0;
        assert!((v - expected).abs() < 1e-6, "{v} vs {expected}");
        assert!((v - 7654.6).abs() < 1.0);
        assert_eq!(snapshot.temperature, Some(Celsius(-10.0)));
        let signal = snapshot.signal.unwrap().0;
        assert!((signal - 26.4).abs() < 1e-9);
    }

    #[test]
    fn test_mirror_url() {
        assert_eq!(
            CelestrakAdapter::new().request_url().as_deref(),
            Some(CELESTRAK_ISS_URL)
        );
        let mirror = CelestrakAdapter::with_url("http://127.0.0.1:8080/iss.tle");
        assert_eq!(mirror.request_url().as_deref(), Some("http://127.0.0.1:8080/iss.tle"));
    }

    #[test]
    fn test_crlf_line_endings() {
        let crlf = ISS_TLE.replace('\n', "\r\n");
        assert_eq!(parse_mean_motion(&crlf), Some(15.5));
    }

    #[test]
    fn test_short_payloads_yield_none() {
        let adapter = CelestrakAdapter::new();
        assert!(adapter.parse("").is_none());
        assert!(adapter.parse("ISS (ZARYA)\n1 25544U\n").is_none());
        assert!(adapter.parse("ISS (ZARYA)\n1 25544U\n2 25544  51.6416\n").is_none());
    }

    #[test]
    fn test_garbage_mean_motion_yields_none() {
        let tle = "ISS\nline1\n2 25544  51.6416 247.4627 0006703 130.5360 325.0288 xx.yyyyyyyy 12345\n";
        assert!(CelestrakAdapter::new().parse(tle).is_none());
        assert!(orbital_speed(0.0).is_none());
        assert!(orbital_speed(-1.0).is_none());
    }
}
