//! Server configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional TOML
//! file, then `MTD_*` environment variables.
//!
//! | Key                  | Env var                  | Default          |
//! |----------------------|--------------------------|------------------|
//! | `bind_addr`          | `MTD_BIND_ADDR`          | `0.0.0.0:9100`   |
//! | `tick_interval_ms`   | `MTD_TICK_INTERVAL_MS`   | `1000`           |
//! | `poll_interval_secs` | `MTD_POLL_INTERVAL_SECS` | `15`             |
//! | `connect_timeout_secs` | `MTD_CONNECT_TIMEOUT_SECS` | `8`          |
//! | `read_timeout_secs`  | `MTD_READ_TIMEOUT_SECS`  | `8`              |
//! | `initial_source`     | `MTD_INITIAL_SOURCE`     | `simulated`      |
//! | `aishub_username`    | `MTD_AISHUB_USERNAME`    | unset            |
//! | `celestrak_url`      | `MTD_CELESTRAK_URL`      | public service   |
//! | `opensky_url`        | `MTD_OPENSKY_URL`        | public service   |
//! | `aishub_endpoint`    | `MTD_AISHUB_ENDPOINT`    | public service   |
//! | `export_dir`         | `MTD_EXPORT_DIR`         | data dir         |
//! | `seed`               | `MTD_SEED`               | unset (entropy)  |

use anyhow::{ensure, Context, Result};
use mtd_adapters::AdapterSettings;
use mtd_core::model::DataSource;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Config file looked up in the working directory when `MTD_CONFIG` is unset
pub const DEFAULT_CONFIG_FILE: &str = "mission-telemetry";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub bind_addr: SocketAddr,
    pub tick_interval_ms: u64,
    pub poll_interval_secs: u64,
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
    pub initial_source: DataSource,
    #[serde(default)]
    pub aishub_username: Option<String>,
    #[serde(default)]
    pub celestrak_url: Option<String>,
    #[serde(default)]
    pub opensky_url: Option<String>,
    #[serde(default)]
    pub aishub_endpoint: Option<String>,
    #[serde(default)]
    pub export_dir: Option<PathBuf>,
    /// Fixed simulator seed for reproducible runs
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Settings {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    pub fn adapter_settings(&self) -> AdapterSettings {
        AdapterSettings {
            aishub_username: self.aishub_username.clone(),
            celestrak_url: self.celestrak_url.clone(),
            opensky_url: self.opensky_url.clone(),
            aishub_endpoint: self.aishub_endpoint.clone(),
        }
    }

    /// Directory relative export paths resolve against
    pub fn export_dir(&self) -> PathBuf {
        self.export_dir
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join("mission-telemetry")))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    fn validate(self) -> Result<Self> {
        ensure!(self.tick_interval_ms > 0, "tick_interval_ms must be positive");
        ensure!(self.poll_interval_secs > 0, "poll_interval_secs must be positive");
        ensure!(self.connect_timeout_secs > 0, "connect_timeout_secs must be positive");
        ensure!(self.read_timeout_secs > 0, "read_timeout_secs must be positive");
        Ok(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 9100)),
            tick_interval_ms: 1000,
            poll_interval_secs: 15,
            connect_timeout_secs: 8,
            read_timeout_secs: 8,
            initial_source: DataSource::Simulated,
            aishub_username: None,
            celestrak_url: None,
            opensky_url: None,
            aishub_endpoint: None,
            export_dir: None,
            seed: None,
        }
    }
}

fn builder_with_defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
    Ok(config::Config::builder()
        .set_default("bind_addr", "0.0.0.0:9100")?
        .set_default("tick_interval_ms", 1000)?
        .set_default("poll_interval_secs", 15)?
        .set_default("connect_timeout_secs", 8)?
        .set_default("read_timeout_secs", 8)?
        .set_default("initial_source", "simulated")?)
}

/// Load settings from `MTD_CONFIG` (or `mission-telemetry.toml`) and the
/// environment
pub fn load_settings() -> Result<Settings> {
    let file = std::env::var("MTD_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
    load_settings_from(&file)
}

pub fn load_settings_from(file: &str) -> Result<Settings> {
    let settings: Settings = builder_with_defaults()?
        .add_source(config::File::with_name(file).required(false))
        .add_source(config::Environment::with_prefix("MTD"))
        .build()
        .context("failed to assemble configuration")?
        .try_deserialize()
        .context("invalid configuration")?;
    settings.validate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_when_file_missing() {
        let settings = load_settings_from("/nonexistent/mission-telemetry").unwrap();
        assert_eq!(settings.tick_interval(), Duration::from_secs(1));
        assert_eq!(settings.poll_interval(), Duration::from_secs(15));
        assert_eq!(settings.connect_timeout(), Duration::from_secs(8));
        assert_eq!(settings.initial_source, DataSource::Simulated);
        assert!(settings.aishub_username.is_none());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "poll_interval_secs = 30\ninitial_source = \"iss-tle\"\naishub_username = \"ops\"\nbind_addr = \"127.0.0.1:8088\"\nopensky_url = \"http://proxy.local/states\""
        )
        .unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let settings = load_settings_from(&path).unwrap();
        assert_eq!(settings.poll_interval_secs, 30);
        assert_eq!(settings.initial_source, DataSource::IssTle);
        assert_eq!(settings.adapter_settings().aishub_username.as_deref(), Some("ops"));
        assert_eq!(settings.bind_addr.port(), 8088);
        assert_eq!(
            settings.adapter_settings().opensky_url.as_deref(),
            Some("http://proxy.local/states")
        );
        assert!(settings.celestrak_url.is_none());
        assert_eq!(settings.tick_interval_ms, 1000);
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "tick_interval_ms = 0").unwrap();
        let path = file.path().to_str().unwrap().to_string();
        assert!(load_settings_from(&path).is_err());
    }

    #[test]
    fn test_export_dir_prefers_configured_path() {
        let settings = Settings {
            export_dir: Some(PathBuf::from("/tmp/exports")),
            ..Settings::default()
        };
        assert_eq!(settings.export_dir(), PathBuf::from("/tmp/exports"));
    }
}
