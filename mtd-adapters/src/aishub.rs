//! Vessel adapter: AIS Hub web service
//!
//! Requires an AIS Hub username. Without one the adapter is inert and never
//! touches the network. Only speed over ground is used.

use mtd_core::{
    adapter::SourceAdapter,
    model::{DataSource, Snapshot},
    units::*,
};
use regex::Regex;
use std::sync::LazyLock;

pub const AISHUB_ENDPOINT: &str = "https://data.aishub.net/ws.php";

static SPEED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""SPEED"\s*:\s*([0-9.]+)"#).expect("valid speed regex"));

#[derive(Debug, Clone)]
pub struct AisHubAdapter {
    username: Option<String>,
    endpoint: String,
}

impl AisHubAdapter {
    pub fn new(username: Option<String>) -> Self {
        let username = username
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());
        Self {
            username,
            endpoint: AISHUB_ENDPOINT.to_string(),
        }
    }

    /// Query `endpoint` instead of the public web service
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn has_credential(&self) -> bool {
        self.username.is_some()
    }
}

/// First `"SPEED"` value in the payload, in knots
pub fn parse_speed_knots(body: &str) -> Option<Knots> {
    let caps = SPEED_RE.captures(body)?;
    caps.get(1)?.as_str().parse().ok().map(Knots)
}

impl SourceAdapter for AisHubAdapter {
    fn source(&self) -> DataSource {
        DataSource::Aishub
    }

    fn request_url(&self) -> Option<String> {
        let username = self.username.as_deref()?;
        Some(format!(
            "{}?username={}&format=1&output=json",
            self.endpoint,
            urlencoding::encode(username)
        ))
    }

    fn parse(&self, body: &str) -> Option<Snapshot> {
        let speed = parse_speed_knots(body)?;
        Some(Snapshot::default().with_velocity(speed.into()))
    }
}
