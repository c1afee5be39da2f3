//! Provider-specific telemetry adapters for Mission Telemetry
//!
//! The set of providers is closed: [`Adapter`] holds one variant per
//! implemented provider and is built from a [`DataSource`] tag. Catalog-only
//! providers fall back to the no-op simulated adapter.

pub mod aishub;
pub mod celestrak;
pub mod http;
pub mod opensky;
pub mod simulated;

pub use aishub::AisHubAdapter;
pub use celestrak::CelestrakAdapter;
pub use http::Fetcher;
pub use opensky::OpenSkyAdapter;
pub use simulated::{NoiseModel, SimulatedAdapter, Simulator};

use mtd_core::{
    adapter::SourceAdapter,
    model::{DataSource, Snapshot},
};

/// Credentials and knobs adapters need at construction
#[derive(Debug, Clone, Default)]
pub struct AdapterSettings {
    pub aishub_username: Option<String>,
    /// Provider URL overrides, e.g. a caching proxy. `None` uses the public
    /// service.
    pub celestrak_url: Option<String>,
    pub opensky_url: Option<String>,
    pub aishub_endpoint: Option<String>,
}

/// Adapter bound to a data source, dispatched by tag
#[derive(Debug, Clone)]
pub enum Adapter {
    Simulated(SimulatedAdapter),
    Celestrak(CelestrakAdapter),
    OpenSky(OpenSkyAdapter),
    AisHub(AisHubAdapter),
}

impl Adapter {
    pub fn for_source(source: DataSource, settings: &AdapterSettings) -> Self {
        match source {
            DataSource::IssTle => Adapter::Celestrak(match &settings.celestrak_url {
                Some(url) => CelestrakAdapter::with_url(url.as_str()),
                None => CelestrakAdapter::new(),
            }),
            DataSource::Opensky => Adapter::OpenSky(match &settings.opensky_url {
                Some(url) => OpenSkyAdapter::with_url(url.as_str()),
                None => OpenSkyAdapter::new(),
            }),
            DataSource::Aishub => {
                let adapter = AisHubAdapter::new(settings.aishub_username.clone());
                Adapter::AisHub(match &settings.aishub_endpoint {
                    Some(endpoint) => adapter.with_endpoint(endpoint.as_str()),
                    None => adapter,
                })
            }
            other => Adapter::Simulated(SimulatedAdapter::standing_in_for(other)),
        }
    }

    fn inner(&self) -> &dyn SourceAdapter {
        match self {
            Adapter::Simulated(a) => a,
            Adapter::Celestrak(a) => a,
            Adapter::OpenSky(a) => a,
            Adapter::AisHub(a) => a,
        }
    }

    /// Whether this source talks to a provider at all
    pub fn is_live(&self) -> bool {
        !matches!(self, Adapter::Simulated(_))
    }
}

impl SourceAdapter for Adapter {
    fn source(&self) -> DataSource {
        self.inner().source()
    }

    fn name(&self) -> &str {
        self.inner().name()
    }

    fn request_url(&self) -> Option<String> {
        self.inner().request_url()
    }

    fn parse(&self, body: &str) -> Option<Snapshot> {
        self.inner().parse(body)
    }
}
