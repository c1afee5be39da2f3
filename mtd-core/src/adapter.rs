//! Source adapter trait definition

use crate::model::{DataSource, Snapshot};

/// Trait for provider-specific telemetry adapters
///
/// Each adapter is responsible for:
/// - Naming the single request it needs (or none, when it has nothing to fetch
///   or is missing a credential)
/// - Converting the provider payload into a partial [`Snapshot`] in canonical
///   units, leaving out anything the provider cannot supply
///
/// Transport is handled by the caller so parsing stays pure and testable.
pub trait SourceAdapter: Send + Sync {
    /// The source this adapter is bound to
    fn source(&self) -> DataSource;

    /// Get the display name of this adapter (e.g., "OpenSky (ADS-B)")
    fn name(&self) -> &str {
        self.source().label()
    }

    /// URL to GET, or `None` to skip I/O entirely this poll
    fn request_url(&self) -> Option<String>;

    /// Normalize a response body
    ///
    /// Returns `None` for short, malformed or otherwise unusable payloads.
    fn parse(&self, body: &str) -> Option<Snapshot>;
}
