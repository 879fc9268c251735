use serde::{Deserialize, Serialize};

/// Address shown when enrichment ran without attempting a reverse-geocoding lookup.
pub const ADDRESS_NOT_ATTEMPTED: &str = "Address not available in background";

/// Address shown when the geocoder answered but had no candidates for the position.
pub const ADDRESS_NOT_FOUND: &str = "Address not found";

/// An unprocessed reading from the device location provider.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPositionSample {
    /// Degrees, within `[-90, 90]`.
    pub latitude: f64,
    /// Degrees, within `[-180, 180]`.
    pub longitude: f64,
    /// Device-reported altitude in meters.
    pub altitude: Option<f64>,
    /// Radius of uncertainty in meters.
    pub accuracy: Option<f64>,
}

/// Where the `elevation` of an [`EnrichedLocation`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum ElevationSource {
    /// The external elevation service answered with a usable value.
    Service,
    /// The service was unavailable, so the device-reported altitude was used.
    Device,
}

/// The output of a single enrichment.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedLocation {
    pub latitude: f64,
    pub longitude: f64,
    /// Elevation in meters, `None` when neither the service nor the device had one.
    pub elevation: Option<f64>,
    pub elevation_source: Option<ElevationSource>,
    pub accuracy: Option<f64>,
    /// Human-readable address, one of the placeholder constants, or `None` when the
    /// lookup was attempted and failed.
    pub address: Option<String>,
}

/// Per-call switches for [`crate::LocationEnricher::enrich`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrichOptions {
    pub resolve_address: bool,
}

impl EnrichOptions {
    /// On-demand refresh with a UI attached; resolves the address.
    pub const fn foreground() -> Self {
        Self {
            resolve_address: true,
        }
    }

    /// Periodic update with no UI attached; skips address resolution.
    pub const fn background() -> Self {
        Self {
            resolve_address: false,
        }
    }
}
