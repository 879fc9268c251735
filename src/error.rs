use thiserror::Error;

/// The primary error type for the location-enricher crate.
#[derive(Error, Debug)]
pub enum LocationEnricherError {
    #[error("Invalid position sample: {0}")]
    InvalidInput(#[from] crate::features::error::SampleError),

    #[error("Position source failed: {0}")]
    PositionSource(#[from] crate::features::error::PositionSourceError),

    // --- External Service Initialization Errors ---
    #[error("HTTP client could not be built")]
    Http(#[from] reqwest::Error),

    #[error("Unknown geocoder `{0}`, expected `offline` or `nominatim`")]
    UnknownGeocoder(String),
}
