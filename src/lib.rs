//! # Location Enricher
//!
//! Turn raw GPS position samples into enriched location records.
//!
//! A sample from the device location provider carries a latitude, a longitude and,
//! optionally, a device-reported altitude and accuracy. Enrichment adds two derived
//! fields from external services:
//!
//! - **Elevation**: terrain elevation from an Open Topo Data compatible HTTP service.
//!   When the service fails, times out or has no value, the device altitude is used.
//! - **Address**: a human-readable address from a reverse geocoder, either the bundled
//!   offline GeoNames dataset or Nominatim. Only foreground enrichment resolves an
//!   address; background updates get a fixed placeholder instead.
//!
//! Both lookups run concurrently and neither can make enrichment fail.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use location_enricher::config::EnricherConfig;
//! use location_enricher::{EnrichOptions, LocationEnricher, RawPositionSample};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let enricher = LocationEnricher::from_config(&EnricherConfig::from_env_or_default()?)?;
//!     let sample = RawPositionSample::new(37.422, -122.084, Some(10.0), Some(5.0))?;
//!
//!     let record = enricher.enrich(&sample, EnrichOptions::foreground()).await?;
//!
//!     println!("Elevation: {:?}", record.elevation);
//!     println!("Address: {:?}", record.address);
//!
//!     Ok(())
//! }
//! ```

pub mod config;
mod error;
pub mod features;
pub mod location_enricher;
pub mod logging;
pub mod merge;
pub mod position;
pub mod structs;
#[cfg(test)]
mod test_support;
pub mod tracker;

pub use error::LocationEnricherError;
pub use location_enricher::LocationEnricher;
pub use structs::{
    ADDRESS_NOT_ATTEMPTED, ADDRESS_NOT_FOUND, ElevationSource, EnrichOptions, EnrichedLocation,
    RawPositionSample,
};
pub use tracker::{BackgroundSchedule, LocationTracker};
