use crate::config::{DEFAULT_LOOKUP_TIMEOUT_SECS, EnricherConfig, GeocoderKind};
use crate::error::LocationEnricherError;
use crate::features::elevation::{ElevationLookup, OpenTopoDataClient};
use crate::features::error::{ElevationError, GeocodeError};
use crate::features::geocode::{
    AddressCandidate, AddressLookup, Geocoder, NominatimClient, OfflineGeocoder,
};
use crate::merge::merge;
use crate::structs::{EnrichOptions, EnrichedLocation, RawPositionSample};
use bon::bon;
use log::{debug, warn};
use std::time::Duration;
use tokio::time::timeout;

/// Turns raw position samples into enriched location records.
///
/// Elevation and address come from two independent, best-effort lookups that run
/// concurrently. Neither can make enrichment fail: a failed or empty elevation lookup
/// falls back to the device altitude, and a failed address lookup leaves the address
/// empty.
///
/// ```rust,no_run
/// # use location_enricher::{EnrichOptions, LocationEnricher, LocationEnricherError, RawPositionSample};
/// # use location_enricher::config::EnricherConfig;
/// # #[tokio::main]
/// # async fn main() -> Result<(), LocationEnricherError> {
/// let enricher = LocationEnricher::from_config(&EnricherConfig::default())?;
/// let sample = RawPositionSample::new(37.422, -122.084, Some(10.0), Some(5.0))?;
///
/// let record = enricher.enrich(&sample, EnrichOptions::foreground()).await?;
/// println!("{:?} m at {:?}", record.elevation, record.address);
/// # Ok(())
/// # }
/// ```
pub struct LocationEnricher<E, G> {
    elevation: E,
    geocoder: G,
    lookup_timeout: Duration,
}

#[bon]
impl<E: ElevationLookup, G: AddressLookup> LocationEnricher<E, G> {
    /// Constructs a `LocationEnricher` via a builder pattern.
    ///
    /// # Builder Arguments
    ///
    /// * `elevation: E` - The elevation service.
    /// * `geocoder: G` - The reverse geocoder used for foreground enrichment.
    /// * `lookup_timeout: Duration` - (Default: 10 seconds) Upper bound for each lookup.
    ///   An expired lookup is handled like any other failed lookup.
    #[builder]
    pub fn new(
        elevation: E,
        geocoder: G,
        #[builder(default = Duration::from_secs(DEFAULT_LOOKUP_TIMEOUT_SECS))]
        lookup_timeout: Duration,
    ) -> Self {
        Self {
            elevation,
            geocoder,
            lookup_timeout,
        }
    }

    /// Enriches one sample.
    ///
    /// With `options.resolve_address` unset the geocoder is never called and the address
    /// is the "not attempted" placeholder.
    ///
    /// # Errors
    ///
    /// Only [`LocationEnricherError::InvalidInput`], for a sample whose coordinates are
    /// non-finite or out of range. Lookup failures are logged and absorbed.
    pub async fn enrich(
        &self,
        sample: &RawPositionSample,
        options: EnrichOptions,
    ) -> Result<EnrichedLocation, LocationEnricherError> {
        sample.validate()?;

        let address_lookup = async {
            if options.resolve_address {
                Some(self.lookup_address(sample).await)
            } else {
                None
            }
        };
        let (elevation, address) = tokio::join!(self.lookup_elevation(sample), address_lookup);

        let record = merge(sample, &elevation, address.as_ref());
        debug!(
            "Enriched ({}, {}): elevation {:?} from {:?}, address {:?}",
            record.latitude,
            record.longitude,
            record.elevation,
            record.elevation_source,
            record.address
        );
        Ok(record)
    }

    async fn lookup_elevation(
        &self,
        sample: &RawPositionSample,
    ) -> Result<Option<f64>, ElevationError> {
        let lookup = self
            .elevation
            .lookup_elevation(sample.latitude, sample.longitude);
        let result = timeout(self.lookup_timeout, lookup)
            .await
            .unwrap_or(Err(ElevationError::Timeout));

        match &result {
            Ok(Some(_)) => {}
            Ok(None) => debug!(
                "Elevation service had no value for ({}, {}), using device altitude {:?}",
                sample.latitude, sample.longitude, sample.altitude
            ),
            Err(e) => warn!(
                "Elevation lookup for ({}, {}) failed, using device altitude {:?}: {e}",
                sample.latitude, sample.longitude, sample.altitude
            ),
        }
        result
    }

    async fn lookup_address(
        &self,
        sample: &RawPositionSample,
    ) -> Result<Vec<AddressCandidate>, GeocodeError> {
        let lookup = self
            .geocoder
            .reverse_geocode(sample.latitude, sample.longitude);
        let result = timeout(self.lookup_timeout, lookup)
            .await
            .unwrap_or(Err(GeocodeError::Timeout));

        match &result {
            Ok(candidates) if candidates.is_empty() => debug!(
                "No address found for ({}, {})",
                sample.latitude, sample.longitude
            ),
            Ok(_) => {}
            Err(e) => warn!(
                "Reverse geocoding for ({}, {}) failed: {e}",
                sample.latitude, sample.longitude
            ),
        }
        result
    }
}

impl LocationEnricher<OpenTopoDataClient, Geocoder> {
    /// Builds an enricher backed by the HTTP elevation service and the configured geocoder.
    ///
    /// # Errors
    ///
    /// Returns [`LocationEnricherError::Http`] if the HTTP client cannot be created.
    pub fn from_config(config: &EnricherConfig) -> Result<Self, LocationEnricherError> {
        let client = config.http_client()?;
        let elevation = OpenTopoDataClient::new(
            client.clone(),
            &config.elevation_api_url,
            &config.elevation_dataset,
        );
        let geocoder = match config.geocoder {
            GeocoderKind::Offline => Geocoder::Offline(OfflineGeocoder::new()),
            GeocoderKind::Nominatim => {
                Geocoder::Nominatim(NominatimClient::new(client, &config.nominatim_url))
            }
        };

        Ok(Self::builder()
            .elevation(elevation)
            .geocoder(geocoder)
            .lookup_timeout(config.lookup_timeout)
            .build())
    }
}
