use crate::features::error::GeocodeError;
use reverse_geocoder::ReverseGeocoder;
use serde::{Deserialize, Serialize};
use std::future::Future;

pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

/// One possible address for a coordinate, as returned by a reverse geocoder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressCandidate {
    pub name: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
}

/// A service that turns a coordinate into address candidates, best match first.
pub trait AddressLookup {
    fn reverse_geocode(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> impl Future<Output = Result<Vec<AddressCandidate>, GeocodeError>> + Send;
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Nearest-city lookup against the bundled GeoNames dataset. Never touches the network.
pub struct OfflineGeocoder {
    geocoder: ReverseGeocoder,
}

impl OfflineGeocoder {
    pub fn new() -> Self {
        Self {
            geocoder: ReverseGeocoder::new(),
        }
    }

    fn nearest(&self, latitude: f64, longitude: f64) -> AddressCandidate {
        let search_result = self.geocoder.search((latitude, longitude));
        let record = search_result.record;
        let country = rust_iso3166::from_alpha2(&record.cc)
            .map(|country| country.name.to_string())
            .or_else(|| non_empty(&record.cc));

        AddressCandidate {
            name: None,
            city: non_empty(&record.name),
            region: non_empty(&record.admin1),
            country,
        }
    }
}

impl Default for OfflineGeocoder {
    fn default() -> Self {
        Self::new()
    }
}

impl AddressLookup for OfflineGeocoder {
    async fn reverse_geocode(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<AddressCandidate>, GeocodeError> {
        Ok(vec![self.nearest(latitude, longitude)])
    }
}

#[derive(Debug, Deserialize)]
struct NominatimResponse {
    name: Option<String>,
    address: Option<NominatimAddress>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    state: Option<String>,
    country: Option<String>,
}

/// Client for the Nominatim `/reverse` endpoint.
#[derive(Debug, Clone)]
pub struct NominatimClient {
    client: reqwest::Client,
    base_url: String,
}

impl NominatimClient {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl AddressLookup for NominatimClient {
    async fn reverse_geocode(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<AddressCandidate>, GeocodeError> {
        let body: NominatimResponse = self
            .client
            .get(format!("{}/reverse", self.base_url))
            .query(&[
                ("format", "jsonv2".to_string()),
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        // Nominatim answers "Unable to geocode" with a 200 and an `error` field.
        if body.error.is_some() {
            return Ok(Vec::new());
        }
        let Some(address) = body.address else {
            return Err(GeocodeError::MalformedResponse(
                "missing `address`".to_string(),
            ));
        };

        Ok(vec![AddressCandidate {
            name: body.name.as_deref().and_then(non_empty),
            city: [address.city, address.town, address.village]
                .iter()
                .find_map(|place| place.as_deref().and_then(non_empty)),
            region: address.state.as_deref().and_then(non_empty),
            country: address.country.as_deref().and_then(non_empty),
        }])
    }
}

/// The geocoder picked at runtime from configuration.
pub enum Geocoder {
    Offline(OfflineGeocoder),
    Nominatim(NominatimClient),
}

impl AddressLookup for Geocoder {
    async fn reverse_geocode(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<AddressCandidate>, GeocodeError> {
        match self {
            Geocoder::Offline(geocoder) => geocoder.reverse_geocode(latitude, longitude).await,
            Geocoder::Nominatim(client) => client.reverse_geocode(latitude, longitude).await,
        }
    }
}
