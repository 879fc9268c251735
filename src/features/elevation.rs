use crate::features::error::ElevationError;
use serde::Deserialize;
use std::future::Future;

pub const DEFAULT_ELEVATION_API_URL: &str = "https://api.opentopodata.org";
pub const DEFAULT_ELEVATION_DATASET: &str = "srtm90m";

/// A remote service that knows the terrain elevation at a coordinate.
pub trait ElevationLookup {
    /// Returns the elevation in meters.
    ///
    /// `Ok(None)` means the service answered but had no value for this coordinate,
    /// which callers treat the same as a failure.
    fn lookup_elevation(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> impl Future<Output = Result<Option<f64>, ElevationError>> + Send;
}

#[derive(Debug, Deserialize)]
struct ElevationResponse {
    results: Option<Vec<ElevationResult>>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ElevationResult {
    elevation: Option<f64>,
}

/// Client for Open Topo Data compatible elevation APIs.
///
/// Requests look like `GET {base_url}/v1/{dataset}?locations={lat},{lon}`.
#[derive(Debug, Clone)]
pub struct OpenTopoDataClient {
    client: reqwest::Client,
    base_url: String,
    dataset: String,
}

impl OpenTopoDataClient {
    pub fn new(client: reqwest::Client, base_url: &str, dataset: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            dataset: dataset.to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/{}", self.base_url, self.dataset)
    }
}

impl ElevationLookup for OpenTopoDataClient {
    async fn lookup_elevation(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<f64>, ElevationError> {
        let body: ElevationResponse = self
            .client
            .get(self.endpoint())
            .query(&[("locations", format!("{latitude},{longitude}"))])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(error) = body.error {
            return Err(ElevationError::MalformedResponse(error));
        }
        let results = body
            .results
            .ok_or_else(|| ElevationError::MalformedResponse("missing `results`".to_string()))?;

        Ok(results
            .first()
            .and_then(|result| result.elevation)
            .filter(|elevation| elevation.is_finite()))
    }
}
