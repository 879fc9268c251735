//! Canned lookups for exercising the enricher without a network.
use crate::features::elevation::ElevationLookup;
use crate::features::error::{ElevationError, GeocodeError};
use crate::features::geocode::{AddressCandidate, AddressLookup};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

pub enum StubElevation {
    Value(f64),
    Empty,
    Fail,
    /// Never answers, so only the enricher's timeout ends the lookup.
    Hang,
}

impl ElevationLookup for StubElevation {
    async fn lookup_elevation(
        &self,
        _latitude: f64,
        _longitude: f64,
    ) -> Result<Option<f64>, ElevationError> {
        match self {
            StubElevation::Value(value) => Ok(Some(*value)),
            StubElevation::Empty => Ok(None),
            StubElevation::Fail => Err(ElevationError::MalformedResponse(
                "stubbed failure".to_string(),
            )),
            StubElevation::Hang => std::future::pending().await,
        }
    }
}

#[derive(Clone)]
enum GeocodeBehaviour {
    Candidates(Vec<AddressCandidate>),
    Fail,
    Hang,
}

/// Counts its calls so tests can assert that a lookup was skipped.
#[derive(Clone)]
pub struct StubGeocoder {
    behaviour: GeocodeBehaviour,
    calls: Arc<AtomicUsize>,
}

impl StubGeocoder {
    fn with(behaviour: GeocodeBehaviour) -> Self {
        Self {
            behaviour,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn googleplex() -> Self {
        Self::with(GeocodeBehaviour::Candidates(vec![AddressCandidate {
            name: Some("Googleplex".to_string()),
            city: Some("Mountain View".to_string()),
            region: Some("CA".to_string()),
            country: Some("USA".to_string()),
        }]))
    }

    pub fn empty() -> Self {
        Self::with(GeocodeBehaviour::Candidates(Vec::new()))
    }

    pub fn failing() -> Self {
        Self::with(GeocodeBehaviour::Fail)
    }

    pub fn hanging() -> Self {
        Self::with(GeocodeBehaviour::Hang)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl AddressLookup for StubGeocoder {
    async fn reverse_geocode(
        &self,
        _latitude: f64,
        _longitude: f64,
    ) -> Result<Vec<AddressCandidate>, GeocodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behaviour {
            GeocodeBehaviour::Candidates(candidates) => Ok(candidates.clone()),
            GeocodeBehaviour::Fail => Err(GeocodeError::MalformedResponse(
                "stubbed failure".to_string(),
            )),
            GeocodeBehaviour::Hang => std::future::pending().await,
        }
    }
}
