//! Deterministic merge of a raw sample with the outcomes of its best-effort lookups.
use crate::features::error::{ElevationError, GeocodeError};
use crate::features::geocode::AddressCandidate;
use crate::structs::{
    ADDRESS_NOT_ATTEMPTED, ADDRESS_NOT_FOUND, ElevationSource, EnrichedLocation, RawPositionSample,
};

/// Joins the present parts of a candidate as `name, city, region, country`.
pub fn compose_address(candidate: &AddressCandidate) -> String {
    [
        &candidate.name,
        &candidate.city,
        &candidate.region,
        &candidate.country,
    ]
    .into_iter()
    .filter_map(|part| part.as_deref().map(str::trim))
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(", ")
}

/// Service value first, then device altitude, then nothing.
pub fn resolve_elevation(
    sample: &RawPositionSample,
    elevation: &Result<Option<f64>, ElevationError>,
) -> (Option<f64>, Option<ElevationSource>) {
    match elevation {
        Ok(Some(value)) if value.is_finite() => (Some(*value), Some(ElevationSource::Service)),
        _ => match sample.altitude {
            Some(altitude) => (Some(altitude), Some(ElevationSource::Device)),
            None => (None, None),
        },
    }
}

/// `address` is `None` when no lookup was attempted.
pub fn resolve_address(
    address: Option<&Result<Vec<AddressCandidate>, GeocodeError>>,
) -> Option<String> {
    match address {
        None => Some(ADDRESS_NOT_ATTEMPTED.to_string()),
        Some(Err(_)) => None,
        Some(Ok(candidates)) => {
            let composed = candidates
                .first()
                .map(compose_address)
                .filter(|composed| !composed.is_empty());
            Some(composed.unwrap_or_else(|| ADDRESS_NOT_FOUND.to_string()))
        }
    }
}

pub fn merge(
    sample: &RawPositionSample,
    elevation: &Result<Option<f64>, ElevationError>,
    address: Option<&Result<Vec<AddressCandidate>, GeocodeError>>,
) -> EnrichedLocation {
    let (elevation, elevation_source) = resolve_elevation(sample, elevation);

    EnrichedLocation {
        latitude: sample.latitude,
        longitude: sample.longitude,
        elevation,
        elevation_source,
        accuracy: sample.accuracy,
        address: resolve_address(address),
    }
}
