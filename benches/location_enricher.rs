use criterion::{Criterion, criterion_group, criterion_main};
use location_enricher::RawPositionSample;
use location_enricher::features::error::{ElevationError, GeocodeError};
use location_enricher::features::geocode::AddressCandidate;
use location_enricher::merge::merge;
use std::hint::black_box;

fn bench(c: &mut Criterion) {
    let sample = RawPositionSample {
        latitude: 37.422,
        longitude: -122.084,
        altitude: Some(10.0),
        accuracy: Some(5.0),
    };
    let elevation_ok: Result<Option<f64>, ElevationError> = Ok(Some(12.3));
    let elevation_failed: Result<Option<f64>, ElevationError> = Err(ElevationError::Timeout);
    let address: Result<Vec<AddressCandidate>, GeocodeError> = Ok(vec![AddressCandidate {
        name: Some("Googleplex".to_string()),
        city: Some("Mountain View".to_string()),
        region: Some("CA".to_string()),
        country: Some("USA".to_string()),
    }]);

    c.bench_function("merge::foreground", |b| {
        b.iter(|| merge(black_box(&sample), black_box(&elevation_ok), Some(&address)));
    });

    c.bench_function("merge::background_fallback", |b| {
        b.iter(|| merge(black_box(&sample), black_box(&elevation_failed), None));
    });
}

criterion_group!(benches, bench);
criterion_main!(benches);
