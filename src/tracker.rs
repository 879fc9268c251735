//! Foreground and background trigger paths and their "latest record" slots.
use crate::error::LocationEnricherError;
use crate::features::elevation::ElevationLookup;
use crate::features::geocode::AddressLookup;
use crate::location_enricher::LocationEnricher;
use crate::position::PositionSource;
use crate::structs::{EnrichOptions, EnrichedLocation};
use futures::StreamExt;
use log::{info, warn};
use std::time::Duration;
use tokio::sync::{Mutex, watch};

/// How often and how far the device must move before a background update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundSchedule {
    pub interval: Duration,
    pub min_distance_m: f64,
}

impl Default for BackgroundSchedule {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            min_distance_m: 10.0,
        }
    }
}

/// Keeps the most recent foreground and background records apart.
///
/// Each slot has exactly one writer: [`LocationTracker::refresh_foreground`] writes the
/// foreground slot and [`LocationTracker::run_background`] the background slot. A second
/// call on the same path waits for the one in flight to finish.
pub struct LocationTracker<E, G> {
    enricher: LocationEnricher<E, G>,
    foreground: watch::Sender<Option<EnrichedLocation>>,
    background: watch::Sender<Option<EnrichedLocation>>,
    foreground_in_flight: Mutex<()>,
    background_in_flight: Mutex<()>,
}

impl<E: ElevationLookup, G: AddressLookup> LocationTracker<E, G> {
    pub fn new(enricher: LocationEnricher<E, G>) -> Self {
        Self {
            enricher,
            foreground: watch::Sender::new(None),
            background: watch::Sender::new(None),
            foreground_in_flight: Mutex::new(()),
            background_in_flight: Mutex::new(()),
        }
    }

    /// Reads the current position and enriches it with address resolution.
    ///
    /// # Errors
    ///
    /// Position-source failures and invalid samples are returned to the caller; the
    /// foreground slot keeps its previous record in that case.
    pub async fn refresh_foreground<S: PositionSource>(
        &self,
        source: &S,
    ) -> Result<EnrichedLocation, LocationEnricherError> {
        let _guard = self.foreground_in_flight.lock().await;
        let sample = source.current_position().await?;
        let record = self
            .enricher
            .enrich(&sample, EnrichOptions::foreground())
            .await?;
        self.foreground.send_replace(Some(record.clone()));
        Ok(record)
    }

    /// Enriches every sample of the source's subscription until it ends, without
    /// address resolution. Returns how many records were written.
    pub async fn run_background<S: PositionSource>(
        &self,
        source: &S,
        schedule: BackgroundSchedule,
    ) -> usize {
        let _guard = self.background_in_flight.lock().await;
        let mut updates = source.subscribe(schedule.interval, schedule.min_distance_m);
        let mut written = 0;

        while let Some(sample) = updates.next().await {
            match self
                .enricher
                .enrich(&sample, EnrichOptions::background())
                .await
            {
                Ok(record) => {
                    info!(
                        "Background update: ({}, {}) elevation {:?}",
                        record.latitude, record.longitude, record.elevation
                    );
                    self.background.send_replace(Some(record));
                    written += 1;
                }
                Err(e) => warn!("Skipping background sample: {e}"),
            }
        }
        written
    }

    pub fn latest_foreground(&self) -> Option<EnrichedLocation> {
        self.foreground.borrow().clone()
    }

    pub fn latest_background(&self) -> Option<EnrichedLocation> {
        self.background.borrow().clone()
    }

    /// Notified on every foreground write.
    pub fn watch_foreground(&self) -> watch::Receiver<Option<EnrichedLocation>> {
        self.foreground.subscribe()
    }

    /// Notified on every background write.
    pub fn watch_background(&self) -> watch::Receiver<Option<EnrichedLocation>> {
        self.background.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::error::PositionSourceError;
    use crate::position::{FixedPositionSource, ReplayPositionSource};
    use crate::structs::{ADDRESS_NOT_ATTEMPTED, RawPositionSample};
    use crate::test_support::{StubElevation, StubGeocoder};
    use futures::stream::BoxStream;

    fn at(latitude: f64, longitude: f64, altitude: Option<f64>) -> RawPositionSample {
        RawPositionSample {
            latitude,
            longitude,
            altitude,
            accuracy: Some(5.0),
        }
    }

    fn tracker(
        elevation: StubElevation,
        geocoder: StubGeocoder,
    ) -> LocationTracker<StubElevation, StubGeocoder> {
        LocationTracker::new(
            LocationEnricher::builder()
                .elevation(elevation)
                .geocoder(geocoder)
                .build(),
        )
    }

    struct BrokenSource;

    impl PositionSource for BrokenSource {
        async fn current_position(&self) -> Result<RawPositionSample, PositionSourceError> {
            Err(PositionSourceError::Empty)
        }

        fn subscribe(&self, _: Duration, _: f64) -> BoxStream<'static, RawPositionSample> {
            futures::stream::empty().boxed()
        }
    }

    #[tokio::test]
    async fn test_foreground_refresh_fills_only_foreground_slot() {
        let tracker = tracker(StubElevation::Value(12.3), StubGeocoder::googleplex());
        let source = FixedPositionSource::new(at(37.422, -122.084, Some(10.0)));

        let record = tracker.refresh_foreground(&source).await.unwrap();

        assert_eq!(
            record.address.as_deref(),
            Some("Googleplex, Mountain View, CA, USA")
        );
        assert_eq!(tracker.latest_foreground(), Some(record));
        assert_eq!(tracker.latest_background(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_background_run_fills_only_background_slot() {
        let geocoder = StubGeocoder::googleplex();
        let tracker = tracker(StubElevation::Fail, geocoder.clone());
        let source = ReplayPositionSource::new(vec![
            at(37.0, -122.0, Some(1.0)),
            at(37.01, -122.0, Some(2.0)),
            at(37.02, -122.0, Some(3.0)),
        ])
        .unwrap();

        let written = tracker
            .run_background(&source, BackgroundSchedule::default())
            .await;

        assert_eq!(written, 3);
        let latest = tracker.latest_background().unwrap();
        assert_eq!(latest.latitude, 37.02);
        assert_eq!(latest.elevation, Some(3.0));
        assert_eq!(latest.address.as_deref(), Some(ADDRESS_NOT_ATTEMPTED));
        assert_eq!(tracker.latest_foreground(), None);
        assert_eq!(geocoder.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slots_stay_independent() {
        let tracker = tracker(StubElevation::Value(50.0), StubGeocoder::googleplex());
        let here = FixedPositionSource::new(at(37.422, -122.084, None));
        let track = ReplayPositionSource::new(vec![at(1.0, 1.0, None)]).unwrap();

        let foreground = tracker.refresh_foreground(&here).await.unwrap();
        tracker
            .run_background(&track, BackgroundSchedule::default())
            .await;

        assert_eq!(tracker.latest_foreground(), Some(foreground));
        assert_eq!(tracker.latest_background().unwrap().latitude, 1.0);
    }

    #[tokio::test]
    async fn test_position_source_failure_is_returned() {
        let tracker = tracker(StubElevation::Value(1.0), StubGeocoder::googleplex());

        let result = tracker.refresh_foreground(&BrokenSource).await;

        assert!(matches!(
            result,
            Err(LocationEnricherError::PositionSource(
                PositionSourceError::Empty
            ))
        ));
        assert_eq!(tracker.latest_foreground(), None);
    }

    #[tokio::test]
    async fn test_watchers_see_foreground_updates() {
        let tracker = tracker(StubElevation::Value(1.0), StubGeocoder::empty());
        let mut watcher = tracker.watch_foreground();
        let source = FixedPositionSource::new(at(10.0, 10.0, None));

        tracker.refresh_foreground(&source).await.unwrap();

        assert!(watcher.has_changed().unwrap());
        assert_eq!(watcher.borrow_and_update().as_ref().unwrap().latitude, 10.0);
    }
}
