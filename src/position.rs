//! Sources of raw position samples.
//!
//! The enricher never talks to a location provider itself; callers hand it samples
//! obtained from a [`PositionSource`]. Permission to read the position is assumed to
//! have been granted before a source is constructed.
use crate::features::error::PositionSourceError;
use crate::structs::RawPositionSample;
use futures::StreamExt;
use futures::stream::{self, BoxStream};
use serde_json::Value;
use std::future::Future;
use std::path::Path;
use std::time::Duration;
use tokio::time::{Interval, MissedTickBehavior, interval};

// The Earth's mean radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

pub trait PositionSource {
    /// A single on-demand reading.
    fn current_position(
        &self,
    ) -> impl Future<Output = Result<RawPositionSample, PositionSourceError>> + Send;

    /// Periodic readings, at most one per `interval`, skipping any reading that lies
    /// within `min_distance_m` meters of the previously emitted one.
    fn subscribe(
        &self,
        interval: Duration,
        min_distance_m: f64,
    ) -> BoxStream<'static, RawPositionSample>;
}

/// Great-circle distance in meters.
pub fn distance_m(a: &RawPositionSample, b: &RawPositionSample) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlng = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

fn throttled<I>(
    samples: I,
    period: Duration,
    min_distance_m: f64,
) -> BoxStream<'static, RawPositionSample>
where
    I: Iterator<Item = RawPositionSample> + Send + 'static,
{
    // tokio::time::interval panics on a zero period.
    let period = period.max(Duration::from_millis(1));
    let state: (I, Option<Interval>, Option<RawPositionSample>) = (samples, None, None);

    stream::unfold(state, move |(mut samples, mut ticker, mut last)| async move {
        // Created lazily so that subscribing does not require a running runtime.
        let ticks = ticker.get_or_insert_with(|| {
            let mut ticks = interval(period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticks
        });
        loop {
            ticks.tick().await;
            let sample = samples.next()?;
            if last.is_some_and(|previous| distance_m(&previous, &sample) < min_distance_m) {
                continue;
            }
            last = Some(sample);
            return Some((sample, (samples, ticker, last)));
        }
    })
    .boxed()
}

/// A device that never moves.
#[derive(Debug, Clone, Copy)]
pub struct FixedPositionSource {
    sample: RawPositionSample,
}

impl FixedPositionSource {
    pub fn new(sample: RawPositionSample) -> Self {
        Self { sample }
    }
}

impl PositionSource for FixedPositionSource {
    async fn current_position(&self) -> Result<RawPositionSample, PositionSourceError> {
        Ok(self.sample)
    }

    fn subscribe(
        &self,
        interval: Duration,
        min_distance_m: f64,
    ) -> BoxStream<'static, RawPositionSample> {
        throttled(std::iter::repeat(self.sample), interval, min_distance_m)
    }
}

/// Replays a recorded track, one JSON object per line.
///
/// The current position is the last sample of the track; a subscription replays the
/// whole track in order and ends after the last sample.
#[derive(Debug, Clone)]
pub struct ReplayPositionSource {
    samples: Vec<RawPositionSample>,
}

impl ReplayPositionSource {
    pub fn new(samples: Vec<RawPositionSample>) -> Result<Self, PositionSourceError> {
        if samples.is_empty() {
            return Err(PositionSourceError::Empty);
        }
        Ok(Self { samples })
    }

    /// Parses a JSON-lines track. Blank lines are ignored; line numbers start at 1.
    pub fn parse(contents: &str) -> Result<Self, PositionSourceError> {
        let samples = contents
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| {
                let line_number = index + 1;
                let value: Value =
                    serde_json::from_str(line).map_err(|source| PositionSourceError::Json {
                        line: line_number,
                        source,
                    })?;
                RawPositionSample::from_json(&value).map_err(|source| {
                    PositionSourceError::InvalidSample {
                        line: line_number,
                        source,
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(samples)
    }

    pub async fn from_path(path: &Path) -> Result<Self, PositionSourceError> {
        let contents = tokio::fs::read_to_string(path).await?;
        Self::parse(&contents)
    }

    pub fn samples(&self) -> &[RawPositionSample] {
        &self.samples
    }
}

impl PositionSource for ReplayPositionSource {
    async fn current_position(&self) -> Result<RawPositionSample, PositionSourceError> {
        self.samples.last().copied().ok_or(PositionSourceError::Empty)
    }

    fn subscribe(
        &self,
        interval: Duration,
        min_distance_m: f64,
    ) -> BoxStream<'static, RawPositionSample> {
        throttled(self.samples.clone().into_iter(), interval, min_distance_m)
    }
}
