use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use location_enricher::config::{EnricherConfig, GeocoderKind};
use location_enricher::logging::{LogFormat, LogLevel, init_logger};
use location_enricher::position::{FixedPositionSource, PositionSource, ReplayPositionSource};
use location_enricher::{
    BackgroundSchedule, EnrichOptions, LocationEnricher, LocationTracker, RawPositionSample,
};
use log::info;
use serde_json::json;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(version, about = "Enrich GPS position samples with elevation and address")]
struct Cli {
    /// Overrides RUST_LOG for this crate; defaults to info when neither is set
    #[arg(long, value_enum, global = true)]
    log_level: Option<LogLevel>,

    #[arg(long, value_enum, default_value = "plain", global = true)]
    log_format: LogFormat,

    #[command(flatten)]
    services: ServiceArgs,

    #[command(subcommand)]
    command: Command,
}

/// Overrides for values otherwise taken from the environment.
#[derive(Args, Debug)]
struct ServiceArgs {
    /// Base URL of the elevation API
    #[arg(long, global = true)]
    elevation_url: Option<String>,

    /// Elevation dataset name, e.g. srtm90m or aster30m
    #[arg(long, global = true)]
    dataset: Option<String>,

    #[arg(long, value_enum, global = true)]
    geocoder: Option<GeocoderKind>,

    /// Timeout for each external lookup
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Enrich a single position and print the record
    Enrich {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        #[arg(long, allow_hyphen_values = true)]
        altitude: Option<f64>,
        #[arg(long)]
        accuracy: Option<f64>,
        /// Enrich as a background update (no address lookup)
        #[arg(long)]
        background: bool,
    },
    /// Replay a JSON-lines track as periodic background updates
    Watch {
        #[arg(long)]
        samples: PathBuf,
        #[arg(long, default_value_t = 5)]
        interval_secs: u64,
        #[arg(long, default_value_t = 10.0)]
        min_distance_m: f64,
    },
}

impl ServiceArgs {
    fn apply(&self, config: &mut EnricherConfig) {
        if let Some(url) = &self.elevation_url {
            config.elevation_api_url = url.clone();
        }
        if let Some(dataset) = &self.dataset {
            config.elevation_dataset = dataset.clone();
        }
        if let Some(geocoder) = self.geocoder {
            config.geocoder = geocoder;
        }
        if let Some(secs) = self.timeout_secs {
            config.lookup_timeout = Duration::from_secs(secs);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_logger(cli.log_level.map(Into::into), cli.log_format);

    let mut config = EnricherConfig::from_env_or_default()?;
    cli.services.apply(&mut config);
    let enricher = LocationEnricher::from_config(&config)?;

    match cli.command {
        Command::Enrich {
            lat,
            lon,
            altitude,
            accuracy,
            background,
        } => {
            let sample = RawPositionSample::new(lat, lon, altitude, accuracy)
                .context("Invalid position")?;
            let options = if background {
                EnrichOptions::background()
            } else {
                EnrichOptions::foreground()
            };
            let record = enricher.enrich(&sample, options).await?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Command::Watch {
            samples,
            interval_secs,
            min_distance_m,
        } => {
            let track = ReplayPositionSource::from_path(&samples)
                .await
                .with_context(|| format!("Could not load {}", samples.display()))?;
            let here = FixedPositionSource::new(track.current_position().await?);
            let tracker = LocationTracker::new(enricher);
            let schedule = BackgroundSchedule {
                interval: Duration::from_secs(interval_secs),
                min_distance_m,
            };

            let (written, foreground) = tokio::join!(
                tracker.run_background(&track, schedule),
                tracker.refresh_foreground(&here)
            );
            foreground?;
            info!(
                "Replayed {} samples, wrote {written} background records",
                track.samples().len()
            );

            let slots = json!({
                "foreground": tracker.latest_foreground(),
                "background": tracker.latest_background(),
            });
            println!("{}", serde_json::to_string_pretty(&slots)?);
        }
    }

    Ok(())
}
