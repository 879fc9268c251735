//! Logger initialization for the command-line binary.

use clap::ValueEnum;
use log::LevelFilter;
use std::io::Write;

/// Verbosity of log output, from most restrictive to most verbose.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Log line layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// `LEVEL target: message`
    Plain,
    /// One JSON object per line
    Json,
}

/// Builds the logger configuration.
///
/// Defaults to `info` with HTTP internals kept at `info` or quieter. `rust_log`
/// directives (the `RUST_LOG` syntax) come next, and an explicit `level` wins over both
/// for this crate and the global default.
pub fn logger_builder(
    rust_log: Option<&str>,
    level: Option<LevelFilter>,
    format: LogFormat,
) -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(LevelFilter::Info);
    builder.filter_module("reqwest", LevelFilter::Info);
    builder.filter_module("hyper", LevelFilter::Info);
    builder.filter_module("hyper_util", LevelFilter::Info);
    builder.filter_module("rustls", LevelFilter::Warn);
    if let Some(directives) = rust_log {
        builder.parse_filters(directives);
    }
    if let Some(level) = level {
        builder.filter_level(level);
        builder.filter_module("location_enricher", level);
    }

    if format == LogFormat::Json {
        builder.format(|buf, record| {
            writeln!(
                buf,
                "{{\"ts\":{},\"level\":\"{}\",\"target\":\"{}\",\"msg\":{}}}",
                chrono::Utc::now().timestamp_millis(),
                record.level(),
                record.target(),
                serde_json::to_string(&record.args().to_string())
                    .unwrap_or_else(|_| "\"\"".into())
            )
        });
    }
    builder
}

/// Installs `env_logger` configured from `RUST_LOG` and the optional `--log-level`.
///
/// Calling this twice is harmless; the second call is ignored.
pub fn init_logger(level: Option<LevelFilter>, format: LogFormat) {
    let rust_log = std::env::var("RUST_LOG").ok();
    let _ = logger_builder(rust_log.as_deref(), level, format).try_init();
}
