use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum SampleError {
    #[error("Missing or non-numeric field: {0}")]
    MissingField(&'static str),

    #[error("Latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("Longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
}

#[derive(Error, Debug)]
pub enum ElevationError {
    #[error("Elevation request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Elevation service returned an unusable response: {0}")]
    MalformedResponse(String),

    #[error("Elevation lookup timed out")]
    Timeout,
}

#[derive(Error, Debug)]
pub enum GeocodeError {
    #[error("Reverse geocoding request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Reverse geocoding service returned an unusable response: {0}")]
    MalformedResponse(String),

    #[error("Reverse geocoding lookup timed out")]
    Timeout,
}

#[derive(Error, Debug)]
pub enum PositionSourceError {
    #[error("Could not read position samples")]
    Io(#[from] std::io::Error),

    #[error("Invalid position sample on line {line}: {source}")]
    InvalidSample { line: usize, source: SampleError },

    #[error("Position sample on line {line} is not valid JSON: {source}")]
    Json {
        line: usize,
        source: serde_json::Error,
    },

    #[error("The position source has no samples")]
    Empty,
}
