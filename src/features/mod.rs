//! Per-concern building blocks: sample validation and the two external lookups.
pub mod elevation;
pub mod error;
pub mod geocode;
pub mod sample;
