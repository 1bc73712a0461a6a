//! Error types.
//!
//! Only caller mistakes surface as errors. Degenerate ranges and pointer
//! misses are ordinary outcomes and are expressed with `Option`.

use thiserror::Error;

use crate::series::SeriesId;

/// Errors raised while constructing a series from raw arrays.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    /// Timestamp and value arrays differ in length.
    #[error("timestamps ({timestamps}) and values ({values}) differ in length")]
    LengthMismatch {
        /// Number of timestamps.
        timestamps: usize,
        /// Number of values.
        values: usize,
    },
    /// A timestamp is smaller than its predecessor.
    #[error("timestamp {current} at index {index} precedes {previous}")]
    NonMonotonic {
        /// Index of the offending sample.
        index: usize,
        /// Timestamp of the previous sample.
        previous: f64,
        /// Timestamp of the offending sample.
        current: f64,
    },
    /// A timestamp is NaN or infinite.
    #[error("timestamp at index {index} is not finite")]
    NonFiniteTimestamp {
        /// Index of the offending sample.
        index: usize,
    },
}

/// Errors raised by view operations that name a series.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    /// The view owns no series with this identifier.
    #[error("unknown series {0:?}")]
    UnknownSeries(SeriesId),
}

/// Errors raised while decoding a binary series batch.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WireError {
    /// The buffer ended before a record was complete.
    #[error("truncated series record: needed {needed} bytes, {remaining} remaining")]
    Truncated {
        /// Bytes required by the current field.
        needed: usize,
        /// Bytes left in the buffer.
        remaining: usize,
    },
    /// The decoded arrays do not form a valid series.
    #[error("invalid series in batch: {0}")]
    Series(#[from] SeriesError),
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML document could not be parsed into a config.
    #[error("invalid view config: {0}")]
    Toml(#[from] toml::de::Error),
}
