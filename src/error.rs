//! Error types for the traffic-forecast library.

use thiserror::Error;

/// Result type alias for forecast operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors that can occur while ingesting, forecasting or exporting.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Input table could not be turned into a numeric time series.
    #[error("malformed series: {0}")]
    MalformedSeries(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Timestamp-related error.
    #[error("timestamp error: {0}")]
    TimestampError(String),

    /// Model has not been fitted yet.
    #[error("model must be fitted before prediction")]
    FitRequired,

    /// Missing values detected when not allowed.
    #[error("missing values detected in data")]
    MissingValues,

    /// Input or output file could not be accessed.
    #[error("i/o error: {0}")]
    Io(String),

    /// Parameter file could not be read or parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// Output table could not be serialized.
    #[error("export error: {0}")]
    Export(String),
}
