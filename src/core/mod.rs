//! Core data structures for time series forecasting.

mod forecast;
mod time_series;

pub use forecast::{forecast_dates, AdjustedForecast, RawForecast};
pub use time_series::{MissingValuePolicy, TimeSeries};
