//! # traffic-forecast
//!
//! Seasonal traffic forecasting with a customer-count adjustment.
//!
//! A daily traffic series is forecast with additive Holt-Winters smoothing.
//! A traffic-per-customer coefficient estimated from the history then turns
//! an expected change in customers into a linearly ramping correction of
//! the forecast.
//!
//! ```
//! use traffic_forecast::prelude::*;
//! use chrono::{Duration, TimeZone, Utc};
//!
//! let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let timestamps = (0..60).map(|i| base + Duration::days(i)).collect();
//! let values = (0..60).map(|i| 100.0 + i as f64).collect();
//! let series = TimeSeries::new(timestamps, values).unwrap();
//!
//! let params = ForecastParameters {
//!     seasonal_periods: 30,
//!     forecast_horizon_days: 10,
//!     historical_customer_change: 100_000.0,
//!     forecast_customer_change: 50_000.0,
//!     ..Default::default()
//! };
//!
//! let report = run(&series, &params).unwrap();
//! assert_eq!(report.forecast.horizon(), 10);
//! assert!((report.coefficient.value() + 0.00046).abs() < 1e-12);
//! ```

#![allow(clippy::needless_range_loop)]

pub mod adjustment;
pub mod config;
pub mod core;
pub mod error;
pub mod ingest;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod utils;

pub use error::{ForecastError, Result};

pub mod prelude {
    pub use crate::adjustment::SensitivityCoefficient;
    pub use crate::config::ForecastParameters;
    pub use crate::core::{AdjustedForecast, MissingValuePolicy, RawForecast, TimeSeries};
    pub use crate::error::{ForecastError, Result};
    pub use crate::models::Forecaster;
    pub use crate::output::{ExportFormat, OutputTable, Summary};
    pub use crate::pipeline::{run, PipelineReport};
}
