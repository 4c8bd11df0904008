//! Exponential smoothing models.
//!
//! Holt-Winters triple exponential smoothing with additive trend and
//! additive seasonality.

mod holt_winters;

pub use holt_winters::{forecast_seasonal, HoltWinters};
