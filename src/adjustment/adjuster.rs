//! Cumulative customer-driven correction of a raw forecast.

use super::SensitivityCoefficient;
use crate::core::{AdjustedForecast, RawForecast};
use crate::error::Result;

/// Per-period adjustment for a customer change spread evenly over `horizon`.
///
/// Period `i` (1-based) carries `i * (forecast_customer_change / horizon) * coefficient`,
/// so the correction grows linearly and peaks at the end of the horizon.
pub fn adjustment_ramp(
    horizon: usize,
    forecast_customer_change: f64,
    coefficient: SensitivityCoefficient,
) -> Vec<f64> {
    if horizon == 0 {
        return Vec::new();
    }
    let daily_change = forecast_customer_change / horizon as f64;
    (1..=horizon)
        .map(|i| i as f64 * daily_change * coefficient.value())
        .collect()
}

/// Apply the customer adjustment to a raw forecast.
///
/// With no change signal (`forecast_customer_change == 0` or a zero
/// coefficient) the adjusted values are an exact copy of the raw values.
/// Otherwise each adjusted value is `max(0, raw_i - adjustment_i)`.
pub fn adjust_forecast(
    raw: &RawForecast,
    coefficient: SensitivityCoefficient,
    forecast_customer_change: f64,
) -> Result<AdjustedForecast> {
    if !is_active(coefficient, forecast_customer_change) {
        return Ok(AdjustedForecast::unadjusted(raw));
    }

    let ramp = adjustment_ramp(raw.horizon(), forecast_customer_change, coefficient);
    let adjusted = raw
        .values()
        .iter()
        .zip(&ramp)
        .map(|(value, adjustment)| (value - adjustment).max(0.0))
        .collect();

    AdjustedForecast::new(raw, adjusted)
}

/// Whether an adjustment would change anything.
pub fn is_active(coefficient: SensitivityCoefficient, forecast_customer_change: f64) -> bool {
    forecast_customer_change != 0.0 && !coefficient.is_zero()
}
