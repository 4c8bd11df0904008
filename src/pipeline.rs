//! End-to-end forecast run: fit, estimate sensitivity, adjust, assemble.

use crate::adjustment::{adjust_forecast, estimate_sensitivity, is_active, SensitivityCoefficient};
use crate::config::ForecastParameters;
use crate::core::{AdjustedForecast, TimeSeries};
use crate::error::{ForecastError, Result};
use crate::models::forecast_seasonal;
use crate::output::{OutputTable, Summary};
use chrono::Duration;
use tracing::{debug, info, warn};

/// Everything a run produces.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineReport {
    /// Raw and adjusted forecast for the requested horizon.
    pub forecast: AdjustedForecast,
    /// Estimated traffic per customer.
    pub coefficient: SensitivityCoefficient,
    /// Customer change the adjustment was computed for.
    pub forecast_customer_change: f64,
    /// False when the adjusted forecast is a copy of the raw forecast.
    pub adjustment_applied: bool,
    /// History followed by the forecast.
    pub table: OutputTable,
}

impl PipelineReport {
    pub fn summary(&self) -> Summary {
        Summary {
            coefficient: self.coefficient,
            forecast_customer_change: self.forecast_customer_change,
            adjustment_applied: self.adjustment_applied,
        }
    }
}

/// Run the full forecast for one series.
///
/// Every run is independent: the model is refitted from scratch and no
/// state is kept between calls.
///
/// # Errors
/// * `InvalidParameter` if `params` fail validation.
/// * `InsufficientData` if the series (after missing-value handling) has
///   fewer than `2 * seasonal_periods` observations.
/// * `MissingValues` if the series has gaps and the policy is `Error`.
pub fn run(series: &TimeSeries, params: &ForecastParameters) -> Result<PipelineReport> {
    params.validate()?;
    if series.is_empty() {
        return Err(ForecastError::EmptyData);
    }

    let clean = series.sanitized(params.missing_values)?;
    if clean.len() < params.required_observations() {
        return Err(ForecastError::InsufficientData {
            needed: params.required_observations(),
            got: clean.len(),
        });
    }

    match clean.infer_frequency(0.5) {
        Ok(spacing) if spacing != Duration::days(1) => warn!(
            spacing_secs = spacing.num_seconds(),
            "series is not daily; forecast dates are still laid out per day"
        ),
        Ok(_) => {}
        Err(e) => warn!(error = %e, "could not infer series spacing"),
    }

    info!(
        observations = clean.len(),
        seasonal_periods = params.seasonal_periods,
        horizon = params.forecast_horizon_days,
        "fitting seasonal model"
    );
    let fitted = forecast_seasonal(&clean, params.seasonal_periods, params.forecast_horizon_days)?;
    // Dropped trailing gaps must not pull the forecast back into the history.
    let last_observed = series.last_timestamp().ok_or(ForecastError::EmptyData)?;
    let raw = fitted.redated_after(last_observed);

    let coefficient = estimate_sensitivity(
        series,
        params.historical_customer_change,
        params.sensitivity_window,
    );
    let adjustment_applied = is_active(coefficient, params.forecast_customer_change);
    debug!(
        coefficient = coefficient.value(),
        adjustment_applied, "estimated customer sensitivity"
    );

    let forecast = adjust_forecast(&raw, coefficient, params.forecast_customer_change)?;
    let table = OutputTable::assemble(series, &forecast);

    info!(rows = table.len(), adjustment_applied, "forecast complete");

    Ok(PipelineReport {
        forecast,
        coefficient,
        forecast_customer_change: params.forecast_customer_change,
        adjustment_applied,
        table,
    })
}
