//! Forecast run parameters.
//!
//! Parameters can be built in code, loaded from a TOML file, or both: any
//! field missing from the file keeps its default.
//!
//! ```toml
//! seasonal_periods = 7
//! forecast_horizon_days = 90
//! historical_customer_change = -425000
//! forecast_customer_change = 200000
//! missing_values = "forward_fill"
//! ```

use crate::adjustment::DEFAULT_SENSITIVITY_WINDOW;
use crate::core::MissingValuePolicy;
use crate::error::{ForecastError, Result};
use serde::Deserialize;
use std::path::Path;

/// Parameters for one forecast run.
///
/// Customer changes use the same sign convention everywhere: positive for
/// an increase in customers, negative for a drop.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ForecastParameters {
    /// Cycle length assumed by the seasonal model (>= 2).
    pub seasonal_periods: usize,
    /// Number of future days to forecast (>= 1).
    pub forecast_horizon_days: usize,
    /// Customer change observed over the history, used to scale traffic per customer.
    pub historical_customer_change: f64,
    /// Customer change expected over the forecast horizon.
    pub forecast_customer_change: f64,
    /// Treatment of missing observations before the model fit.
    pub missing_values: MissingValuePolicy,
    /// Observations averaged at each end of the history for the sensitivity estimate.
    pub sensitivity_window: usize,
}

impl Default for ForecastParameters {
    fn default() -> Self {
        Self {
            seasonal_periods: 30,
            forecast_horizon_days: 120,
            historical_customer_change: 425_000.0,
            forecast_customer_change: 200_000.0,
            missing_values: MissingValuePolicy::Error,
            sensitivity_window: DEFAULT_SENSITIVITY_WINDOW,
        }
    }
}

impl ForecastParameters {
    /// Parse parameters from TOML text and validate them.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let params: Self = toml::from_str(text).map_err(|e| ForecastError::Config(e.to_string()))?;
        params.validate()?;
        Ok(params)
    }

    /// Load parameters from a TOML file and validate them.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ForecastError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }

    /// Check ranges that the types alone do not enforce.
    pub fn validate(&self) -> Result<()> {
        if self.seasonal_periods < 2 {
            return Err(ForecastError::InvalidParameter(format!(
                "seasonal_periods must be at least 2, got {}",
                self.seasonal_periods
            )));
        }
        if self.forecast_horizon_days == 0 {
            return Err(ForecastError::InvalidParameter(
                "forecast_horizon_days must be positive".to_string(),
            ));
        }
        if self.sensitivity_window == 0 {
            return Err(ForecastError::InvalidParameter(
                "sensitivity_window must be positive".to_string(),
            ));
        }
        if !self.historical_customer_change.is_finite() {
            return Err(ForecastError::InvalidParameter(
                "historical_customer_change must be finite".to_string(),
            ));
        }
        if !self.forecast_customer_change.is_finite() {
            return Err(ForecastError::InvalidParameter(
                "forecast_customer_change must be finite".to_string(),
            ));
        }
        Ok(())
    }

    /// Minimum number of observations the seasonal fit needs.
    pub fn required_observations(&self) -> usize {
        2 * self.seasonal_periods
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let params = ForecastParameters::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.seasonal_periods, 30);
        assert_eq!(params.forecast_horizon_days, 120);
        assert_eq!(params.required_observations(), 60);
    }

    #[test]
    fn toml_overrides_and_keeps_defaults() {
        let params = ForecastParameters::from_toml_str(
            r#"
            seasonal_periods = 7
            historical_customer_change = -1500.5
            missing_values = "forward_fill"
            "#,
        )
        .unwrap();

        assert_eq!(params.seasonal_periods, 7);
        assert_eq!(params.historical_customer_change, -1500.5);
        assert_eq!(params.missing_values, MissingValuePolicy::ForwardFill);
        assert_eq!(params.forecast_horizon_days, 120);
        assert_eq!(params.sensitivity_window, 14);
    }

    #[test]
    fn toml_fill_policy() {
        let params = ForecastParameters::from_toml_str("missing_values = { fill = 0.0 }").unwrap();
        assert_eq!(params.missing_values, MissingValuePolicy::Fill(0.0));
    }

    #[test]
    fn toml_errors_are_config_errors() {
        assert!(matches!(
            ForecastParameters::from_toml_str("seasonal_periods = \"thirty\""),
            Err(ForecastError::Config(_))
        ));
        assert!(matches!(
            ForecastParameters::from_toml_str("unknown_key = 1"),
            Err(ForecastError::Config(_))
        ));
    }

    #[test]
    fn validation_rejects_bad_ranges() {
        let params = ForecastParameters {
            seasonal_periods: 1,
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ForecastError::InvalidParameter(_))
        ));

        let params = ForecastParameters {
            forecast_horizon_days: 0,
            ..Default::default()
        };
        assert!(params.validate().is_err());

        let params = ForecastParameters {
            forecast_customer_change: f64::NAN,
            ..Default::default()
        };
        assert!(params.validate().is_err());

        assert!(matches!(
            ForecastParameters::from_toml_str("seasonal_periods = 0"),
            Err(ForecastError::InvalidParameter(_))
        ));
    }

    #[test]
    fn zero_customer_changes_are_allowed() {
        let params = ForecastParameters {
            historical_customer_change: 0.0,
            forecast_customer_change: 0.0,
            ..Default::default()
        };
        assert!(params.validate().is_ok());
    }
}
