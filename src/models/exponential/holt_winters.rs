//! Holt-Winters forecasting model.
//!
//! Triple exponential smoothing with an additive trend and an additive
//! seasonal component.

use crate::core::{RawForecast, TimeSeries};
use crate::error::{ForecastError, Result};
use crate::models::Forecaster;
use crate::utils::optimization::{nelder_mead, NelderMeadConfig};
use crate::utils::stats::{mean, rms};
use chrono::{DateTime, Utc};
use tracing::debug;

const PARAM_BOUNDS: (f64, f64) = (0.0001, 0.9999);

/// Additive Holt-Winters forecaster.
///
/// The model equations:
/// - Level: `l_t = α(y_t - s_{t-m}) + (1-α)(l_{t-1} + b_{t-1})`
/// - Trend: `b_t = β(l_t - l_{t-1}) + (1-β)b_{t-1}`
/// - Seasonal: `s_t = γ(y_t - l_t) + (1-γ)s_{t-m}`
/// - Forecast: `ŷ_{t+h} = l_t + h*b_t + s_{t+h-m}`
///
/// The first season initialises the state and is excluded from the
/// in-sample error.
#[derive(Debug, Clone)]
pub struct HoltWinters {
    /// Level smoothing parameter (0 < alpha < 1).
    alpha: Option<f64>,
    /// Trend smoothing parameter (0 < beta < 1).
    beta: Option<f64>,
    /// Seasonal smoothing parameter (0 < gamma < 1).
    gamma: Option<f64>,
    /// Seasonal period.
    seasonal_period: usize,
    /// Whether to optimize parameters.
    optimize: bool,
    /// Fitted state, present after a successful `fit`.
    state: Option<FittedState>,
}

#[derive(Debug, Clone)]
struct FittedState {
    level: f64,
    trend: f64,
    seasonals: Vec<f64>,
    fitted: Vec<f64>,
    residuals: Vec<f64>,
    sse: f64,
    n: usize,
    last_timestamp: DateTime<Utc>,
}

/// Output of one pass of the smoothing recursion.
struct Recursion {
    level: f64,
    trend: f64,
    seasonals: Vec<f64>,
    fitted: Vec<f64>,
    sse: f64,
}

impl HoltWinters {
    /// Create a model with fixed smoothing parameters.
    pub fn additive(alpha: f64, beta: f64, gamma: f64, seasonal_period: usize) -> Self {
        let (lo, hi) = PARAM_BOUNDS;
        Self {
            alpha: Some(alpha.clamp(lo, hi)),
            beta: Some(beta.clamp(lo, hi)),
            gamma: Some(gamma.clamp(lo, hi)),
            seasonal_period,
            optimize: false,
            state: None,
        }
    }

    /// Create a model whose parameters are fitted by minimising in-sample SSE.
    pub fn auto(seasonal_period: usize) -> Self {
        Self {
            alpha: None,
            beta: None,
            gamma: None,
            seasonal_period,
            optimize: true,
            state: None,
        }
    }

    pub fn alpha(&self) -> Option<f64> {
        self.alpha
    }

    pub fn beta(&self) -> Option<f64> {
        self.beta
    }

    pub fn gamma(&self) -> Option<f64> {
        self.gamma
    }

    /// Get the seasonal period.
    pub fn seasonal_period(&self) -> usize {
        self.seasonal_period
    }

    /// Get the final level.
    pub fn level(&self) -> Option<f64> {
        self.state.as_ref().map(|s| s.level)
    }

    /// Get the final trend.
    pub fn trend(&self) -> Option<f64> {
        self.state.as_ref().map(|s| s.trend)
    }

    /// Get the final seasonal indices, ordered by position in the cycle.
    pub fn seasonals(&self) -> Option<&[f64]> {
        self.state.as_ref().map(|s| s.seasonals.as_slice())
    }

    /// In-sample sum of squared one-step errors.
    pub fn sse(&self) -> Option<f64> {
        self.state.as_ref().map(|s| s.sse)
    }

    /// Initial level, trend and seasonal indices from the first seasons.
    fn initialize_state(values: &[f64], period: usize) -> (f64, f64, Vec<f64>) {
        let first_season = &values[..period];
        let level = mean(first_season);

        // Average per-step change between the first two seasons.
        let trend = if values.len() >= 2 * period {
            (0..period)
                .map(|i| (values[period + i] - values[i]) / period as f64)
                .sum::<f64>()
                / period as f64
        } else {
            0.0
        };

        let mut seasonals: Vec<f64> = first_season.iter().map(|y| y - level).collect();
        let offset = mean(&seasonals);
        for s in &mut seasonals {
            *s -= offset;
        }

        (level, trend, seasonals)
    }

    /// Run the smoothing recursion over `values` with the given parameters.
    fn smooth(values: &[f64], alpha: f64, beta: f64, gamma: f64, period: usize) -> Recursion {
        let (mut level, mut trend, mut seasonals) = Self::initialize_state(values, period);

        let mut fitted = Vec::with_capacity(values.len());
        // The initialisation season is reproduced as-is.
        fitted.extend_from_slice(&values[..period]);

        let mut sse = 0.0;
        for (t, &y) in values.iter().enumerate().skip(period) {
            let idx = t % period;
            let s = seasonals[idx];

            let one_step = level + trend + s;
            fitted.push(one_step);
            sse += (y - one_step).powi(2);

            let level_prev = level;
            level = alpha * (y - s) + (1.0 - alpha) * (level_prev + trend);
            trend = beta * (level - level_prev) + (1.0 - beta) * trend;
            seasonals[idx] = gamma * (y - level) + (1.0 - gamma) * s;
        }

        Recursion {
            level,
            trend,
            seasonals,
            fitted,
            sse,
        }
    }

    /// Fit alpha, beta and gamma with bounded Nelder-Mead.
    fn optimize_params(values: &[f64], period: usize) -> (f64, f64, f64) {
        let config = NelderMeadConfig {
            max_iter: 1000,
            tolerance: 1e-8,
            ..Default::default()
        };

        let result = nelder_mead(
            |p| Self::smooth(values, p[0], p[1], p[2], period).sse,
            &[0.3, 0.1, 0.1],
            Some(&[PARAM_BOUNDS; 3]),
            config,
        );

        debug!(
            iterations = result.iterations,
            converged = result.converged,
            sse = result.optimal_value,
            "holt-winters parameter search finished"
        );

        let (lo, hi) = PARAM_BOUNDS;
        (
            result.optimal_point[0].clamp(lo, hi),
            result.optimal_point[1].clamp(lo, hi),
            result.optimal_point[2].clamp(lo, hi),
        )
    }
}

impl Default for HoltWinters {
    fn default() -> Self {
        Self::auto(30)
    }
}

impl Forecaster for HoltWinters {
    fn fit(&mut self, series: &TimeSeries) -> Result<()> {
        let period = self.seasonal_period;
        if period < 2 {
            return Err(ForecastError::InvalidParameter(format!(
                "seasonal period must be at least 2, got {period}"
            )));
        }

        let values = series.values();
        if values.len() < 2 * period {
            return Err(ForecastError::InsufficientData {
                needed: 2 * period,
                got: values.len(),
            });
        }
        if series.has_missing_values() {
            return Err(ForecastError::MissingValues);
        }
        let last_timestamp = series.last_timestamp().ok_or(ForecastError::EmptyData)?;

        if self.optimize {
            let (alpha, beta, gamma) = Self::optimize_params(values, period);
            self.alpha = Some(alpha);
            self.beta = Some(beta);
            self.gamma = Some(gamma);
        }

        let alpha = self.alpha.ok_or(ForecastError::FitRequired)?;
        let beta = self.beta.ok_or(ForecastError::FitRequired)?;
        let gamma = self.gamma.ok_or(ForecastError::FitRequired)?;

        let pass = Self::smooth(values, alpha, beta, gamma, period);
        let residuals: Vec<f64> = values
            .iter()
            .zip(&pass.fitted)
            .map(|(y, f)| y - f)
            .collect();

        debug!(
            alpha,
            beta,
            gamma,
            rmse = rms(&residuals[period..]),
            "fitted {}",
            self.name()
        );

        self.state = Some(FittedState {
            level: pass.level,
            trend: pass.trend,
            seasonals: pass.seasonals,
            fitted: pass.fitted,
            residuals,
            sse: pass.sse,
            n: values.len(),
            last_timestamp,
        });

        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<RawForecast> {
        let state = self.state.as_ref().ok_or(ForecastError::FitRequired)?;
        let period = self.seasonal_period;

        let predictions: Vec<f64> = (1..=horizon)
            .map(|h| {
                let s = state.seasonals[(state.n + h - 1) % period];
                state.level + (h as f64) * state.trend + s
            })
            .collect();

        Ok(RawForecast::daily_after(state.last_timestamp, predictions))
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.state.as_ref().map(|s| s.fitted.as_slice())
    }

    fn residuals(&self) -> Option<&[f64]> {
        self.state.as_ref().map(|s| s.residuals.as_slice())
    }

    fn name(&self) -> &str {
        "HoltWinters(additive)"
    }
}

/// Fit an optimised additive Holt-Winters model and forecast `horizon` days.
///
/// Requires at least `2 * seasonal_period` observations.
pub fn forecast_seasonal(
    series: &TimeSeries,
    seasonal_period: usize,
    horizon: usize,
) -> Result<RawForecast> {
    let mut model = HoltWinters::auto(seasonal_period);
    model.fit(series)?;
    model.predict(horizon)
}
