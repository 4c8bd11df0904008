//! Traffic-per-customer sensitivity estimated from the historical series.

use crate::core::TimeSeries;
use crate::utils::stats::finite_mean;
use std::fmt;
use tracing::debug;

/// Number of observations averaged at each end of the series.
pub const DEFAULT_SENSITIVITY_WINDOW: usize = 14;

/// Traffic units attributable to one customer.
///
/// Zero means there was not enough signal to estimate a sensitivity. A
/// negative value means traffic historically rose while the customer
/// count rose (or fell while it fell).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct SensitivityCoefficient(f64);

impl SensitivityCoefficient {
    pub const ZERO: Self = Self(0.0);

    pub fn new(value: f64) -> Self {
        Self(value)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0.0
    }
}

impl fmt::Display for SensitivityCoefficient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.0)
    }
}

/// Estimate the sensitivity coefficient.
///
/// `(mean(first window) - mean(last window)) / historical_customer_change`,
/// where each mean skips missing values and each window shrinks to the
/// series length when the series is shorter than `window`.
///
/// Resolves to zero when `historical_customer_change` is zero or either
/// window has no finite value.
pub fn estimate_sensitivity(
    series: &TimeSeries,
    historical_customer_change: f64,
    window: usize,
) -> SensitivityCoefficient {
    let head = finite_mean(series.head(window));
    let tail = finite_mean(series.tail(window));
    debug!(?head, ?tail, window, "sensitivity window means");

    let (Some(head), Some(tail)) = (head, tail) else {
        return SensitivityCoefficient::ZERO;
    };
    if historical_customer_change == 0.0 {
        return SensitivityCoefficient::ZERO;
    }

    SensitivityCoefficient((head - tail) / historical_customer_change)
}
