//! Customer-count adjustment of seasonal forecasts.
//!
//! A sensitivity coefficient (traffic per customer) is estimated from the
//! history and then applied as a linearly ramping correction to the raw
//! forecast.

mod adjuster;
mod sensitivity;

pub use adjuster::{adjust_forecast, adjustment_ramp, is_active};
pub use sensitivity::{estimate_sensitivity, SensitivityCoefficient, DEFAULT_SENSITIVITY_WINDOW};
