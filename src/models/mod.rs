//! Forecasting models.

mod traits;

pub mod exponential;

pub use exponential::{forecast_seasonal, HoltWinters};
pub use traits::Forecaster;
