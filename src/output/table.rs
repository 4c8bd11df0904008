//! Combined historical and forecast table.

use crate::core::{AdjustedForecast, TimeSeries};
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn serialize_date<S: Serializer>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&date.format(DATE_FORMAT))
}

/// One dated row of the output table.
///
/// Historical rows carry only `historical`; forecast rows carry only
/// `forecast_raw` and `adjusted`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputRow {
    #[serde(serialize_with = "serialize_date")]
    pub date: DateTime<Utc>,
    pub historical: Option<f64>,
    pub forecast_raw: Option<f64>,
    pub adjusted: Option<f64>,
}

impl OutputRow {
    pub fn is_forecast(&self) -> bool {
        self.forecast_raw.is_some()
    }
}

/// Historical rows followed by forecast rows, in date order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputTable {
    rows: Vec<OutputRow>,
}

impl OutputTable {
    /// Concatenate the history with the adjusted forecast.
    ///
    /// Missing historical observations are left empty.
    pub fn assemble(history: &TimeSeries, forecast: &AdjustedForecast) -> Self {
        let historical = history.iter().map(|(date, value)| OutputRow {
            date,
            historical: value.is_finite().then_some(value),
            forecast_raw: None,
            adjusted: None,
        });
        let predicted = forecast.iter().map(|(date, raw, adjusted)| OutputRow {
            date,
            historical: None,
            forecast_raw: Some(raw),
            adjusted: Some(adjusted),
        });

        Self {
            rows: historical.chain(predicted).collect(),
        }
    }

    pub fn rows(&self) -> &[OutputRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows produced by the forecast.
    pub fn forecast_rows(&self) -> impl Iterator<Item = &OutputRow> {
        self.rows.iter().filter(|r| r.is_forecast())
    }
}
