//! Forecast result structures.

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Duration, NaiveTime, Utc};

/// Daily dates for `horizon` periods following `last_observed`.
///
/// The first date is midnight (UTC) of the day after the last observation,
/// regardless of the time of day the last observation carried.
pub fn forecast_dates(last_observed: DateTime<Utc>, horizon: usize) -> Vec<DateTime<Utc>> {
    let start = last_observed.date_naive().and_time(NaiveTime::MIN).and_utc();
    (1..=horizon)
        .map(|h| start + Duration::days(h as i64))
        .collect()
}

/// Point predictions from the seasonal model, one per future day.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawForecast {
    dates: Vec<DateTime<Utc>>,
    values: Vec<f64>,
}

impl RawForecast {
    /// Predictions dated on consecutive days after `last_observed`.
    pub fn daily_after(last_observed: DateTime<Utc>, values: Vec<f64>) -> Self {
        let dates = forecast_dates(last_observed, values.len());
        Self { dates, values }
    }

    /// The same predictions re-dated to start the day after `last_observed`.
    pub fn redated_after(self, last_observed: DateTime<Utc>) -> Self {
        Self::daily_after(last_observed, self.values)
    }

    /// Number of forecast periods.
    pub fn horizon(&self) -> usize {
        self.values.len()
    }

    pub fn dates(&self) -> &[DateTime<Utc>] {
        &self.dates
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Iterate over `(date, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (DateTime<Utc>, f64)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }
}

/// Raw and customer-adjusted predictions sharing the same dates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdjustedForecast {
    dates: Vec<DateTime<Utc>>,
    raw: Vec<f64>,
    adjusted: Vec<f64>,
}

impl AdjustedForecast {
    /// Attach adjusted values to a raw forecast.
    pub fn new(raw: &RawForecast, adjusted: Vec<f64>) -> Result<Self> {
        if adjusted.len() != raw.horizon() {
            return Err(ForecastError::InvalidParameter(format!(
                "adjusted forecast has {} values, expected {}",
                adjusted.len(),
                raw.horizon()
            )));
        }
        Ok(Self {
            dates: raw.dates.clone(),
            raw: raw.values.clone(),
            adjusted,
        })
    }

    /// A forecast whose adjusted values equal the raw values.
    pub fn unadjusted(raw: &RawForecast) -> Self {
        Self {
            dates: raw.dates.clone(),
            raw: raw.values.clone(),
            adjusted: raw.values.clone(),
        }
    }

    pub fn horizon(&self) -> usize {
        self.dates.len()
    }

    pub fn dates(&self) -> &[DateTime<Utc>] {
        &self.dates
    }

    pub fn raw(&self) -> &[f64] {
        &self.raw
    }

    pub fn adjusted(&self) -> &[f64] {
        &self.adjusted
    }

    /// Iterate over `(date, raw, adjusted)` triples.
    pub fn iter(&self) -> impl Iterator<Item = (DateTime<Utc>, f64, f64)> + '_ {
        self.dates
            .iter()
            .zip(self.raw.iter().zip(self.adjusted.iter()))
            .map(|(&d, (&r, &a))| (d, r, a))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn forecast_dates_start_the_day_after() {
        let last = Utc.with_ymd_and_hms(2024, 2, 28, 17, 45, 0).unwrap();
        let dates = forecast_dates(last, 3);

        assert_eq!(
            dates,
            vec![
                Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap(),
            ]
        );
    }

    #[test]
    fn forecast_dates_zero_horizon() {
        let last = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert!(forecast_dates(last, 0).is_empty());
    }

    #[test]
    fn redated_forecast_keeps_values() {
        let fitted_until = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let history_until = Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap();

        let raw = RawForecast::daily_after(fitted_until, vec![1.0, 2.0]).redated_after(history_until);
        assert_eq!(raw.horizon(), 2);
        assert_eq!(raw.values(), &[1.0, 2.0]);
        assert_eq!(
            raw.dates()[0],
            Utc.with_ymd_and_hms(2024, 1, 4, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn adjusted_forecast_shares_dates() {
        let last = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let raw = RawForecast::daily_after(last, vec![10.0, 20.0]);

        let adjusted = AdjustedForecast::new(&raw, vec![9.0, 18.0]).unwrap();
        assert_eq!(adjusted.dates(), raw.dates());
        assert_eq!(adjusted.raw(), &[10.0, 20.0]);
        assert_eq!(adjusted.adjusted(), &[9.0, 18.0]);

        assert!(AdjustedForecast::new(&raw, vec![1.0]).is_err());

        let same = AdjustedForecast::unadjusted(&raw);
        assert_eq!(same.raw(), same.adjusted());
    }
}
