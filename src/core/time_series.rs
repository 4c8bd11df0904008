//! TimeSeries data structure for representing a single traffic series.

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::collections::HashMap;

/// Policy for handling missing values (NaN/Inf).
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingValuePolicy {
    /// Drop observations with missing values.
    Drop,
    /// Fill with a specific value.
    Fill(f64),
    /// Forward fill (use previous valid value).
    ForwardFill,
    /// Return error if missing values found.
    #[default]
    Error,
}

/// A univariate time series with strictly increasing timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    timestamps: Vec<DateTime<Utc>>,
    values: Vec<f64>,
}

impl TimeSeries {
    /// Create a series from already ordered observations.
    ///
    /// Fails if the lengths differ or the timestamps are not strictly
    /// increasing.
    pub fn new(timestamps: Vec<DateTime<Utc>>, values: Vec<f64>) -> Result<Self> {
        if timestamps.len() != values.len() {
            return Err(ForecastError::MalformedSeries(format!(
                "{} timestamps but {} values",
                timestamps.len(),
                values.len()
            )));
        }

        for i in 1..timestamps.len() {
            if timestamps[i] <= timestamps[i - 1] {
                return Err(ForecastError::TimestampError(
                    "timestamps must be strictly increasing".to_string(),
                ));
            }
        }

        Ok(Self { timestamps, values })
    }

    /// Build a series from observations in arbitrary order.
    ///
    /// Observations are sorted by timestamp. When a timestamp occurs more
    /// than once the observation that came last in the input wins.
    /// Returns the series and the number of duplicates discarded.
    pub fn from_unordered(observations: Vec<(DateTime<Utc>, f64)>) -> (Self, usize) {
        let total = observations.len();
        let mut latest: HashMap<DateTime<Utc>, f64> = HashMap::with_capacity(total);
        for (ts, value) in observations {
            latest.insert(ts, value);
        }

        let mut pairs: Vec<(DateTime<Utc>, f64)> = latest.into_iter().collect();
        pairs.sort_by_key(|(ts, _)| *ts);
        let duplicates = total - pairs.len();

        let (timestamps, values) = pairs.into_iter().unzip();
        (Self { timestamps, values }, duplicates)
    }

    /// Get the number of observations.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Check if the series is empty.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Get timestamps.
    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// Get values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Timestamp of the most recent observation.
    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamps.last().copied()
    }

    /// Iterate over `(timestamp, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (DateTime<Utc>, f64)> + '_ {
        self.timestamps
            .iter()
            .copied()
            .zip(self.values.iter().copied())
    }

    /// The first `n` values, or all of them if the series is shorter.
    pub fn head(&self, n: usize) -> &[f64] {
        &self.values[..n.min(self.values.len())]
    }

    /// The last `n` values, or all of them if the series is shorter.
    pub fn tail(&self, n: usize) -> &[f64] {
        let start = self.values.len().saturating_sub(n);
        &self.values[start..]
    }

    /// Check if series has missing values (NaN or Inf).
    pub fn has_missing_values(&self) -> bool {
        self.values.iter().any(|v| !v.is_finite())
    }

    /// Return a sanitized copy with missing values handled.
    pub fn sanitized(&self, policy: MissingValuePolicy) -> Result<TimeSeries> {
        match policy {
            MissingValuePolicy::Error => {
                if self.has_missing_values() {
                    return Err(ForecastError::MissingValues);
                }
                Ok(self.clone())
            }
            MissingValuePolicy::Drop => {
                let (timestamps, values) = self.iter().filter(|(_, v)| v.is_finite()).unzip();
                Ok(TimeSeries { timestamps, values })
            }
            MissingValuePolicy::Fill(fill_value) => {
                let values = self
                    .values
                    .iter()
                    .map(|&v| if v.is_finite() { v } else { fill_value })
                    .collect();
                Ok(TimeSeries {
                    timestamps: self.timestamps.clone(),
                    values,
                })
            }
            MissingValuePolicy::ForwardFill => {
                let mut values = Vec::with_capacity(self.values.len());
                let mut last_valid = None;
                for &v in &self.values {
                    if v.is_finite() {
                        last_valid = Some(v);
                        values.push(v);
                    } else {
                        values.push(last_valid.unwrap_or(v));
                    }
                }

                let filled = TimeSeries {
                    timestamps: self.timestamps.clone(),
                    values,
                };
                // Leading gaps have nothing to carry forward.
                if filled.has_missing_values() {
                    return Err(ForecastError::MissingValues);
                }
                Ok(filled)
            }
        }
    }

    /// Infer the modal spacing between consecutive timestamps.
    ///
    /// `tolerance` is the minimum share of gaps that must agree with the
    /// modal spacing.
    pub fn infer_frequency(&self, tolerance: f64) -> Result<Duration> {
        if self.len() < 2 {
            return Err(ForecastError::InsufficientData {
                needed: 2,
                got: self.len(),
            });
        }

        let mut counts: HashMap<i64, usize> = HashMap::new();
        for w in self.timestamps.windows(2) {
            *counts.entry((w[1] - w[0]).num_seconds()).or_insert(0) += 1;
        }

        let (modal_diff, modal_count) = counts
            .iter()
            .max_by_key(|(&diff, &count)| (count, std::cmp::Reverse(diff)))
            .map(|(&diff, &count)| (diff, count))
            .ok_or_else(|| ForecastError::TimestampError("empty spacing data".to_string()))?;

        let total_count = self.len() - 1;
        let modal_ratio = modal_count as f64 / total_count as f64;

        if modal_ratio < tolerance {
            return Err(ForecastError::TimestampError(
                "no unique modal spacing found".to_string(),
            ));
        }

        Ok(Duration::seconds(modal_diff))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn days(n: usize) -> Vec<DateTime<Utc>> {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        (0..n).map(|i| base + Duration::days(i as i64)).collect()
    }

    #[test]
    fn new_rejects_non_increasing_timestamps() {
        let mut ts = days(3);
        ts.swap(1, 2);
        assert!(matches!(
            TimeSeries::new(ts, vec![1.0, 2.0, 3.0]),
            Err(ForecastError::TimestampError(_))
        ));

        let mut ts = days(3);
        ts[2] = ts[1];
        assert!(TimeSeries::new(ts, vec![1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn new_rejects_length_mismatch() {
        assert!(matches!(
            TimeSeries::new(days(3), vec![1.0, 2.0]),
            Err(ForecastError::MalformedSeries(_))
        ));
    }

    #[test]
    fn from_unordered_sorts_and_keeps_last_duplicate() {
        let ts = days(3);
        let observations = vec![
            (ts[2], 30.0),
            (ts[0], 10.0),
            (ts[1], 20.0),
            (ts[0], 11.0),
        ];

        let (series, duplicates) = TimeSeries::from_unordered(observations);
        assert_eq!(duplicates, 1);
        assert_eq!(series.timestamps(), &ts[..]);
        assert_eq!(series.values(), &[11.0, 20.0, 30.0]);
    }

    #[test]
    fn head_and_tail_shrink_to_available() {
        let series = TimeSeries::new(days(5), vec![1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(series.head(2), &[1.0, 2.0]);
        assert_eq!(series.tail(2), &[4.0, 5.0]);
        assert_eq!(series.head(14).len(), 5);
        assert_eq!(series.tail(14).len(), 5);
    }

    #[test]
    fn sanitized_policies() {
        let series = TimeSeries::new(days(4), vec![1.0, f64::NAN, 3.0, f64::NAN]).unwrap();
        assert!(series.has_missing_values());

        assert_eq!(
            series.sanitized(MissingValuePolicy::Error),
            Err(ForecastError::MissingValues)
        );

        let dropped = series.sanitized(MissingValuePolicy::Drop).unwrap();
        assert_eq!(dropped.values(), &[1.0, 3.0]);
        assert_eq!(dropped.len(), 2);

        let filled = series.sanitized(MissingValuePolicy::Fill(0.0)).unwrap();
        assert_eq!(filled.values(), &[1.0, 0.0, 3.0, 0.0]);

        let ffilled = series.sanitized(MissingValuePolicy::ForwardFill).unwrap();
        assert_eq!(ffilled.values(), &[1.0, 1.0, 3.0, 3.0]);
    }

    #[test]
    fn forward_fill_fails_on_leading_gap() {
        let series = TimeSeries::new(days(3), vec![f64::NAN, 2.0, 3.0]).unwrap();
        assert_eq!(
            series.sanitized(MissingValuePolicy::ForwardFill),
            Err(ForecastError::MissingValues)
        );
    }

    #[test]
    fn infer_frequency_daily() {
        let mut ts = days(10);
        ts.remove(4);
        let series = TimeSeries::new(ts, vec![1.0; 9]).unwrap();
        assert_eq!(series.infer_frequency(0.5).unwrap(), Duration::days(1));
    }

    #[test]
    fn infer_frequency_needs_two_points() {
        let series = TimeSeries::new(days(1), vec![1.0]).unwrap();
        assert!(matches!(
            series.infer_frequency(0.5),
            Err(ForecastError::InsufficientData { needed: 2, got: 1 })
        ));
    }
}
