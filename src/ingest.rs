//! CSV ingestion into a validated [`TimeSeries`].

use crate::core::TimeSeries;
use crate::error::{ForecastError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

/// Naive datetime layouts tried after RFC 3339.
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Date-only layouts, read as midnight UTC.
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Names of the CSV columns holding timestamps and traffic values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvColumns {
    pub time: String,
    pub value: String,
}

impl Default for CsvColumns {
    fn default() -> Self {
        Self {
            time: "time_sec".to_string(),
            value: "AVG_Total_Traffic".to_string(),
        }
    }
}

/// Compact `YYYYMMDD` dates, tried before Unix seconds on 8-digit cells.
const COMPACT_DATE_FORMAT: &str = "%Y%m%d";

/// Parse a timestamp cell.
///
/// Accepts compact `YYYYMMDD` dates, integer Unix seconds, RFC 3339, and
/// the naive layouts in [`DATETIME_FORMATS`] and [`DATE_FORMATS`]
/// (interpreted as UTC). An 8-digit cell that is a valid calendar date is
/// read as that date; any other integer is Unix seconds.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if raw.len() == 8 && raw.bytes().all(|b| b.is_ascii_digit()) {
        if let Some(midnight) = NaiveDate::parse_from_str(raw, COMPACT_DATE_FORMAT)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
        {
            return Some(midnight.and_utc());
        }
    }

    if let Ok(secs) = raw.parse::<i64>() {
        return DateTime::from_timestamp(secs, 0);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

/// Parse a value cell. Blank cells are missing observations (NaN).
fn parse_value(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Some(f64::NAN);
    }
    raw.parse::<f64>().ok()
}

/// Read a time series from CSV data with a header row.
///
/// Rows may arrive in any order; the series is sorted by timestamp and
/// duplicate timestamps keep the row that appears last.
///
/// # Errors
/// * `MalformedSeries` if a column is missing, a timestamp cannot be parsed,
///   or a value is not numeric.
/// * `EmptyData` if the table has no data rows.
pub fn read_series<R: Read>(reader: R, columns: &CsvColumns) -> Result<TimeSeries> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| ForecastError::MalformedSeries(format!("failed to read headers: {e}")))?
        .clone();
    let column_index = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ForecastError::MalformedSeries(format!("column '{name}' not found")))
    };
    let time_idx = column_index(&columns.time)?;
    let value_idx = column_index(&columns.value)?;

    let mut observations = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| ForecastError::MalformedSeries(e.to_string()))?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        let time_cell = record.get(time_idx).unwrap_or_default();
        let timestamp = parse_timestamp(time_cell).ok_or_else(|| {
            ForecastError::MalformedSeries(format!(
                "line {line}: cannot parse timestamp '{time_cell}'"
            ))
        })?;

        let value_cell = record.get(value_idx).unwrap_or_default();
        let value = parse_value(value_cell).ok_or_else(|| {
            ForecastError::MalformedSeries(format!(
                "line {line}: value '{value_cell}' is not numeric"
            ))
        })?;

        observations.push((timestamp, value));
    }

    if observations.is_empty() {
        return Err(ForecastError::EmptyData);
    }

    let (series, duplicates) = TimeSeries::from_unordered(observations);
    if duplicates > 0 {
        warn!(duplicates, "dropped rows with duplicate timestamps");
    }

    Ok(series)
}

/// Read a time series from a CSV file.
pub fn read_series_from_path(path: impl AsRef<Path>, columns: &CsvColumns) -> Result<TimeSeries> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .map_err(|e| ForecastError::Io(format!("{}: {}", path.display(), e)))?;
    let series = read_series(file, columns)?;
    info!(
        path = %path.display(),
        observations = series.len(),
        "loaded traffic history"
    );
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn columns() -> CsvColumns {
        CsvColumns::default()
    }

    #[test]
    fn parse_timestamp_formats() {
        let midnight = Utc.with_ymd_and_hms(2024, 5, 6, 0, 0, 0).unwrap();
        let afternoon = Utc.with_ymd_and_hms(2024, 5, 6, 13, 30, 0).unwrap();

        assert_eq!(parse_timestamp("2024-05-06"), Some(midnight));
        assert_eq!(parse_timestamp("2024/05/06"), Some(midnight));
        assert_eq!(parse_timestamp("2024-05-06 13:30:00"), Some(afternoon));
        assert_eq!(parse_timestamp("2024-05-06T13:30:00"), Some(afternoon));
        assert_eq!(parse_timestamp("2024-05-06 13:30"), Some(afternoon));
        assert_eq!(parse_timestamp("2024-05-06T15:30:00+02:00"), Some(afternoon));
        assert_eq!(parse_timestamp("1714953600"), Some(midnight));
        assert_eq!(parse_timestamp(" 2024-05-06 "), Some(midnight));
    }

    #[test]
    fn parse_timestamp_compact_dates() {
        assert_eq!(
            parse_timestamp("20240101"),
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
        // Not a calendar date, so it stays Unix seconds.
        assert_eq!(
            parse_timestamp("99999999"),
            DateTime::from_timestamp(99_999_999, 0)
        );
        assert_eq!(
            parse_timestamp("86400"),
            Some(Utc.with_ymd_and_hms(1970, 1, 2, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn parse_timestamp_rejects_garbage() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp("2024-13-45"), None);
    }

    #[test]
    fn read_series_sorts_and_dedupes() {
        let data = "\
time_sec,AVG_Total_Traffic,other
2024-01-03,30,x
2024-01-01,10,y
2024-01-02,20,z
2024-01-01,11,w
";
        let series = read_series(data.as_bytes(), &columns()).unwrap();

        assert_eq!(series.len(), 3);
        assert_eq!(series.values(), &[11.0, 20.0, 30.0]);
        assert_eq!(
            series.timestamps()[0],
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn read_series_custom_columns() {
        let data = "day,hits\n2024-01-01, 5.5\n2024-01-02,6\n";
        let cols = CsvColumns {
            time: "day".to_string(),
            value: "hits".to_string(),
        };
        let series = read_series(data.as_bytes(), &cols).unwrap();
        assert_eq!(series.values(), &[5.5, 6.0]);
    }

    #[test]
    fn read_series_blank_value_is_missing() {
        let data = "time_sec,AVG_Total_Traffic\n2024-01-01,1\n2024-01-02,\n";
        let series = read_series(data.as_bytes(), &columns()).unwrap();
        assert!(series.values()[1].is_nan());
        assert!(series.has_missing_values());
    }

    #[test]
    fn read_series_non_numeric_value_is_malformed() {
        let data = "time_sec,AVG_Total_Traffic\n2024-01-01,1\n2024-01-02,lots\n";
        let err = read_series(data.as_bytes(), &columns()).unwrap_err();
        assert_eq!(
            err,
            ForecastError::MalformedSeries("line 3: value 'lots' is not numeric".to_string())
        );
    }

    #[test]
    fn read_series_bad_timestamp_is_malformed() {
        let data = "time_sec,AVG_Total_Traffic\nnot-a-date,1\n";
        assert!(matches!(
            read_series(data.as_bytes(), &columns()),
            Err(ForecastError::MalformedSeries(msg)) if msg.contains("line 2")
        ));
    }

    #[test]
    fn read_series_missing_column() {
        let data = "date,traffic\n2024-01-01,1\n";
        assert!(matches!(
            read_series(data.as_bytes(), &columns()),
            Err(ForecastError::MalformedSeries(msg)) if msg.contains("time_sec")
        ));
    }

    #[test]
    fn read_series_empty_table() {
        let data = "time_sec,AVG_Total_Traffic\n";
        assert_eq!(
            read_series(data.as_bytes(), &columns()),
            Err(ForecastError::EmptyData)
        );
    }

    #[test]
    fn read_series_from_missing_file() {
        assert!(matches!(
            read_series_from_path("/nonexistent/traffic.csv", &columns()),
            Err(ForecastError::Io(_))
        ));
    }
}
