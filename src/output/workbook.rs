//! Excel workbook export with a line chart of the three series.

use super::OutputTable;
use crate::error::{ForecastError, Result};
use rust_xlsxwriter::{Chart, ChartType, Workbook, Worksheet, XlsxError};

const SHEET_NAME: &str = "Forecast";
const HEADERS: [&str; 4] = ["date", "historical", "forecast_raw", "adjusted"];
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Series drawn in the chart: value column and legend label.
const SERIES: [(u16, &str); 3] = [
    (1, "Historical"),
    (2, "HW Forecast (raw)"),
    (3, "Adjusted Forecast (with customer change: + increase, - drop)"),
];

fn export_error(e: XlsxError) -> ForecastError {
    ForecastError::Export(e.to_string())
}

/// Serialize the table into an `.xlsx` workbook held in memory.
///
/// The `Forecast` sheet holds the table with blank cells where a column
/// does not apply; a line chart of all three series sits beside it.
pub fn to_xlsx(table: &OutputTable) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME).map_err(export_error)?;
    write_rows(worksheet, table).map_err(export_error)?;

    if !table.is_empty() {
        let last_row = u32::try_from(table.len())
            .map_err(|_| ForecastError::Export("table too large for a worksheet".to_string()))?;
        let chart = traffic_chart(last_row);
        worksheet
            .insert_chart(1, HEADERS.len() as u16 + 1, &chart)
            .map_err(export_error)?;
    }

    workbook.save_to_buffer().map_err(export_error)
}

fn write_rows(worksheet: &mut Worksheet, table: &OutputTable) -> std::result::Result<(), XlsxError> {
    for (col, header) in HEADERS.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header)?;
    }
    worksheet.set_column_width(0, 20)?;

    for (i, row) in table.rows().iter().enumerate() {
        let r = i as u32 + 1;
        worksheet.write_string(r, 0, row.date.format(DATE_FORMAT).to_string())?;
        for (col, value) in [(1, row.historical), (2, row.forecast_raw), (3, row.adjusted)] {
            if let Some(value) = value {
                worksheet.write_number(r, col, value)?;
            }
        }
    }
    Ok(())
}

fn traffic_chart(last_row: u32) -> Chart {
    let mut chart = Chart::new(ChartType::Line);
    chart.title().set_name("Traffic Forecast with Customer Adjustment");
    chart.x_axis().set_name("Date");
    chart.y_axis().set_name("Traffic");

    for (col, label) in SERIES {
        chart
            .add_series()
            .set_name(label)
            .set_categories((SHEET_NAME, 1, 0, last_row, 0))
            .set_values((SHEET_NAME, 1, col, last_row, col));
    }
    chart
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AdjustedForecast, RawForecast, TimeSeries};
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn workbook_is_a_zip_container() {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let history =
            TimeSeries::new(vec![base, base + Duration::days(1)], vec![10.0, 12.5]).unwrap();
        let raw = RawForecast::daily_after(base + Duration::days(1), vec![13.0, 14.0]);
        let forecast = AdjustedForecast::new(&raw, vec![12.0, 12.5]).unwrap();
        let table = OutputTable::assemble(&history, &forecast);

        let bytes = to_xlsx(&table).unwrap();
        assert!(bytes.starts_with(b"PK\x03\x04"));
    }

    #[test]
    fn empty_table_still_writes_a_workbook() {
        let bytes = to_xlsx(&OutputTable::default()).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }
}
