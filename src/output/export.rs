//! Serialization of the output table for spreadsheets and chart renderers.

use super::{to_xlsx, OutputTable};
use crate::error::{ForecastError, Result};
use std::path::Path;
use std::str::FromStr;
use tracing::info;

/// File format of an exported table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Comma-separated values with a header row; opens in any spreadsheet.
    #[default]
    Csv,
    /// Array of row objects.
    Json,
    /// Excel workbook with the table and a line chart.
    Xlsx,
}

impl ExportFormat {
    /// Conventional file extension.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Xlsx => "xlsx",
        }
    }

    /// Guess the format from a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()?.to_str()?.parse().ok()
    }
}

impl FromStr for ExportFormat {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            "xlsx" => Ok(ExportFormat::Xlsx),
            other => Err(ForecastError::InvalidParameter(format!(
                "unknown export format '{other}'"
            ))),
        }
    }
}

/// Serialize the table into an in-memory buffer.
pub fn to_bytes(table: &OutputTable, format: ExportFormat) -> Result<Vec<u8>> {
    match format {
        ExportFormat::Csv => {
            let mut writer = csv::Writer::from_writer(Vec::new());
            for row in table.rows() {
                writer
                    .serialize(row)
                    .map_err(|e| ForecastError::Export(e.to_string()))?;
            }
            writer
                .into_inner()
                .map_err(|e| ForecastError::Export(e.to_string()))
        }
        ExportFormat::Json => serde_json::to_vec_pretty(table.rows())
            .map_err(|e| ForecastError::Export(e.to_string())),
        ExportFormat::Xlsx => to_xlsx(table),
    }
}

/// Write the table to `path`.
///
/// The whole table is serialized before the file is touched, so a
/// serialization failure never leaves a partial file behind.
pub fn write_table(table: &OutputTable, format: ExportFormat, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let buffer = to_bytes(table, format)?;
    std::fs::write(path, &buffer)
        .map_err(|e| ForecastError::Io(format!("{}: {}", path.display(), e)))?;
    info!(
        path = %path.display(),
        rows = table.len(),
        bytes = buffer.len(),
        "wrote forecast table"
    );
    Ok(())
}
