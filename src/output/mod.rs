//! Output artifacts: the combined table, its exports and the run summary.

pub mod export;
mod summary;
mod table;
mod workbook;

pub use export::{to_bytes, write_table, ExportFormat};
pub use summary::{group_thousands, Summary};
pub use table::{OutputRow, OutputTable};
pub use workbook::to_xlsx;
