//! Excel import/export for record sheets
//!
//! This module connects the in-memory workbook to .xlsx files:
//! - Export: records → [`MemoryWorkbook`](crate::sheet::MemoryWorkbook) → .xlsx via rust_xlsxwriter
//! - Import: .xlsx → [`MemoryWorkbook`](crate::sheet::MemoryWorkbook) via calamine → records
//!
//! Date-times and durations are stored as Excel serial numbers with a number
//! format, so Excel shows them as dates and calamine reads them back typed.

mod exporter;
mod importer;

pub use exporter::{render_workbook, ExcelExporter};
pub use importer::ExcelImporter;
