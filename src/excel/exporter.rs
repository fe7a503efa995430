//! Excel exporter implementation

use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::converters::serial::{datetime_to_serial, duration_to_serial};
use crate::error::{SheetBindError, SheetBindResult};
use crate::model::SheetRecord;
use crate::settings::SheetExportSettings;
use crate::sheet::{MemoryWorkbook, TabularSheet};
use crate::types::CellValue;
use crate::writer::{write_sheet, SheetWriteSummary};

const DATETIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";
const DURATION_FORMAT: &str = "[h]:mm:ss";

/// Collects record sheets and saves them as an .xlsx workbook
#[derive(Debug, Default)]
pub struct ExcelExporter {
    workbook: MemoryWorkbook,
}

impl ExcelExporter {
    /// Create a new exporter with an empty workbook
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named sheet filled with `records`
    pub fn add_sheet<'a, T: SheetRecord>(
        &mut self,
        records: impl IntoIterator<Item = &'a T>,
        settings: &SheetExportSettings,
    ) -> SheetBindResult<&mut Self> {
        self.add_sheet_with_summary(records, settings)?;
        Ok(self)
    }

    pub fn add_sheet_with_summary<'a, T: SheetRecord>(
        &mut self,
        records: impl IntoIterator<Item = &'a T>,
        settings: &SheetExportSettings,
    ) -> SheetBindResult<SheetWriteSummary> {
        write_sheet(&mut self.workbook, records, settings)
    }

    pub fn workbook(&self) -> &MemoryWorkbook {
        &self.workbook
    }

    /// Direct access for sheets that are not record-backed
    pub fn workbook_mut(&mut self) -> &mut MemoryWorkbook {
        &mut self.workbook
    }

    /// Save the workbook to `output_path`.
    ///
    /// An existing file is replaced only when `overwrite` is set.
    pub fn export(&self, output_path: &Path, overwrite: bool) -> SheetBindResult<()> {
        self.check_before_export()?;
        if output_path.exists() && !overwrite {
            return Err(SheetBindError::Export(format!(
                "File {} already exists. Use overwrite = true for replacing.",
                output_path.display()
            )));
        }

        let mut workbook = render_workbook(&self.workbook)?;
        workbook
            .save(output_path)
            .map_err(|e| SheetBindError::Export(format!("Failed to save Excel file: {}", e)))?;

        info!(path = %output_path.display(), sheets = self.workbook.sheets().len(), "exported workbook");
        Ok(())
    }

    /// Write the .xlsx bytes to any writer
    pub fn export_to_writer<W: Write>(&self, mut writer: W) -> SheetBindResult<()> {
        let bytes = self.to_bytes()?;
        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(())
    }

    pub fn to_bytes(&self) -> SheetBindResult<Vec<u8>> {
        self.check_before_export()?;
        let mut workbook = render_workbook(&self.workbook)?;
        workbook
            .save_to_buffer()
            .map_err(|e| SheetBindError::Export(format!("Failed to render Excel file: {}", e)))
    }

    fn check_before_export(&self) -> SheetBindResult<()> {
        if self.workbook.is_empty() {
            return Err(SheetBindError::Export(
                "Document does not contain any sheets. Use add_sheet() before.".to_string(),
            ));
        }
        Ok(())
    }
}

/// Render an in-memory workbook with rust_xlsxwriter
pub fn render_workbook(source: &MemoryWorkbook) -> SheetBindResult<Workbook> {
    let datetime_format = Format::new().set_num_format(DATETIME_FORMAT);
    let duration_format = Format::new().set_num_format(DURATION_FORMAT);
    let mut workbook = Workbook::new();

    for sheet in source.sheets() {
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(sheet.name())
            .map_err(|e| SheetBindError::Export(format!("Failed to set worksheet name: {}", e)))?;

        for (row, col, value) in sheet.cells() {
            let col = u16::try_from(col - 1).map_err(|_| {
                SheetBindError::Export(format!("Column {} is beyond the Excel limit", col))
            })?;
            write_cell_value(worksheet, row - 1, col, value, &datetime_format, &duration_format)
                .map_err(|e| {
                    SheetBindError::Export(format!(
                        "Failed to write cell {}:{} in '{}': {}",
                        row,
                        col + 1,
                        sheet.name(),
                        e
                    ))
                })?;
        }
    }

    Ok(workbook)
}

/// Write a single cell value based on its type (0-based coordinates)
fn write_cell_value(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &CellValue,
    datetime_format: &Format,
    duration_format: &Format,
) -> Result<(), XlsxError> {
    match value {
        CellValue::Empty => {}
        CellValue::Bool(b) => {
            worksheet.write_boolean(row, col, *b)?;
        }
        CellValue::Int(i) => {
            worksheet.write_number(row, col, *i as f64)?;
        }
        CellValue::Float(x) => {
            worksheet.write_number(row, col, *x)?;
        }
        CellValue::Text(s) => {
            worksheet.write_string(row, col, s.as_str())?;
        }
        CellValue::DateTime(dt) => {
            worksheet.write_number_with_format(row, col, datetime_to_serial(dt), datetime_format)?;
        }
        CellValue::Duration(d) => {
            worksheet.write_number_with_format(row, col, duration_to_serial(d), duration_format)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::TabularWorkbook;
    use tempfile::TempDir;

    fn sample_workbook() -> MemoryWorkbook {
        let mut workbook = MemoryWorkbook::new();
        let sheet = workbook.add_sheet("Data").unwrap();
        sheet.set_cell(1, 1, CellValue::from("Name"));
        sheet.set_cell(2, 1, CellValue::from("Ada"));
        sheet.set_cell(2, 2, CellValue::Int(36));
        sheet.set_cell(2, 3, CellValue::Bool(true));
        workbook
    }

    #[test]
    fn test_render_workbook() {
        let mut workbook = render_workbook(&sample_workbook()).unwrap();
        let bytes = workbook.save_to_buffer().unwrap();
        // xlsx files are zip archives
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_export_empty_fails() {
        let temp_dir = TempDir::new().unwrap();
        let output_path = temp_dir.path().join("empty.xlsx");
        let result = ExcelExporter::new().export(&output_path, true);
        assert!(matches!(result, Err(SheetBindError::Export(_))));
        assert!(!output_path.exists());
    }

    #[test]
    fn test_export_respects_overwrite_flag() {
        let temp_dir = TempDir::new().unwrap();
        let output_path = temp_dir.path().join("data.xlsx");
        std::fs::write(&output_path, b"old").unwrap();

        let exporter = ExcelExporter {
            workbook: sample_workbook(),
        };
        let result = exporter.export(&output_path, false);
        assert!(matches!(result, Err(SheetBindError::Export(msg)) if msg.contains("already exists")));

        exporter.export(&output_path, true).unwrap();
        assert!(std::fs::metadata(&output_path).unwrap().len() > 3);
    }
}
