//! Excel importer implementation - Excel (.xlsx) → in-memory workbook

use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use tracing::{debug, info};

use crate::converters::datetime::parse_datetime;
use crate::converters::serial::{serial_to_datetime, serial_to_duration};
use crate::error::{SheetBindError, SheetBindResult};
use crate::model::SheetRecord;
use crate::reader::{read_raw, read_typed};
use crate::settings::SheetImportSettings;
use crate::sheet::{MemorySheet, MemoryWorkbook, TabularSheet, TabularWorkbook};
use crate::types::{CellValue, RawTable};

/// Loads every sheet of an .xlsx file and reads them back as records
#[derive(Debug)]
pub struct ExcelImporter {
    workbook: MemoryWorkbook,
}

impl ExcelImporter {
    /// Open an .xlsx file from disk
    pub fn open<P: AsRef<Path>>(path: P) -> SheetBindResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SheetBindError::Import(format!(
                "File {} does not exist",
                path.display()
            )));
        }

        let xlsx: Xlsx<_> = open_workbook(path)
            .map_err(|e| SheetBindError::Import(format!("Failed to open Excel file: {}", e)))?;
        let importer = Self {
            workbook: load_workbook(xlsx)?,
        };
        info!(
            path = %path.display(),
            sheets = importer.workbook.sheet_count(),
            "opened workbook"
        );
        Ok(importer)
    }

    pub fn from_bytes(bytes: Vec<u8>) -> SheetBindResult<Self> {
        let xlsx = Xlsx::new(Cursor::new(bytes))
            .map_err(|e| SheetBindError::Import(format!("Failed to read Excel data: {}", e)))?;
        Ok(Self {
            workbook: load_workbook(xlsx)?,
        })
    }

    pub fn from_reader<R: Read>(mut reader: R) -> SheetBindResult<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_bytes(bytes)
    }

    pub fn workbook(&self) -> &MemoryWorkbook {
        &self.workbook
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names()
    }

    /// Read sheet `sheet_index` (1-based) as dynamic values
    pub fn import_as_raw(
        &self,
        sheet_index: usize,
        settings: &SheetImportSettings,
    ) -> SheetBindResult<RawTable> {
        read_raw(&self.workbook, sheet_index, settings)
    }

    /// Read sheet `sheet_index` (1-based) as records of `T`
    pub fn import_as<T: SheetRecord>(
        &self,
        sheet_index: usize,
        settings: &SheetImportSettings,
    ) -> SheetBindResult<Vec<T>> {
        read_typed(&self.workbook, sheet_index, settings)
    }
}

fn load_workbook<RS: Read + Seek>(mut xlsx: Xlsx<RS>) -> SheetBindResult<MemoryWorkbook> {
    let mut workbook = MemoryWorkbook::new();
    for name in xlsx.sheet_names() {
        let range = xlsx.worksheet_range(&name).map_err(|e| {
            SheetBindError::Import(format!("Failed to read sheet '{}': {}", name, e))
        })?;
        let mut sheet = MemorySheet::new(name.as_str());
        load_range(&mut sheet, &range);
        debug!(sheet = %name, dimensions = ?sheet.dimensions(), "loaded sheet");
        workbook.push_sheet(sheet)?;
    }
    Ok(workbook)
}

/// Copy a calamine range into `sheet`. Ranges are 0-based and may not start
/// at A1; sheet coordinates are absolute and 1-based.
fn load_range(sheet: &mut MemorySheet, range: &Range<Data>) {
    let (start_row, start_col) = range.start().unwrap_or((0, 0));
    for (row, col, cell) in range.cells() {
        let row = start_row + row as u32 + 1;
        let col = start_col + col as u32 + 1;
        match convert_cell(cell) {
            Ok(value) => sheet.set_cell(row, col, value),
            Err(reason) => sheet.set_fault(row, col, reason),
        }
    }
}

fn convert_cell(cell: &Data) -> Result<CellValue, String> {
    let value = match cell {
        Data::Empty => CellValue::Empty,
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => {
            let serial = dt.as_f64();
            let converted = if dt.is_duration() {
                serial_to_duration(serial).map(CellValue::Duration)
            } else {
                serial_to_datetime(serial).map(CellValue::DateTime)
            };
            converted.unwrap_or(CellValue::Float(serial))
        }
        Data::DateTimeIso(s) => parse_datetime(s)
            .map(CellValue::DateTime)
            .unwrap_or_else(|| CellValue::Text(s.clone())),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => return Err(format!("cell holds error value {}", e)),
    };
    Ok(value)
}
