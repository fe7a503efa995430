//! Row reader: sheet rows → raw tables or typed records

use tracing::{info, warn};

use crate::error::{SheetBindError, SheetBindResult};
use crate::model::{describe, ColumnDescriptor, SheetRecord};
use crate::settings::SheetImportSettings;
use crate::sheet::{TabularSheet, TabularWorkbook};
use crate::types::{CellValue, RawTable};

/// Import a sheet (1-based `index`) as dynamic values.
pub fn read_raw<W: TabularWorkbook>(
    workbook: &W,
    index: usize,
    settings: &SheetImportSettings,
) -> SheetBindResult<RawTable> {
    let sheet = get_sheet(workbook, index)?;
    let mut data = RawTable::new();
    let (total_rows, total_cols) = sheet.dimensions();
    if total_rows == 0 || total_cols == 0 {
        return Ok(data);
    }

    if settings.has_header {
        data.headers = Some(read_header(sheet, total_cols));
    }

    for row in settings.first_data_row()..=total_rows {
        let mut line = vec![CellValue::Empty; total_cols as usize];
        for col in 1..=total_cols {
            match sheet.get_cell(row, col) {
                Ok(value) => line[col as usize - 1] = value,
                Err(reason) if settings.break_on_error => {
                    return Err(SheetBindError::CellRead {
                        row,
                        col,
                        field: None,
                        message: reason,
                    });
                }
                Err(reason) => warn!(row, col, %reason, "skipped unreadable cell"),
            }
        }
        data.values.push(line);
    }

    info!(sheet = sheet.name(), rows = data.values.len(), "read raw sheet");
    Ok(data)
}

/// Import a sheet (1-based `index`) as records of `T`.
///
/// Columns are bound by position: the n-th sheet column feeds the n-th
/// non-ignored field. Sheet columns beyond the plan are ignored; fields
/// beyond the sheet keep their default.
pub fn read_typed<T, W>(
    workbook: &W,
    index: usize,
    settings: &SheetImportSettings,
) -> SheetBindResult<Vec<T>>
where
    T: SheetRecord,
    W: TabularWorkbook,
{
    let sheet = get_sheet(workbook, index)?;
    let mut data = Vec::new();
    let (total_rows, total_cols) = sheet.dimensions();
    if total_rows == 0 || total_cols == 0 {
        return Ok(data);
    }

    let descriptor = describe::<T>()?;
    let columns: Vec<&ColumnDescriptor<T>> = descriptor.active_columns().collect();
    let max_col = columns.len().min(total_cols as usize);

    for row in settings.first_data_row()..=total_rows {
        let mut item = T::default();
        for (idx, info) in columns.iter().take(max_col).enumerate() {
            let col = idx as u32 + 1;
            if let Err(message) = read_cell(sheet, row, col, info, &mut item) {
                if settings.break_on_error {
                    return Err(SheetBindError::CellRead {
                        row,
                        col,
                        field: Some(info.key.clone()),
                        message,
                    });
                }
                warn!(row, col, field = %info.key, %message, "left field at default");
            }
        }
        data.push(item);
    }

    info!(
        sheet = sheet.name(),
        record = descriptor.type_name,
        rows = data.len(),
        "read typed sheet"
    );
    Ok(data)
}

/// Read one cell into its field. Empty cells without a converter leave the
/// field untouched.
fn read_cell<T, S: TabularSheet>(
    sheet: &S,
    row: u32,
    col: u32,
    info: &ColumnDescriptor<T>,
    item: &mut T,
) -> Result<(), String> {
    let value = sheet.get_cell(row, col)?;
    let value = match &info.converter {
        Some(converter) => converter
            .read(value)
            .map_err(|e| SheetBindError::from_any(e).to_string())?,
        None if value.is_empty() => return Ok(()),
        None => value,
    };
    info.set(item, value).map_err(|e| e.to_string())
}

fn read_header<S: TabularSheet>(sheet: &S, cols: u32) -> Vec<String> {
    (1..=cols)
        .map(|col| sheet.get_cell(1, col).map(|v| v.to_string()).unwrap_or_default())
        .collect()
}

fn get_sheet<W: TabularWorkbook>(workbook: &W, index: usize) -> SheetBindResult<&W::Sheet> {
    workbook
        .sheet(index)
        .ok_or(SheetBindError::SheetNotFound(index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Field, Schema};
    use crate::sheet::MemoryWorkbook;

    #[derive(Debug, Default, PartialEq)]
    struct Reading {
        station: String,
        celsius: f64,
        samples: i32,
        skipped: bool,
    }

    impl SheetRecord for Reading {
        fn schema() -> Schema<Self> {
            Schema::new()
                .field(Field::new("Station", |r: &Reading| r.station.clone(), |r: &mut Reading, v| r.station = v))
                .field(Field::new("Skipped", |r: &Reading| r.skipped, |r: &mut Reading, v| r.skipped = v).ignore())
                .field(Field::new("Celsius", |r: &Reading| r.celsius, |r: &mut Reading, v| r.celsius = v))
                .field(Field::new("Samples", |r: &Reading| r.samples, |r: &mut Reading, v| r.samples = v))
        }
    }

    fn workbook() -> MemoryWorkbook {
        let mut workbook = MemoryWorkbook::new();
        let sheet = workbook.add_sheet("Readings").unwrap();
        for (col, heading) in ["Station", "Celsius", "Samples"].iter().enumerate() {
            sheet.set_cell(1, col as u32 + 1, CellValue::from(*heading));
        }
        sheet.set_cell(2, 1, CellValue::from("Oslo"));
        sheet.set_cell(2, 2, CellValue::Float(-3.5));
        sheet.set_cell(2, 3, CellValue::Float(12.0));
        sheet.set_cell(3, 1, CellValue::from("Rome"));
        sheet.set_cell(3, 2, CellValue::from("warm"));
        sheet.set_cell(3, 3, CellValue::Int(9));
        workbook
    }

    #[test]
    fn test_read_typed_tolerates_bad_cells() {
        let rows: Vec<Reading> =
            read_typed(&workbook(), 1, &SheetImportSettings::default()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0],
            Reading {
                station: "Oslo".to_string(),
                celsius: -3.5,
                samples: 12,
                skipped: false
            }
        );
        assert_eq!(rows[1].station, "Rome");
        assert_eq!(rows[1].celsius, 0.0);
        assert_eq!(rows[1].samples, 9);
    }

    #[test]
    fn test_read_typed_break_on_error() {
        let settings = SheetImportSettings::new().with_break_on_error(true);
        let err = read_typed::<Reading, _>(&workbook(), 1, &settings).unwrap_err();
        match err {
            SheetBindError::CellRead { row, col, field, .. } => {
                assert_eq!((row, col), (3, 2));
                assert_eq!(field.as_deref(), Some("Celsius"));
            }
            other => panic!("Expected CellRead, got {:?}", other),
        }
    }

    #[test]
    fn test_read_raw_with_and_without_header() {
        let table = read_raw(&workbook(), 1, &SheetImportSettings::default()).unwrap();
        assert_eq!(
            table.headers,
            Some(vec!["Station".to_string(), "Celsius".to_string(), "Samples".to_string()])
        );
        assert_eq!(table.values.len(), 2);
        assert_eq!(table.values[1][1], CellValue::from("warm"));

        let headless =
            read_raw(&workbook(), 1, &SheetImportSettings::new().with_header(false)).unwrap();
        assert!(headless.headers.is_none());
        assert_eq!(headless.values.len(), 3);
    }

    #[test]
    fn test_read_raw_fault_cells() {
        let mut workbook = workbook();
        let mut faulty = crate::sheet::MemorySheet::new("Faulty");
        faulty.set_cell(1, 1, CellValue::from("A"));
        faulty.set_fault(2, 1, "#N/A");
        workbook.push_sheet(faulty).unwrap();

        let table = read_raw(&workbook, 2, &SheetImportSettings::default()).unwrap();
        assert_eq!(table.values, vec![vec![CellValue::Empty]]);

        let err = read_raw(&workbook, 2, &SheetImportSettings::new().with_break_on_error(true))
            .unwrap_err();
        assert!(matches!(err, SheetBindError::CellRead { row: 2, col: 1, field: None, .. }));
    }

    #[test]
    fn test_missing_and_empty_sheets() {
        let mut workbook = workbook();
        assert!(matches!(
            read_raw(&workbook, 5, &SheetImportSettings::default()),
            Err(SheetBindError::SheetNotFound(5))
        ));
        assert!(matches!(
            read_typed::<Reading, _>(&workbook, 0, &SheetImportSettings::default()),
            Err(SheetBindError::SheetNotFound(0))
        ));

        workbook.add_sheet("Empty").unwrap();
        let rows: Vec<Reading> = read_typed(&workbook, 2, &SheetImportSettings::default()).unwrap();
        assert!(rows.is_empty());
        assert!(read_raw(&workbook, 2, &SheetImportSettings::default()).unwrap().is_empty());
    }
}
