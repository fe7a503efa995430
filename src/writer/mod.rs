//! Row writer: records → header row + one row per record

use std::sync::Arc;
use tracing::{debug, info};

use crate::culture::Culture;
use crate::error::{SheetBindError, SheetBindResult};
use crate::localizer::Localizer;
use crate::model::{describe, ColumnDescriptor, SheetDescriptor, SheetRecord};
use crate::settings::SheetExportSettings;
use crate::sheet::{MemorySheet, TabularSheet, TabularWorkbook};
use crate::types::CellValue;

/// Outcome of a successful [`write_sheet`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetWriteSummary {
    pub sheet_name: String,
    /// Data rows written, header excluded
    pub rows: usize,
    /// Columns left in the sheet
    pub columns: usize,
    /// Columns deleted because no record had a value for them
    pub omitted_columns: usize,
}

/// Add a sheet to `workbook` holding a header row and one row per record.
///
/// The sheet is built off to the side and only added to the workbook once
/// every record has been converted, so a failed write leaves the workbook
/// untouched.
pub fn write_sheet<'a, T, W>(
    workbook: &mut W,
    records: impl IntoIterator<Item = &'a T>,
    settings: &SheetExportSettings,
) -> SheetBindResult<SheetWriteSummary>
where
    T: SheetRecord,
    W: TabularWorkbook,
{
    let descriptor = describe::<T>()?;
    let culture = settings.effective_culture();
    let localizer = settings.scoped_localizer();

    let name = resolve_sheet_name(&descriptor, settings, localizer.as_deref());
    if workbook.has_sheet(&name) {
        return Err(SheetBindError::DuplicateSheet(name));
    }

    if localizer.is_none() {
        if let Some(column) = descriptor.active_columns().find(|c| c.attributes.translate) {
            return Err(SheetBindError::MissingLocalizer {
                field: column.key.clone(),
            });
        }
    }

    let mut staged = MemorySheet::new(name.as_str());
    write_header(&mut staged, &descriptor, settings, localizer.as_deref());

    let width = descriptor.active_columns().count();
    let mut column_usages = vec![0usize; width];
    let mut rows = 0usize;

    // 1 = table header, 2 = first record
    let mut row = 2u32;
    for record in records {
        for (idx, column) in descriptor.active_columns().enumerate() {
            let value = column_value(column, record, &culture, localizer.as_ref())?;
            if value.is_used() {
                column_usages[idx] += 1;
            }
            staged.set_cell(row, idx as u32 + 1, value);
        }
        row += 1;
        rows += 1;
    }

    let omitted_columns = if settings.omit_empty_columns {
        omit_unused_columns(&mut staged, &column_usages)
    } else {
        0
    };

    commit(workbook, &staged)?;
    workbook.flush()?;

    info!(sheet = %name, rows, columns = width - omitted_columns, "wrote sheet");
    Ok(SheetWriteSummary {
        sheet_name: name,
        rows,
        columns: width - omitted_columns,
        omitted_columns,
    })
}

/// Settings name, else descriptor name, else bare type name; translated
/// when headers are translated and a localizer is present.
fn resolve_sheet_name<T>(
    descriptor: &SheetDescriptor<T>,
    settings: &SheetExportSettings,
    localizer: Option<&dyn Localizer>,
) -> String {
    let name = [settings.sheet_name.as_deref(), Some(descriptor.name.as_str())]
        .into_iter()
        .flatten()
        .find(|n| !n.is_empty())
        .unwrap_or(descriptor.type_name);

    match localizer {
        Some(localizer) if settings.translate_headers => {
            localizer.lookup(&descriptor.translation_key(name))
        }
        _ => name.to_string(),
    }
}

fn write_header<T>(
    sheet: &mut MemorySheet,
    descriptor: &SheetDescriptor<T>,
    settings: &SheetExportSettings,
    localizer: Option<&dyn Localizer>,
) {
    for (idx, column) in descriptor.active_columns().enumerate() {
        let heading = &column.attributes.heading;
        let text = match localizer {
            Some(localizer) if settings.translate_headers => {
                localizer.lookup(&descriptor.translation_key(heading))
            }
            _ => heading.clone(),
        };
        sheet.set_cell(1, idx as u32 + 1, CellValue::Text(text));
    }
}

fn column_value<T>(
    column: &ColumnDescriptor<T>,
    record: &T,
    culture: &Culture,
    localizer: Option<&Arc<dyn Localizer>>,
) -> SheetBindResult<CellValue> {
    let raw = column.get(record);
    let value = match &column.converter {
        Some(converter) => converter
            .write(raw, column.type_key, culture)
            .map_err(|e| SheetBindError::FieldWrite {
                field: column.key.clone(),
                message: format!("{:#}", e),
            })?,
        None => raw,
    };

    if !column.attributes.translate {
        return Ok(value);
    }
    let localizer = localizer.ok_or_else(|| SheetBindError::MissingLocalizer {
        field: column.key.clone(),
    })?;
    translate_value(column, value, localizer.as_ref())
}

/// Null and blank text pass through; other text becomes
/// `localizer[prefix + text]`.
fn translate_value<T>(
    column: &ColumnDescriptor<T>,
    value: CellValue,
    localizer: &dyn Localizer,
) -> SheetBindResult<CellValue> {
    match value {
        CellValue::Empty => Ok(CellValue::Empty),
        CellValue::Text(text) if text.trim().is_empty() => Ok(CellValue::Text(text)),
        CellValue::Text(text) => {
            let key = format!("{}{}", column.attributes.dictionary_prefix, text);
            Ok(CellValue::Text(localizer.lookup(&key)))
        }
        other => Err(SheetBindError::FieldWrite {
            field: column.key.clone(),
            message: format!("translated value must be text, got {}", other.type_name()),
        }),
    }
}

/// Delete never-used columns left to right. Each deletion shifts later
/// columns one to the left, hence the running correction.
fn omit_unused_columns(sheet: &mut impl TabularSheet, column_usages: &[usize]) -> usize {
    let mut deleted = 0u32;
    for (idx, used) in column_usages.iter().enumerate() {
        if *used != 0 {
            continue;
        }
        let col = idx as u32 + 1;
        sheet.delete_column(col - deleted);
        deleted += 1;
    }
    if deleted > 0 {
        debug!(sheet = sheet.name(), deleted, "omitted empty columns");
    }
    deleted as usize
}

fn commit<W: TabularWorkbook>(workbook: &mut W, staged: &MemorySheet) -> SheetBindResult<()> {
    let target = workbook.add_sheet(staged.name())?;
    for (row, col, value) in staged.cells() {
        target.set_cell(row, col, value.clone());
    }
    Ok(())
}
