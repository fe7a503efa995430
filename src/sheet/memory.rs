use std::collections::BTreeMap;

use super::{TabularSheet, TabularWorkbook};
use crate::error::{SheetBindError, SheetBindResult};
use crate::types::CellValue;

/// Sparse in-memory worksheet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemorySheet {
    name: String,
    cells: BTreeMap<(u32, u32), CellValue>,
    faults: BTreeMap<(u32, u32), String>,
}

impl MemorySheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Mark a cell as unreadable (spreadsheet error value)
    pub fn set_fault(&mut self, row: u32, col: u32, reason: impl Into<String>) {
        self.cells.remove(&(row, col));
        self.faults.insert((row, col), reason.into());
    }

    /// Non-empty cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32, &CellValue)> {
        self.cells.iter().map(|(&(r, c), v)| (r, c, v))
    }

    pub fn faults(&self) -> impl Iterator<Item = (u32, u32, &str)> {
        self.faults.iter().map(|(&(r, c), v)| (r, c, v.as_str()))
    }

    /// Values of one row from column 1 to the sheet width
    pub fn row_values(&self, row: u32) -> Vec<CellValue> {
        let (_, cols) = self.dimensions();
        (1..=cols)
            .map(|col| self.cells.get(&(row, col)).cloned().unwrap_or_default())
            .collect()
    }

    fn shift_left<V>(map: &mut BTreeMap<(u32, u32), V>, col: u32) {
        let old = std::mem::take(map);
        *map = old
            .into_iter()
            .filter(|((_, c), _)| *c != col)
            .map(|((r, c), v)| if c > col { ((r, c - 1), v) } else { ((r, c), v) })
            .collect();
    }
}

impl TabularSheet for MemorySheet {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_cell(&self, row: u32, col: u32) -> Result<CellValue, String> {
        if let Some(reason) = self.faults.get(&(row, col)) {
            return Err(reason.clone());
        }
        Ok(self.cells.get(&(row, col)).cloned().unwrap_or_default())
    }

    fn set_cell(&mut self, row: u32, col: u32, value: CellValue) {
        self.faults.remove(&(row, col));
        if value.is_empty() {
            self.cells.remove(&(row, col));
        } else {
            self.cells.insert((row, col), value);
        }
    }

    fn delete_column(&mut self, col: u32) {
        Self::shift_left(&mut self.cells, col);
        Self::shift_left(&mut self.faults, col);
    }

    fn dimensions(&self) -> (u32, u32) {
        self.cells
            .keys()
            .chain(self.faults.keys())
            .fold((0, 0), |(rows, cols), &(r, c)| (rows.max(r), cols.max(c)))
    }
}

/// Ordered collection of [`MemorySheet`]s
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryWorkbook {
    sheets: Vec<MemorySheet>,
}

impl MemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sheets(&self) -> &[MemorySheet] {
        &self.sheets
    }

    pub fn sheet_by_name(&self, name: &str) -> Option<&MemorySheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// Append a fully built sheet; fails on a name collision
    pub fn push_sheet(&mut self, sheet: MemorySheet) -> SheetBindResult<()> {
        if self.has_sheet(&sheet.name) {
            return Err(SheetBindError::DuplicateSheet(sheet.name));
        }
        self.sheets.push(sheet);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

impl TabularWorkbook for MemoryWorkbook {
    type Sheet = MemorySheet;

    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    fn add_sheet(&mut self, name: &str) -> SheetBindResult<&mut MemorySheet> {
        self.push_sheet(MemorySheet::new(name))?;
        let last = self.sheets.len() - 1;
        Ok(&mut self.sheets[last])
    }

    fn sheet(&self, index: usize) -> Option<&MemorySheet> {
        index.checked_sub(1).and_then(|i| self.sheets.get(i))
    }

    fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    fn has_sheet(&self, name: &str) -> bool {
        self.sheets.iter().any(|s| s.name == name)
    }
}
