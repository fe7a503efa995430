//! Abstract tabular sheet collaborator
//!
//! Rows and columns are 1-based, as in spreadsheet applications. The row
//! writer and reader only talk to these traits; [`MemoryWorkbook`] is the
//! in-crate implementation that the xlsx adapters load into and render from.

mod memory;

pub use memory::{MemorySheet, MemoryWorkbook};

use crate::error::SheetBindResult;
use crate::types::CellValue;

/// A single worksheet
pub trait TabularSheet {
    fn name(&self) -> &str;

    /// Read one cell. `Err` carries the reason the cell holds no readable
    /// value (e.g. a spreadsheet error cell such as `#DIV/0!`).
    fn get_cell(&self, row: u32, col: u32) -> Result<CellValue, String>;

    /// Write one cell; [`CellValue::Empty`] clears it
    fn set_cell(&mut self, row: u32, col: u32, value: CellValue);

    /// Remove a column, shifting every column to its right one position left
    fn delete_column(&mut self, col: u32);

    /// `(rows, cols)` spanned from A1 to the last used cell
    fn dimensions(&self) -> (u32, u32);
}

/// A set of named worksheets
pub trait TabularWorkbook {
    type Sheet: TabularSheet;

    fn sheet_names(&self) -> Vec<String>;

    /// Append a new empty sheet; fails on a name collision
    fn add_sheet(&mut self, name: &str) -> SheetBindResult<&mut Self::Sheet>;

    /// Sheet by 1-based position
    fn sheet(&self, index: usize) -> Option<&Self::Sheet>;

    fn sheet_count(&self) -> usize {
        self.sheet_names().len()
    }

    fn has_sheet(&self, name: &str) -> bool {
        self.sheet_names().iter().any(|n| n == name)
    }

    /// Persist pending changes to the backing store
    fn flush(&mut self) -> SheetBindResult<()> {
        Ok(())
    }
}
