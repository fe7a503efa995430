//! Per-call export and import settings

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::culture::Culture;
use crate::localizer::Localizer;

/// Options recognized by the row writer
#[derive(Clone)]
pub struct SheetExportSettings {
    /// Overrides the descriptor's sheet name
    pub sheet_name: Option<String>,
    /// Passed to converters; `None` uses [`Culture::current`]
    pub culture: Option<Culture>,
    /// Delete columns that received no value in any row
    pub omit_empty_columns: bool,
    pub localizer: Option<Arc<dyn Localizer>>,
    /// Translate the sheet name and headings when a localizer is present
    pub translate_headers: bool,
}

impl SheetExportSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = Some(name.into());
        self
    }

    pub fn with_culture(mut self, culture: Culture) -> Self {
        self.culture = Some(culture);
        self
    }

    pub fn with_omit_empty_columns(mut self, omit: bool) -> Self {
        self.omit_empty_columns = omit;
        self
    }

    pub fn with_localizer(mut self, localizer: Arc<dyn Localizer>) -> Self {
        self.localizer = Some(localizer);
        self
    }

    pub fn with_translate_headers(mut self, translate: bool) -> Self {
        self.translate_headers = translate;
        self
    }

    pub fn has_localizer(&self) -> bool {
        self.localizer.is_some()
    }

    pub(crate) fn effective_culture(&self) -> Culture {
        self.culture.clone().unwrap_or_else(Culture::current)
    }

    /// The localizer bound to the effective culture
    pub(crate) fn scoped_localizer(&self) -> Option<Arc<dyn Localizer>> {
        self.localizer
            .as_ref()
            .map(|l| l.with_culture(&self.effective_culture()))
    }
}

impl Default for SheetExportSettings {
    fn default() -> Self {
        Self {
            sheet_name: None,
            culture: None,
            omit_empty_columns: false,
            localizer: None,
            translate_headers: true,
        }
    }
}

impl fmt::Debug for SheetExportSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SheetExportSettings")
            .field("sheet_name", &self.sheet_name)
            .field("culture", &self.culture)
            .field("omit_empty_columns", &self.omit_empty_columns)
            .field("localizer", &self.localizer.is_some())
            .field("translate_headers", &self.translate_headers)
            .finish()
    }
}

/// Options recognized by the row reader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetImportSettings {
    /// Row 1 holds headings; data starts at row 2
    pub has_header: bool,
    /// Abort on the first cell that fails to read or convert
    pub break_on_error: bool,
}

impl SheetImportSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    pub fn with_break_on_error(mut self, break_on_error: bool) -> Self {
        self.break_on_error = break_on_error;
        self
    }

    pub(crate) fn first_data_row(&self) -> u32 {
        if self.has_header {
            2
        } else {
            1
        }
    }
}

impl Default for SheetImportSettings {
    fn default() -> Self {
        Self {
            has_header: true,
            break_on_error: false,
        }
    }
}
