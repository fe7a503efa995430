//! sheetbind - bind typed records to spreadsheet sheets
//!
//! Records declare their columns once through a [`Schema`]; the crate turns a
//! sequence of records into a sheet (header row plus one row per record) and
//! reads a sheet back into records or into a raw table of dynamic values.
//!
//! # Features
//!
//! - Header overrides, ignored fields, translated headers and values
//! - Per-type value converters (date-times, durations, custom newtypes)
//! - Optional removal of columns no record has a value for
//! - Per-cell failure isolation when reading
//! - Excel (.xlsx) import/export
//!
//! # Example
//!
//! ```
//! use sheetbind::{
//!     read_typed, write_sheet, Field, MemoryWorkbook, Schema, SheetExportSettings,
//!     SheetImportSettings, SheetRecord,
//! };
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct City {
//!     name: String,
//!     population: u32,
//! }
//!
//! impl SheetRecord for City {
//!     fn schema() -> Schema<Self> {
//!         Schema::new()
//!             .field(Field::new("Name", |c: &City| c.name.clone(), |c: &mut City, v| c.name = v))
//!             .field(Field::new("Population", |c: &City| c.population, |c: &mut City, v| c.population = v))
//!     }
//! }
//!
//! let cities = vec![City { name: "Brno".into(), population: 380_000 }];
//! let mut workbook = MemoryWorkbook::new();
//! write_sheet(&mut workbook, &cities, &SheetExportSettings::default())?;
//!
//! let back: Vec<City> = read_typed(&workbook, 1, &SheetImportSettings::default())?;
//! assert_eq!(back, cities);
//! # Ok::<(), sheetbind::SheetBindError>(())
//! ```

pub mod cli;
pub mod config;
pub mod converters;
pub mod culture;
pub mod error;
pub mod excel;
pub mod localizer;
pub mod model;
pub mod reader;
pub mod settings;
pub mod sheet;
pub mod types;
pub mod writer;

// Re-export commonly used types
pub use config::BindConfig;
pub use converters::{register_converter, ValueConverter};
pub use culture::Culture;
pub use error::{SheetBindError, SheetBindResult};
pub use excel::{ExcelExporter, ExcelImporter};
pub use localizer::{DictionaryLocalizer, Localizer};
pub use model::{describe, Field, FieldValue, Schema, SheetRecord};
pub use reader::{read_raw, read_typed};
pub use settings::{SheetExportSettings, SheetImportSettings};
pub use sheet::{MemorySheet, MemoryWorkbook, TabularSheet, TabularWorkbook};
pub use types::{CellValue, RawTable, TypeKey};
pub use writer::{write_sheet, SheetWriteSummary};
