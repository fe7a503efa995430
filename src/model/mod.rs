//! Record model description
//!
//! A record type opts into sheet binding by implementing [`SheetRecord`] and
//! declaring its fields, in column order, through a [`Schema`]:
//!
//! ```
//! use sheetbind::model::{describe, Field, Schema, SheetRecord};
//!
//! #[derive(Default)]
//! struct Person {
//!     name: String,
//!     age: i32,
//!     internal_id: u64,
//! }
//!
//! impl SheetRecord for Person {
//!     fn schema() -> Schema<Self> {
//!         Schema::new()
//!             .sheet_name("People")
//!             .field(Field::new("Name", |p: &Person| p.name.clone(), |p: &mut Person, v| p.name = v)
//!                 .header("Full name"))
//!             .field(Field::new("Age", |p: &Person| p.age, |p: &mut Person, v| p.age = v))
//!             .field(Field::new("InternalId", |p: &Person| p.internal_id, |p: &mut Person, v| p.internal_id = v)
//!                 .ignore())
//!     }
//! }
//!
//! let plan = describe::<Person>()?;
//! assert_eq!(plan.headings(), vec!["Full name", "Age"]);
//! # Ok::<(), sheetbind::SheetBindError>(())
//! ```

mod attributes;
mod describer;
mod field;
mod schema;

pub use attributes::{ColumnAttributes, FieldKind};
pub use describer::{cached_descriptor_count, describe, ColumnDescriptor, SheetDescriptor};
pub use field::FieldValue;
pub use schema::{Field, FieldAnnotation, Schema};

/// A record type that can be written to and read from a sheet
pub trait SheetRecord: Default + 'static {
    /// Declared fields and sheet metadata. Evaluated once per process.
    fn schema() -> Schema<Self>;
}
