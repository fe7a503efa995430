//! Declarative field lists for record types

use super::field::FieldValue;
use crate::error::SheetBindResult;
use crate::types::{CellValue, TypeKey};

/// Declarative metadata attached to one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldAnnotation {
    /// Never written nor read
    Ignore,
    /// Custom heading text
    Header(String),
    /// Translate values through the localizer under `prefix + value`
    Translate { prefix: String },
}

/// Typed get/set pair bound to one field of `T`, erased to cell values
pub(crate) trait FieldAccessor<T>: Send + Sync {
    fn get(&self, record: &T) -> CellValue;
    fn set(&self, record: &mut T, value: CellValue) -> SheetBindResult<()>;
}

struct TypedAccessor<T, V> {
    get: fn(&T) -> V,
    set: fn(&mut T, V),
}

impl<T: 'static, V: FieldValue> FieldAccessor<T> for TypedAccessor<T, V> {
    fn get(&self, record: &T) -> CellValue {
        (self.get)(record).to_cell()
    }

    fn set(&self, record: &mut T, value: CellValue) -> SheetBindResult<()> {
        (self.set)(record, V::from_cell(value)?);
        Ok(())
    }
}

/// One declared field of a record type
pub struct Field<T> {
    pub(crate) key: String,
    pub(crate) type_key: TypeKey,
    pub(crate) textual: bool,
    pub(crate) annotations: Vec<FieldAnnotation>,
    pub(crate) accessor: Box<dyn FieldAccessor<T>>,
}

impl<T: 'static> Field<T> {
    /// Declare a field by key with its getter and setter.
    ///
    /// ```
    /// use sheetbind::model::Field;
    ///
    /// #[derive(Default)]
    /// struct Person { age: i32 }
    ///
    /// let field = Field::new("Age", |p: &Person| p.age, |p: &mut Person, v| p.age = v);
    /// assert_eq!(field.key(), "Age");
    /// ```
    pub fn new<V: FieldValue>(key: impl Into<String>, get: fn(&T) -> V, set: fn(&mut T, V)) -> Self {
        Self {
            key: key.into(),
            type_key: TypeKey::of::<V>(),
            textual: V::TEXTUAL,
            annotations: Vec::new(),
            accessor: Box::new(TypedAccessor { get, set }),
        }
    }

    pub fn header(self, name: impl Into<String>) -> Self {
        self.annotate(FieldAnnotation::Header(name.into()))
    }

    pub fn ignore(self) -> Self {
        self.annotate(FieldAnnotation::Ignore)
    }

    pub fn translate(self, prefix: impl Into<String>) -> Self {
        self.annotate(FieldAnnotation::Translate {
            prefix: prefix.into(),
        })
    }

    pub fn annotate(mut self, annotation: FieldAnnotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn type_key(&self) -> TypeKey {
        self.type_key
    }

    pub fn annotations(&self) -> &[FieldAnnotation] {
        &self.annotations
    }
}

/// Ordered field list of a record type plus sheet-level metadata
pub struct Schema<T> {
    pub(crate) sheet_name: Option<String>,
    pub(crate) dictionary_prefix: Option<String>,
    pub(crate) fields: Vec<Field<T>>,
}

impl<T: 'static> Schema<T> {
    pub fn new() -> Self {
        Self {
            sheet_name: None,
            dictionary_prefix: None,
            fields: Vec::new(),
        }
    }

    /// Sheet name used when export settings don't name one
    pub fn sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = Some(name.into());
        self
    }

    /// Prefix for sheet name and heading translation keys
    pub fn dictionary_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.dictionary_prefix = Some(prefix.into());
        self
    }

    /// Append a field; declaration order becomes column order
    pub fn field(mut self, field: Field<T>) -> Self {
        self.fields.push(field);
        self
    }

    pub fn fields(&self) -> &[Field<T>] {
        &self.fields
    }
}

impl<T: 'static> Default for Schema<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Item {
        label: String,
        count: u32,
    }

    #[test]
    fn test_field_metadata() {
        let field = Field::new("Label", |i: &Item| i.label.clone(), |i: &mut Item, v| i.label = v)
            .header("Item label")
            .translate("item.");
        assert_eq!(field.key(), "Label");
        assert_eq!(field.type_key(), TypeKey::of::<String>());
        assert!(field.textual);
        assert_eq!(
            field.annotations(),
            &[
                FieldAnnotation::Header("Item label".to_string()),
                FieldAnnotation::Translate {
                    prefix: "item.".to_string()
                }
            ]
        );
    }

    #[test]
    fn test_accessor_get_set() {
        let field = Field::new("Count", |i: &Item| i.count, |i: &mut Item, v| i.count = v);
        let mut item = Item::default();
        field.accessor.set(&mut item, CellValue::Float(12.0)).unwrap();
        assert_eq!(item.count, 12);
        assert_eq!(field.accessor.get(&item), CellValue::Int(12));
        assert!(field.accessor.set(&mut item, CellValue::from("x")).is_err());
        assert_eq!(item.count, 12);
    }

    #[test]
    fn test_schema_keeps_declaration_order() {
        let schema = Schema::<Item>::new()
            .sheet_name("Items")
            .field(Field::new("Count", |i: &Item| i.count, |i: &mut Item, v| i.count = v))
            .field(Field::new("Label", |i: &Item| i.label.clone(), |i: &mut Item, v| i.label = v));
        let keys: Vec<&str> = schema.fields().iter().map(|f| f.key()).collect();
        assert_eq!(keys, vec!["Count", "Label"]);
        assert_eq!(schema.sheet_name.as_deref(), Some("Items"));
    }
}
