use super::schema::{Field, FieldAnnotation};
use crate::error::{SheetBindError, SheetBindResult};

/// Resolved column attributes of one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnAttributes {
    pub ignore: bool,
    pub heading: String,
    pub translate: bool,
    pub dictionary_prefix: String,
}

impl ColumnAttributes {
    fn for_key(key: &str) -> Self {
        Self {
            ignore: false,
            heading: key.to_string(),
            translate: false,
            dictionary_prefix: String::new(),
        }
    }
}

/// How a column is handled by the writer and reader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Ignored,
    Plain,
    CustomConverted,
    Translated,
}

/// Evaluate a field's annotations in declaration order.
///
/// `Ignore` stops evaluation of the remaining annotations of that field.
pub(crate) fn resolve_attributes<T: 'static>(
    record: &str,
    field: &Field<T>,
) -> SheetBindResult<ColumnAttributes> {
    let mut info = ColumnAttributes::for_key(&field.key);

    for annotation in &field.annotations {
        match annotation {
            FieldAnnotation::Ignore => {
                info.ignore = true;
                break;
            }
            FieldAnnotation::Header(name) => info.heading = name.clone(),
            FieldAnnotation::Translate { prefix } => {
                if !field.textual {
                    return Err(SheetBindError::InvalidSchema {
                        record: record.to_string(),
                        field: field.key.clone(),
                        reason: format!(
                            "cannot be translated since its type {} is not textual",
                            field.type_key.short_name()
                        ),
                    });
                }
                info.translate = true;
                info.dictionary_prefix = prefix.clone();
            }
        }
    }

    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Row {
        name: String,
        size: i32,
    }

    fn name_field() -> Field<Row> {
        Field::new("Name", |r: &Row| r.name.clone(), |r: &mut Row, v| r.name = v)
    }

    fn size_field() -> Field<Row> {
        Field::new("Size", |r: &Row| r.size, |r: &mut Row, v| r.size = v)
    }

    #[test]
    fn test_defaults() {
        let attrs = resolve_attributes("Row", &name_field()).unwrap();
        assert_eq!(attrs, ColumnAttributes::for_key("Name"));
    }

    #[test]
    fn test_header_and_translate() {
        let attrs =
            resolve_attributes("Row", &name_field().header("Full name").translate("names.")).unwrap();
        assert_eq!(attrs.heading, "Full name");
        assert!(attrs.translate);
        assert_eq!(attrs.dictionary_prefix, "names.");
        assert!(!attrs.ignore);
    }

    #[test]
    fn test_translate_requires_text() {
        let err = resolve_attributes("Row", &size_field().translate("x.")).unwrap_err();
        match err {
            SheetBindError::InvalidSchema { record, field, .. } => {
                assert_eq!(record, "Row");
                assert_eq!(field, "Size");
            }
            other => panic!("Expected InvalidSchema, got {:?}", other),
        }
    }

    #[test]
    fn test_ignore_short_circuits() {
        let attrs = resolve_attributes("Row", &size_field().ignore().translate("x.")).unwrap();
        assert!(attrs.ignore);
        assert!(!attrs.translate);
        assert_eq!(attrs.heading, "Size");
    }
}
