use chrono::{Duration, NaiveDateTime};
use serde::{Serialize, Serializer};
use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::converters::timespan::format_timespan;

//==============================================================================
// Cell Values
//==============================================================================

/// Dynamic value of a single spreadsheet cell
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// No value (null cell)
    #[default]
    Empty,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    DateTime(NaiveDateTime),
    Duration(Duration),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// True when the cell holds something other than null or empty text.
    /// Used for column-usage accounting.
    pub fn is_used(&self) -> bool {
        match self {
            CellValue::Empty => false,
            CellValue::Text(s) => !s.is_empty(),
            _ => true,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Empty => "Empty",
            CellValue::Bool(_) => "Bool",
            CellValue::Int(_) => "Int",
            CellValue::Float(_) => "Float",
            CellValue::Text(_) => "Text",
            CellValue::DateTime(_) => "DateTime",
            CellValue::Duration(_) => "Duration",
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Float(x) => write!(f, "{}", x),
            CellValue::Text(s) => f.write_str(s),
            CellValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            CellValue::Duration(d) => f.write_str(&format_timespan(d)),
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Empty => serializer.serialize_none(),
            CellValue::Bool(b) => serializer.serialize_bool(*b),
            CellValue::Int(i) => serializer.serialize_i64(*i),
            CellValue::Float(x) => serializer.serialize_f64(*x),
            CellValue::Text(s) => serializer.serialize_str(s),
            CellValue::DateTime(_) | CellValue::Duration(_) => {
                serializer.serialize_str(&self.to_string())
            }
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<f64> for CellValue {
    fn from(x: f64) -> Self {
        CellValue::Float(x)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

//==============================================================================
// Type Identity
//==============================================================================

/// Identity token of a field's declared Rust type.
///
/// Equality and hashing use only the [`TypeId`]; the name is kept for
/// diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Full type path, e.g. `chrono::naive::datetime::NaiveDateTime`
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type name without its module path
    pub fn short_name(&self) -> &'static str {
        short_type_name(self.name)
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Strip the module path from a `std::any::type_name` result, keeping
/// generic arguments intact (`a::b::Wrapper<c::D>` → `Wrapper<c::D>`).
pub fn short_type_name(full: &'static str) -> &'static str {
    let head = full.split('<').next().unwrap_or(full);
    match head.rfind("::") {
        Some(pos) => &full[pos + 2..],
        None => full,
    }
}

//==============================================================================
// Raw Import Result
//==============================================================================

/// Headerless, typeless import of a sheet
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RawTable {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<Vec<String>>,
    pub values: Vec<Vec<CellValue>>,
}

impl RawTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row_count(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.headers.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name("my_crate::model::Person"), "Person");
        assert_eq!(short_type_name("Person"), "Person");
        assert_eq!(
            short_type_name("my_crate::Wrapper<other::Inner>"),
            "Wrapper<other::Inner>"
        );
    }

    #[test]
    fn test_type_key_identity() {
        struct A;
        struct B;
        assert_eq!(TypeKey::of::<A>(), TypeKey::of::<A>());
        assert_ne!(TypeKey::of::<A>(), TypeKey::of::<B>());
        assert_eq!(TypeKey::of::<A>().short_name(), "A");
    }

    #[test]
    fn test_cell_value_usage() {
        assert!(!CellValue::Empty.is_used());
        assert!(!CellValue::Text(String::new()).is_used());
        assert!(CellValue::Text(" ".to_string()).is_used());
        assert!(CellValue::Int(0).is_used());
        assert!(CellValue::Bool(false).is_used());
    }

    #[test]
    fn test_cell_value_serializes_to_json() {
        let row = vec![
            CellValue::Empty,
            CellValue::Int(7),
            CellValue::Text("x".to_string()),
            CellValue::Duration(Duration::hours(14)),
        ];
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"[null,7,"x","14:00:00"]"#);
    }
}
