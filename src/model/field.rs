//! Native field values and the bounded coercion table used when no
//! converter is registered for a field's type

use chrono::{Duration, NaiveDate, NaiveDateTime};
use uuid::Uuid;

use crate::converters::datetime::parse_datetime;
use crate::converters::serial::{serial_to_datetime, serial_to_duration};
use crate::converters::timespan::parse_timespan;
use crate::error::{SheetBindError, SheetBindResult};
use crate::types::CellValue;

/// A type that can live in a record field bound to a sheet column
pub trait FieldValue: Sized + 'static {
    /// Whether values of this type may be translated
    const TEXTUAL: bool = false;

    fn to_cell(&self) -> CellValue;

    /// Coerce a non-empty cell value into this type
    fn from_cell(value: CellValue) -> SheetBindResult<Self>;
}

fn unsupported<T>(value: &CellValue, target: &str) -> SheetBindResult<T> {
    Err(SheetBindError::Conversion(format!(
        "Cannot convert {} '{}' to {}",
        value.type_name(),
        value,
        target
    )))
}

impl FieldValue for String {
    const TEXTUAL: bool = true;

    fn to_cell(&self) -> CellValue {
        CellValue::Text(self.clone())
    }

    fn from_cell(value: CellValue) -> SheetBindResult<Self> {
        match value {
            CellValue::Text(s) => Ok(s),
            other => Ok(other.to_string()),
        }
    }
}

impl FieldValue for bool {
    fn to_cell(&self) -> CellValue {
        CellValue::Bool(*self)
    }

    fn from_cell(value: CellValue) -> SheetBindResult<Self> {
        match &value {
            CellValue::Bool(b) => Ok(*b),
            CellValue::Int(i) => Ok(*i != 0),
            CellValue::Float(x) => Ok(*x != 0.0),
            CellValue::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(true),
                "false" | "0" => Ok(false),
                _ => unsupported(&value, "bool"),
            },
            _ => unsupported(&value, "bool"),
        }
    }
}

/// Integral value of a float cell; fractional or out-of-range input fails
fn integral(x: f64) -> Option<i64> {
    (x.is_finite() && x.fract() == 0.0 && x >= i64::MIN as f64 && x < i64::MAX as f64)
        .then_some(x as i64)
}

macro_rules! impl_integer_field {
    ($($t:ty),*) => {$(
        impl FieldValue for $t {
            fn to_cell(&self) -> CellValue {
                CellValue::Int(*self as i64)
            }

            fn from_cell(value: CellValue) -> SheetBindResult<Self> {
                let wide = match &value {
                    CellValue::Int(i) => Some(*i),
                    CellValue::Float(x) => integral(*x),
                    CellValue::Bool(b) => Some(*b as i64),
                    CellValue::Text(s) => s.trim().parse::<i64>().ok(),
                    _ => None,
                };
                match wide.and_then(|w| <$t>::try_from(w).ok()) {
                    Some(v) => Ok(v),
                    None => unsupported(&value, stringify!($t)),
                }
            }
        }
    )*};
}

impl_integer_field!(i8, i16, i32, i64, u8, u16, u32);

impl FieldValue for u64 {
    fn to_cell(&self) -> CellValue {
        match i64::try_from(*self) {
            Ok(i) => CellValue::Int(i),
            Err(_) => CellValue::Float(*self as f64),
        }
    }

    fn from_cell(value: CellValue) -> SheetBindResult<Self> {
        let parsed = match &value {
            CellValue::Int(i) => u64::try_from(*i).ok(),
            CellValue::Float(x)
                if x.is_finite() && x.fract() == 0.0 && *x >= 0.0 && *x < u64::MAX as f64 =>
            {
                Some(*x as u64)
            }
            CellValue::Bool(b) => Some(*b as u64),
            CellValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        };
        match parsed {
            Some(v) => Ok(v),
            None => unsupported(&value, "u64"),
        }
    }
}

macro_rules! impl_float_field {
    ($($t:ty),*) => {$(
        impl FieldValue for $t {
            fn to_cell(&self) -> CellValue {
                CellValue::Float(*self as f64)
            }

            fn from_cell(value: CellValue) -> SheetBindResult<Self> {
                match &value {
                    CellValue::Float(x) => Ok(*x as $t),
                    CellValue::Int(i) => Ok(*i as $t),
                    CellValue::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
                    CellValue::Text(s) => match s.trim().parse::<$t>() {
                        Ok(v) => Ok(v),
                        Err(_) => unsupported(&value, stringify!($t)),
                    },
                    _ => unsupported(&value, stringify!($t)),
                }
            }
        }
    )*};
}

impl_float_field!(f32, f64);

impl FieldValue for NaiveDateTime {
    fn to_cell(&self) -> CellValue {
        CellValue::DateTime(*self)
    }

    fn from_cell(value: CellValue) -> SheetBindResult<Self> {
        let parsed = match &value {
            CellValue::DateTime(dt) => Some(*dt),
            CellValue::Float(x) => serial_to_datetime(*x),
            CellValue::Text(s) => parse_datetime(s),
            _ => None,
        };
        match parsed {
            Some(dt) => Ok(dt),
            None => unsupported(&value, "NaiveDateTime"),
        }
    }
}

impl FieldValue for NaiveDate {
    fn to_cell(&self) -> CellValue {
        match self.and_hms_opt(0, 0, 0) {
            Some(dt) => CellValue::DateTime(dt),
            None => CellValue::Empty,
        }
    }

    fn from_cell(value: CellValue) -> SheetBindResult<Self> {
        NaiveDateTime::from_cell(value).map(|dt| dt.date())
    }
}

impl FieldValue for Duration {
    fn to_cell(&self) -> CellValue {
        CellValue::Duration(*self)
    }

    fn from_cell(value: CellValue) -> SheetBindResult<Self> {
        let parsed = match &value {
            CellValue::Duration(d) => Some(*d),
            CellValue::Float(days) => serial_to_duration(*days),
            CellValue::Text(s) => parse_timespan(s),
            _ => None,
        };
        match parsed {
            Some(d) => Ok(d),
            None => unsupported(&value, "Duration"),
        }
    }
}

impl FieldValue for Uuid {
    fn to_cell(&self) -> CellValue {
        CellValue::Text(self.to_string())
    }

    fn from_cell(value: CellValue) -> SheetBindResult<Self> {
        match &value {
            CellValue::Text(s) => match Uuid::parse_str(s.trim()) {
                Ok(id) => Ok(id),
                Err(_) => unsupported(&value, "Uuid"),
            },
            _ => unsupported(&value, "Uuid"),
        }
    }
}

impl<V: FieldValue> FieldValue for Option<V> {
    const TEXTUAL: bool = V::TEXTUAL;

    fn to_cell(&self) -> CellValue {
        match self {
            Some(v) => v.to_cell(),
            None => CellValue::Empty,
        }
    }

    fn from_cell(value: CellValue) -> SheetBindResult<Self> {
        match value {
            CellValue::Empty => Ok(None),
            other => V::from_cell(other).map(Some),
        }
    }
}
