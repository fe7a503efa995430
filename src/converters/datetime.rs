use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::fmt::Write;

use super::serial::serial_to_datetime;
use super::ValueConverter;
use crate::culture::Culture;
use crate::error::SheetBindError;
use crate::types::{CellValue, TypeKey};

/// ISO-8601 style patterns accepted after the culture patterns
const ISO_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Writes `NaiveDateTime` fields as culture-formatted text
#[derive(Debug, Clone, Copy, Default)]
pub struct DateTimeConverter;

impl ValueConverter for DateTimeConverter {
    fn write(
        &self,
        value: CellValue,
        declared: TypeKey,
        culture: &Culture,
    ) -> anyhow::Result<CellValue> {
        if declared != TypeKey::of::<NaiveDateTime>() {
            return Ok(value);
        }
        match value {
            CellValue::DateTime(dt) => {
                let mut text = String::new();
                write!(text, "{}", dt.format(culture.datetime_format())).map_err(|_| {
                    SheetBindError::Conversion(format!(
                        "Invalid date-time pattern '{}' in culture '{}'",
                        culture.datetime_format(),
                        culture.name()
                    ))
                })?;
                Ok(CellValue::Text(text))
            }
            other => Ok(other),
        }
    }

    fn read(&self, value: CellValue) -> anyhow::Result<CellValue> {
        let parsed = match &value {
            CellValue::DateTime(dt) => Some(*dt),
            CellValue::Float(serial) => serial_to_datetime(*serial),
            CellValue::Int(serial) => serial_to_datetime(*serial as f64),
            CellValue::Text(text) => parse_datetime(text),
            _ => None,
        };
        parsed.map(CellValue::DateTime).ok_or_else(|| {
            SheetBindError::Conversion(format!("Cannot parse datetime from '{}'", value)).into()
        })
    }
}

/// Parse date-time text: current culture first, then every built-in
/// culture, then ISO-8601 forms and bare dates.
pub fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let current = Culture::current();
    NaiveDateTime::parse_from_str(text, current.datetime_format())
        .ok()
        .or_else(|| {
            Culture::builtin_formats()
                .chain(ISO_FORMATS.iter().copied())
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        })
        .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.naive_local()))
        .or_else(|| {
            ["%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y"]
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn birthday() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(1990, 2, 14)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_write_invariant() {
        let out = DateTimeConverter
            .write(
                CellValue::DateTime(birthday()),
                TypeKey::of::<NaiveDateTime>(),
                &Culture::invariant(),
            )
            .unwrap();
        assert_eq!(out, CellValue::from("02/14/1990 00:00:00"));
    }

    #[test]
    fn test_write_with_culture() {
        let culture = Culture::from_name("de-DE").unwrap();
        let out = DateTimeConverter
            .write(
                CellValue::DateTime(birthday()),
                TypeKey::of::<NaiveDateTime>(),
                &culture,
            )
            .unwrap();
        assert_eq!(out, CellValue::from("14.02.1990 00:00:00"));
    }

    #[test]
    fn test_write_passes_other_types_through() {
        let out = DateTimeConverter
            .write(CellValue::Int(5), TypeKey::of::<i32>(), &Culture::invariant())
            .unwrap();
        assert_eq!(out, CellValue::Int(5));
    }

    #[test]
    fn test_write_invalid_pattern_is_conversion_error() {
        let culture = Culture::custom("broken", "%Y-%Q");
        let err = DateTimeConverter
            .write(
                CellValue::DateTime(birthday()),
                TypeKey::of::<NaiveDateTime>(),
                &culture,
            )
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SheetBindError>(),
            Some(SheetBindError::Conversion(msg)) if msg.contains("%Y-%Q")
        ));
    }

    #[test]
    fn test_read_formats() {
        for text in ["02/14/1990 00:00:00", "14.02.1990 00:00:00", "1990-02-14", "1990-02-14T00:00:00"] {
            let out = DateTimeConverter.read(CellValue::from(text)).unwrap();
            assert_eq!(out, CellValue::DateTime(birthday()), "input {}", text);
        }
    }

    #[test]
    fn test_read_serial_number() {
        let out = DateTimeConverter.read(CellValue::Float(32918.0)).unwrap();
        assert_eq!(out, CellValue::DateTime(birthday()));
    }

    #[test]
    fn test_read_garbage_fails() {
        let err = DateTimeConverter.read(CellValue::from("yesterday")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SheetBindError>(),
            Some(SheetBindError::Conversion(_))
        ));
        assert!(DateTimeConverter.read(CellValue::Empty).is_err());
    }
}
