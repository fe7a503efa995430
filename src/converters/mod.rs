//! Value converters between field values and their cell representation
//!
//! Converters are looked up by the declared type of a field when its record
//! type is first described. Built-in converters cover `chrono::NaiveDateTime`
//! and `chrono::Duration`; callers register their own with
//! [`register_converter`].

pub mod datetime;
pub(crate) mod serial;
pub mod timespan;

pub use datetime::DateTimeConverter;
pub use timespan::TimeSpanConverter;

use chrono::{Duration, NaiveDateTime};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::culture::Culture;
use crate::types::{CellValue, TypeKey};

/// Bidirectional transform between a field value and its cell value.
///
/// Errors are `anyhow` so custom converters can surface any failure; the
/// built-ins fail with [`crate::SheetBindError::Conversion`].
pub trait ValueConverter: Send + Sync {
    /// Field value → cell value
    fn write(
        &self,
        value: CellValue,
        declared: TypeKey,
        culture: &Culture,
    ) -> anyhow::Result<CellValue>;

    /// Cell value → field value
    fn read(&self, value: CellValue) -> anyhow::Result<CellValue>;
}

type Registry = HashMap<TypeKey, Arc<dyn ValueConverter>>;

static CONVERTERS: Lazy<RwLock<Registry>> = Lazy::new(|| {
    let mut converters: Registry = HashMap::new();
    converters.insert(
        TypeKey::of::<NaiveDateTime>(),
        Arc::new(DateTimeConverter),
    );
    converters.insert(TypeKey::of::<Duration>(), Arc::new(TimeSpanConverter));
    RwLock::new(converters)
});

/// Declare the converter for values of type `V`, replacing any previous one.
///
/// Record types already described keep the converter they were built with.
pub fn register_converter<V: 'static>(converter: impl ValueConverter + 'static) {
    register_converter_for(TypeKey::of::<V>(), Arc::new(converter));
}

pub fn register_converter_for(key: TypeKey, converter: Arc<dyn ValueConverter>) {
    let mut converters = match CONVERTERS.write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    converters.insert(key, converter);
}

/// Exact-type lookup; no subtype or `Option<_>` unwrapping.
pub fn lookup_converter(key: TypeKey) -> Option<Arc<dyn ValueConverter>> {
    let converters = match CONVERTERS.read() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    converters.get(&key).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Shouting;

    impl ValueConverter for Shouting {
        fn write(&self, value: CellValue, _: TypeKey, _: &Culture) -> anyhow::Result<CellValue> {
            Ok(CellValue::Text(value.to_string().to_uppercase()))
        }

        fn read(&self, value: CellValue) -> anyhow::Result<CellValue> {
            Ok(CellValue::Text(value.to_string().to_lowercase()))
        }
    }

    #[test]
    fn test_builtins_registered() {
        assert!(lookup_converter(TypeKey::of::<NaiveDateTime>()).is_some());
        assert!(lookup_converter(TypeKey::of::<Duration>()).is_some());
    }

    #[test]
    fn test_exact_type_only() {
        assert!(lookup_converter(TypeKey::of::<Option<NaiveDateTime>>()).is_none());
        assert!(lookup_converter(TypeKey::of::<String>()).is_none());
    }

    #[test]
    fn test_register_last_write_wins() {
        struct Marker;
        register_converter::<Marker>(DateTimeConverter);
        register_converter::<Marker>(Shouting);

        let converter = lookup_converter(TypeKey::of::<Marker>()).unwrap();
        let written = converter
            .write(CellValue::from("abc"), TypeKey::of::<Marker>(), &Culture::invariant())
            .unwrap();
        assert_eq!(written, CellValue::from("ABC"));
    }
}
