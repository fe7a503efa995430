//! Column plans and the process-wide descriptor cache

use once_cell::sync::Lazy;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};
use tracing::debug;

use super::attributes::{resolve_attributes, ColumnAttributes, FieldKind};
use super::schema::FieldAccessor;
use super::SheetRecord;
use crate::converters::{lookup_converter, ValueConverter};
use crate::error::SheetBindResult;
use crate::types::{short_type_name, CellValue, TypeKey};

type DescriptorCache = HashMap<TypeId, Arc<dyn Any + Send + Sync>>;

static DESCRIPTORS: Lazy<RwLock<DescriptorCache>> = Lazy::new(|| RwLock::new(HashMap::new()));

/// One column of a plan, bound to one field of `T`
pub struct ColumnDescriptor<T> {
    pub key: String,
    pub type_key: TypeKey,
    pub attributes: ColumnAttributes,
    pub converter: Option<Arc<dyn ValueConverter>>,
    accessor: Box<dyn FieldAccessor<T>>,
}

impl<T> ColumnDescriptor<T> {
    pub fn kind(&self) -> FieldKind {
        if self.attributes.ignore {
            FieldKind::Ignored
        } else if self.attributes.translate {
            FieldKind::Translated
        } else if self.converter.is_some() {
            FieldKind::CustomConverted
        } else {
            FieldKind::Plain
        }
    }

    pub(crate) fn get(&self, record: &T) -> CellValue {
        self.accessor.get(record)
    }

    pub(crate) fn set(&self, record: &mut T, value: CellValue) -> SheetBindResult<()> {
        self.accessor.set(record, value)
    }
}

impl<T> fmt::Debug for ColumnDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDescriptor")
            .field("key", &self.key)
            .field("type", &self.type_key.short_name())
            .field("attributes", &self.attributes)
            .field("converter", &self.converter.is_some())
            .finish()
    }
}

/// Cached column plan of a record type
#[derive(Debug)]
pub struct SheetDescriptor<T> {
    pub type_name: &'static str,
    pub name: String,
    pub dictionary_prefix: String,
    pub columns: Vec<ColumnDescriptor<T>>,
}

impl<T> SheetDescriptor<T> {
    /// Localizer key for a sheet name or heading
    pub fn translation_key(&self, text: &str) -> String {
        format!("{}{}", self.dictionary_prefix, text)
    }

    /// Columns that are written and read, in plan order
    pub fn active_columns(&self) -> impl Iterator<Item = &ColumnDescriptor<T>> {
        self.columns.iter().filter(|c| !c.attributes.ignore)
    }

    pub fn headings(&self) -> Vec<&str> {
        self.active_columns()
            .map(|c| c.attributes.heading.as_str())
            .collect()
    }
}

/// Column plan of `T`, built on first use and cached for the process
/// lifetime. Repeated calls return the same `Arc`.
pub fn describe<T: SheetRecord>() -> SheetBindResult<Arc<SheetDescriptor<T>>> {
    if let Some(hit) = cached::<T>() {
        return Ok(hit);
    }

    let built: Arc<dyn Any + Send + Sync> = Arc::new(build_descriptor::<T>()?);
    let entry = {
        let mut cache = match DESCRIPTORS.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        cache.entry(TypeId::of::<T>()).or_insert(built).clone()
    };
    Ok(downcast(entry))
}

/// Number of record types described so far
pub fn cached_descriptor_count() -> usize {
    match DESCRIPTORS.read() {
        Ok(cache) => cache.len(),
        Err(poisoned) => poisoned.into_inner().len(),
    }
}

fn cached<T: SheetRecord>() -> Option<Arc<SheetDescriptor<T>>> {
    let cache = match DESCRIPTORS.read() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    cache.get(&TypeId::of::<T>()).cloned().map(downcast)
}

fn downcast<T: SheetRecord>(entry: Arc<dyn Any + Send + Sync>) -> Arc<SheetDescriptor<T>> {
    // entries are keyed by TypeId::of::<T>() and always hold SheetDescriptor<T>
    match entry.downcast::<SheetDescriptor<T>>() {
        Ok(descriptor) => descriptor,
        Err(_) => unreachable!("descriptor cache entry has a foreign type"),
    }
}

fn build_descriptor<T: SheetRecord>() -> SheetBindResult<SheetDescriptor<T>> {
    let type_name = short_type_name(std::any::type_name::<T>());
    let schema = T::schema();

    let mut columns = Vec::with_capacity(schema.fields.len());
    for field in schema.fields {
        let attributes = resolve_attributes(type_name, &field)?;
        let converter = lookup_converter(field.type_key);
        columns.push(ColumnDescriptor {
            key: field.key,
            type_key: field.type_key,
            attributes,
            converter,
            accessor: field.accessor,
        });
    }

    let descriptor = SheetDescriptor {
        type_name,
        name: schema.sheet_name.unwrap_or_else(|| type_name.to_string()),
        dictionary_prefix: schema.dictionary_prefix.unwrap_or_default(),
        columns,
    };
    debug!(
        record = type_name,
        columns = descriptor.columns.len(),
        active = descriptor.active_columns().count(),
        "described record type"
    );
    Ok(descriptor)
}
