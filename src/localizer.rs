//! Localization collaborator used to translate sheet names, headings and
//! values marked for translation

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::culture::Culture;
use crate::error::SheetBindResult;

/// Key → text lookup scoped to a culture
pub trait Localizer: Send + Sync {
    fn lookup(&self, key: &str) -> String;

    /// A view of this localizer bound to `culture`
    fn with_culture(&self, culture: &Culture) -> Arc<dyn Localizer>;
}

/// In-memory localizer holding one key table per culture name.
///
/// Lookups try the bound culture, then the invariant table (empty name), and
/// finally return the key itself.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DictionaryLocalizer {
    #[serde(flatten)]
    tables: HashMap<String, HashMap<String, String>>,
    #[serde(skip)]
    culture: String,
}

impl DictionaryLocalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry to the invariant table
    pub fn with_entry(self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.with_culture_entry("", key, text)
    }

    pub fn with_culture_entry(
        mut self,
        culture: &str,
        key: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        self.tables
            .entry(culture.to_string())
            .or_default()
            .insert(key.into(), text.into());
        self
    }

    /// Parse tables from YAML:
    ///
    /// ```yaml
    /// "":
    ///   Person.Name: Name
    /// de-DE:
    ///   Person.Name: Vorname
    /// ```
    pub fn from_yaml_str(yaml: &str) -> SheetBindResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_yaml_file(path: &Path) -> SheetBindResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn culture(&self) -> &str {
        &self.culture
    }

    pub fn into_shared(self) -> Arc<dyn Localizer> {
        Arc::new(self)
    }
}

impl Localizer for DictionaryLocalizer {
    fn lookup(&self, key: &str) -> String {
        [self.culture.as_str(), ""]
            .iter()
            .filter_map(|culture| self.tables.get(*culture))
            .find_map(|table| table.get(key))
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    fn with_culture(&self, culture: &Culture) -> Arc<dyn Localizer> {
        Arc::new(Self {
            tables: self.tables.clone(),
            culture: culture.name().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_falls_back_to_key() {
        let localizer = DictionaryLocalizer::new().with_entry("a", "A");
        assert_eq!(localizer.lookup("a"), "A");
        assert_eq!(localizer.lookup("missing.key"), "missing.key");
    }

    #[test]
    fn test_with_culture_prefers_culture_table() {
        let localizer = DictionaryLocalizer::new()
            .with_entry("greeting", "Hello")
            .with_entry("farewell", "Bye")
            .with_culture_entry("de-DE", "greeting", "Hallo");
        let german = localizer.with_culture(&Culture::from_name("de-DE").unwrap());

        assert_eq!(german.lookup("greeting"), "Hallo");
        assert_eq!(german.lookup("farewell"), "Bye");
        assert_eq!(localizer.lookup("greeting"), "Hello");
    }

    #[test]
    fn test_from_yaml_str() {
        let yaml = r#"
"":
  Person.Name: Name
de-DE:
  Person.Name: Vorname
"#;
        let localizer = DictionaryLocalizer::from_yaml_str(yaml).unwrap();
        assert_eq!(localizer.lookup("Person.Name"), "Name");
        let german = localizer.with_culture(&Culture::from_name("de-DE").unwrap());
        assert_eq!(german.lookup("Person.Name"), "Vorname");
    }
}
