//! Culture-specific formatting rules for date-time cells

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

use crate::error::{SheetBindError, SheetBindResult};

/// Built-in cultures: (name, chrono date-time pattern)
const BUILTIN_CULTURES: &[(&str, &str)] = &[
    ("", "%m/%d/%Y %H:%M:%S"),
    ("en-US", "%-m/%-d/%Y %-I:%M:%S %p"),
    ("en-GB", "%d/%m/%Y %H:%M:%S"),
    ("de-DE", "%d.%m.%Y %H:%M:%S"),
    ("fr-FR", "%d/%m/%Y %H:%M:%S"),
    ("cs-CZ", "%-d.%-m.%Y %-H:%M:%S"),
    ("ja-JP", "%Y/%m/%d %-H:%M:%S"),
];

static CURRENT_CULTURE: Lazy<RwLock<Culture>> = Lazy::new(|| RwLock::new(Culture::from_env()));

/// Named date-time formatting rules.
///
/// The empty name is the invariant culture.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Culture {
    name: String,
    datetime_format: String,
}

impl Culture {
    pub fn invariant() -> Self {
        Self {
            name: String::new(),
            datetime_format: BUILTIN_CULTURES[0].1.to_string(),
        }
    }

    /// Look up a built-in culture by its name (`de-DE`, `en_GB`, ...).
    pub fn from_name(name: &str) -> SheetBindResult<Self> {
        let wanted = name.replace('_', "-");
        BUILTIN_CULTURES
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(&wanted))
            .map(|(n, fmt)| Self {
                name: n.to_string(),
                datetime_format: fmt.to_string(),
            })
            .ok_or_else(|| SheetBindError::Config(format!("Unknown culture '{}'", name)))
    }

    /// Culture with a caller-supplied chrono pattern
    pub fn custom(name: impl Into<String>, datetime_format: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            datetime_format: datetime_format.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn datetime_format(&self) -> &str {
        &self.datetime_format
    }

    pub fn is_invariant(&self) -> bool {
        self.name.is_empty()
    }

    /// The process-wide current culture
    pub fn current() -> Culture {
        match CURRENT_CULTURE.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Replace the process-wide current culture
    pub fn set_current(culture: Culture) {
        match CURRENT_CULTURE.write() {
            Ok(mut guard) => *guard = culture,
            Err(poisoned) => *poisoned.into_inner() = culture,
        }
    }

    /// Every built-in date-time pattern, used as parse fallbacks
    pub(crate) fn builtin_formats() -> impl Iterator<Item = &'static str> {
        BUILTIN_CULTURES.iter().map(|(_, fmt)| *fmt)
    }

    /// Derive the culture from `LC_ALL` / `LANG` (`de_DE.UTF-8` → `de-DE`),
    /// falling back to invariant.
    fn from_env() -> Self {
        ["LC_ALL", "LANG"]
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .map(|value| value.split('.').next().unwrap_or_default().to_string())
            .find_map(|locale| Self::from_name(&locale).ok())
            .unwrap_or_else(Self::invariant)
    }
}

impl Default for Culture {
    fn default() -> Self {
        Self::invariant()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_accepts_posix_style() {
        let culture = Culture::from_name("de_DE").unwrap();
        assert_eq!(culture.name(), "de-DE");
        assert_eq!(culture.datetime_format(), "%d.%m.%Y %H:%M:%S");
    }

    #[test]
    fn test_from_name_unknown() {
        let result = Culture::from_name("xx-YY");
        assert!(matches!(result, Err(SheetBindError::Config(_))));
    }

    #[test]
    fn test_invariant_default() {
        let culture = Culture::default();
        assert!(culture.is_invariant());
        assert_eq!(culture.datetime_format(), "%m/%d/%Y %H:%M:%S");
    }

    #[test]
    fn test_custom_culture() {
        let culture = Culture::custom("iso", "%Y-%m-%dT%H:%M:%S");
        assert_eq!(culture.name(), "iso");
        assert!(!culture.is_invariant());
    }
}
