//! YAML configuration for the command line front-end
//!
//! ```yaml
//! culture: de-DE
//! import:
//!   has_header: true
//!   break_on_error: false
//! ```

use serde::Deserialize;
use std::path::Path;

use crate::culture::Culture;
use crate::error::{SheetBindError, SheetBindResult};
use crate::settings::SheetImportSettings;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BindConfig {
    /// Culture name installed as the process current culture
    pub culture: Option<String>,
    pub import: SheetImportSettings,
}

impl BindConfig {
    pub fn from_yaml_str(yaml: &str) -> SheetBindResult<Self> {
        let config: BindConfig = serde_yaml::from_str(yaml)?;
        if let Some(name) = &config.culture {
            Culture::from_name(name)?;
        }
        Ok(config)
    }

    pub fn load(path: &Path) -> SheetBindResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SheetBindError::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Install the configured culture as the current one
    pub fn apply_culture(&self) -> SheetBindResult<()> {
        if let Some(name) = &self.culture {
            Culture::set_current(Culture::from_name(name)?);
        }
        Ok(())
    }
}
