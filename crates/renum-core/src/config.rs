use crate::error::EnumError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Naming rules applied to declared types and values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamingOptions {
    /// Type and value names must start with an uppercase letter (default: true)
    #[serde(default = "default_true")]
    pub require_capitalized: bool,
}

impl Default for NamingOptions {
    fn default() -> Self {
        Self {
            require_capitalized: true,
        }
    }
}

/// Options controlling how the factory builds enum types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactoryConfig {
    /// Naming rules
    #[serde(default)]
    pub naming: NamingOptions,

    /// String keys given to `EnumType::get` accept snake_case (default: true)
    #[serde(default = "default_true")]
    pub fuzzy_lookup: bool,

    /// Keyed init arguments naming no declared field are errors rather than
    /// warnings (default: true)
    #[serde(default = "default_true")]
    pub strict_fields: bool,

    /// Pretty-print diagnostics (default: true)
    #[serde(default = "default_true")]
    pub pretty: bool,
}

fn default_true() -> bool {
    true
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            naming: NamingOptions::default(),
            fuzzy_lookup: true,
            strict_fields: true,
            pretty: true,
        }
    }
}

impl FactoryConfig {
    /// Load configuration from a JSON or YAML file, chosen by extension
    pub fn from_file(path: &Path) -> Result<Self, EnumError> {
        let content = std::fs::read_to_string(path)?;
        if is_yaml(path) {
            serde_yaml::from_str(&content).map_err(|e| EnumError::Config(e.to_string()))
        } else {
            serde_json::from_str(&content).map_err(|e| EnumError::Config(e.to_string()))
        }
    }

    /// Create a default configuration and write it to a JSON file
    pub fn init_file(path: &Path) -> Result<(), EnumError> {
        let config = FactoryConfig::default();
        let json = serde_json::to_string_pretty(&config)
            .map_err(|e| EnumError::Config(e.to_string()))?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

pub(crate) fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml" | "yml")
    )
}
