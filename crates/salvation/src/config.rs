// File: salvation/src/config.rs
// Purpose: Validator configuration, parsed from salvation.toml or built in code

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

/// Validator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Default date template for fields without their own format
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Show the effective date template as placeholder text on date fields
    #[serde(default = "default_false")]
    pub date_placeholder_enabled: bool,

    /// Marker class the presentation layer toggles on invalid fields
    #[serde(default = "default_error_class")]
    pub error_class: String,

    /// Reject unknown validation types at setup instead of letting them pass
    #[serde(default = "default_false")]
    pub strict_types: bool,

    /// Year used for the two-digit-year heuristic (default: current year)
    #[serde(default)]
    pub reference_year: Option<i32>,

    #[serde(default)]
    pub attributes: AttributeNames,

    /// User rules: type name -> regular expression
    #[serde(default)]
    pub rules: BTreeMap<String, String>,

    /// Hint text overrides: reason code -> message
    #[serde(default)]
    pub messages: HashMap<String, String>,
}

/// Names of the attributes the engine reads off each field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeNames {
    #[serde(default = "default_validate_attr")]
    pub validate: String,

    #[serde(default = "default_length_attr")]
    pub length: String,

    /// Length qualifier (`max`/`min`) or per-field date template
    #[serde(default = "default_format_attr")]
    pub format: String,

    /// Legacy per-field date template
    #[serde(default = "default_date_attr")]
    pub date: String,

    #[serde(default = "default_required_attr")]
    pub required: String,
}

// Default values
fn default_date_format() -> String {
    "MM/DD/YYYY".to_string()
}

fn default_error_class() -> String {
    "error".to_string()
}

fn default_validate_attr() -> String {
    "data-validate".to_string()
}

fn default_length_attr() -> String {
    "data-length".to_string()
}

fn default_format_attr() -> String {
    "data-format".to_string()
}

fn default_date_attr() -> String {
    "data-date".to_string()
}

fn default_required_attr() -> String {
    "required".to_string()
}

fn default_false() -> bool {
    false
}

impl Default for Config {
    fn default() -> Self {
        Self {
            date_format: default_date_format(),
            date_placeholder_enabled: false,
            error_class: default_error_class(),
            strict_types: false,
            reference_year: None,
            attributes: AttributeNames::default(),
            rules: BTreeMap::new(),
            messages: HashMap::new(),
        }
    }
}

impl Default for AttributeNames {
    fn default() -> Self {
        Self {
            validate: default_validate_attr(),
            length: default_length_attr(),
            format: default_format_attr(),
            date: default_date_attr(),
            required: default_required_attr(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // Missing file means defaults
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Load configuration from default path (./salvation.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("salvation.toml")
    }

    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    pub fn with_reference_year(mut self, year: i32) -> Self {
        self.reference_year = Some(year);
        self
    }

    pub fn with_rule(mut self, name: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.rules.insert(name.into(), pattern.into());
        self
    }

    pub fn strict(mut self) -> Self {
        self.strict_types = true;
        self
    }
}
