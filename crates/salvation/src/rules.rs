// File: salvation/src/rules.rs
// Purpose: Validation vocabulary, built-in patterns and the merged rule table

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::ConfigError;

// At least one non-whitespace character
pub(crate) static REQUIRED_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S").unwrap());

pub(crate) static NUMERIC_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").unwrap());

pub(crate) static ALPHANUMERIC_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]+$").unwrap());

// local-part @ domain (3-63 chars) . tld
pub(crate) static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_.+-]+@[A-Za-z0-9.-]{3,63}\.[A-Za-z]{2,}$").unwrap()
});

/// A validation type a field can declare in its type list
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ValidationType {
    Required,
    Length,
    Numeric,
    Alphanumeric,
    Email,
    Date,
    /// Any user-supplied name, matched against the custom rule table
    Custom(String),
}

impl ValidationType {
    /// Map a declared name onto the vocabulary
    ///
    /// Built-in names are matched case-insensitively; anything else becomes a
    /// custom type carrying the trimmed name verbatim.
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        match name.to_ascii_lowercase().as_str() {
            "required" => ValidationType::Required,
            "length" => ValidationType::Length,
            "numeric" => ValidationType::Numeric,
            "alphanumeric" => ValidationType::Alphanumeric,
            "email" => ValidationType::Email,
            "date" => ValidationType::Date,
            _ => ValidationType::Custom(name.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ValidationType::Required => "required",
            ValidationType::Length => "length",
            ValidationType::Numeric => "numeric",
            ValidationType::Alphanumeric => "alphanumeric",
            ValidationType::Email => "email",
            ValidationType::Date => "date",
            ValidationType::Custom(name) => name,
        }
    }

    pub fn is_builtin(&self) -> bool {
        !matches!(self, ValidationType::Custom(_))
    }
}

impl fmt::Display for ValidationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<&str> for ValidationType {
    fn from(name: &str) -> Self {
        ValidationType::from_name(name)
    }
}

impl From<String> for ValidationType {
    fn from(name: String) -> Self {
        ValidationType::from_name(&name)
    }
}

impl From<ValidationType> for String {
    fn from(ty: ValidationType) -> Self {
        ty.name().to_string()
    }
}

/// Built-in plus user-declared rules, fixed at construction
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    custom: Vec<(String, Regex)>,
}

impl RuleSet {
    /// Only the built-in vocabulary
    pub fn builtin() -> Self {
        Self::default()
    }

    /// Merge user rules over the built-ins
    ///
    /// A user rule never shadows a built-in of the same name; such entries are
    /// dropped with a warning. New names extend the vocabulary.
    pub fn with_custom(custom: &BTreeMap<String, String>) -> Result<Self, ConfigError> {
        let mut rules = Vec::with_capacity(custom.len());

        for (name, pattern) in custom {
            let ty = ValidationType::from_name(name);
            if ty.is_builtin() {
                tracing::warn!("Custom rule '{}' ignored: built-in rule of the same name wins", name);
                continue;
            }

            let regex = Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
                name: name.trim().to_string(),
                source,
            })?;
            rules.push((ty.name().to_string(), regex));
        }

        Ok(Self { custom: rules })
    }

    /// Whether a rule exists for the given type
    pub fn knows(&self, ty: &ValidationType) -> bool {
        match ty {
            ValidationType::Custom(name) => self.custom(name).is_some(),
            _ => true,
        }
    }

    /// Compiled user pattern for a custom type name
    pub fn custom(&self, name: &str) -> Option<&Regex> {
        self.custom
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, regex)| regex)
    }

    /// Names of the user-declared rules, in table order
    pub fn custom_names(&self) -> impl Iterator<Item = &str> {
        self.custom.iter().map(|(n, _)| n.as_str())
    }
}
