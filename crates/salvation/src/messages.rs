// File: salvation/src/messages.rs
// Purpose: Reason code -> hint text for invalid fields

use std::collections::HashMap;

use crate::rules::ValidationType;

/// Default hints, keyed by reason code
const DEFAULT_MESSAGES: &[(&str, &str)] = &[
    ("required", "This field is required"),
    ("length", "This field has the wrong length"),
    ("numeric", "Only digits are allowed"),
    ("alphanumeric", "Only letters and digits are allowed"),
    ("email", "Invalid email address"),
    ("date", "Invalid date"),
    ("unknown", "Invalid value"),
];

/// Reason code a failing type reports under
///
/// Custom types have no dedicated hint and fall back to `unknown`.
pub fn reason_code(ty: &ValidationType) -> &str {
    match ty {
        ValidationType::Custom(_) => "unknown",
        builtin => builtin.name(),
    }
}

/// Hint table with configured overrides applied
#[derive(Debug, Clone)]
pub struct Messages {
    table: HashMap<String, String>,
}

impl Messages {
    pub fn new(overrides: &HashMap<String, String>) -> Self {
        let mut table: HashMap<String, String> = DEFAULT_MESSAGES
            .iter()
            .map(|(code, msg)| (code.to_string(), msg.to_string()))
            .collect();

        for (code, msg) in overrides {
            table.insert(code.clone(), msg.clone());
        }

        Self { table }
    }

    /// Hint for a failing type
    ///
    /// An override keyed by a custom type's own name wins over `unknown`.
    pub fn hint(&self, ty: &ValidationType) -> &str {
        self.table
            .get(ty.name())
            .or_else(|| self.table.get(reason_code(ty)))
            .map(String::as_str)
            .unwrap_or("Invalid value")
    }
}

impl Default for Messages {
    fn default() -> Self {
        Self::new(&HashMap::new())
    }
}
