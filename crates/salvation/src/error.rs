// File: salvation/src/error.rs
// Purpose: Construction-time configuration errors

use thiserror::Error;

/// Errors raised while building a validator
///
/// Evaluation never fails; a malformed field declaration only exempts that
/// field for the current pass. These errors cover the configuration itself.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Custom rule '{name}' has an invalid pattern: {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },

    #[error("Field '{field}' declares unknown validation type '{name}'")]
    UnknownType { field: String, name: String },
}
