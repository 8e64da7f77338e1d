// File: salvation/src/compiler.rs
// Purpose: Turn a declared validation type plus field parameters into a concrete rule

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::config::Config;
use crate::date::DateSpec;
use crate::field::Field;
use crate::rules::{RuleSet, ValidationType, ALPHANUMERIC_REGEX, EMAIL_REGEX, NUMERIC_REGEX};

// data-length shapes: "5", "1,5", "3,"
static LENGTH_SINGLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([0-9])$").unwrap());
static LENGTH_RANGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([0-9]),([0-9])$").unwrap());
static LENGTH_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([0-9]),$").unwrap());

/// A rule ready to be tested against field values
#[derive(Debug, Clone)]
pub enum CompiledRule {
    /// Value must contain a non-whitespace character
    Required,
    /// Character count within `min..=max`; `max: None` is open-ended
    Length { min: usize, max: Option<usize> },
    /// Fixed built-in pattern (numeric, alphanumeric, email)
    Pattern {
        ty: ValidationType,
        regex: &'static Regex,
    },
    Date(DateSpec),
    Custom { name: String, regex: Regex },
    /// Declared type with no rule in the table
    Unknown(String),
}

impl CompiledRule {
    /// The validation type this rule reports failures under
    pub fn validation_type(&self) -> ValidationType {
        match self {
            CompiledRule::Required => ValidationType::Required,
            CompiledRule::Length { .. } => ValidationType::Length,
            CompiledRule::Pattern { ty, .. } => ty.clone(),
            CompiledRule::Date(_) => ValidationType::Date,
            CompiledRule::Custom { name, .. } | CompiledRule::Unknown(name) => {
                ValidationType::Custom(name.clone())
            }
        }
    }
}

/// Qualifier read from the format attribute of a length-constrained field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthQualifier {
    Max,
    Min,
}

impl LengthQualifier {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "max" => Some(LengthQualifier::Max),
            "min" => Some(LengthQualifier::Min),
            _ => None,
        }
    }
}

/// Parse a length specifier into `(min, max)` bounds
///
/// With a qualifier the specifier is a single digit. Without one, `lo,hi`,
/// `lo,` and a bare digit (implicit max) are accepted. Anything else is `None`.
pub fn parse_length(spec: &str, qualifier: Option<LengthQualifier>) -> Option<(usize, Option<usize>)> {
    match qualifier {
        Some(LengthQualifier::Max) => {
            let caps = LENGTH_SINGLE.captures(spec)?;
            Some((0, Some(digit(&caps, 1)?)))
        }
        Some(LengthQualifier::Min) => {
            let caps = LENGTH_SINGLE.captures(spec)?;
            Some((digit(&caps, 1)?, None))
        }
        None => {
            if let Some(caps) = LENGTH_RANGE.captures(spec) {
                let (lo, hi) = (digit(&caps, 1)?, digit(&caps, 2)?);
                // an inverted pair describes no range at all
                (lo <= hi).then_some((lo, Some(hi)))
            } else if let Some(caps) = LENGTH_OPEN.captures(spec) {
                Some((digit(&caps, 1)?, None))
            } else if let Some(caps) = LENGTH_SINGLE.captures(spec) {
                Some((0, Some(digit(&caps, 1)?)))
            } else {
                None
            }
        }
    }
}

fn digit(caps: &Captures<'_>, i: usize) -> Option<usize> {
    caps.get(i).and_then(|m| m.as_str().parse::<usize>().ok())
}

/// Effective date template of a field
///
/// The format attribute wins unless it holds a length qualifier, then the
/// legacy date attribute, then the configured default.
pub fn date_format_for<F: Field + ?Sized>(field: &F, config: &Config) -> String {
    let attrs = &config.attributes;

    field
        .attribute(&attrs.format)
        .filter(|f| !f.trim().is_empty() && LengthQualifier::parse(f).is_none())
        .or_else(|| field.attribute(&attrs.date).filter(|f| !f.trim().is_empty()))
        .unwrap_or(config.date_format.as_str())
        .to_string()
}

/// Compile the rule for `ty` against one field
///
/// Returns `None` (skip) when the field's parameters cannot produce a rule:
/// a missing or malformed length specifier, or an undecomposable date template.
pub fn compile<F: Field + ?Sized>(
    ty: &ValidationType,
    field: &F,
    rules: &RuleSet,
    config: &Config,
) -> Option<CompiledRule> {
    match ty {
        ValidationType::Required => Some(CompiledRule::Required),
        ValidationType::Numeric => Some(CompiledRule::Pattern {
            ty: ty.clone(),
            regex: &NUMERIC_REGEX,
        }),
        ValidationType::Alphanumeric => Some(CompiledRule::Pattern {
            ty: ty.clone(),
            regex: &ALPHANUMERIC_REGEX,
        }),
        ValidationType::Email => Some(CompiledRule::Pattern {
            ty: ty.clone(),
            regex: &EMAIL_REGEX,
        }),
        ValidationType::Length => compile_length(field, config),
        ValidationType::Date => compile_date(field, config),
        ValidationType::Custom(name) => match rules.custom(name) {
            Some(regex) => Some(CompiledRule::Custom {
                name: name.clone(),
                regex: regex.clone(),
            }),
            None => Some(CompiledRule::Unknown(name.clone())),
        },
    }
}

fn compile_length<F: Field + ?Sized>(field: &F, config: &Config) -> Option<CompiledRule> {
    let attrs = &config.attributes;

    let Some(spec) = field.attribute(&attrs.length) else {
        tracing::debug!("Field '{}' has no {} attribute, skipping length", field.id(), attrs.length);
        return None;
    };
    let qualifier = field.attribute(&attrs.format).and_then(LengthQualifier::parse);

    match parse_length(spec, qualifier) {
        Some((min, max)) => Some(CompiledRule::Length { min, max }),
        None => {
            tracing::debug!("Field '{}' has malformed length '{}', skipping", field.id(), spec);
            None
        }
    }
}

fn compile_date<F: Field + ?Sized>(field: &F, config: &Config) -> Option<CompiledRule> {
    let format = date_format_for(field, config);

    match DateSpec::from_format(&format) {
        Some(spec) => Some(CompiledRule::Date(spec)),
        None => {
            tracing::debug!("Field '{}' has undecomposable date format '{}', skipping", field.id(), format);
            None
        }
    }
}
