// File: salvation/src/evaluator.rs
// Purpose: Apply compiled rules to field values, in bulk or one field at a time

use chrono::Datelike;
use serde::Serialize;

use crate::classifier::memberships;
use crate::compiler::{compile, CompiledRule};
use crate::config::Config;
use crate::field::{Field, FieldId};
use crate::rules::{RuleSet, ValidationType, REQUIRED_REGEX};

/// Per-field pass/fail result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub field: FieldId,
    pub valid: bool,
    /// First type that failed, in evaluation order
    pub reason: Option<ValidationType>,
}

impl Verdict {
    pub fn valid(field: impl Into<FieldId>) -> Self {
        Self {
            field: field.into(),
            valid: true,
            reason: None,
        }
    }

    pub fn invalid(field: impl Into<FieldId>, reason: ValidationType) -> Self {
        Self {
            field: field.into(),
            valid: false,
            reason: Some(reason),
        }
    }
}

/// Everything an evaluation pass reads besides the fields themselves
#[derive(Debug, Clone, Copy)]
pub struct EvalContext<'a> {
    pub config: &'a Config,
    pub rules: &'a RuleSet,
    /// Year feeding the two-digit-year heuristic
    pub reference_year: i32,
}

impl<'a> EvalContext<'a> {
    pub fn new(config: &'a Config, rules: &'a RuleSet) -> Self {
        Self {
            config,
            rules,
            reference_year: config.reference_year.unwrap_or_else(current_year),
        }
    }
}

fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Test one value against a compiled rule
///
/// Only `Required` looks at empty values; every other rule exempts them.
/// A rule with no table entry passes.
pub fn check_value(rule: &CompiledRule, value: &str, reference_year: i32) -> bool {
    match rule {
        CompiledRule::Required => REQUIRED_REGEX.is_match(value),
        _ if value.is_empty() => true,
        CompiledRule::Length { min, max } => {
            let len = value.chars().count();
            len >= *min && max.map_or(true, |max| len <= max)
        }
        CompiledRule::Pattern { regex, .. } => regex.is_match(value),
        CompiledRule::Date(spec) => spec.check(value, reference_year).is_valid(),
        CompiledRule::Custom { regex, .. } => regex.is_match(value),
        CompiledRule::Unknown(name) => {
            tracing::debug!("No rule for validation type '{}', passing", name);
            true
        }
    }
}

/// Compile and check `ty` for one field; a skipped rule counts as a pass
pub fn check_field<F: Field + ?Sized>(ty: &ValidationType, field: &F, ctx: &EvalContext<'_>) -> bool {
    match compile(ty, field, ctx.rules, ctx.config) {
        Some(rule) => check_value(&rule, field.value(), ctx.reference_year),
        None => true,
    }
}

/// Failing members of one bucket, in bucket order
///
/// Member ids the lookup cannot resolve (removed from the document) are ignored.
pub fn evaluate_bucket<'f, F, L>(
    ty: &ValidationType,
    members: &[FieldId],
    lookup: L,
    ctx: &EvalContext<'_>,
) -> Vec<FieldId>
where
    F: Field + ?Sized + 'f,
    L: Fn(&str) -> Option<&'f F>,
{
    members
        .iter()
        .filter_map(|id| lookup(id.as_str()))
        .filter(|field| !check_field(ty, *field, ctx))
        .map(|field| field.id().to_string())
        .collect()
}

/// Re-check a single field after a live edit
///
/// Declared types run left to right and the first failure wins; the legacy
/// `required`/length attributes are checked afterwards when not declared.
pub fn evaluate_one<F: Field + ?Sized>(field: &F, ctx: &EvalContext<'_>) -> Verdict {
    for ty in memberships(field, &ctx.config.attributes) {
        if !check_field(&ty, field, ctx) {
            return Verdict::invalid(field.id(), ty);
        }
    }

    Verdict::valid(field.id())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::InputField;

    fn ctx<'a>(config: &'a Config, rules: &'a RuleSet) -> EvalContext<'a> {
        EvalContext::new(config, rules)
    }

    #[test]
    fn test_required_sees_empty_values() {
        assert!(!check_value(&CompiledRule::Required, "", 2024));
        assert!(!check_value(&CompiledRule::Required, "   ", 2024));
        assert!(check_value(&CompiledRule::Required, " x ", 2024));
    }

    #[test]
    fn test_length_bounds() {
        let rule = CompiledRule::Length { min: 2, max: Some(4) };
        assert!(check_value(&rule, "", 2024));
        assert!(!check_value(&rule, "a", 2024));
        assert!(check_value(&rule, "ab", 2024));
        assert!(check_value(&rule, "abcd", 2024));
        assert!(!check_value(&rule, "abcde", 2024));

        let open = CompiledRule::Length { min: 3, max: None };
        assert!(!check_value(&open, "ab", 2024));
        assert!(check_value(&open, &"x".repeat(500), 2024));
    }

    #[test]
    fn test_length_counts_characters() {
        let rule = CompiledRule::Length { min: 0, max: Some(3) };
        assert!(check_value(&rule, "äöü", 2024));
    }

    #[test]
    fn test_unknown_rule_passes() {
        assert!(check_value(&CompiledRule::Unknown("phone".into()), "anything", 2024));
    }

    #[test]
    fn test_evaluate_bucket_reports_failures_in_order() {
        let config = Config::default();
        let rules = RuleSet::builtin();
        let fields = vec![
            InputField::new("a").with_value("12a"),
            InputField::new("b").with_value("123"),
            InputField::new("c").with_value(""),
            InputField::new("d").with_value("x"),
        ];
        let members: Vec<FieldId> = vec!["d".into(), "a".into(), "b".into(), "c".into(), "gone".into()];

        let failing = evaluate_bucket(
            &ValidationType::Numeric,
            &members,
            |id| fields.iter().find(|f| f.id == id),
            &ctx(&config, &rules),
        );
        assert_eq!(failing, vec!["d".to_string(), "a".to_string()]);
    }

    #[test]
    fn test_evaluate_one_first_failure_wins() {
        let config = Config::default();
        let rules = RuleSet::builtin();

        let field = InputField::new("n")
            .with_attr("data-validate", "alphanumeric,numeric")
            .with_value("ab!");
        assert_eq!(
            evaluate_one(&field, &ctx(&config, &rules)),
            Verdict::invalid("n", ValidationType::Alphanumeric)
        );

        let field = InputField::new("n")
            .with_attr("data-validate", "numeric")
            .with_attr("data-length", "3")
            .with_value("12345");
        assert_eq!(
            evaluate_one(&field, &ctx(&config, &rules)),
            Verdict::invalid("n", ValidationType::Length)
        );
    }
}
