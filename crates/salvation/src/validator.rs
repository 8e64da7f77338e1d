// File: salvation/src/validator.rs
// Purpose: Orchestrates classification, bulk submit checks and live re-checks

use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};

use crate::classifier::{classify, memberships, BucketMap};
use crate::compiler::{compile, date_format_for, CompiledRule};
use crate::config::Config;
use crate::error::ConfigError;
use crate::evaluator::{evaluate_bucket, evaluate_one, EvalContext, Verdict};
use crate::field::{Field, FieldId};
use crate::messages::Messages;
use crate::rules::{RuleSet, ValidationType};

/// Callbacks fired after a check
///
/// Both methods default to no-ops, so hosts implement only what they need.
pub trait ValidationHooks {
    /// Fields that passed every rule they are subject to
    fn on_validation(&mut self, _fields: &[FieldId]) {}

    /// Fields that failed `reason`
    fn on_invalidation(&mut self, _fields: &[FieldId], _reason: &ValidationType) {}
}

/// Hooks that do nothing
pub struct NoHooks;

impl ValidationHooks for NoHooks {}

type ValidationFn<'a> = Box<dyn FnMut(&[FieldId]) + 'a>;
type InvalidationFn<'a> = Box<dyn FnMut(&[FieldId], &ValidationType) + 'a>;

/// Hooks built from closures
#[derive(Default)]
pub struct CallbackHooks<'a> {
    on_validation: Option<ValidationFn<'a>>,
    on_invalidation: Option<InvalidationFn<'a>>,
}

impl<'a> CallbackHooks<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_validation(mut self, f: impl FnMut(&[FieldId]) + 'a) -> Self {
        self.on_validation = Some(Box::new(f));
        self
    }

    pub fn with_invalidation(mut self, f: impl FnMut(&[FieldId], &ValidationType) + 'a) -> Self {
        self.on_invalidation = Some(Box::new(f));
        self
    }
}

impl ValidationHooks for CallbackHooks<'_> {
    fn on_validation(&mut self, fields: &[FieldId]) {
        if let Some(f) = self.on_validation.as_mut() {
            f(fields);
        }
    }

    fn on_invalidation(&mut self, fields: &[FieldId], reason: &ValidationType) {
        if let Some(f) = self.on_invalidation.as_mut() {
            f(fields, reason);
        }
    }
}

/// Presentation layer driven by verdicts: error class, hint text, focus
pub trait Presenter {
    fn mark_invalid(&mut self, field: &str, class: &str, hint: &str);
    fn clear(&mut self, field: &str, class: &str);
    fn focus(&mut self, field: &str);
}

/// Failing fields of one bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketFailure {
    pub reason: ValidationType,
    pub fields: Vec<FieldId>,
}

/// Result of a bulk submit-time pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubmitReport {
    /// Failing buckets, in bucket order
    pub failures: Vec<BucketFailure>,
    /// One verdict per classified field, in snapshot order
    pub verdicts: Vec<Verdict>,
    /// Whether the submission must be stopped
    pub blocked: bool,
    /// First field that turned invalid in this pass
    pub focus: Option<FieldId>,
}

impl SubmitReport {
    pub fn invalid_fields(&self) -> impl Iterator<Item = &Verdict> {
        self.verdicts.iter().filter(|v| !v.valid)
    }
}

/// Configured validator for one form
pub struct Validator {
    config: Config,
    rules: RuleSet,
    messages: Messages,
    buckets: BucketMap,
    invalid: HashSet<FieldId>,
    /// Declared types with no rule, already reported
    unknown: BTreeSet<String>,
}

impl Validator {
    /// Build the rule table and classify the initial fields
    pub fn new<F: Field>(config: Config, fields: &[F]) -> Result<Self, ConfigError> {
        let rules = RuleSet::with_custom(&config.rules)?;
        let messages = Messages::new(&config.messages);

        let mut validator = Self {
            buckets: BucketMap::new(),
            config,
            rules,
            messages,
            invalid: HashSet::new(),
            unknown: BTreeSet::new(),
        };

        for field in fields {
            validator.ensure_known(field)?;
        }
        validator.buckets = classify(fields, &validator.config.attributes);

        tracing::info!(
            "Validator ready: {} fields, {} buckets, {} custom rules",
            fields.len(),
            validator.buckets.len(),
            validator.rules.custom_names().count()
        );

        Ok(validator)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn buckets(&self) -> &BucketMap {
        &self.buckets
    }

    pub fn error_class(&self) -> &str {
        &self.config.error_class
    }

    pub fn is_invalid(&self, id: &str) -> bool {
        self.invalid.contains(id)
    }

    fn context(&self) -> EvalContext<'_> {
        EvalContext::new(&self.config, &self.rules)
    }

    /// Declared types with no rule in the table, in name order
    pub fn unknown_types(&self) -> impl Iterator<Item = &str> {
        self.unknown.iter().map(String::as_str)
    }

    /// Reject (with `strict_types`) or report once the types the table lacks
    fn ensure_known<F: Field + ?Sized>(&mut self, field: &F) -> Result<(), ConfigError> {
        for ty in memberships(field, &self.config.attributes) {
            if self.rules.knows(&ty) {
                continue;
            }
            if self.config.strict_types {
                return Err(ConfigError::UnknownType {
                    field: field.id().to_string(),
                    name: ty.name().to_string(),
                });
            }
            if self.unknown.insert(ty.name().to_string()) {
                tracing::warn!("No rule for validation type '{}' (field '{}'), it will always pass", ty, field.id());
            }
        }
        Ok(())
    }

    /// Add a field inserted after setup
    pub fn register_field<F: Field + ?Sized>(&mut self, field: &F) -> Result<Vec<ValidationType>, ConfigError> {
        self.ensure_known(field)?;
        Ok(self.buckets.register_field(field, &self.config.attributes))
    }

    /// Forget a field removed from the document
    pub fn unregister_field(&mut self, id: &str) -> bool {
        self.invalid.remove(id);
        self.buckets.unregister_field(id)
    }

    /// Rule `ty` compiles to for this field, `None` when skipped
    pub fn compile_rule<F: Field + ?Sized>(&self, ty: &ValidationType, field: &F) -> Option<CompiledRule> {
        compile(ty, field, &self.rules, &self.config)
    }

    /// Failing members of one bucket, without touching validity state
    pub fn evaluate_bucket<F: Field>(&self, ty: &ValidationType, fields: &[F]) -> Vec<FieldId> {
        let Some(members) = self.buckets.get(ty) else {
            return Vec::new();
        };
        evaluate_bucket(ty, members, |id| fields.iter().find(|f| f.id() == id), &self.context())
    }

    /// Verdict for one field, without touching validity state
    pub fn evaluate_one<F: Field + ?Sized>(&self, field: &F) -> Verdict {
        evaluate_one(field, &self.context())
    }

    /// Bulk pass over every bucket, as on a submit attempt
    pub fn validate_submit<F, H>(&mut self, fields: &[F], hooks: &mut H) -> SubmitReport
    where
        F: Field,
        H: ValidationHooks + ?Sized,
    {
        let index: HashMap<&str, &F> = fields.iter().map(|f| (f.id(), f)).collect();
        let ctx = self.context();

        let mut failures = Vec::new();

        for bucket in self.buckets.iter() {
            let failing = evaluate_bucket(&bucket.name, &bucket.members, |id| index.get(id).copied(), &ctx);
            if failing.is_empty() {
                continue;
            }

            hooks.on_invalidation(&failing, &bucket.name);
            failures.push(BucketFailure {
                reason: bucket.name.clone(),
                fields: failing,
            });
        }

        let failed: Vec<(&ValidationType, &str)> = failures
            .iter()
            .flat_map(|failure| failure.fields.iter().map(move |id| (&failure.reason, id.as_str())))
            .collect();

        // reason follows the field's own type order, not bucket order
        let verdicts: Vec<Verdict> = fields
            .iter()
            .filter(|f| self.buckets.iter().any(|b| b.members.iter().any(|m| m == f.id())))
            .map(|f| {
                let id = f.id();
                let reason = memberships(f, &self.config.attributes)
                    .into_iter()
                    .find(|ty| failed.contains(&(ty, id)))
                    .or_else(|| failed.iter().find(|(_, other)| *other == id).map(|(ty, _)| (*ty).clone()));

                match reason {
                    Some(reason) => Verdict::invalid(id, reason),
                    None => Verdict::valid(id),
                }
            })
            .collect();

        let focus = failures
            .iter()
            .flat_map(|failure| failure.fields.iter())
            .find(|id| !self.invalid.contains(id.as_str()))
            .cloned();

        let passed: Vec<FieldId> = verdicts.iter().filter(|v| v.valid).map(|v| v.field.clone()).collect();
        if !passed.is_empty() {
            hooks.on_validation(&passed);
        }

        let blocked = !failures.is_empty();
        if blocked {
            tracing::debug!("Submission blocked: {} failing buckets", failures.len());
        }

        self.invalid = verdicts.iter().filter(|v| !v.valid).map(|v| v.field.clone()).collect();

        SubmitReport {
            failures,
            verdicts,
            blocked,
            focus,
        }
    }

    /// Live re-check of a single field after its value changed
    pub fn check_field<F, H>(&mut self, field: &F, hooks: &mut H) -> Verdict
    where
        F: Field + ?Sized,
        H: ValidationHooks + ?Sized,
    {
        let verdict = self.evaluate_one(field);
        let ids = [verdict.field.clone()];

        match &verdict.reason {
            Some(reason) => {
                self.invalid.insert(verdict.field.clone());
                hooks.on_invalidation(&ids, reason);
            }
            None => {
                self.invalid.remove(&verdict.field);
                hooks.on_validation(&ids);
            }
        }

        verdict
    }

    /// Placeholder text for date fields, when enabled
    pub fn placeholder_for<F: Field + ?Sized>(&self, field: &F) -> Option<String> {
        if !self.config.date_placeholder_enabled || !self.buckets.contains(&ValidationType::Date, field.id()) {
            return None;
        }
        Some(date_format_for(field, &self.config))
    }

    /// Hint text for an invalid verdict
    pub fn hint_for(&self, verdict: &Verdict) -> Option<&str> {
        verdict.reason.as_ref().map(|reason| self.messages.hint(reason))
    }

    /// Push one verdict to the presentation layer
    pub fn present_verdict<P: Presenter + ?Sized>(&self, verdict: &Verdict, presenter: &mut P) {
        match self.hint_for(verdict) {
            Some(hint) => presenter.mark_invalid(&verdict.field, self.error_class(), hint),
            None => presenter.clear(&verdict.field, self.error_class()),
        }
    }

    /// Push a submit report to the presentation layer, focusing the first new failure
    pub fn present<P: Presenter + ?Sized>(&self, report: &SubmitReport, presenter: &mut P) {
        for verdict in &report.verdicts {
            self.present_verdict(verdict, presenter);
        }
        if let Some(id) = &report.focus {
            presenter.focus(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::InputField;

    #[test]
    fn test_strict_types_rejects_unknown_names() {
        let fields = vec![InputField::new("p").with_attr("data-validate", "phone")];

        assert!(Validator::new(Config::default(), &fields).is_ok());

        let err = Validator::new(Config::default().strict(), &fields).err().unwrap();
        assert!(matches!(err, ConfigError::UnknownType { ref name, .. } if name == "phone"));

        let config = Config::default().strict().with_rule("phone", r"^\+?[0-9 ]+$");
        assert!(Validator::new(config, &fields).is_ok());
    }

    #[test]
    fn test_unknown_types_are_noted_once() {
        let fields = vec![
            InputField::new("p").with_attr("data-validate", "phone"),
            InputField::new("q").with_attr("data-validate", "phone,numeric"),
        ];
        let mut validator = Validator::new(Config::default(), &fields).unwrap();
        assert_eq!(validator.unknown_types().collect::<Vec<_>>(), vec!["phone"]);

        let fax = InputField::new("f").with_attr("data-validate", "fax").with_value("x");
        validator.register_field(&fax).unwrap();
        assert_eq!(validator.unknown_types().collect::<Vec<_>>(), vec!["fax", "phone"]);
        assert!(validator.evaluate_one(&fax).valid);
    }

    #[test]
    fn test_check_field_tracks_validity() {
        let mut field = InputField::new("age").with_attr("data-validate", "numeric").with_value("x");
        let mut validator = Validator::new(Config::default(), std::slice::from_ref(&field)).unwrap();

        let verdict = validator.check_field(&field, &mut NoHooks);
        assert!(!verdict.valid);
        assert!(validator.is_invalid("age"));

        field.set_value("42");
        assert!(validator.check_field(&field, &mut NoHooks).valid);
        assert!(!validator.is_invalid("age"));
    }

    #[test]
    fn test_placeholder_only_when_enabled() {
        let fields = vec![
            InputField::new("born").with_attr("data-validate", "date"),
            InputField::new("name"),
        ];

        let validator = Validator::new(Config::default(), &fields).unwrap();
        assert_eq!(validator.placeholder_for(&fields[0]), None);

        let mut config = Config::default();
        config.date_placeholder_enabled = true;
        let validator = Validator::new(config, &fields).unwrap();
        assert_eq!(validator.placeholder_for(&fields[0]).as_deref(), Some("MM/DD/YYYY"));
        assert_eq!(validator.placeholder_for(&fields[1]), None);
    }
}
