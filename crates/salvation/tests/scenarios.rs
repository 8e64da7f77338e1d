//! Behavioural scenarios for the rule compiler and evaluator
//!
//! Each case builds a field the way markup would declare it and checks the
//! verdict reported for it.

use rstest::rstest;
use salvation::{evaluate_one, Config, EvalContext, InputField, RuleSet, ValidationType, Verdict};

fn check(field: &InputField) -> Verdict {
    let config = Config::default().with_reference_year(2024);
    let rules = RuleSet::builtin();
    evaluate_one(field, &EvalContext::new(&config, &rules))
}

fn length_field(spec: &str, format: Option<&str>, value: &str) -> InputField {
    let field = InputField::new("f").with_attr("data-length", spec).with_value(value);
    match format {
        Some(format) => field.with_attr("data-format", format),
        None => field,
    }
}

#[rstest]
#[case("abcdef", false)]
#[case("abcde", true)]
#[case("abc", true)]
#[case("", true)]
fn test_bare_digit_means_max_length(#[case] value: &str, #[case] valid: bool) {
    assert_eq!(check(&length_field("5", None, value)).valid, valid);
}

#[rstest]
#[case("ab", true)]
#[case("abc", true)]
#[case("abcd", false)]
fn test_max_qualifier(#[case] value: &str, #[case] valid: bool) {
    assert_eq!(check(&length_field("3", Some("max"), value)).valid, valid);
}

#[rstest]
#[case("ab", false)]
#[case("abc", true)]
#[case("abcdefghijklmnop", true)]
#[case("", true)]
fn test_min_qualifier(#[case] value: &str, #[case] valid: bool) {
    assert_eq!(check(&length_field("3", Some("min"), value)).valid, valid);
}

#[rstest]
#[case("1,5", "", true)]
#[case("1,5", "a", true)]
#[case("1,5", "abcdef", false)]
#[case("2,", "a", false)]
#[case("2,", "a much longer value", true)]
fn test_range_specifiers(#[case] spec: &str, #[case] value: &str, #[case] valid: bool) {
    assert_eq!(check(&length_field(spec, None, value)).valid, valid);
}

#[rstest]
#[case("10")]
#[case("1-5")]
#[case("x")]
#[case("5,1")]
fn test_malformed_length_is_skipped(#[case] spec: &str) {
    let verdict = check(&length_field(spec, None, "a value far too long for any bound"));
    assert!(verdict.valid);
}

#[test]
fn test_length_verdict_reason() {
    assert_eq!(
        check(&length_field("5", None, "abcdef")),
        Verdict::invalid("f", ValidationType::Length)
    );
}

#[rstest]
#[case("", false)]
#[case("   ", false)]
#[case("\t\n", false)]
#[case("x", true)]
#[case("  x  ", true)]
fn test_required(#[case] value: &str, #[case] valid: bool) {
    let field = InputField::new("r").with_attr("data-validate", "required").with_value(value);
    assert_eq!(check(&field).valid, valid);
}

#[rstest]
#[case("user@example.com", true)]
#[case("user@ex", false)]
#[case("user example.com", false)]
#[case("josé@example.com", false)]
#[case("", true)]
fn test_email(#[case] value: &str, #[case] valid: bool) {
    let field = InputField::new("e").with_attr("data-validate", "email").with_value(value);
    assert_eq!(check(&field).valid, valid);
}

#[rstest]
#[case("12345", true)]
#[case("12a45", false)]
#[case("12 45", false)]
#[case("", true)]
fn test_numeric(#[case] value: &str, #[case] valid: bool) {
    let field = InputField::new("n").with_attr("data-validate", "numeric").with_value(value);
    assert_eq!(check(&field).valid, valid);
}

#[rstest]
#[case("abc123", true)]
#[case("abc-123", false)]
#[case("naïve", false)]
#[case("", true)]
fn test_alphanumeric(#[case] value: &str, #[case] valid: bool) {
    let field = InputField::new("a").with_attr("data-validate", "alphanumeric").with_value(value);
    assert_eq!(check(&field).valid, valid);
}

#[rstest]
#[case("MM/DD/YYYY", "03/07/2024", true)]
#[case("MM/DD/YYYY", "3/7/2024", true)]
#[case("MM/DD/YYYY", "02/31/2024", false)]
#[case("MM/DD/YYYY", "13/01/2024", false)]
#[case("MM/DD/YYYY", "00/01/2024", false)]
#[case("MM/DD/YYYY", "03-07-2024", false)]
#[case("MM/DD/YYYY", "03/07/24", false)]
#[case("MM/DD/YYYY", "", true)]
#[case("YYYY-MM-DD", "2024-02-29", true)]
#[case("YYYY-MM-DD", "2023-02-29", false)]
#[case("DD.MM.YY", "31.12.24", true)]
#[case("DD.MM.YY", "31.04.24", false)]
fn test_dates(#[case] format: &str, #[case] value: &str, #[case] valid: bool) {
    let field = InputField::new("d")
        .with_attr("data-validate", "date")
        .with_attr("data-format", format)
        .with_value(value);
    let verdict = check(&field);

    assert_eq!(verdict.valid, valid);
    if !valid {
        assert_eq!(verdict.reason, Some(ValidationType::Date));
    }
}

#[test]
fn test_two_digit_year_uses_current_century() {
    let field = InputField::new("d")
        .with_attr("data-validate", "date")
        .with_attr("data-format", "MM/DD/YY")
        .with_value("02/29/24");
    // read as 2024
    assert!(check(&field).valid);

    let config = Config::default().with_reference_year(1899);
    let rules = RuleSet::builtin();
    let field = field.with_value("02/29/00");
    // 1800 is not a leap year
    assert!(!evaluate_one(&field, &EvalContext::new(&config, &rules)).valid);
}

#[test]
fn test_global_date_format_applies_without_field_format() {
    let config = Config::default().with_date_format("DD/MM/YYYY").with_reference_year(2024);
    let rules = RuleSet::builtin();
    let ctx = EvalContext::new(&config, &rules);

    let field = InputField::new("d").with_attr("data-validate", "date").with_value("31/12/2024");
    assert!(evaluate_one(&field, &ctx).valid);

    let field = field.with_value("12/31/2024");
    assert!(!evaluate_one(&field, &ctx).valid);
}

#[test]
fn test_undecomposable_global_format_skips_dates() {
    let config = Config::default().with_date_format("YYYYMMDD");
    let rules = RuleSet::builtin();

    let field = InputField::new("d").with_attr("data-validate", "date").with_value("garbage");
    assert!(evaluate_one(&field, &EvalContext::new(&config, &rules)).valid);
}

#[test]
fn test_required_reported_before_numeric() {
    let field = InputField::new("q").with_attr("data-validate", "required,numeric");
    assert_eq!(check(&field), Verdict::invalid("q", ValidationType::Required));
}

#[test]
fn test_declared_order_decides_reason() {
    let field = InputField::new("q")
        .with_attr("data-validate", "numeric,email")
        .with_value("abc");
    assert_eq!(check(&field).reason, Some(ValidationType::Numeric));

    let field = InputField::new("q")
        .with_attr("data-validate", "email,numeric")
        .with_value("abc");
    assert_eq!(check(&field).reason, Some(ValidationType::Email));
}

#[test]
fn test_length_checked_last_when_not_declared() {
    let field = InputField::new("q")
        .with_attr("data-validate", "numeric")
        .with_attr("data-length", "2")
        .with_value("abc");
    assert_eq!(check(&field).reason, Some(ValidationType::Numeric));

    let field = InputField::new("q")
        .with_attr("data-validate", "length,numeric")
        .with_attr("data-length", "2")
        .with_value("abc");
    assert_eq!(check(&field).reason, Some(ValidationType::Length));
}

#[test]
fn test_unknown_type_passes_silently() {
    let field = InputField::new("p").with_attr("data-validate", "phone").with_value("not a phone");
    assert!(check(&field).valid);
}

#[test]
fn test_custom_rule() {
    let config = Config::default().with_rule("zipcode", r"^\d{5}$");
    let rules = RuleSet::with_custom(&config.rules).unwrap();
    let ctx = EvalContext::new(&config, &rules);

    let field = InputField::new("z").with_attr("data-validate", "zipcode").with_value("1234");
    assert_eq!(
        evaluate_one(&field, &ctx),
        Verdict::invalid("z", ValidationType::Custom("zipcode".into()))
    );
    assert!(evaluate_one(&field.clone().with_value("12345"), &ctx).valid);
    assert!(evaluate_one(&field.with_value(""), &ctx).valid);
}
