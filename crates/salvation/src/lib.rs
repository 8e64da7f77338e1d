//! Salvation - declarative form field validation
//!
//! Fields declare what they expect through attributes (`required`,
//! `data-validate="numeric,length"`, `data-length="1,5"`, `data-format`).
//! The engine sorts them into buckets, compiles a concrete rule per field and
//! reports which fields fail and why.
//!
//! ```ignore
//! use salvation::{Config, InputField, NoHooks, Validator};
//!
//! let fields = vec![
//!     InputField::new("zip").with_attr("data-validate", "numeric").with_attr("data-length", "5"),
//!     InputField::new("born").with_attr("data-validate", "date").with_value("02/31/2024"),
//! ];
//!
//! let mut validator = Validator::new(Config::default(), &fields)?;
//! let report = validator.validate_submit(&fields, &mut NoHooks);
//! assert!(report.blocked);
//! ```

pub mod classifier;
pub mod compiler;
pub mod config;
pub mod date;
pub mod error;
pub mod evaluator;
pub mod field;
pub mod messages;
pub mod rules;
pub mod validator;

pub use classifier::{classify, memberships, Bucket, BucketMap};
pub use compiler::{compile, date_format_for, parse_length, CompiledRule, LengthQualifier};
pub use config::{AttributeNames, Config};
pub use date::{DateCheck, DateComponent, DateSpec};
pub use error::ConfigError;
pub use evaluator::{check_value, evaluate_bucket, evaluate_one, EvalContext, Verdict};
pub use field::{declared_types, Field, FieldId, InputField};
pub use messages::{reason_code, Messages};
pub use rules::{RuleSet, ValidationType};
pub use validator::{
    BucketFailure, CallbackHooks, NoHooks, Presenter, SubmitReport, ValidationHooks, Validator,
};
