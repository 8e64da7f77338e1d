// File: salvation/src/date.rs
// Purpose: Date template decomposition and calendar verification

use chrono::{Datelike, Days, Months, NaiveDate};
use regex::Regex;

/// One delimiter-separated part of a date template (`MM`, `DD`, `YYYY`, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateComponent {
    /// First letter of the component, uppercased
    pub key: char,
    /// Number of letters in the template component
    pub width: usize,
}

impl DateComponent {
    fn digits(&self) -> String {
        if self.key == 'Y' {
            format!("([0-9]{{{}}})", self.width)
        } else {
            format!("([0-9]{{1,{}}})", self.width)
        }
    }
}

/// Outcome of checking a value against a date template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateCheck {
    Valid,
    /// Digit grouping or delimiter does not match the template
    Malformed,
    /// Shape matches but the date does not exist (Feb 31, month 13, day 0)
    Impossible,
}

impl DateCheck {
    pub fn is_valid(&self) -> bool {
        matches!(self, DateCheck::Valid)
    }
}

/// Matching rule derived from a date template such as `MM/DD/YYYY`
#[derive(Debug, Clone)]
pub struct DateSpec {
    format: String,
    delimiter: char,
    components: Vec<DateComponent>,
    regex: Regex,
}

impl DateSpec {
    /// Decompose a template
    ///
    /// The delimiter is the first non-word character of the template. Returns
    /// `None` when the template has no delimiter or contains an empty component.
    pub fn from_format(format: &str) -> Option<Self> {
        let delimiter = format.chars().find(|c| !is_word_char(*c))?;

        let mut components = Vec::new();
        for part in format.split(delimiter) {
            let key = part.chars().next()?.to_ascii_uppercase();
            components.push(DateComponent {
                key,
                width: part.chars().count(),
            });
        }

        let separator = regex::escape(&delimiter.to_string());
        let body = components
            .iter()
            .map(DateComponent::digits)
            .collect::<Vec<_>>()
            .join(&separator);

        let regex = Regex::new(&format!("^{}$", body)).ok()?;

        Some(Self {
            format: format.to_string(),
            delimiter,
            components,
            regex,
        })
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    pub fn components(&self) -> &[DateComponent] {
        &self.components
    }

    /// Anchored pattern the value must match
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Syntactic then calendar check of a non-empty value
    pub fn check(&self, value: &str, reference_year: i32) -> DateCheck {
        let Some(caps) = self.regex.captures(value) else {
            return DateCheck::Malformed;
        };

        let part = |key: char| {
            self.components
                .iter()
                .position(|c| c.key == key)
                .and_then(|i| caps.get(i + 1))
                .map(|m| m.as_str())
        };

        // Only Y/M/D templates get calendar semantics
        let (Some(year), Some(month), Some(day)) = (part('Y'), part('M'), part('D')) else {
            return DateCheck::Valid;
        };

        let year = if year.len() == 2 {
            format!("{}{}", century_prefix(reference_year), year)
        } else {
            year.to_string()
        };

        let parsed = (
            year.parse::<i32>(),
            month.parse::<u32>(),
            day.parse::<u32>(),
        );
        let (Ok(year), Ok(month), Ok(day)) = parsed else {
            return DateCheck::Impossible;
        };

        match normalize(year, month, day) {
            Some(date) if date.year() == year && date.month() == month && date.day() == day => {
                DateCheck::Valid
            }
            _ => DateCheck::Impossible,
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// First two digits of the reference year
fn century_prefix(reference_year: i32) -> String {
    let year = format!("{:04}", reference_year.rem_euclid(10_000));
    year[..2].to_string()
}

/// Calendar arithmetic with overflow: month 13 rolls into next year, day 0
/// into the previous month, and so on
fn normalize(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1)?;

    let shifted = if month >= 1 {
        start.checked_add_months(Months::new(month - 1))?
    } else {
        start.checked_sub_months(Months::new(1))?
    };

    if day >= 1 {
        shifted.checked_add_days(Days::new(u64::from(day - 1)))
    } else {
        shifted.checked_sub_days(Days::new(1))
    }
}
