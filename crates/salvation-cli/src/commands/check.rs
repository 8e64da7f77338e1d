use anyhow::{Context, Result};
use colored::Colorize;
use salvation::{Config, InputField, NoHooks, Validator};
use std::fs;
use std::path::Path;

/// Run a submit pass over a form snapshot; returns whether it was blocked
pub fn execute(form: &Path, config: Option<&Path>, date_format: Option<String>, json: bool) -> Result<bool> {
    let mut config = match config {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    };
    if let Some(format) = date_format {
        config.date_format = format;
    }

    let content = fs::read_to_string(form)
        .with_context(|| format!("Failed to read form snapshot: {:?}", form))?;
    let fields: Vec<InputField> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse form snapshot: {:?}", form))?;

    tracing::debug!("Loaded {} fields from {:?}", fields.len(), form);

    let mut validator = Validator::new(config, &fields)?;
    let report = validator.validate_submit(&fields, &mut NoHooks);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(report.blocked);
    }

    println!("{}", format!("Checking {} fields...", fields.len()).green().bold());
    println!();

    for verdict in &report.verdicts {
        match validator.hint_for(verdict) {
            Some(hint) => {
                let reason = verdict.reason.as_ref().map(|r| r.to_string()).unwrap_or_default();
                println!("  {} {} ({}: {})", "✗".red(), verdict.field, reason.yellow(), hint);
            }
            None => println!("  {} {}", "✓".green(), verdict.field),
        }
    }

    for field in &fields {
        if let Some(placeholder) = validator.placeholder_for(field) {
            println!("  {} {} placeholder: {}", "•".cyan(), field.id, placeholder.cyan());
        }
    }

    println!();
    if report.blocked {
        println!("{}", "Submission blocked".red().bold());
        if let Some(focus) = &report.focus {
            println!("Focus: {}", focus.cyan());
        }
    } else {
        println!("{}", "All fields valid".green().bold());
    }

    Ok(report.blocked)
}
