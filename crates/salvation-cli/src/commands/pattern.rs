use anyhow::{bail, Result};
use colored::Colorize;
use salvation::DateSpec;

pub fn execute(format: &str) -> Result<()> {
    let Some(spec) = DateSpec::from_format(format) else {
        bail!("Date format '{}' has no delimiter or an empty component", format);
    };

    println!("Format:    {}", spec.format().cyan());
    println!("Delimiter: {}", spec.delimiter().to_string().cyan());
    println!("Pattern:   {}", spec.pattern().green());
    for component in spec.components() {
        let digits = if component.key == 'Y' {
            format!("exactly {}", component.width)
        } else {
            format!("1 to {}", component.width)
        };
        println!("  {} -> {} digits", component.key.to_string().yellow(), digits);
    }

    Ok(())
}
