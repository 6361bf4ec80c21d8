//! Rendering of state results and exec outcomes

use armflow_cloud::outcome::to_value;
use armflow_cloud::{Failure, Outcome, StateResult, Verdict};
use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
    Human,
}

/// An exec result ready to print
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub value: Value,
    pub ok: bool,
}

impl Rendered {
    pub fn outcome<T: Serialize>(outcome: &Outcome<T>) -> Self {
        Self {
            value: to_value(outcome),
            ok: outcome.is_ok(),
        }
    }

    /// Deletes and restarts report a bare boolean
    pub fn flag(ok: bool) -> Self {
        Self {
            value: Value::Bool(ok),
            ok,
        }
    }

    pub fn failure(failure: &Failure) -> Self {
        Self::outcome::<()>(&Err(failure.clone()))
    }
}

pub fn print_state(result: &StateResult, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(result)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(result)?),
        OutputFormat::Human => {
            let marker = match result.result {
                Verdict::Success => "✓".green().bold(),
                Verdict::Pending => "~".yellow().bold(),
                Verdict::Failure => "✗".red().bold(),
            };
            println!("{} {}: {}", marker, result.name.cyan(), result.comment);
            if let Some(change) = &result.changes {
                println!("  {}", "old:".dimmed());
                print_indented(&change.old)?;
                println!("  {}", "new:".dimmed());
                print_indented(&change.new)?;
            }
        }
    }
    Ok(())
}

pub fn print_value(rendered: &Rendered, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rendered.value)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&rendered.value)?),
        OutputFormat::Human => match rendered.value.get("error").and_then(Value::as_str) {
            Some(message) if !rendered.ok => {
                println!("{} {}", "✗".red().bold(), message);
            }
            _ => println!("{}", serde_json::to_string_pretty(&rendered.value)?),
        },
    }
    Ok(())
}

fn print_indented(value: &Value) -> anyhow::Result<()> {
    for line in serde_json::to_string_pretty(value)?.lines() {
        println!("    {}", line);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use armflow_cloud::FailureKind;
    use serde_json::json;

    #[test]
    fn test_rendered_outcome() {
        let ok: Outcome<Value> = Ok(json!({"name": "rg1"}));
        assert_eq!(
            Rendered::outcome(&ok),
            Rendered {
                value: json!({"name": "rg1"}),
                ok: true
            }
        );

        let failure = Failure::new(FailureKind::RemoteRejection, "boom");
        let rendered = Rendered::failure(&failure);
        assert_eq!(rendered.value, json!({"error": "boom"}));
        assert!(!rendered.ok);
    }

    #[test]
    fn test_flag() {
        assert_eq!(Rendered::flag(false).value, json!(false));
        assert!(Rendered::flag(true).ok);
    }
}
