use crate::acct;
use crate::output::OutputFormat;
use colored::Colorize;
use std::path::Path;

/// Print the profiles of the acct file; false when there is no file
pub fn handle(acct_file: Option<&Path>, format: OutputFormat) -> anyhow::Result<bool> {
    let Some(path) = acct::locate(acct_file)? else {
        eprintln!("{}", "✗ No acct file found".red().bold());
        eprintln!("  Create acct.yaml or set ARMFLOW_ACCT_FILE");
        return Ok(false);
    };

    let profiles = armflow_config::list_profiles(&path)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&profiles)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&profiles)?),
        OutputFormat::Human => {
            println!("acct file: {}", path.display().to_string().cyan());
            for profile in &profiles {
                println!("  - {}", profile);
            }
        }
    }
    Ok(true)
}
