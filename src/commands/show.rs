//! Show command - displays information.

use anyhow::Result;

use jurisdiction_bootstrap::config::Config;
use jurisdiction_bootstrap::JurisdictionName;

/// Show target for the show command.
pub enum ShowTarget {
    /// Show configuration
    Config,
    /// Show every name derived from an identifier
    Names { identifier: Option<String> },
}

/// Execute the show command.
pub fn cmd_show(config: &Config, target: ShowTarget) -> Result<()> {
    match target {
        ShowTarget::Config => config.print(),
        ShowTarget::Names { identifier } => {
            let raw = match identifier {
                Some(raw) => raw,
                None => config.require_jurisdiction()?.to_string(),
            };
            let name = JurisdictionName::parse(&raw)?;
            println!("Display:       {}", name.display());
            println!("Lowercase:     {}", name.lowercase());
            println!("Space-joined:  {}", name.space_joined());
            println!("Snake case:    {}", name.snake_case());
            println!("Package:       {}", name.package_name());
            println!("Project dir:   {}", name.project_dir_name());
        }
    }
    Ok(())
}
