//! Plan command - shows what a transform would do, without doing it.

use anyhow::{Context, Result};

use jurisdiction_bootstrap::config::Config;

use super::transform_from;

/// Execute the plan command.
pub fn cmd_plan(config: &Config, relocate: bool, json: bool) -> Result<()> {
    let transform = transform_from(config, relocate)?;
    let plan = transform
        .plan()
        .with_context(|| format!("Cannot plan transform of {}", transform.root().display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        plan.print();
    }
    Ok(())
}
