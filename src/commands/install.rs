//! Install command - retries the install step on a transformed tree.

use anyhow::{Context, Result};

use jurisdiction_bootstrap::config::Config;
use jurisdiction_bootstrap::PipInstaller;

use super::transform_from;

/// Execute the install command.
pub fn cmd_install(config: &Config) -> Result<()> {
    let transform = transform_from(config, false)?;
    let pip = PipInstaller::new(&config.pip);

    let project_root = transform
        .install_only(&pip)
        .context("Install of transformed tree failed")?;

    println!("Installed {}", project_root.display());
    Ok(())
}
