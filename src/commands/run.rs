//! Run command - transforms the template and installs it.

use anyhow::{Context, Result};

use jurisdiction_bootstrap::config::Config;
use jurisdiction_bootstrap::{Installer, NoInstall, PipInstaller};

use super::transform_from;

/// Execute the run command.
pub fn cmd_run(config: &Config, relocate: bool, no_install: bool) -> Result<()> {
    let transform = transform_from(config, relocate)?;

    let pip = PipInstaller::new(&config.pip);
    let installer: &dyn Installer = if no_install { &NoInstall } else { &pip };

    let report = transform
        .run(installer)
        .with_context(|| format!("Transform of {} failed", transform.root().display()))?;

    println!();
    report.print();
    Ok(())
}
