//! CLI command handlers.
//!
//! Each submodule handles a specific CLI command:
//! - `run` - Transform the template and install it
//! - `plan` - Show what a transform would do
//! - `install` - Retry only the install step
//! - `preflight` - Run preflight checks
//! - `show` - Display configuration or derived names

mod install;
mod plan;
mod preflight;
mod run;
pub mod show;

pub use install::cmd_install;
pub use plan::cmd_plan;
pub use preflight::cmd_preflight;
pub use run::cmd_run;
pub use show::cmd_show;

use anyhow::Result;

use jurisdiction_bootstrap::config::Config;
use jurisdiction_bootstrap::Transform;

/// Build a transform from resolved configuration.
fn transform_from(config: &Config, relocate: bool) -> Result<Transform> {
    let name = config.require_jurisdiction()?;
    Ok(Transform::new(&config.template_root, name)
        .target_files(&config.target_files)
        .metadata_file(&config.metadata_file)
        .relocate_root(relocate))
}
