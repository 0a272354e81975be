//! Delegated package installation.
//!
//! The transform ends by installing the renamed package in editable mode.
//! Installation sits behind [`Installer`] so the transform can run against
//! any package manager, or none at all.

use std::path::Path;

use crate::error::{Result, TransformError};
use crate::process::Cmd;

/// Installs a project into the active environment.
pub trait Installer {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Install the project rooted at `project_root`.
    fn install(&self, project_root: &Path) -> Result<()>;
}

/// `pip install --editable .`, run from the project root.
#[derive(Debug, Clone)]
pub struct PipInstaller {
    program: String,
}

impl PipInstaller {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command(&self, project_root: &Path) -> Cmd {
        Cmd::new(&self.program)
            .args(["install", "--editable", "."])
            .dir(project_root)
            .error_msg(format!("{} install --editable . failed", self.program))
    }
}

impl Installer for PipInstaller {
    fn name(&self) -> &str {
        &self.program
    }

    fn install(&self, project_root: &Path) -> Result<()> {
        self.command(project_root)
            .run()
            .map(|_| ())
            .map_err(|e| TransformError::InstallFailure {
                dir: project_root.to_path_buf(),
                message: format!("{e:#}"),
            })
    }
}

/// Skips installation. Used for dry runs and `--no-install`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInstall;

impl Installer for NoInstall {
    fn name(&self) -> &str {
        "none"
    }

    fn install(&self, _project_root: &Path) -> Result<()> {
        Ok(())
    }
}
