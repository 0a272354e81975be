//! The jurisdiction transform.
//!
//! Turns an extracted country template into a jurisdiction package:
//!
//! ```text
//! 1. derive      validate the identifier, derive every name form
//! 2. enumerate   listed files + every file under the package directory
//! 3. rewrite     placeholder substitutions, one pass per file     ┐ planned in memory,
//! 4. normalize   version / maturity resets on the metadata file   ┘ one write per file
//! 5. rename      openfisca_country_template -> openfisca_<snake>
//!    relocate    (optional) root -> openfisca-<space_joined>
//! 6. install     delegated editable install from the project root
//! ```
//!
//! Steps 1-4 are computed before anything is written. Steps 3-5 are
//! journaled; a failure anywhere in them rolls the tree back. A failed
//! install leaves the tree transformed so only the install needs retrying.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{Result, Step, TransformError};
use crate::identifier::JurisdictionName;
use crate::install::Installer;
use crate::journal::Journal;
use crate::plan::{self, DirRename, Plan, PlanInputs};
use crate::timing::Timer;

/// Files rewritten in addition to the package directory.
pub const DEFAULT_TARGET_FILES: &[&str] = &["README.md", "setup.py", "CONTRIBUTING.md", "Makefile"];

/// File receiving version and maturity resets.
pub const DEFAULT_METADATA_FILE: &str = "setup.py";

/// A configured transform of one template tree.
#[derive(Debug, Clone)]
pub struct Transform {
    root: PathBuf,
    target: String,
    placeholder: JurisdictionName,
    target_files: Vec<String>,
    metadata_file: String,
    relocate_root: bool,
}

/// What a completed transform did.
#[derive(Debug, Clone, Serialize)]
pub struct TransformReport {
    pub target: JurisdictionName,
    pub project_root: PathBuf,
    pub package_dir: PathBuf,
    pub files_rewritten: usize,
    pub replacements: usize,
    pub resets: usize,
    pub installed_with: String,
}

impl TransformReport {
    pub fn print(&self) {
        println!("Jurisdiction {} ready.", self.target.display());
        println!("  Package:      {}", self.package_dir.display());
        println!("  Files:        {} rewritten", self.files_rewritten);
        println!("  Replacements: {}", self.replacements);
        println!("  Resets:       {}", self.resets);
        println!("  Installed:    {}", self.installed_with);
    }
}

impl Transform {
    /// Transform the template at `root` into the jurisdiction `target`.
    pub fn new(root: impl Into<PathBuf>, target: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            target: target.into(),
            placeholder: JurisdictionName::template(),
            target_files: DEFAULT_TARGET_FILES.iter().map(|s| s.to_string()).collect(),
            metadata_file: DEFAULT_METADATA_FILE.to_string(),
            relocate_root: false,
        }
    }

    /// Identifier the template uses (default: `Country-Template`).
    pub fn placeholder(mut self, placeholder: JurisdictionName) -> Self {
        self.placeholder = placeholder;
        self
    }

    /// Files (or globs) outside the package directory that must contain a
    /// placeholder.
    pub fn target_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.target_files = files.into_iter().map(|f| f.as_ref().to_string()).collect();
        self
    }

    pub fn metadata_file(mut self, file: impl Into<String>) -> Self {
        self.metadata_file = file.into();
        self
    }

    /// Also rename the root to `openfisca-<space_joined>`.
    pub fn relocate_root(mut self, relocate: bool) -> Self {
        self.relocate_root = relocate;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Validate the target identifier against the character rules and the
    /// placeholder.
    pub fn target_name(&self) -> Result<JurisdictionName> {
        JurisdictionName::parse_target(&self.target, &self.placeholder)
    }

    /// Compute the plan without touching the tree.
    pub fn plan(&self) -> Result<Plan> {
        let target = self.target_name()?;
        self.plan_for(&target)
    }

    fn plan_for(&self, target: &JurisdictionName) -> Result<Plan> {
        plan::build_plan(&PlanInputs {
            root: &self.root,
            placeholder: &self.placeholder,
            target,
            target_files: &self.target_files,
            metadata_file: &self.metadata_file,
            relocate_root: self.relocate_root,
        })
    }

    /// Run every step, rolling back on failure before the install.
    pub fn run(&self, installer: &dyn Installer) -> Result<TransformReport> {
        let timer = Timer::start(Step::Derive);
        let target = self.target_name()?;
        timer.finish();

        info!(
            "Transforming {} into {}",
            self.root.display(),
            target.package_name()
        );

        let timer = Timer::start(Step::Enumerate);
        let plan = self.plan_for(&target)?;
        timer.finish();

        info!(
            "Planned {} file rewrite(s), {} replacement(s), {} reset(s)",
            plan.edits.len(),
            plan.replacement_count(),
            plan.reset_count()
        );

        let mut journal = Journal::new();
        if let Err(err) = apply(&plan, &mut journal) {
            return Err(abort(journal, err));
        }

        let project_root = plan.final_root().to_path_buf();
        let timer = Timer::start(Step::Install);
        info!("Installing {} with {}", project_root.display(), installer.name());
        if let Err(err) = installer.install(&project_root) {
            warn!(
                "Install failed; tree at {} stays transformed, retry the install only",
                project_root.display()
            );
            return Err(err);
        }
        timer.finish();

        Ok(TransformReport {
            package_dir: plan.final_package_dir(),
            project_root,
            files_rewritten: plan.edits.len(),
            replacements: plan.replacement_count(),
            resets: plan.reset_count(),
            installed_with: installer.name().to_string(),
            target,
        })
    }

    /// Re-run only the install step on an already-transformed tree.
    pub fn install_only(&self, installer: &dyn Installer) -> Result<PathBuf> {
        let target = self.target_name()?;
        let root =
            resolve_root(&self.root).map_err(|e| TransformError::io(Step::Install, &self.root, e))?;

        let mut candidates = vec![root.clone()];
        if let Some(parent) = root.parent() {
            candidates.push(parent.join(target.project_dir_name()));
        }

        let project_root = candidates
            .into_iter()
            .find(|dir| dir.join(target.package_name()).is_dir())
            .ok_or_else(|| {
                TransformError::drift(
                    root.join(target.package_name()),
                    "transformed package not found; run the transform first",
                )
            })?;

        info!("Installing {} with {}", project_root.display(), installer.name());
        installer.install(&project_root)?;
        Ok(project_root)
    }
}

/// Canonical form of `path`. A root that has been relocated away no longer
/// exists, so only its parent is resolved then.
fn resolve_root(path: &Path) -> io::Result<PathBuf> {
    match fs::canonicalize(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            let (Some(parent), Some(name)) = (path.parent(), path.file_name()) else {
                return Err(e);
            };
            let parent = if parent.as_os_str().is_empty() {
                Path::new(".")
            } else {
                parent
            };
            Ok(fs::canonicalize(parent)?.join(name))
        }
        resolved => resolved,
    }
}

/// Steps 3-5. Every mutation goes through the journal.
fn apply(plan: &Plan, journal: &mut Journal) -> Result<()> {
    let timer = Timer::start(Step::Rewrite);
    for edit in &plan.edits {
        let step = if edit.replacements == 0 {
            Step::Normalize
        } else {
            Step::Rewrite
        };
        journal
            .write_file(&edit.path, &edit.original, &edit.updated)
            .map_err(|e| TransformError::io(step, &edit.path, e))?;
        debug!(
            "Rewrote {} ({} replacements, resets: {:?})",
            edit.path.display(),
            edit.replacements,
            edit.resets
        );
    }
    timer.finish();

    let timer = Timer::start(Step::Rename);
    rename_dir(journal, &plan.package_rename, Step::Rename)?;
    if let Some(relocation) = &plan.root_rename {
        rename_dir(journal, relocation, Step::Relocate)?;
    }
    timer.finish();

    Ok(())
}

fn rename_dir(journal: &mut Journal, rename: &DirRename, step: Step) -> Result<()> {
    if rename.to.exists() {
        return Err(TransformError::DirectoryRenameConflict {
            from: rename.from.clone(),
            to: rename.to.clone(),
        });
    }
    journal
        .rename_dir(&rename.from, &rename.to)
        .map_err(|e| TransformError::io(step, &rename.from, e))?;
    info!("Renamed {} -> {}", rename.from.display(), rename.to.display());
    Ok(())
}

/// Roll back `journal` and decide which error the caller sees.
fn abort(journal: Journal, err: TransformError) -> TransformError {
    if journal.is_empty() {
        return err;
    }

    warn!("{}; rolling back {} change(s)", err, journal.len());
    let timer = Timer::start(Step::Rollback);
    let report = journal.rollback();
    timer.finish();
    if report.is_complete() {
        info!("Rollback complete, {} change(s) undone", report.restored);
        err
    } else {
        TransformError::RollbackIncomplete {
            source: Box::new(err),
            unrestored: report.unrestored,
        }
    }
}
