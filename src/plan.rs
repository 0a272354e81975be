//! Transform planning.
//!
//! Builds the complete set of edits for a transform without touching the
//! filesystem: every file is read once, every rule is evaluated against that
//! snapshot, and every precondition is checked. Nothing is written until a
//! plan exists, so drift in the template is reported before any mutation.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::error::{Result, Step, TransformError};
use crate::identifier::JurisdictionName;
use crate::rules::{self, Rewriter, Substitution};

/// File names never rewritten by the recursive pass.
const IGNORED_NAMES: &[&str] = &[".DS_Store", "__pycache__"];

/// File extensions never rewritten by the recursive pass.
const IGNORED_EXTENSIONS: &[&str] = &["pyc"];

/// What the planner needs to know.
#[derive(Debug, Clone)]
pub struct PlanInputs<'a> {
    pub root: &'a Path,
    pub placeholder: &'a JurisdictionName,
    pub target: &'a JurisdictionName,
    pub target_files: &'a [String],
    pub metadata_file: &'a str,
    pub relocate_root: bool,
}

/// A single file rewrite.
#[derive(Debug, Clone, Serialize)]
pub struct FileEdit {
    pub path: PathBuf,
    #[serde(skip)]
    pub original: Vec<u8>,
    #[serde(skip)]
    pub updated: Vec<u8>,
    pub replacements: usize,
    pub resets: Vec<&'static str>,
}

/// A directory move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirRename {
    pub from: PathBuf,
    pub to: PathBuf,
}

/// Everything a transform will do, computed up front.
#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    pub root: PathBuf,
    pub target: JurisdictionName,
    pub rules: Vec<Substitution>,
    pub edits: Vec<FileEdit>,
    pub unchanged: usize,
    pub package_rename: DirRename,
    pub root_rename: Option<DirRename>,
}

impl Plan {
    /// Project root after the transform.
    pub fn final_root(&self) -> &Path {
        match &self.root_rename {
            Some(rename) => &rename.to,
            None => &self.root,
        }
    }

    /// Package directory after the transform.
    pub fn final_package_dir(&self) -> PathBuf {
        self.final_root().join(self.target.package_name())
    }

    pub fn replacement_count(&self) -> usize {
        self.edits.iter().map(|e| e.replacements).sum()
    }

    pub fn reset_count(&self) -> usize {
        self.edits.iter().map(|e| e.resets.len()).sum()
    }

    /// Print the plan to stdout.
    pub fn print(&self) {
        println!("=== Transform Plan ===\n");
        println!("  Jurisdiction: {}", self.target.display());
        println!("  Package:      {}", self.target.package_name());
        println!("  Root:         {}", self.root.display());
        println!();

        println!("Rules:");
        for rule in &self.rules {
            println!("  {:?} -> {:?}", rule.pattern, rule.replacement);
        }
        println!();

        println!("Files:");
        for edit in &self.edits {
            let rel = edit.path.strip_prefix(&self.root).unwrap_or(&edit.path);
            print!("  ~ {} ({} replacements", rel.display(), edit.replacements);
            if !edit.resets.is_empty() {
                print!(", reset: {}", edit.resets.join(", "));
            }
            println!(")");
        }
        println!();

        println!("Directories:");
        println!(
            "  {} -> {}",
            self.package_rename.from.display(),
            self.package_rename.to.display()
        );
        if let Some(rename) = &self.root_rename {
            println!("  {} -> {}", rename.from.display(), rename.to.display());
        }
        println!();

        println!(
            "Summary: {} file(s) to rewrite, {} unchanged, {} replacements, {} metadata reset(s)",
            self.edits.len(),
            self.unchanged,
            self.replacement_count(),
            self.reset_count()
        );
    }
}

/// How a file entered the transform set.
#[derive(Debug, Clone, Copy, Default)]
struct FileRole {
    /// Named in the target file list; must contain a placeholder.
    listed: bool,
    /// Receives metadata resets.
    metadata: bool,
}

/// Build a plan. Reads files, never writes them.
pub fn build_plan(inputs: &PlanInputs<'_>) -> Result<Plan> {
    let root = fs::canonicalize(inputs.root)
        .map_err(|e| TransformError::io(Step::Enumerate, inputs.root, e))?;

    let package_src = root.join(inputs.placeholder.package_name());
    if !package_src.is_dir() {
        return Err(TransformError::drift(
            &package_src,
            "template package directory not found (already transformed?)",
        ));
    }

    let mut files: BTreeMap<PathBuf, FileRole> = BTreeMap::new();

    for path in expand_target_files(&root, inputs.target_files)? {
        files.entry(path).or_default().listed = true;
    }

    let metadata_path = root.join(inputs.metadata_file);
    if !metadata_path.is_file() {
        return Err(TransformError::drift(&metadata_path, "metadata file not found"));
    }
    files.entry(metadata_path).or_default().metadata = true;

    for path in enumerate_package_files(&package_src)? {
        files.entry(path).or_default();
    }

    debug!("Planning rewrite of {} file(s)", files.len());

    let rules = rules::substitutions(inputs.placeholder, inputs.target);
    let rewriter = Rewriter::new(&rules).map_err(|e| {
        TransformError::invalid(
            inputs.target.display(),
            format!("substitution rules do not compile: {e}"),
        )
    })?;
    let mut edits = Vec::new();
    let mut unchanged = 0;

    for (path, role) in files {
        let original = fs::read(&path).map_err(|e| TransformError::io(Step::Rewrite, &path, e))?;

        let (rewritten, replacements) = rewriter.rewrite(&original);
        if role.listed && replacements == 0 {
            return Err(TransformError::drift(
                &path,
                format!(
                    "expected placeholder ({} or {}) not found",
                    inputs.placeholder.snake_case(),
                    inputs.placeholder.display()
                ),
            ));
        }
        let mut updated = rewritten.into_owned();

        let mut resets = Vec::new();
        if role.metadata {
            let text = String::from_utf8(updated)
                .map_err(|_| TransformError::drift(&path, "metadata file is not UTF-8 text"))?;
            let (reset, applied) = rules::apply_resets(&text);
            updated = reset.into_bytes();
            resets = applied;
        }

        if updated == original {
            unchanged += 1;
            continue;
        }

        edits.push(FileEdit {
            path,
            original,
            updated,
            replacements,
            resets,
        });
    }

    let package_rename = DirRename {
        from: package_src,
        to: root.join(inputs.target.package_name()),
    };

    let root_rename = if inputs.relocate_root {
        relocation_for(&root, inputs.target)
    } else {
        None
    };

    Ok(Plan {
        root,
        target: inputs.target.clone(),
        rules,
        edits,
        unchanged,
        package_rename,
        root_rename,
    })
}

/// Resolve target file entries to concrete files under `root`.
///
/// Entries containing glob metacharacters must match at least one file;
/// literal entries must exist.
pub(crate) fn expand_target_files(root: &Path, entries: &[String]) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();

    for entry in entries {
        let joined = root.join(entry);

        if !is_glob(entry) {
            if !joined.is_file() {
                return Err(TransformError::drift(&joined, "listed file not found"));
            }
            out.push(joined);
            continue;
        }

        let pattern = joined.to_string_lossy().into_owned();
        let paths = glob::glob(&pattern).map_err(|e| {
            TransformError::io(
                Step::Enumerate,
                &joined,
                io::Error::new(io::ErrorKind::InvalidInput, e.to_string()),
            )
        })?;

        let mut matched = 0;
        for path in paths {
            let path = path.map_err(|e| {
                let failed = e.path().to_path_buf();
                TransformError::io(Step::Enumerate, failed, e.into_error())
            })?;
            if path.is_file() {
                out.push(path);
                matched += 1;
            }
        }

        if matched == 0 {
            return Err(TransformError::drift(&joined, "pattern matched no files"));
        }
    }

    Ok(out)
}

fn is_glob(entry: &str) -> bool {
    entry.contains(['*', '?', '['])
}

/// Every regular file under the package directory, minus ignored entries.
pub fn enumerate_package_files(package_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();

    let walker = WalkDir::new(package_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_ignored(e));

    for entry in walker {
        let entry = entry.map_err(|e| {
            let failed = e.path().unwrap_or(package_dir).to_path_buf();
            TransformError::io(Step::Enumerate, failed, io::Error::from(e))
        })?;
        if entry.file_type().is_file() {
            out.push(entry.into_path());
        }
    }

    Ok(out)
}

fn is_ignored(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    if IGNORED_NAMES.contains(&name.as_ref()) {
        return true;
    }
    entry.file_type().is_file()
        && entry
            .path()
            .extension()
            .is_some_and(|ext| IGNORED_EXTENSIONS.iter().any(|i| ext == *i))
}

fn relocation_for(root: &Path, target: &JurisdictionName) -> Option<DirRename> {
    let parent = root.parent()?;
    let to = parent.join(target.project_dir_name());
    if to == root {
        None
    } else {
        Some(DirRename {
            from: root.to_path_buf(),
            to,
        })
    }
}
