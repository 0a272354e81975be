//! Template tree checks (layout, placeholders, destination).

use std::fs;
use std::path::Path;

use crate::config::Config;
use crate::identifier::JurisdictionName;
use crate::plan::{enumerate_package_files, expand_target_files};
use crate::rules::{self, Rewriter};

use super::types::CheckResult;

/// Check the template tree is untransformed and matches the expected layout.
pub fn check_template(config: &Config, target: Option<&JurisdictionName>) -> Vec<CheckResult> {
    let mut results = Vec::new();
    let root = &config.template_root;
    let placeholder = JurisdictionName::template();

    if !root.is_dir() {
        results.push(CheckResult::fail(
            "template root",
            format!("{} not found - extract the template first", root.display()),
        ));
        return results;
    }
    results.push(CheckResult::pass_with("template root", root.display().to_string()));

    let package_dir = root.join(placeholder.package_name());
    if package_dir.is_dir() {
        match enumerate_package_files(&package_dir) {
            Ok(files) => results.push(CheckResult::pass_with(
                placeholder.package_name(),
                format!("{} file(s)", files.len()),
            )),
            Err(e) => results.push(CheckResult::fail(placeholder.package_name(), e.to_string())),
        }
    } else {
        results.push(CheckResult::fail(
            placeholder.package_name(),
            "Not found - tree already transformed or template layout changed",
        ));
    }

    match Rewriter::detector(&rules::placeholder_patterns(&placeholder)) {
        Ok(detector) => {
            for entry in &config.target_files {
                results.push(check_target_entry(root, entry, &detector));
            }
        }
        Err(e) => results.push(CheckResult::fail("placeholder patterns", e.to_string())),
    }

    results.push(check_metadata(&root.join(&config.metadata_file)));

    if let Some(target) = target {
        let destination = root.join(target.package_name());
        if destination.exists() {
            results.push(CheckResult::fail(
                "destination",
                format!("{} already exists", destination.display()),
            ));
        } else {
            results.push(CheckResult::pass_with(
                "destination",
                format!("{} is free", destination.display()),
            ));
        }
    }

    results
}

fn check_target_entry(root: &Path, entry: &str, detector: &Rewriter) -> CheckResult {
    let paths = match expand_target_files(root, &[entry.to_string()]) {
        Ok(paths) => paths,
        Err(e) => return CheckResult::fail(entry, e.to_string()),
    };

    let mut total = 0;
    for path in &paths {
        let content = match fs::read(path) {
            Ok(content) => content,
            Err(e) => return CheckResult::fail(entry, format!("{}: {}", path.display(), e)),
        };
        let found = detector.count(&content);
        if found == 0 {
            return CheckResult::fail(
                entry,
                format!("{}: no placeholder found (template drift?)", path.display()),
            );
        }
        total += found;
    }

    CheckResult::pass_with(
        entry,
        format!("{} placeholder(s) in {} file(s)", total, paths.len()),
    )
}

fn check_metadata(path: &Path) -> CheckResult {
    let name = "metadata resets";
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => return CheckResult::fail(name, format!("{}: {}", path.display(), e)),
    };

    let (_, applied) = rules::apply_resets(&content);
    if applied.is_empty() {
        CheckResult::warn(
            name,
            format!("{}: no version or maturity field to reset", path.display()),
        )
    } else {
        CheckResult::pass_with(name, applied.join(", "))
    }
}
