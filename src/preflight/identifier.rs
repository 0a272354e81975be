//! Jurisdiction identifier checks.

use crate::config::Config;
use crate::identifier::JurisdictionName;

use super::types::CheckResult;

/// Check the configured identifier. Returns the parsed name when usable.
pub fn check_identifier(config: &Config, checks: &mut Vec<CheckResult>) -> Option<JurisdictionName> {
    let raw = match config.require_jurisdiction() {
        Ok(raw) => raw,
        Err(e) => {
            checks.push(CheckResult::fail("jurisdiction identifier", e.to_string()));
            return None;
        }
    };

    let name = match JurisdictionName::parse_target(raw, &JurisdictionName::template()) {
        Ok(name) => name,
        Err(e) => {
            checks.push(CheckResult::fail("jurisdiction identifier", e.to_string()));
            return None;
        }
    };

    checks.push(CheckResult::pass_with(
        "jurisdiction identifier",
        format!(
            "{:?} -> {} (project dir {})",
            name.display(),
            name.package_name(),
            name.project_dir_name()
        ),
    ));
    Some(name)
}
