//! Host tool availability checks.

use crate::config::Config;
use crate::process;

use super::types::CheckResult;

/// Check the package manager used for the install step is on PATH.
pub fn check_host_tools(config: &Config) -> Vec<CheckResult> {
    let mut results = Vec::new();

    match process::which(&config.pip) {
        Some(path) => results.push(CheckResult::pass_with(
            config.pip.as_str(),
            path.display().to_string(),
        )),
        None => results.push(CheckResult::fail(
            config.pip.as_str(),
            "Not found. Required for the editable install (set PIP to override)",
        )),
    }

    results
}
