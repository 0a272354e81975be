//! Preflight checks for a jurisdiction transform.
//!
//! Reports everything that would stop a transform, without touching the
//! template tree. Run with `jurisdiction-bootstrap preflight`.

mod host_tools;
mod identifier;
mod template;
mod types;

use anyhow::{bail, Result};

use crate::config::Config;

pub use types::{CheckResult, CheckStatus, PreflightReport};

/// Run all preflight checks.
pub fn run_preflight(config: &Config) -> PreflightReport {
    let mut checks = Vec::new();

    println!("Running preflight checks...\n");

    println!("Checking jurisdiction identifier...");
    let target = identifier::check_identifier(config, &mut checks);

    println!("Checking template tree...");
    checks.extend(template::check_template(config, target.as_ref()));

    println!("Checking host tools...");
    checks.extend(host_tools::check_host_tools(config));

    println!();

    PreflightReport { checks }
}

/// Run preflight and bail if any checks fail.
pub fn run_preflight_or_fail(config: &Config) -> Result<()> {
    let report = run_preflight(config);
    report.print();

    if !report.all_passed() {
        bail!(
            "Preflight failed: {} check(s) failed. Fix the issues above before transforming.",
            report.fail_count()
        );
    }

    println!("All preflight checks passed!\n");
    Ok(())
}
