//! Preflight check types and report.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    /// The transform will get past this point.
    Pass,
    /// The transform will fail here.
    Fail,
    /// Works, but probably not what was intended.
    Warn,
}

impl CheckStatus {
    fn icon(self) -> &'static str {
        match self {
            CheckStatus::Pass => "✓",
            CheckStatus::Fail => "✗",
            CheckStatus::Warn => "⚠",
        }
    }

    fn label(self) -> &'static str {
        match self {
            CheckStatus::Pass => "PASS",
            CheckStatus::Fail => "FAIL",
            CheckStatus::Warn => "WARN",
        }
    }
}

/// Result of a single preflight check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub details: Option<String>,
}

impl CheckResult {
    fn new(name: impl Into<String>, status: CheckStatus, details: Option<String>) -> Self {
        Self {
            name: name.into(),
            status,
            details,
        }
    }

    pub fn pass_with(name: impl Into<String>, details: impl Into<String>) -> Self {
        Self::new(name, CheckStatus::Pass, Some(details.into()))
    }

    pub fn fail(name: impl Into<String>, details: impl Into<String>) -> Self {
        Self::new(name, CheckStatus::Fail, Some(details.into()))
    }

    pub fn warn(name: impl Into<String>, details: impl Into<String>) -> Self {
        Self::new(name, CheckStatus::Warn, Some(details.into()))
    }
}

/// Results of all preflight checks.
#[derive(Debug, Default)]
pub struct PreflightReport {
    pub checks: Vec<CheckResult>,
}

impl PreflightReport {
    pub fn count(&self, status: CheckStatus) -> usize {
        self.checks.iter().filter(|c| c.status == status).count()
    }

    pub fn all_passed(&self) -> bool {
        self.count(CheckStatus::Fail) == 0
    }

    pub fn fail_count(&self) -> usize {
        self.count(CheckStatus::Fail)
    }

    /// Print the report to stdout.
    pub fn print(&self) {
        println!("=== Preflight Check Results ===\n");

        for check in &self.checks {
            print!(
                "  {} [{}] {}",
                check.status.icon(),
                check.status.label(),
                check.name
            );
            match &check.details {
                Some(details) => println!(": {}", details),
                None => println!(),
            }
        }

        println!();
        println!(
            "Summary: {}/{} passed",
            self.count(CheckStatus::Pass),
            self.checks.len()
        );
        let failed = self.fail_count();
        if failed > 0 {
            println!("         {} FAILED - transform will not succeed", failed);
        }
        let warned = self.count(CheckStatus::Warn);
        if warned > 0 {
            println!("         {} warnings", warned);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let report = PreflightReport {
            checks: vec![
                CheckResult::pass_with("a", "ok"),
                CheckResult::warn("b", "hmm"),
                CheckResult::fail("c", "no"),
                CheckResult::fail("d", "no"),
            ],
        };
        assert_eq!(report.count(CheckStatus::Pass), 1);
        assert_eq!(report.count(CheckStatus::Warn), 1);
        assert_eq!(report.fail_count(), 2);
        assert!(!report.all_passed());
    }

    #[test]
    fn test_warnings_do_not_fail() {
        let report = PreflightReport {
            checks: vec![CheckResult::pass_with("a", "ok"), CheckResult::warn("b", "hmm")],
        };
        assert!(report.all_passed());
    }
}
