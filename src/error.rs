//! Error taxonomy for the jurisdiction transform.
//!
//! Every error is fatal to the invocation. Variants carry the file or step
//! that failed, since the usual real-world cause is upstream template drift.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Ordered steps of a transform, used to label failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Step {
    Derive,
    Enumerate,
    Rewrite,
    Normalize,
    Rename,
    Relocate,
    Install,
    Rollback,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Derive => "derive names",
            Step::Enumerate => "enumerate files",
            Step::Rewrite => "rewrite placeholders",
            Step::Normalize => "normalize metadata",
            Step::Rename => "rename package directory",
            Step::Relocate => "relocate project root",
            Step::Install => "install package",
            Step::Rollback => "rollback",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("invalid jurisdiction identifier {input:?}: {reason}")]
    InvalidIdentifier { input: String, reason: String },

    #[error("template drift in {}: {detail}", path.display())]
    MissingPlaceholder { path: PathBuf, detail: String },

    #[error("cannot rename {} to {}: destination already exists", from.display(), to.display())]
    DirectoryRenameConflict { from: PathBuf, to: PathBuf },

    #[error("package installation failed in {}:\n{message}", dir.display())]
    InstallFailure { dir: PathBuf, message: String },

    #[error("jurisdiction identifier not configured: set {}", vars.join(" or "))]
    EnvironmentMisconfiguration { vars: Vec<String> },

    #[error("{step} failed at {}: {source}", path.display())]
    Io {
        step: Step,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{source} (rollback incomplete, {} path(s) left modified)", unrestored.len())]
    RollbackIncomplete {
        source: Box<TransformError>,
        unrestored: Vec<PathBuf>,
    },
}

impl TransformError {
    pub(crate) fn io(step: Step, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            step,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid(input: &str, reason: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn drift(path: impl Into<PathBuf>, detail: impl Into<String>) -> Self {
        Self::MissingPlaceholder {
            path: path.into(),
            detail: detail.into(),
        }
    }
}

pub type Result<T, E = TransformError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_names_step_and_path() {
        let err = TransformError::io(
            Step::Rewrite,
            "/tmp/tree/README.md",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("rewrite placeholders"));
        assert!(msg.contains("/tmp/tree/README.md"));
    }

    #[test]
    fn test_rollback_incomplete_keeps_original_cause() {
        let err = TransformError::RollbackIncomplete {
            source: Box::new(TransformError::drift("setup.py", "no placeholder")),
            unrestored: vec![PathBuf::from("README.md")],
        };
        let msg = err.to_string();
        assert!(msg.contains("setup.py"));
        assert!(msg.contains("1 path(s)"));
    }

    #[test]
    fn test_misconfiguration_lists_variables() {
        let err = TransformError::EnvironmentMisconfiguration {
            vars: vec!["JURISDICTION_NAME".into(), "COUNTRY_NAME".into()],
        };
        assert_eq!(
            err.to_string(),
            "jurisdiction identifier not configured: set JURISDICTION_NAME or COUNTRY_NAME"
        );
    }
}
