//! External command execution.
//!
//! The transform delegates exactly one thing to another program: package
//! installation. Commands run here capture stdout and stderr so a failure can
//! surface the program's own output verbatim.

use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use anyhow::{bail, Context, Result};
use tracing::debug;

/// Captured output of a finished command.
#[derive(Debug, Clone)]
pub struct Captured {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl Captured {
    /// Exit code, or -1 if the child was killed by a signal.
    pub fn code(&self) -> i32 {
        self.status.code().unwrap_or(-1)
    }
}

/// One program invocation.
#[derive(Debug, Clone)]
pub struct Cmd {
    program: String,
    args: Vec<String>,
    cwd: Option<PathBuf>,
    failure: Option<String>,
}

impl Cmd {
    pub fn new(program: impl AsRef<str>) -> Self {
        Self {
            program: program.as_ref().to_string(),
            args: Vec::new(),
            cwd: None,
            failure: None,
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.args.extend(args.into_iter().map(|a| a.as_ref().to_string()));
        self
    }

    /// Run from `dir` instead of the caller's working directory.
    pub fn dir(mut self, dir: &Path) -> Self {
        self.cwd = Some(dir.to_path_buf());
        self
    }

    /// Headline of the error raised on non-zero exit.
    pub fn error_msg(mut self, msg: impl AsRef<str>) -> Self {
        self.failure = Some(msg.as_ref().to_string());
        self
    }

    pub fn describe(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run to completion. Non-zero exit is an error carrying stderr.
    pub fn run(self) -> Result<Captured> {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        if let Some(cwd) = &self.cwd {
            command.current_dir(cwd);
        }

        debug!(
            "Running '{}' in {}",
            self.describe(),
            self.cwd
                .as_deref()
                .map(|d| d.display().to_string())
                .unwrap_or_else(|| ".".to_string())
        );

        let output = command
            .output()
            .with_context(|| format!("Failed to execute '{}'. Is it installed?", self.program))?;

        let captured = Captured {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if captured.status.success() {
            return Ok(captured);
        }

        let headline = self
            .failure
            .unwrap_or_else(|| format!("'{}' failed", self.program));
        match captured.stderr.trim() {
            "" => bail!("{} (exit code {})", headline, captured.code()),
            stderr => bail!("{} (exit code {}):\n{}", headline, captured.code(), stderr),
        }
    }
}

/// Locate a program on PATH.
pub fn which(program: &str) -> Option<PathBuf> {
    which::which(program).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_captures_stdout() {
        let out = Cmd::new("echo").args(["editable", "install"]).run().unwrap();
        assert_eq!(out.stdout.trim(), "editable install");
        assert_eq!(out.code(), 0);
    }

    #[test]
    fn test_failure_includes_stderr_verbatim() {
        let err = Cmd::new("sh")
            .args(["-c", "echo 'ERROR: No matching distribution' >&2; exit 1"])
            .error_msg("pip install failed")
            .run()
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("pip install failed"));
        assert!(msg.contains("exit code 1"));
        assert!(msg.contains("ERROR: No matching distribution"));
    }

    #[test]
    fn test_silent_failure() {
        let err = Cmd::new("false").run().unwrap_err();
        assert_eq!(err.to_string(), "'false' failed (exit code 1)");
    }

    #[test]
    fn test_working_directory() {
        let out = Cmd::new("pwd").dir(Path::new("/")).run().unwrap();
        assert_eq!(out.stdout.trim(), "/");
    }

    #[test]
    fn test_missing_program() {
        let err = Cmd::new("nonexistent_program_12345").run().unwrap_err();
        assert!(err.to_string().contains("Is it installed?"));
    }

    #[test]
    fn test_describe() {
        let cmd = Cmd::new("pip").args(["install", "--editable", "."]);
        assert_eq!(cmd.describe(), "pip install --editable .");
    }

    #[test]
    fn test_which() {
        assert!(which("sh").is_some());
        assert!(which("nonexistent_program_12345").is_none());
    }
}
