//! Undo journal for transform mutations.
//!
//! Every mutation is recorded before it is attempted, so a failure part way
//! through a write still has the original content on file. `rollback`
//! replays the journal in reverse order. Anything it cannot restore is
//! reported back rather than swallowed, so a partially modified tree is an
//! observable state.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

/// A recorded mutation.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum JournalRecord {
    /// File content replaced; `original` is what to write back.
    FileWritten {
        path: PathBuf,
        #[serde(skip)]
        original: Vec<u8>,
    },
    /// Directory moved from `from` to `to`.
    DirRenamed { from: PathBuf, to: PathBuf },
}

/// Outcome of a rollback.
#[derive(Debug, Default)]
pub struct RollbackReport {
    pub restored: usize,
    pub unrestored: Vec<PathBuf>,
}

impl RollbackReport {
    pub fn is_complete(&self) -> bool {
        self.unrestored.is_empty()
    }
}

/// Append-only list of mutations applied to a tree.
#[derive(Debug, Default)]
pub struct Journal {
    records: Vec<JournalRecord>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Replace the content of `path`, remembering `original`.
    pub fn write_file(&mut self, path: &Path, original: &[u8], updated: &[u8]) -> io::Result<()> {
        self.records.push(JournalRecord::FileWritten {
            path: path.to_path_buf(),
            original: original.to_vec(),
        });
        fs::write(path, updated)
    }

    /// Move a directory. Recorded only once the move succeeded.
    pub fn rename_dir(&mut self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)?;
        self.records.push(JournalRecord::DirRenamed {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
        });
        Ok(())
    }

    /// Undo every recorded mutation, newest first.
    pub fn rollback(self) -> RollbackReport {
        let mut report = RollbackReport::default();

        for record in self.records.into_iter().rev() {
            let (path, result) = match record {
                JournalRecord::FileWritten { path, original } => {
                    let result = fs::write(&path, &original);
                    (path, result)
                }
                JournalRecord::DirRenamed { from, to } => {
                    let result = fs::rename(&to, &from);
                    (to, result)
                }
            };

            match result {
                Ok(()) => {
                    debug!("Restored {}", path.display());
                    report.restored += 1;
                }
                Err(e) => {
                    warn!("Could not restore {}: {}", path.display(), e);
                    report.unrestored.push(path);
                }
            }
        }

        report
    }
}
