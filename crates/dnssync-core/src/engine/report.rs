//! Per-file outcomes and the aggregate run report

use chrono::{DateTime, Utc};
use std::fmt;

use crate::changes::ChangeKind;
use crate::error::Error;
use crate::record::{LiveRecord, RecordIdentity};

/// What happened to one record file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// A new live record was created
    Created(LiveRecord),

    /// An existing live record was overwritten
    Updated(LiveRecord),

    /// A live record was deleted
    Deleted {
        id: String,
        identity: RecordIdentity,
    },

    /// Local and live state already agree (no-op)
    Unchanged { identity: RecordIdentity },

    /// A deleted file's record has no live counterpart (warning)
    NotFound { identity: RecordIdentity },
}

impl FileOutcome {
    /// Identity of the record this outcome refers to
    pub fn identity(&self) -> RecordIdentity {
        match self {
            FileOutcome::Created(record) | FileOutcome::Updated(record) => record.identity(),
            FileOutcome::Deleted { identity, .. }
            | FileOutcome::Unchanged { identity }
            | FileOutcome::NotFound { identity } => identity.clone(),
        }
    }
}

impl fmt::Display for FileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileOutcome::Created(record) => write!(f, "created {}", record.identity()),
            FileOutcome::Updated(record) => write!(f, "updated {}", record.identity()),
            FileOutcome::Deleted { identity, .. } => write!(f, "deleted {}", identity),
            FileOutcome::Unchanged { identity } => write!(f, "no changes needed for {}", identity),
            FileOutcome::NotFound { identity } => {
                write!(f, "warning: record not found in provider: {}", identity)
            }
        }
    }
}

/// Result of processing one changed file
#[derive(Debug)]
pub struct FileReport {
    /// Path of the record file
    pub path: String,

    /// Which change set the file came from
    pub change: ChangeKind,

    /// Outcome, or the error that stopped this file
    pub result: Result<FileOutcome, Error>,
}

impl FileReport {
    /// Whether processing this file failed
    pub fn is_failure(&self) -> bool {
        self.result.is_err()
    }

    /// Whether this file ended in a warning
    pub fn is_warning(&self) -> bool {
        matches!(self.result, Ok(FileOutcome::NotFound { .. }))
    }
}

impl fmt::Display for FileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.result {
            Ok(outcome) => write!(f, "[{}] {}: {}", self.change, self.path, outcome),
            Err(e) => write!(f, "[{}] {}: error ({}): {}", self.change, self.path, e.kind(), e),
        }
    }
}

/// Aggregate report for one run
///
/// A report exists only for completed runs. Per-file failures are recorded
/// here; fatal errors are returned by the engine instead.
#[derive(Debug)]
pub struct RunReport {
    /// When the run started
    pub started_at: DateTime<Utc>,

    /// When the run finished
    pub finished_at: DateTime<Utc>,

    /// Number of live records in the snapshot (None when no snapshot was needed)
    pub snapshot_size: Option<usize>,

    /// Per-file results, in processing order
    pub files: Vec<FileReport>,
}

impl RunReport {
    /// Whether the run had no record changes to process
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Number of created records
    pub fn created(&self) -> usize {
        self.count(|outcome| matches!(outcome, FileOutcome::Created(_)))
    }

    /// Number of updated records
    pub fn updated(&self) -> usize {
        self.count(|outcome| matches!(outcome, FileOutcome::Updated(_)))
    }

    /// Number of deleted records
    pub fn deleted(&self) -> usize {
        self.count(|outcome| matches!(outcome, FileOutcome::Deleted { .. }))
    }

    /// Number of files needing no provider call
    pub fn unchanged(&self) -> usize {
        self.count(|outcome| matches!(outcome, FileOutcome::Unchanged { .. }))
    }

    /// Number of files that ended in a warning
    pub fn warnings(&self) -> usize {
        self.files.iter().filter(|file| file.is_warning()).count()
    }

    /// Number of files that failed
    pub fn failures(&self) -> usize {
        self.files.iter().filter(|file| file.is_failure()).count()
    }

    /// Whether any file failed
    pub fn has_failures(&self) -> bool {
        self.files.iter().any(FileReport::is_failure)
    }

    /// Report entry for `path`, if it was processed
    pub fn file(&self, path: &str) -> Option<&FileReport> {
        self.files.iter().find(|file| file.path == path)
    }

    fn count(&self, predicate: impl Fn(&FileOutcome) -> bool) -> usize {
        self.files
            .iter()
            .filter(|file| file.result.as_ref().is_ok_and(&predicate))
            .count()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("No DNS record changes detected");
        }

        write!(
            f,
            "{} file(s): {} created, {} updated, {} deleted, {} unchanged, {} warning(s), {} failed",
            self.files.len(),
            self.created(),
            self.updated(),
            self.deleted(),
            self.unchanged(),
            self.warnings(),
            self.failures()
        )
    }
}
