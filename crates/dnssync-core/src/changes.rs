//! Change classification
//!
//! Turns a raw `<status>\t<path>` change report into a [`ChangeSet`] of
//! record files, filtered by [`RecordsConfig`].

use std::collections::BTreeSet;
use std::fmt;

use tracing::{debug, warn};

use crate::config::RecordsConfig;
use crate::error::{Error, Result};

/// Status of one entry in a change report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeStatus {
    /// `A`
    Added,
    /// `M`
    Modified,
    /// `D`
    Deleted,
    /// Any other status code (renames, copies, type changes...)
    Other(String),
}

impl ChangeStatus {
    /// Parse a status code. Unknown codes map to [`ChangeStatus::Other`].
    pub fn parse(code: &str) -> Self {
        match code {
            "A" => ChangeStatus::Added,
            "M" => ChangeStatus::Modified,
            "D" => ChangeStatus::Deleted,
            other => ChangeStatus::Other(other.to_string()),
        }
    }
}

/// One `(status, path)` pair from a change report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub status: ChangeStatus,
    pub path: String,
    /// Destination path of a rename or copy
    pub new_path: Option<String>,
}

/// The three change phases a record file can fall into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Added,
    Modified,
    Deleted,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeKind::Added => f.write_str("added"),
            ChangeKind::Modified => f.write_str("modified"),
            ChangeKind::Deleted => f.write_str("deleted"),
        }
    }
}

/// Parse a change report into `(status, path)` pairs
///
/// Blank lines are skipped. A line without a tab-separated status and path
/// is an [`Error::Input`]. Three-column lines (renames, copies) keep the
/// destination in `new_path`.
pub fn parse_change_report(report: &str) -> Result<Vec<FileChange>> {
    let mut changes = Vec::new();

    for (index, line) in report.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }

        let mut parts = line.split('\t');
        let status = parts.next().unwrap_or_default().trim();
        let path = parts.next().unwrap_or_default();
        let new_path = parts.next().filter(|p| !p.is_empty()).map(str::to_string);

        if status.is_empty() || path.is_empty() {
            return Err(Error::input(format!(
                "Malformed change report line {}: '{}'",
                index + 1,
                line
            )));
        }

        changes.push(FileChange {
            status: ChangeStatus::parse(status),
            path: path.to_string(),
            new_path,
        });
    }

    Ok(changes)
}

/// Record files changed between two revisions
///
/// The three sets are disjoint. Iteration order is lexical, which keeps
/// logs and reports stable; nothing depends on it. Record-file entries
/// with another status (renames, copies, type changes) land in `skipped`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub added: BTreeSet<String>,
    pub modified: BTreeSet<String>,
    pub deleted: BTreeSet<String>,
    pub skipped: Vec<FileChange>,
}

impl ChangeSet {
    /// Parse a raw report and classify it in one step
    pub fn from_report(report: &str, records: &RecordsConfig) -> Result<Self> {
        let changes = parse_change_report(report)?;
        Ok(Self::classify(&changes, records))
    }

    /// Sort record-file changes into added, modified and deleted sets
    ///
    /// Paths outside the records directory and paths without an accepted
    /// extension are dropped. Record files with an unrecognized status are
    /// not synced; they are kept in `skipped` and logged as a warning.
    pub fn classify(changes: &[FileChange], records: &RecordsConfig) -> Self {
        let mut set = ChangeSet::default();

        for change in changes {
            let touches_records = records.accepts(&change.path)
                || change.new_path.as_deref().is_some_and(|p| records.accepts(p));
            if !touches_records {
                continue;
            }

            if set.contains(&change.path) {
                debug!("Duplicate change entry for {}, keeping the first", change.path);
                continue;
            }

            match &change.status {
                ChangeStatus::Added => {
                    set.added.insert(change.path.clone());
                }
                ChangeStatus::Modified => {
                    set.modified.insert(change.path.clone());
                }
                ChangeStatus::Deleted => {
                    set.deleted.insert(change.path.clone());
                }
                ChangeStatus::Other(code) => {
                    match &change.new_path {
                        Some(new_path) => warn!(
                            "Not syncing '{}' change {} -> {}; live records for either path are left as they are",
                            code, change.path, new_path
                        ),
                        None => warn!("Not syncing '{}' change for {}", code, change.path),
                    }
                    set.skipped.push(change.clone());
                }
            }
        }

        set
    }

    /// Whether all three sets are empty
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.modified.is_empty() && self.deleted.is_empty()
    }

    /// Total number of changed record files
    pub fn len(&self) -> usize {
        self.added.len() + self.modified.len() + self.deleted.len()
    }

    /// Whether `path` appears in any of the three sets
    pub fn contains(&self, path: &str) -> bool {
        self.added.contains(path) || self.modified.contains(path) || self.deleted.contains(path)
    }
}
