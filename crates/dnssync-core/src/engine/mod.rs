//! Reconciliation engine
//!
//! The SyncEngine is responsible for:
//! - Turning the change report into a [`ChangeSet`]
//! - Fetching the live-record snapshot once per run
//! - Deciding one [`SyncAction`] per changed record file
//! - Executing that action through the [`DnsProvider`]
//! - Recording a per-file result in the [`RunReport`]
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐                      ┌──────────────┐
//! │ ChangeSource │── change report ──┐  │ DnsProvider  │
//! └──────────────┘                   │  └──────────────┘
//!                                    ▼     ▲ snapshot / writes
//!                             ┌──────────────┐
//!                             │  SyncEngine  │
//!                             └──────────────┘
//!                                    │
//!                                    ▼
//!                             ┌──────────────┐
//!                             │  RunReport   │
//!                             └──────────────┘
//! ```
//!
//! ## Run Flow
//!
//! 1. Classify the change report (fatal on failure)
//! 2. Stop early if no record files changed
//! 3. Fetch the live snapshot once (fatal on failure)
//! 4. Deletions, then additions, then modifications
//! 5. Each file is fault-isolated: its error lands in the report

mod report;

pub use report::{FileOutcome, FileReport, RunReport};

use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::changes::{ChangeKind, ChangeSet};
use crate::config::{RecordsConfig, SyncConfig};
use crate::diff::records_differ;
use crate::error::Result;
use crate::loader::load_record_file;
use crate::matcher::find_match;
use crate::record::{LiveRecord, RecordDefinition};
use crate::traits::{ChangeSource, DnsProvider};

/// Action decided for one record file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncAction {
    /// Create a new live record
    Create(RecordDefinition),

    /// Overwrite the live record `id` with the definition
    Update { id: String, record: RecordDefinition },

    /// Delete the live record `id`
    Delete { id: String },

    /// No provider call needed
    NoOp,
}

/// Decide the action for one changed file
///
/// Pure: consults only the definition and the snapshot.
///
/// | change   | live match     | action |
/// |----------|----------------|--------|
/// | deleted  | found          | Delete |
/// | deleted  | none           | NoOp (reported as a warning) |
/// | added    | none           | Create |
/// | modified | none           | Create |
/// | added/modified | differs  | Update |
/// | added/modified | equal    | NoOp   |
pub fn plan_action(
    change: ChangeKind,
    definition: &RecordDefinition,
    snapshot: &[LiveRecord],
) -> SyncAction {
    let matched = find_match(definition, snapshot);

    match (change, matched) {
        (ChangeKind::Deleted, Some(live)) => SyncAction::Delete {
            id: live.id.clone(),
        },
        (ChangeKind::Deleted, None) => SyncAction::NoOp,
        (_, None) => SyncAction::Create(definition.clone()),
        (_, Some(live)) if records_differ(definition, live) => SyncAction::Update {
            id: live.id.clone(),
            record: definition.clone(),
        },
        (_, Some(_)) => SyncAction::NoOp,
    }
}

/// Core reconciliation engine
///
/// Runs once per invocation. All collaborator calls are awaited in
/// sequence; nothing is spawned and no state is shared between files
/// except the read-only snapshot.
pub struct SyncEngine {
    /// Version-control change source
    source: Box<dyn ChangeSource>,

    /// DNS provider for the snapshot and writes
    provider: Box<dyn DnsProvider>,

    /// Records directory and file filter
    records: RecordsConfig,

    /// Whether the provider was built in dry-run mode (logging only)
    dry_run: bool,
}

impl SyncEngine {
    /// Create a new sync engine
    ///
    /// # Parameters
    ///
    /// - `source`: Change source implementation
    /// - `provider`: DNS provider implementation
    /// - `config`: Sync configuration (validated here)
    pub fn new(
        source: Box<dyn ChangeSource>,
        provider: Box<dyn DnsProvider>,
        config: &SyncConfig,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            source,
            provider,
            records: config.records.clone(),
            dry_run: config.dry_run,
        })
    }

    /// Fetch and classify the change report
    pub async fn detect_changes(&self) -> Result<ChangeSet> {
        let report = self.source.change_report().await?;
        ChangeSet::from_report(&report, &self.records)
    }

    /// Run one reconciliation pass
    ///
    /// # Returns
    ///
    /// - `Ok(RunReport)`: The run completed; per-file failures are inside
    /// - `Err(Error)`: The change report or the snapshot could not be fetched
    pub async fn run(&self) -> Result<RunReport> {
        let started_at = Utc::now();

        info!("Detecting changes via {}", self.source.source_name());
        let changes = self.detect_changes().await?;

        if changes.is_empty() {
            info!("No DNS record changes detected");
            return Ok(RunReport {
                started_at,
                finished_at: Utc::now(),
                snapshot_size: None,
                files: Vec::new(),
            });
        }

        info!(
            "Changes detected: {} added, {} modified, {} deleted",
            changes.added.len(),
            changes.modified.len(),
            changes.deleted.len()
        );

        info!(
            "Fetching live records from {} [mode: {}]",
            self.provider.provider_name(),
            if self.dry_run { "DRY-RUN" } else { "LIVE" }
        );
        let snapshot = self.provider.list_records().await?;
        info!("Found {} existing records", snapshot.len());

        let mut files = Vec::with_capacity(changes.len());

        for path in &changes.deleted {
            info!("Processing deletion: {}", path);
            let result = self.process_deletion(path, &snapshot).await;
            files.push(self.record_result(path, ChangeKind::Deleted, result));
        }

        for path in &changes.added {
            info!("Processing addition: {}", path);
            let result = self.process_upsert(path, ChangeKind::Added, &snapshot).await;
            files.push(self.record_result(path, ChangeKind::Added, result));
        }

        for path in &changes.modified {
            info!("Processing modification: {}", path);
            let result = self.process_upsert(path, ChangeKind::Modified, &snapshot).await;
            files.push(self.record_result(path, ChangeKind::Modified, result));
        }

        let report = RunReport {
            started_at,
            finished_at: Utc::now(),
            snapshot_size: Some(snapshot.len()),
            files,
        };

        info!("Sync complete: {}", report);
        Ok(report)
    }

    /// Handle a deleted record file
    ///
    /// The file is gone from the current revision, so its definition is
    /// recovered from the baseline revision.
    async fn process_deletion(&self, path: &str, snapshot: &[LiveRecord]) -> Result<FileOutcome> {
        let content = self.source.previous_content(path).await?;
        let definition = load_record_file(path, &content)?;

        let action = plan_action(ChangeKind::Deleted, &definition, snapshot);
        self.execute(&definition, action, ChangeKind::Deleted).await
    }

    /// Handle an added or modified record file
    async fn process_upsert(
        &self,
        path: &str,
        change: ChangeKind,
        snapshot: &[LiveRecord],
    ) -> Result<FileOutcome> {
        let content = self.source.current_content(path).await?;
        let definition = load_record_file(path, &content)?;

        let action = plan_action(change, &definition, snapshot);
        match (&action, change) {
            (SyncAction::Update { .. }, ChangeKind::Added) => {
                warn!("Record already exists, will update instead: {}", definition.identity());
            }
            (SyncAction::Create(_), ChangeKind::Modified) => {
                warn!("Record not found, will create: {}", definition.identity());
            }
            _ => {}
        }

        self.execute(&definition, action, change).await
    }

    /// Perform the provider call for an action
    async fn execute(
        &self,
        definition: &RecordDefinition,
        action: SyncAction,
        change: ChangeKind,
    ) -> Result<FileOutcome> {
        let identity = definition.identity();
        debug!("Action for {}: {:?}", identity, action);

        match action {
            SyncAction::Create(record) => {
                let created = self.provider.create_record(&record).await?;
                Ok(FileOutcome::Created(created))
            }
            SyncAction::Update { id, record } => {
                let updated = self.provider.update_record(&id, &record).await?;
                Ok(FileOutcome::Updated(updated))
            }
            SyncAction::Delete { id } => {
                self.provider.delete_record(&id).await?;
                Ok(FileOutcome::Deleted { id, identity })
            }
            SyncAction::NoOp if change == ChangeKind::Deleted => {
                Ok(FileOutcome::NotFound { identity })
            }
            SyncAction::NoOp => Ok(FileOutcome::Unchanged { identity }),
        }
    }

    /// Log a per-file result and wrap it in a report entry
    fn record_result(
        &self,
        path: &str,
        change: ChangeKind,
        result: Result<FileOutcome>,
    ) -> FileReport {
        match &result {
            Ok(outcome @ FileOutcome::NotFound { .. }) => warn!("{}: {}", path, outcome),
            Ok(outcome) => info!("{}: {}", path, outcome),
            Err(e) => error!("{}: {}", path, e),
        }

        FileReport {
            path: path.to_string(),
            change,
            result,
        }
    }
}
