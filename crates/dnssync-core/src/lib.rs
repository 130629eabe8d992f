// # dnssync-core
//
// Core library for git-driven DNS record synchronization.
//
// ## Architecture Overview
//
// One record file per DNS record lives in a version-controlled directory.
// Each run reconciles the files changed in the latest revision against the
// provider's live records:
// - **ChangeSet**: Added/modified/deleted record files from a change report
// - **load_record**: Parses and validates one record file
// - **find_match**: Finds the live record with the same `(name, type)`
// - **records_differ**: Compares a definition with a live record under defaults
// - **SyncEngine**: Picks create/update/delete/no-op per file and executes it
//
// ## Collaborators
//
// - **ChangeSource**: Version control (change report, file contents)
// - **DnsProvider**: DNS provider API (list, create, update, delete)
//
// ## Design Principles
//
// 1. **Read-once snapshot**: Live records are fetched once per run
// 2. **Fault isolation**: A failing file is recorded and the run continues
// 3. **Explicit configuration**: No environment access below the binary
// 4. **Library-first**: The binary is a thin wiring layer

pub mod changes;
pub mod config;
pub mod diff;
pub mod engine;
pub mod error;
pub mod loader;
pub mod matcher;
pub mod record;
pub mod traits;

// Re-export core types for convenience
pub use changes::{ChangeKind, ChangeSet, ChangeStatus, FileChange};
pub use config::{ChangeSourceConfig, ProviderConfig, RecordsConfig, SyncConfig};
pub use diff::records_differ;
pub use engine::{FileOutcome, FileReport, RunReport, SyncAction, SyncEngine, plan_action};
pub use error::{Error, Result};
pub use loader::load_record;
pub use matcher::find_match;
pub use record::{LiveRecord, RecordDefinition, RecordIdentity, RecordType};
pub use traits::{ChangeSource, DnsProvider};
