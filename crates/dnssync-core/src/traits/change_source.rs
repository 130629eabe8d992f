// # Change Source Trait
//
// Defines the interface to the version-control system that drives a run.
//
// ## Implementations
//
// - Git: `dnssync-source-git` crate

use async_trait::async_trait;

/// Trait for version-control change sources
///
/// A change source compares a baseline revision with the current one.
/// When no baseline exists (first revision), it must compare against an
/// empty tree so every present file reports as added.
#[async_trait]
pub trait ChangeSource: Send + Sync {
    /// Raw change report: one `<status>\t<path>` line per changed file
    ///
    /// Status codes follow `git diff --name-status` (`A`, `M`, `D`, ...).
    async fn change_report(&self) -> Result<String, crate::Error>;

    /// Content of `path` at the baseline revision
    ///
    /// Used to recover the definition of a deleted record file.
    async fn previous_content(&self, path: &str) -> Result<String, crate::Error>;

    /// Content of `path` at the current revision
    async fn current_content(&self, path: &str) -> Result<String, crate::Error>;

    /// Get the source name (for logging/debugging)
    fn source_name(&self) -> &'static str;
}
