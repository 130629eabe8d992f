// # DNS Provider Trait
//
// Defines the interface the engine uses to read and write live records.
//
// ## Implementations
//
// - Cloudflare: `dnssync-provider-cloudflare` crate
//
// ## Usage
//
// ```rust,ignore
// use dnssync_core::{DnsProvider, RecordDefinition, RecordType};
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let provider = /* DnsProvider implementation */;
//
//     let snapshot = provider.list_records().await?;
//     let created = provider
//         .create_record(&RecordDefinition::new("api.example.com", RecordType::A, "1.2.3.4"))
//         .await?;
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

use crate::record::{LiveRecord, RecordDefinition};

/// Trait for DNS provider implementations
///
/// Each method performs one logical API operation and reports failure as
/// [`Error::Provider`](crate::Error::Provider). Providers never retry and
/// never decide whether a write is needed; both belong to the engine.
///
/// # Payloads
///
/// Writes send the definition with defaults applied: `ttl` via
/// [`RecordDefinition::effective_ttl`], `proxied` via
/// [`RecordDefinition::effective_proxied`]. `priority` is sent only when set.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// List every record in the managed zone
    async fn list_records(&self) -> Result<Vec<LiveRecord>, crate::Error>;

    /// Create a record, returning the provider's copy of it
    async fn create_record(&self, record: &RecordDefinition) -> Result<LiveRecord, crate::Error>;

    /// Overwrite the record with provider id `id`, returning the updated copy
    async fn update_record(
        &self,
        id: &str,
        record: &RecordDefinition,
    ) -> Result<LiveRecord, crate::Error>;

    /// Delete the record with provider id `id`
    async fn delete_record(&self, id: &str) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
