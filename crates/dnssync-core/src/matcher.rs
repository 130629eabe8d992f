//! Record matching
//!
//! Finds the live record sharing a definition's `(name, type)` identity.

use crate::record::{LiveRecord, RecordDefinition};

/// Return the first live record whose name and type equal the definition's
///
/// Linear scan in snapshot order. Comparison is exact: no case folding and
/// no trailing-dot handling. When the snapshot holds several records with
/// the same identity, the first one wins and the rest are not seen.
pub fn find_match<'a>(
    definition: &RecordDefinition,
    snapshot: &'a [LiveRecord],
) -> Option<&'a LiveRecord> {
    let record_type = definition.record_type.as_str();
    snapshot
        .iter()
        .find(|live| live.name == definition.name && live.record_type == record_type)
}
