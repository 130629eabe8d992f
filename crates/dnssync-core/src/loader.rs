//! Record loading
//!
//! Parses one record file (YAML) into a [`RecordDefinition`]. Optional
//! fields stay absent; no defaults are applied here.

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::record::{RecordDefinition, RecordType};

/// Loose shape of a record file: every field optional so a missing one
/// can be reported by name instead of as a generic parse failure. Unknown
/// keys are rejected so a misspelled optional field is not read as absent.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRecord {
    name: Option<String>,
    #[serde(rename = "type")]
    record_type: Option<String>,
    content: Option<String>,
    ttl: Option<u32>,
    proxied: Option<bool>,
    priority: Option<u16>,
}

/// Parse and validate a record file's content
///
/// # Errors
///
/// - [`Error::Input`] if the content is not a YAML mapping of scalars or
///   carries a key other than `name`, `type`, `content`, `ttl`, `proxied`,
///   `priority`
/// - [`Error::Validation`] naming the first missing field of
///   `name`, `type`, `content`, or an unsupported `type`
pub fn load_record(content: &str) -> Result<RecordDefinition> {
    if content.trim().is_empty() {
        return Err(Error::input("Record file is empty"));
    }

    let raw: RawRecord = serde_yaml::from_str(content)
        .map_err(|e| Error::input(format!("Failed to parse record file: {}", e)))?;

    let name = require(raw.name, "name")?;
    let record_type = require(raw.record_type, "type")?;
    let content = require(raw.content, "content")?;

    let record_type: RecordType = record_type.parse()?;

    Ok(RecordDefinition {
        name,
        record_type,
        content,
        ttl: raw.ttl,
        proxied: raw.proxied,
        priority: raw.priority,
    })
}

/// Load a record file, prefixing any error with its path
pub fn load_record_file(path: &str, content: &str) -> Result<RecordDefinition> {
    load_record(content).map_err(|e| match e {
        Error::Input(msg) => Error::input(format!("{}: {}", path, msg)),
        Error::Validation(msg) => Error::validation(format!("{}: {}", path, msg)),
        other => other,
    })
}

fn require(value: Option<String>, field: &str) -> Result<String> {
    value.ok_or_else(|| Error::validation(format!("Missing required field '{}'", field)))
}
