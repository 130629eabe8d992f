//! DNS record data model
//!
//! - [`RecordDefinition`]: desired state loaded from one record file
//! - [`LiveRecord`]: the provider's current copy of a record
//! - [`RecordIdentity`]: the `(name, type)` pair used for matching

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// TTL applied when a record leaves it unset (or sets it to 0)
pub const DEFAULT_TTL: u32 = 3600;

/// Proxy flag applied when a record leaves it unset
pub const DEFAULT_PROXIED: bool = false;

/// DNS record types accepted in record definitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordType {
    A,
    #[serde(rename = "AAAA")]
    Aaaa,
    #[serde(rename = "CNAME")]
    Cname,
    #[serde(rename = "MX")]
    Mx,
    #[serde(rename = "TXT")]
    Txt,
    #[serde(rename = "SRV")]
    Srv,
    #[serde(rename = "NS")]
    Ns,
    #[serde(rename = "CAA")]
    Caa,
    #[serde(rename = "PTR")]
    Ptr,
}

impl RecordType {
    /// Canonical upper-case type string, as used by providers
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Cname => "CNAME",
            RecordType::Mx => "MX",
            RecordType::Txt => "TXT",
            RecordType::Srv => "SRV",
            RecordType::Ns => "NS",
            RecordType::Caa => "CAA",
            RecordType::Ptr => "PTR",
        }
    }

    /// Whether `priority` is part of this type's record data
    pub fn uses_priority(&self) -> bool {
        matches!(self, RecordType::Mx | RecordType::Srv)
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = Error;

    /// Parse a type string. Exact, case-sensitive match.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(RecordType::A),
            "AAAA" => Ok(RecordType::Aaaa),
            "CNAME" => Ok(RecordType::Cname),
            "MX" => Ok(RecordType::Mx),
            "TXT" => Ok(RecordType::Txt),
            "SRV" => Ok(RecordType::Srv),
            "NS" => Ok(RecordType::Ns),
            "CAA" => Ok(RecordType::Caa),
            "PTR" => Ok(RecordType::Ptr),
            other => Err(Error::validation(format!(
                "Unsupported record type '{}' in field 'type'",
                other
            ))),
        }
    }
}

/// Identity of a record for matching: the `(name, type)` pair
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordIdentity {
    /// Record name
    pub name: String,
    /// Record type string
    pub record_type: String,
}

impl fmt::Display for RecordIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.record_type)
    }
}

/// Desired state for one DNS record
///
/// Optional fields are kept exactly as loaded; defaults are applied only
/// when comparing or when building a provider payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordDefinition {
    /// Record name (e.g. "api.example.com")
    pub name: String,

    /// Record type
    #[serde(rename = "type")]
    pub record_type: RecordType,

    /// Record content (address, target, text...)
    pub content: String,

    /// Time-to-live in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,

    /// Whether the record is proxied by the provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxied: Option<bool>,

    /// Priority, meaningful for MX and SRV only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,
}

impl RecordDefinition {
    /// Create a definition with all optional fields absent
    pub fn new(
        name: impl Into<String>,
        record_type: RecordType,
        content: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            record_type,
            content: content.into(),
            ttl: None,
            proxied: None,
            priority: None,
        }
    }

    /// Set the TTL
    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Set the proxy flag
    pub fn with_proxied(mut self, proxied: bool) -> Self {
        self.proxied = Some(proxied);
        self
    }

    /// Set the priority
    pub fn with_priority(mut self, priority: u16) -> Self {
        self.priority = Some(priority);
        self
    }

    /// The `(name, type)` identity of this definition
    pub fn identity(&self) -> RecordIdentity {
        RecordIdentity {
            name: self.name.clone(),
            record_type: self.record_type.as_str().to_string(),
        }
    }

    /// TTL with [`DEFAULT_TTL`] applied
    pub fn effective_ttl(&self) -> u32 {
        effective_ttl(self.ttl)
    }

    /// Proxy flag with [`DEFAULT_PROXIED`] applied
    pub fn effective_proxied(&self) -> bool {
        self.proxied.unwrap_or(DEFAULT_PROXIED)
    }
}

/// A record as held by the DNS provider
///
/// The type is kept as the provider's raw string so records of types this
/// crate does not model still load into the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveRecord {
    /// Provider-assigned identifier
    pub id: String,

    /// Record name
    pub name: String,

    /// Record type string
    #[serde(rename = "type")]
    pub record_type: String,

    /// Record content
    pub content: String,

    /// Time-to-live in seconds
    #[serde(default)]
    pub ttl: Option<u32>,

    /// Proxy flag
    #[serde(default)]
    pub proxied: Option<bool>,

    /// Priority (MX, SRV)
    #[serde(default)]
    pub priority: Option<u16>,
}

impl LiveRecord {
    /// The `(name, type)` identity of this record
    pub fn identity(&self) -> RecordIdentity {
        RecordIdentity {
            name: self.name.clone(),
            record_type: self.record_type.clone(),
        }
    }
}

/// Map an optional TTL to its effective value. 0 counts as unset.
pub fn effective_ttl(ttl: Option<u32>) -> u32 {
    match ttl {
        Some(0) | None => DEFAULT_TTL,
        Some(ttl) => ttl,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_type_parse() {
        assert_eq!("AAAA".parse::<RecordType>().unwrap(), RecordType::Aaaa);
        assert_eq!("MX".parse::<RecordType>().unwrap(), RecordType::Mx);
        assert!("aaaa".parse::<RecordType>().is_err());
        assert!("HTTPS".parse::<RecordType>().is_err());
    }

    #[test]
    fn test_uses_priority() {
        assert!(RecordType::Mx.uses_priority());
        assert!(RecordType::Srv.uses_priority());
        assert!(!RecordType::A.uses_priority());
        assert!(!RecordType::Txt.uses_priority());
    }

    #[test]
    fn test_effective_defaults() {
        let def = RecordDefinition::new("api.example.com", RecordType::A, "1.2.3.4");
        assert_eq!(def.effective_ttl(), DEFAULT_TTL);
        assert!(!def.effective_proxied());

        let def = def.with_ttl(0);
        assert_eq!(def.effective_ttl(), DEFAULT_TTL);

        let def = def.with_ttl(300).with_proxied(true);
        assert_eq!(def.effective_ttl(), 300);
        assert!(def.effective_proxied());
    }

    #[test]
    fn test_identity_display() {
        let def = RecordDefinition::new("mail.example.com", RecordType::Mx, "mx1.example.com");
        assert_eq!(def.identity().to_string(), "mail.example.com (MX)");
    }

    #[test]
    fn test_live_record_ignores_unknown_fields() {
        let json = serde_json::json!({
            "id": "abc123",
            "name": "api.example.com",
            "type": "HTTPS",
            "content": "1 . alpn=h2",
            "ttl": 1,
            "proxied": false,
            "zone_id": "zone",
            "created_on": "2024-01-01T00:00:00Z"
        });

        let record: LiveRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.record_type, "HTTPS");
        assert_eq!(record.priority, None);
    }
}
