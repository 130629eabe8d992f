//! Diff evaluation
//!
//! Decides whether a definition and its matched live record disagree.

use crate::record::{DEFAULT_PROXIED, LiveRecord, RecordDefinition, effective_ttl};

/// Whether `definition` and `live` differ in any compared field
///
/// - `content`: exact string equality
/// - `ttl`: both sides defaulted to [`DEFAULT_TTL`](crate::record::DEFAULT_TTL) when absent or 0
/// - `proxied`: both sides defaulted to `false` when absent
/// - `priority`: MX and SRV only, compared without defaulting
pub fn records_differ(definition: &RecordDefinition, live: &LiveRecord) -> bool {
    if definition.content != live.content {
        return true;
    }

    if effective_ttl(definition.ttl) != effective_ttl(live.ttl) {
        return true;
    }

    if definition.proxied.unwrap_or(DEFAULT_PROXIED) != live.proxied.unwrap_or(DEFAULT_PROXIED) {
        return true;
    }

    definition.record_type.uses_priority() && definition.priority != live.priority
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordType;

    fn live_a(content: &str) -> LiveRecord {
        LiveRecord {
            id: "rec-1".to_string(),
            name: "api.example.com".to_string(),
            record_type: "A".to_string(),
            content: content.to_string(),
            ttl: Some(3600),
            proxied: Some(false),
            priority: None,
        }
    }

    fn live_mx(priority: Option<u16>) -> LiveRecord {
        LiveRecord {
            id: "rec-mx".to_string(),
            name: "example.com".to_string(),
            record_type: "MX".to_string(),
            content: "mail.example.com".to_string(),
            ttl: Some(3600),
            proxied: Some(false),
            priority,
        }
    }

    #[test]
    fn test_defaults_make_records_equal() {
        let def = RecordDefinition::new("api.example.com", RecordType::A, "1.2.3.4");
        assert!(!records_differ(&def, &live_a("1.2.3.4")));
    }

    #[test]
    fn test_content_change_differs() {
        let def = RecordDefinition::new("api.example.com", RecordType::A, "1.2.3.4");
        assert!(records_differ(&def, &live_a("1.2.3.5")));
    }

    #[test]
    fn test_ttl_defaulting_is_symmetric() {
        let implicit = RecordDefinition::new("api.example.com", RecordType::A, "1.2.3.4");
        let explicit = implicit.clone().with_ttl(3600);

        for content in ["1.2.3.4", "1.2.3.5"] {
            let live = live_a(content);
            assert_eq!(records_differ(&implicit, &live), records_differ(&explicit, &live));
        }

        let mut live_without_ttl = live_a("1.2.3.4");
        live_without_ttl.ttl = None;
        assert!(!records_differ(&explicit, &live_without_ttl));

        live_without_ttl.ttl = Some(0);
        assert!(!records_differ(&explicit, &live_without_ttl));
    }

    #[test]
    fn test_ttl_change_differs() {
        let def = RecordDefinition::new("api.example.com", RecordType::A, "1.2.3.4").with_ttl(300);
        assert!(records_differ(&def, &live_a("1.2.3.4")));
    }

    #[test]
    fn test_proxied_defaulting() {
        let def = RecordDefinition::new("api.example.com", RecordType::A, "1.2.3.4");
        let mut live = live_a("1.2.3.4");
        live.proxied = None;
        assert!(!records_differ(&def, &live));

        let proxied = def.with_proxied(true);
        assert!(records_differ(&proxied, &live));
    }

    #[test]
    fn test_priority_compared_for_mx() {
        let def = RecordDefinition::new("example.com", RecordType::Mx, "mail.example.com")
            .with_priority(10);

        assert!(!records_differ(&def, &live_mx(Some(10))));
        assert!(records_differ(&def, &live_mx(Some(20))));
        assert!(records_differ(&def, &live_mx(None)));

        let no_priority = RecordDefinition::new("example.com", RecordType::Mx, "mail.example.com");
        assert!(!records_differ(&no_priority, &live_mx(None)));
        assert!(records_differ(&no_priority, &live_mx(Some(10))));
    }

    #[test]
    fn test_priority_compared_for_srv() {
        let def = RecordDefinition::new("_sip._tcp.example.com", RecordType::Srv, "10 5060 sip.example.com")
            .with_priority(1);
        let mut live = live_mx(Some(2));
        live.name = "_sip._tcp.example.com".to_string();
        live.record_type = "SRV".to_string();
        live.content = "10 5060 sip.example.com".to_string();

        assert!(records_differ(&def, &live));
    }

    #[test]
    fn test_priority_ignored_for_other_types() {
        let def = RecordDefinition::new("api.example.com", RecordType::A, "1.2.3.4").with_priority(5);
        let mut live = live_a("1.2.3.4");
        live.priority = Some(99);
        assert!(!records_differ(&def, &live));
    }
}
