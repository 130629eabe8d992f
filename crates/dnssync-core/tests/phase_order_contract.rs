//! Contract Test: Phase Order
//!
//! This test verifies the fixed processing order of a run: deletions,
//! then additions, then modifications, each against the same snapshot.
//!
//! Constraints verified:
//! - Deletions run before additions, additions before modifications
//! - The snapshot is not re-read between phases, so a record deleted in
//!   this run still matches a same-identity file processed later

mod common;

use common::*;
use dnssync_core::{ChangeKind, SyncEngine};

#[tokio::test]
async fn phases_run_in_fixed_order() {
    // Report order is deliberately the reverse of the processing order
    let report_text = "M\trecords/m.yaml\nA\trecords/a.yaml\nD\trecords/d.yaml\n";
    let source = MemoryChangeSource::new(report_text)
        .with_current("records/m.yaml", &a_record_yaml("m.example.com", "3.3.3.3"))
        .with_current("records/a.yaml", &a_record_yaml("a.example.com", "2.2.2.2"))
        .with_previous("records/d.yaml", &a_record_yaml("d.example.com", "1.1.1.1"));
    let provider = MockDnsProvider::new(vec![live("rec-d", "d.example.com", "A", "1.1.1.1")]);
    let log = provider.call_log();

    let engine = SyncEngine::new(Box::new(source), Box::new(provider), &minimal_config())
        .expect("engine construction succeeds");
    let report = engine.run().await.expect("run completes");

    let kinds: Vec<ChangeKind> = report.files.iter().map(|file| file.change).collect();
    assert_eq!(
        kinds,
        vec![ChangeKind::Deleted, ChangeKind::Added, ChangeKind::Modified]
    );

    let calls = log.lock().unwrap().clone();
    assert!(matches!(
        calls.as_slice(),
        [
            ProviderCall::List,
            ProviderCall::Delete(_),
            ProviderCall::Create(a),
            ProviderCall::Create(m),
        ] if a.name == "a.example.com" && m.name == "m.example.com"
    ));
}

#[tokio::test]
async fn same_identity_across_phases_uses_stale_snapshot() {
    // A file is deleted and another re-adds the identical record in one run.
    // The added file still matches the snapshot entry removed moments before.
    let report_text = "D\trecords/old.yaml\nA\trecords/new.yaml\n";
    let yaml = a_record_yaml("api.example.com", "1.2.3.4");
    let source = MemoryChangeSource::new(report_text)
        .with_previous("records/old.yaml", &yaml)
        .with_current("records/new.yaml", &yaml);
    let provider = MockDnsProvider::new(vec![live("rec-1", "api.example.com", "A", "1.2.3.4")]);
    let log = provider.call_log();

    let engine = SyncEngine::new(Box::new(source), Box::new(provider), &minimal_config())
        .expect("engine construction succeeds");
    let report = engine.run().await.expect("run completes");

    assert_eq!(
        log.lock().unwrap().as_slice(),
        &[ProviderCall::List, ProviderCall::Delete("rec-1".to_string())]
    );
    assert_eq!(report.deleted(), 1);
    assert_eq!(report.unchanged(), 1);
}
