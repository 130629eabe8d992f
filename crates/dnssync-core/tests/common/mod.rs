//! Test doubles and common utilities for engine contract tests
//!
//! This module provides minimal in-memory collaborators that record every
//! call, so tests can assert exactly which provider operations ran.

#![allow(dead_code)]

use dnssync_core::error::{Error, Result};
use dnssync_core::traits::{ChangeSource, DnsProvider};
use dnssync_core::{LiveRecord, ProviderConfig, RecordDefinition, SyncConfig};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A provider call observed by [`MockDnsProvider`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    List,
    Create(RecordDefinition),
    Update(String, RecordDefinition),
    Delete(String),
}

/// A mock DnsProvider that serves a fixed snapshot and tracks calls
pub struct MockDnsProvider {
    /// Records returned by list_records()
    snapshot: Vec<LiveRecord>,
    /// Every call, in order
    calls: Arc<Mutex<Vec<ProviderCall>>>,
    /// Record names whose writes fail
    failing_names: HashSet<String>,
    /// Whether list_records() fails
    fail_list: bool,
    /// Counter for generated record ids
    next_id: Arc<AtomicUsize>,
}

impl MockDnsProvider {
    pub fn new(snapshot: Vec<LiveRecord>) -> Self {
        Self {
            snapshot,
            calls: Arc::new(Mutex::new(Vec::new())),
            failing_names: HashSet::new(),
            fail_list: false,
            next_id: Arc::new(AtomicUsize::new(1)),
        }
    }

    /// Make every write for `name` fail with a provider error
    pub fn failing_on(mut self, name: &str) -> Self {
        self.failing_names.insert(name.to_string());
        self
    }

    /// Make list_records() fail
    pub fn failing_list(mut self) -> Self {
        self.fail_list = true;
        self
    }

    /// Handle to the call log, usable after the provider moves into the engine
    pub fn call_log(&self) -> Arc<Mutex<Vec<ProviderCall>>> {
        Arc::clone(&self.calls)
    }

    fn check_name(&self, name: &str) -> Result<()> {
        if self.failing_names.contains(name) {
            return Err(Error::provider("mock", format!("Injected failure for {}", name)));
        }
        Ok(())
    }

    fn to_live(id: String, record: &RecordDefinition) -> LiveRecord {
        LiveRecord {
            id,
            name: record.name.clone(),
            record_type: record.record_type.to_string(),
            content: record.content.clone(),
            ttl: Some(record.effective_ttl()),
            proxied: Some(record.effective_proxied()),
            priority: record.priority,
        }
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn list_records(&self) -> Result<Vec<LiveRecord>> {
        self.calls.lock().unwrap().push(ProviderCall::List);
        if self.fail_list {
            return Err(Error::provider("mock", "Zone listing unavailable"));
        }
        Ok(self.snapshot.clone())
    }

    async fn create_record(&self, record: &RecordDefinition) -> Result<LiveRecord> {
        self.calls
            .lock()
            .unwrap()
            .push(ProviderCall::Create(record.clone()));
        self.check_name(&record.name)?;

        let id = format!("new-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        Ok(Self::to_live(id, record))
    }

    async fn update_record(&self, id: &str, record: &RecordDefinition) -> Result<LiveRecord> {
        self.calls
            .lock()
            .unwrap()
            .push(ProviderCall::Update(id.to_string(), record.clone()));
        self.check_name(&record.name)?;

        Ok(Self::to_live(id.to_string(), record))
    }

    async fn delete_record(&self, id: &str) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(ProviderCall::Delete(id.to_string()));

        let name = self
            .snapshot
            .iter()
            .find(|live| live.id == id)
            .map(|live| live.name.clone())
            .unwrap_or_default();
        self.check_name(&name)
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// An in-memory ChangeSource backed by maps of file contents
pub struct MemoryChangeSource {
    report: String,
    current: HashMap<String, String>,
    previous: HashMap<String, String>,
    fail_report: bool,
}

impl MemoryChangeSource {
    pub fn new(report: impl Into<String>) -> Self {
        Self {
            report: report.into(),
            current: HashMap::new(),
            previous: HashMap::new(),
            fail_report: false,
        }
    }

    /// Set the current-revision content of `path`
    pub fn with_current(mut self, path: &str, content: &str) -> Self {
        self.current.insert(path.to_string(), content.to_string());
        self
    }

    /// Set the baseline-revision content of `path`
    pub fn with_previous(mut self, path: &str, content: &str) -> Self {
        self.previous.insert(path.to_string(), content.to_string());
        self
    }

    /// Make change_report() fail
    pub fn failing_report(mut self) -> Self {
        self.fail_report = true;
        self
    }
}

#[async_trait::async_trait]
impl ChangeSource for MemoryChangeSource {
    async fn change_report(&self) -> Result<String> {
        if self.fail_report {
            return Err(Error::change_source("git diff exited with status 128"));
        }
        Ok(self.report.clone())
    }

    async fn previous_content(&self, path: &str) -> Result<String> {
        self.previous
            .get(path)
            .cloned()
            .ok_or_else(|| Error::change_source(format!("{} not found at baseline", path)))
    }

    async fn current_content(&self, path: &str) -> Result<String> {
        self.current
            .get(path)
            .cloned()
            .ok_or_else(|| Error::change_source(format!("{} not found at current revision", path)))
    }

    fn source_name(&self) -> &'static str {
        "memory"
    }
}

/// Helper to create a minimal SyncConfig for testing
pub fn minimal_config() -> SyncConfig {
    SyncConfig::new(ProviderConfig::cloudflare("test-token", "test-zone"))
}

/// Helper to build a live record with provider defaults filled in
pub fn live(id: &str, name: &str, record_type: &str, content: &str) -> LiveRecord {
    LiveRecord {
        id: id.to_string(),
        name: name.to_string(),
        record_type: record_type.to_string(),
        content: content.to_string(),
        ttl: Some(3600),
        proxied: Some(false),
        priority: None,
    }
}

/// Helper to render a minimal A record file
pub fn a_record_yaml(name: &str, content: &str) -> String {
    format!("name: {}\ntype: A\ncontent: {}\n", name, content)
}
