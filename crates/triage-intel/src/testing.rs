//! Deterministic provider doubles for pipeline tests.

use crate::provider::{IntelError, IntelProvider};
use crate::report::{IntelReport, SourceVerdict};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Provider that records every lookup and answers from a script.
///
/// Addresses registered as failing return [`IntelError::Provider`]; addresses
/// registered as malicious return a single flagged source with score 1.0;
/// everything else gets a benign report.
#[derive(Debug, Default)]
pub struct RecordingProvider {
    calls: AtomicUsize,
    addresses: Mutex<Vec<String>>,
    failing: HashSet<String>,
    malicious: HashSet<String>,
}

impl RecordingProvider {
    /// Provider that answers benign for every address.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make lookups for `address` fail.
    #[must_use]
    pub fn failing_on(mut self, address: &str) -> Self {
        self.failing.insert(address.to_string());
        self
    }

    /// Make lookups for `address` come back malicious.
    #[must_use]
    pub fn malicious_on(mut self, address: &str) -> Self {
        self.malicious.insert(address.to_string());
        self
    }

    /// Number of lookups issued so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Addresses looked up, in call order.
    #[must_use]
    pub fn seen(&self) -> Vec<String> {
        self.addresses.lock().clone()
    }
}

#[async_trait]
impl IntelProvider for RecordingProvider {
    async fn check_address(&self, address: &str) -> Result<IntelReport, IntelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.addresses.lock().push(address.to_string());

        if self.failing.contains(address) {
            return Err(IntelError::Provider(format!(
                "scripted failure for {address}"
            )));
        }

        let malicious = self.malicious.contains(address);
        let mut sources = BTreeMap::new();
        sources.insert(
            "scripted".to_string(),
            Some(SourceVerdict::new(malicious, json!({ "scripted": true }))),
        );

        Ok(IntelReport {
            address: address.to_string(),
            sources,
            score: if malicious { 1.0 } else { 0.0 },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn recording_provider_counts_and_records() {
        let provider = RecordingProvider::new().malicious_on("10.0.0.5");

        let benign = provider.check_address("192.168.1.1").await.unwrap();
        let flagged = provider.check_address("10.0.0.5").await.unwrap();

        assert_eq!(provider.call_count(), 2);
        assert_eq!(provider.seen(), vec!["192.168.1.1", "10.0.0.5"]);
        assert_eq!(benign.score, 0.0);
        assert_eq!(flagged.score, 1.0);
    }

    #[tokio::test]
    async fn recording_provider_scripted_failure() {
        let provider = RecordingProvider::new().failing_on("10.0.0.5");

        let result = provider.check_address("10.0.0.5").await;
        assert!(matches!(result, Err(IntelError::Provider(_))));
        assert_eq!(provider.call_count(), 1);
    }
}
