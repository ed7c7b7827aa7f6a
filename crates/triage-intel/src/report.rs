//! Enrichment result types and scoring.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Verdict from a single reputation source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceVerdict {
    /// Whether this source considers the address malicious.
    pub malicious: bool,
    /// Source-specific supporting detail (confidence score, pulse count, ...).
    pub evidence: Value,
}

impl SourceVerdict {
    /// Build a verdict with its supporting evidence.
    #[inline]
    #[must_use]
    pub fn new(malicious: bool, evidence: Value) -> Self {
        Self { malicious, evidence }
    }
}

/// Result of one enrichment lookup for one address.
///
/// Produced at most once per address per investigation and immutable
/// afterward. A `None` source entry means that source was skipped or failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntelReport {
    /// The address that was looked up.
    pub address: String,
    /// Per-source verdicts, keyed by source name.
    pub sources: BTreeMap<String, Option<SourceVerdict>>,
    /// Aggregate score in `[0.0, 1.0]`.
    pub score: f64,
}

/// Aggregate scoring over per-source verdicts.
///
/// The shipped formula is a placeholder heuristic, so it sits behind a trait:
/// swapping in a real reputation model must not touch the fan-out stage.
pub trait ScorePolicy: Send + Sync + std::fmt::Debug {
    /// Fold the source verdicts into a single score.
    fn score(&self, sources: &BTreeMap<String, Option<SourceVerdict>>) -> f64;
}

/// Default policy: fraction of the configured source universe that flagged
/// the address as malicious.
#[derive(Debug, Clone, Copy)]
pub struct SourceFraction {
    /// Size of the source universe the fraction is taken over.
    pub total_sources: u32,
}

impl SourceFraction {
    /// Policy over `total_sources` sources.
    #[inline]
    #[must_use]
    pub fn new(total_sources: u32) -> Self {
        Self { total_sources }
    }
}

impl Default for SourceFraction {
    fn default() -> Self {
        // AbuseIPDB, VirusTotal, OTX
        Self::new(3)
    }
}

impl ScorePolicy for SourceFraction {
    fn score(&self, sources: &BTreeMap<String, Option<SourceVerdict>>) -> f64 {
        if self.total_sources == 0 {
            return 0.0;
        }
        let malicious = sources
            .values()
            .filter(|verdict| verdict.as_ref().is_some_and(|v| v.malicious))
            .count();
        malicious as f64 / f64::from(self.total_sources)
    }
}
