//! Identifier and key types for the memory store.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier scoping one memory partition.
///
/// Created once at pipeline entry and never reused across investigations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvestigationId(String);

impl InvestigationId {
    /// Generate a fresh random identifier.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Identifier as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for InvestigationId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<String> for InvestigationId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for InvestigationId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Display for InvestigationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Names of the artifacts a pipeline run writes into its partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKey {
    /// Every record extracted from the raw log text.
    ParsedRecords,
    /// The subset of records carrying at least one tag.
    FlaggedRecords,
    /// Merged address -> intel result mapping from the fan-out stage.
    EnrichmentResults,
    /// Structured synthesis output.
    Findings,
    /// Final refined report.
    Report,
}

impl ArtifactKey {
    /// Stable store-key name for this artifact.
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ParsedRecords => "parsed_records",
            Self::FlaggedRecords => "flagged_records",
            Self::EnrichmentResults => "enrichment_results",
            Self::Findings => "findings",
            Self::Report => "report",
        }
    }
}

impl std::fmt::Display for ArtifactKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
