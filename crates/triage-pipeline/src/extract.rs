//! Stage 1: extraction.
//!
//! Parses the raw log text, derives tags, and seeds the investigation's
//! partition with `parsed_records` and `flagged_records`. Zero records is a
//! valid outcome, not an error.

use crate::error::StageError;
use crate::records::{parse_records, Record};
use serde::{Deserialize, Serialize};
use tracing::info;
use triage_memory::{ArtifactKey, InvestigationId, MemoryStore};

/// Counts returned by the extraction stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionSummary {
    /// Records parsed from the raw text.
    pub parsed: usize,
    /// Records carrying at least one tag.
    pub flagged: usize,
}

impl std::fmt::Display for ExtractionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Parsed {} records; found {} suspicious events.",
            self.parsed, self.flagged
        )
    }
}

/// The extraction stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct Extraction;

impl Extraction {
    /// Parse `raw_logs` and write both record artifacts.
    ///
    /// # Errors
    /// - [`StageError::Memory`] if an artifact write fails
    pub fn run(
        &self,
        store: &MemoryStore,
        id: &InvestigationId,
        raw_logs: &str,
    ) -> Result<ExtractionSummary, StageError> {
        let records = parse_records(raw_logs);
        let flagged: Vec<Record> = records
            .iter()
            .filter(|record| record.is_flagged())
            .cloned()
            .collect();

        let summary = ExtractionSummary {
            parsed: records.len(),
            flagged: flagged.len(),
        };
        info!(
            investigation = %id,
            parsed = summary.parsed,
            flagged = summary.flagged,
            "extraction complete"
        );

        store.put(id, ArtifactKey::ParsedRecords, &records)?;
        store.put(id, ArtifactKey::FlaggedRecords, &flagged)?;
        Ok(summary)
    }
}
