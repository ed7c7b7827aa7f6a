//! Pipeline error taxonomy.
//!
//! Recoverable conditions (malformed records, unconfigured collaborators,
//! per-key lookup failures, unparseable model responses) never appear here;
//! they are folded into fallback values at the stage that meets them. What
//! remains is stage-fatal: the orchestrator aborts the remaining stages and
//! tags the failure with the stage it came from. Artifacts already written
//! stay readable in the memory store.

use serde::{Deserialize, Serialize};
use triage_llm::LlmError;
use triage_memory::MemoryError;

/// The four pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Raw text to tagged records.
    Extraction,
    /// Concurrent reputation lookups.
    Enrichment,
    /// Structured findings synthesis.
    Synthesis,
    /// Iterative report refinement.
    Refinement,
}

impl Stage {
    /// Stable snake_case name, matching the serialized form.
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Extraction => "extraction",
            Self::Enrichment => "enrichment",
            Self::Synthesis => "synthesis",
            Self::Refinement => "refinement",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecoverable condition inside one stage.
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    /// The memory store rejected an artifact read or write.
    #[error(transparent)]
    Memory(#[from] MemoryError),

    /// A configured narrative model call failed outright.
    #[error("narrative model call failed: {0}")]
    Model(#[from] LlmError),

    /// Prompt context could not be rendered to JSON.
    #[error("failed to render prompt context: {0}")]
    Render(#[source] serde_json::Error),
}

/// Stage-tagged pipeline failure surfaced to callers.
#[derive(Debug, thiserror::Error)]
#[error("{stage} stage failed: {source}")]
pub struct PipelineError {
    /// Stage that raised the failure.
    pub stage: Stage,
    /// The underlying condition.
    #[source]
    pub source: StageError,
}

impl PipelineError {
    pub(crate) fn at(stage: Stage) -> impl FnOnce(StageError) -> Self {
        move |source| Self { stage, source }
    }
}
