//! The pipeline orchestrator.
//!
//! Invokes the four stages in fixed order for one investigation. Control
//! flow is strictly linear; stage data flows only through the memory store,
//! and the fan-out inside enrichment is the single suspension point with
//! internal concurrency. A stage-fatal error aborts the remaining stages,
//! leaving already-written artifacts inspectable.

use crate::config::TriageConfig;
use crate::enrich::{Enrichment, EnrichmentMap};
use crate::error::{PipelineError, Stage};
use crate::extract::{Extraction, ExtractionSummary};
use crate::findings::{Findings, Report};
use crate::refine::Refinement;
use crate::synthesize::Synthesis;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use triage_intel::{HttpIntelClient, IntelError, IntelProvider};
use triage_llm::{GeminiClient, LlmError, NarrativeModel};
use triage_memory::{InvestigationId, MemoryStore};

/// Consolidated result of one investigation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestigationOutcome {
    /// Identifier of the investigation's memory partition.
    pub id: InvestigationId,
    /// Extraction counts.
    pub extraction: ExtractionSummary,
    /// Address to intel result mapping.
    pub enrichment: EnrichmentMap,
    /// Tagged synthesis output.
    pub findings: Findings,
    /// Final refined report.
    pub report: Report,
}

/// Failure while wiring collaborators from configuration.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The intel client could not be constructed.
    #[error("failed to build intel client: {0}")]
    Intel(#[from] IntelError),

    /// The narrative client could not be constructed.
    #[error("failed to build narrative client: {0}")]
    Llm(#[from] LlmError),
}

/// The staged investigation pipeline.
pub struct Pipeline {
    store: Arc<MemoryStore>,
    extraction: Extraction,
    enrichment: Enrichment,
    synthesis: Synthesis,
    refinement: Refinement,
}

impl Pipeline {
    /// Assemble a pipeline over `store` with explicit collaborators.
    ///
    /// `model: None` runs the synthesis and refinement fallbacks.
    #[must_use]
    pub fn new(
        store: Arc<MemoryStore>,
        intel: Arc<dyn IntelProvider>,
        model: Option<Arc<dyn NarrativeModel>>,
    ) -> Self {
        Self {
            store,
            extraction: Extraction,
            enrichment: Enrichment::new(intel),
            synthesis: Synthesis::new(model.clone()),
            refinement: Refinement::new(model),
        }
    }

    /// Wire collaborators from configuration.
    ///
    /// # Errors
    /// - [`BuildError`] if an HTTP client cannot be constructed
    pub fn from_config(store: Arc<MemoryStore>, config: &TriageConfig) -> Result<Self, BuildError> {
        let intel: Arc<dyn IntelProvider> =
            Arc::new(HttpIntelClient::new(config.intel_keys.clone())?);

        let model: Option<Arc<dyn NarrativeModel>> = match &config.gemini_api_key {
            Some(key) => Some(Arc::new(GeminiClient::new(key, &config.gemini_model)?)),
            None => None,
        };

        Ok(Self::new(store, intel, model))
    }

    /// The shared memory store, for inspecting artifacts after a run.
    #[inline]
    #[must_use]
    pub fn store(&self) -> &Arc<MemoryStore> {
        &self.store
    }

    /// Run the full investigation: extraction, enrichment, synthesis,
    /// refinement.
    ///
    /// # Errors
    /// - [`PipelineError`] tagged with the stage that failed; artifacts from
    ///   completed stages remain in the store
    pub async fn investigate(
        &self,
        id: &InvestigationId,
        raw_logs: &str,
        max_iterations: u32,
    ) -> Result<InvestigationOutcome, PipelineError> {
        info!(investigation = %id, bytes = raw_logs.len(), "starting investigation");

        let extraction = self
            .extraction
            .run(&self.store, id, raw_logs)
            .map_err(PipelineError::at(Stage::Extraction))?;

        let enrichment = self
            .enrichment
            .run(&self.store, id)
            .await
            .map_err(PipelineError::at(Stage::Enrichment))?;

        let findings = self
            .synthesis
            .run(&self.store, id)
            .await
            .map_err(PipelineError::at(Stage::Synthesis))?;

        let report = self
            .refinement
            .run(&self.store, id, max_iterations)
            .await
            .map_err(PipelineError::at(Stage::Refinement))?;

        info!(investigation = %id, iterations = report.iterations, "investigation complete");

        Ok(InvestigationOutcome {
            id: id.clone(),
            extraction,
            enrichment: enrichment.results,
            findings,
            report,
        })
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("enrichment", &self.enrichment)
            .field("synthesis", &self.synthesis)
            .field("refinement", &self.refinement)
            .finish_non_exhaustive()
    }
}
