//! Stage 3: findings synthesis.
//!
//! Reads the record and enrichment artifacts, calls the narrative model
//! exactly once, and stores tagged findings. A malformed model response is
//! wrapped, not fatal; an absent model selects the fixed placeholder, so the
//! whole pipeline can run offline.

use crate::enrich::EnrichmentMap;
use crate::error::StageError;
use crate::findings::{Findings, ResponsePlan};
use crate::records::Record;
use std::sync::Arc;
use tracing::{info, warn};
use triage_llm::NarrativeModel;
use triage_memory::{ArtifactKey, InvestigationId, MemoryStore};

/// The synthesis stage.
pub struct Synthesis {
    model: Option<Arc<dyn NarrativeModel>>,
}

impl Synthesis {
    /// Stage backed by `model`; `None` selects the deterministic fallback.
    #[inline]
    #[must_use]
    pub fn new(model: Option<Arc<dyn NarrativeModel>>) -> Self {
        Self { model }
    }

    /// Synthesize findings from the artifacts written by stages 1 and 2.
    ///
    /// # Errors
    /// - [`StageError::Memory`] if an artifact read or write fails
    /// - [`StageError::Model`] if a configured model call fails outright
    pub async fn run(
        &self,
        store: &MemoryStore,
        id: &InvestigationId,
    ) -> Result<Findings, StageError> {
        let flagged: Vec<Record> = store.get_or_default(id, ArtifactKey::FlaggedRecords)?;
        let intel: EnrichmentMap = store.get_or_default(id, ArtifactKey::EnrichmentResults)?;

        let findings = match &self.model {
            None => {
                warn!(investigation = %id, "no narrative model configured, using placeholder findings");
                Findings::Placeholder(ResponsePlan::placeholder(intel.keys().cloned().collect()))
            }
            Some(model) => {
                let prompt = build_prompt(&flagged, &intel)?;
                info!(investigation = %id, "requesting response recommendation");
                let text = model.generate(&prompt).await?;
                match serde_json::from_str::<ResponsePlan>(&text) {
                    Ok(plan) => Findings::Model(plan),
                    Err(error) => {
                        warn!(investigation = %id, %error, "model response was not structured, wrapping raw text");
                        Findings::Unparsed { raw_response: text }
                    }
                }
            }
        };

        store.put(id, ArtifactKey::Findings, &findings)?;
        Ok(findings)
    }
}

impl std::fmt::Debug for Synthesis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Synthesis")
            .field("model_configured", &self.model.is_some())
            .finish()
    }
}

fn build_prompt(flagged: &[Record], intel: &EnrichmentMap) -> Result<String, StageError> {
    let flagged = serde_json::to_string_pretty(flagged).map_err(StageError::Render)?;
    let intel = serde_json::to_string_pretty(intel).map_err(StageError::Render)?;

    Ok(format!(
        r#"You are a senior SOC analyst.

You are given:
1. Suspicious log records (JSON):
{flagged}

2. Threat intelligence lookups for IPs:
{intel}

Tasks:
- Identify likely attack type(s).
- Map to MITRE ATT&CK techniques.
- Prioritize severity (Low/Medium/High/Critical).
- Suggest concrete remediation actions an analyst should take.
- Highlight any indicators of compromise (IOCs).

Return your answer as structured JSON with keys:
"attack_summary", "mitre_techniques", "severity", "remediation_steps", "ioc_list"."#
    ))
}
