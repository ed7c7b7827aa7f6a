//! Stage 4: report refinement.
//!
//! A bounded loop over the narrative model: every configured iteration runs
//! (there is no convergence check), and from the second iteration onward the
//! previous draft is fed back for improvement. With no model configured the
//! fixed placeholder draft is produced in a single conceptual iteration,
//! whatever the requested maximum was.

use crate::enrich::EnrichmentMap;
use crate::error::StageError;
use crate::findings::{Findings, Report};
use crate::records::Record;
use std::sync::Arc;
use tracing::{info, warn};
use triage_llm::NarrativeModel;
use triage_memory::{ArtifactKey, InvestigationId, MemoryStore};

/// Draft substituted when no narrative model is configured.
pub const PLACEHOLDER_DRAFT: &str = "Incident Report (placeholder)\n\n\
Executive Summary: Brute force attempts detected.\n\
Severity: High\n\
Remediation: Block IPs, enforce MFA.";

/// The refinement stage.
pub struct Refinement {
    model: Option<Arc<dyn NarrativeModel>>,
}

impl Refinement {
    /// Stage backed by `model`; `None` selects the deterministic fallback.
    #[inline]
    #[must_use]
    pub fn new(model: Option<Arc<dyn NarrativeModel>>) -> Self {
        Self { model }
    }

    /// Produce the final report from all prior artifacts.
    ///
    /// # Errors
    /// - [`StageError::Memory`] if an artifact read or write fails
    /// - [`StageError::Model`] if a configured model call fails outright
    pub async fn run(
        &self,
        store: &MemoryStore,
        id: &InvestigationId,
        max_iterations: u32,
    ) -> Result<Report, StageError> {
        let parsed: Vec<Record> = store.get_or_default(id, ArtifactKey::ParsedRecords)?;
        let flagged: Vec<Record> = store.get_or_default(id, ArtifactKey::FlaggedRecords)?;
        let intel: EnrichmentMap = store.get_or_default(id, ArtifactKey::EnrichmentResults)?;
        let findings: Option<Findings> = store.get(id, ArtifactKey::Findings)?;

        let report = match &self.model {
            None => {
                warn!(investigation = %id, "no narrative model configured, using placeholder report");
                Report {
                    draft: PLACEHOLDER_DRAFT.to_string(),
                    iterations: 1,
                    placeholder: true,
                }
            }
            Some(model) => {
                let base_prompt = build_prompt(&parsed, &flagged, &intel, findings.as_ref())?;
                let mut draft = String::new();

                for iteration in 0..max_iterations {
                    info!(
                        investigation = %id,
                        iteration = iteration + 1,
                        max_iterations,
                        "report refinement iteration"
                    );

                    let prompt = if draft.is_empty() {
                        base_prompt.clone()
                    } else {
                        format!(
                            "{base_prompt}\n\nHere is the previous draft. \
                             Improve clarity and structure:\n\n{draft}"
                        )
                    };
                    draft = model.generate(&prompt).await?;
                }

                Report {
                    draft,
                    iterations: max_iterations,
                    placeholder: false,
                }
            }
        };

        store.put(id, ArtifactKey::Report, &report)?;
        Ok(report)
    }
}

impl std::fmt::Debug for Refinement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Refinement")
            .field("model_configured", &self.model.is_some())
            .finish()
    }
}

fn build_prompt(
    parsed: &[Record],
    flagged: &[Record],
    intel: &EnrichmentMap,
    findings: Option<&Findings>,
) -> Result<String, StageError> {
    let parsed = serde_json::to_string_pretty(parsed).map_err(StageError::Render)?;
    let flagged = serde_json::to_string_pretty(flagged).map_err(StageError::Render)?;
    let intel = serde_json::to_string_pretty(intel).map_err(StageError::Render)?;
    let findings = serde_json::to_string_pretty(&findings).map_err(StageError::Render)?;

    Ok(format!(
        r#"You are an experienced SOC incident responder.

Create a professional incident report with:

- Executive Summary
- Timeline of Events
- Indicators of Compromise (IOCs)
- Attack Narrative (what likely happened)
- MITRE ATT&CK mapping
- Severity
- Detailed Technical Findings
- Recommended Remediation Actions
- Next Steps

Data you can use:

1) Parsed logs:
{parsed}

2) Suspicious logs:
{flagged}

3) Threat intelligence:
{intel}

4) Response recommendation:
{findings}"#
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::Extraction;
    use triage_llm::testing::ScriptedModel;

    const RAW: &str = "{\"message\":\"Failed password for root\",\"src_ip\":\"10.0.0.5\"}";

    fn seeded_store(id: &InvestigationId) -> MemoryStore {
        let store = MemoryStore::new();
        Extraction.run(&store, id, RAW).unwrap();
        store
    }

    #[tokio::test]
    async fn unconfigured_model_reports_one_iteration() {
        let id = InvestigationId::from("inv-1");
        let store = seeded_store(&id);
        let stage = Refinement::new(None);

        for requested in [1, 3, 10] {
            let report = stage.run(&store, &id, requested).await.unwrap();
            assert_eq!(report.iterations, 1);
            assert_eq!(report.draft, PLACEHOLDER_DRAFT);
            assert!(report.placeholder);
        }
    }

    #[tokio::test]
    async fn live_model_runs_every_configured_iteration() {
        let id = InvestigationId::from("inv-1");
        let store = seeded_store(&id);
        let model = Arc::new(ScriptedModel::with_responses([
            "draft one",
            "draft two",
            "draft three",
        ]));

        let report = Refinement::new(Some(model.clone()))
            .run(&store, &id, 3)
            .await
            .unwrap();

        assert_eq!(model.call_count(), 3);
        assert_eq!(report.iterations, 3);
        assert_eq!(report.draft, "draft three");
        assert!(!report.placeholder);
    }

    #[tokio::test]
    async fn previous_draft_is_fed_back_from_second_iteration() {
        let id = InvestigationId::from("inv-1");
        let store = seeded_store(&id);
        let model = Arc::new(ScriptedModel::with_responses(["first draft", "final"]));

        Refinement::new(Some(model.clone()))
            .run(&store, &id, 2)
            .await
            .unwrap();

        let prompts = model.prompts();
        assert!(!prompts[0].contains("previous draft"));
        assert!(prompts[1].contains("previous draft"));
        assert!(prompts[1].contains("first draft"));
    }

    #[tokio::test]
    async fn report_is_written_to_the_store() {
        let id = InvestigationId::from("inv-1");
        let store = seeded_store(&id);

        Refinement::new(None).run(&store, &id, 3).await.unwrap();

        let stored: Report = store.get(&id, ArtifactKey::Report).unwrap().unwrap();
        assert_eq!(stored.draft, PLACEHOLDER_DRAFT);
        assert_eq!(stored.iterations, 1);
    }
}
