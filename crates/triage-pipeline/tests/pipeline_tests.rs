//! End-to-end pipeline scenarios over the in-memory store and scripted
//! collaborators. No network, no live model.

use async_trait::async_trait;
use std::sync::Arc;
use triage_intel::testing::RecordingProvider;
use triage_llm::testing::ScriptedModel;
use triage_llm::{LlmError, NarrativeModel};
use triage_memory::{ArtifactKey, InvestigationId, MemoryStore};
use triage_pipeline::{
    evaluate_report, Findings, Pipeline, Record, Report, Stage, Tag, PLACEHOLDER_DRAFT,
};

fn offline_pipeline(store: Arc<MemoryStore>, provider: Arc<RecordingProvider>) -> Pipeline {
    Pipeline::new(store, provider, None)
}

#[tokio::test]
async fn single_auth_failure_record_is_flagged() {
    let store = Arc::new(MemoryStore::new());
    let provider = Arc::new(RecordingProvider::new());
    let pipeline = offline_pipeline(Arc::clone(&store), provider);

    let id = InvestigationId::from("scenario-a");
    let outcome = pipeline
        .investigate(&id, r#"{"message":"Failed password for root"}"#, 3)
        .await
        .unwrap();

    assert_eq!(outcome.extraction.parsed, 1);
    assert_eq!(outcome.extraction.flagged, 1);

    let flagged: Vec<Record> = store
        .get(&id, ArtifactKey::FlaggedRecords)
        .unwrap()
        .unwrap();
    assert_eq!(flagged.len(), 1);
    assert_eq!(flagged[0].tags, vec![Tag::AuthFailure]);
}

#[tokio::test]
async fn duplicate_source_ips_produce_one_lookup() {
    let store = Arc::new(MemoryStore::new());
    let provider = Arc::new(RecordingProvider::new());
    let pipeline = offline_pipeline(store, Arc::clone(&provider));

    let id = InvestigationId::from("scenario-b");
    let raw = concat!(
        "{\"message\":\"Failed password for root\",\"src_ip\":\"10.0.0.5\"}\n",
        "{\"message\":\"Failed password for admin\",\"src_ip\":\"10.0.0.5\"}\n",
    );
    let outcome = pipeline.investigate(&id, raw, 3).await.unwrap();

    assert_eq!(provider.call_count(), 1);
    assert_eq!(provider.seen(), vec!["10.0.0.5"]);
    assert_eq!(outcome.enrichment.len(), 1);
}

#[tokio::test]
async fn fully_offline_run_uses_placeholders_and_no_external_calls() {
    let store = Arc::new(MemoryStore::new());
    let provider = Arc::new(RecordingProvider::new());
    let pipeline = offline_pipeline(Arc::clone(&store), Arc::clone(&provider));

    let id = InvestigationId::from("scenario-c");
    let outcome = pipeline
        .investigate(&id, r#"{"message":"Failed password for root"}"#, 3)
        .await
        .unwrap();

    // The record has no address field, so even the scripted provider is
    // never invoked.
    assert_eq!(provider.call_count(), 0);

    assert!(matches!(outcome.findings, Findings::Placeholder(_)));
    assert_eq!(outcome.findings.plan().unwrap().severity, "High");
    assert_eq!(outcome.report.draft, PLACEHOLDER_DRAFT);
    assert_eq!(outcome.report.iterations, 1);
    assert!(outcome.report.placeholder);
}

#[tokio::test]
async fn offline_iteration_count_is_one_for_any_requested_maximum() {
    for requested in [1, 3, 10] {
        let store = Arc::new(MemoryStore::new());
        let provider = Arc::new(RecordingProvider::new());
        let pipeline = offline_pipeline(store, provider);

        let id = InvestigationId::from("iterations");
        let outcome = pipeline
            .investigate(&id, r#"{"message":"Failed password for root"}"#, requested)
            .await
            .unwrap();

        assert_eq!(outcome.report.iterations, 1);
    }
}

#[tokio::test]
async fn malformed_jsonl_line_is_dropped_silently() {
    let store = Arc::new(MemoryStore::new());
    let provider = Arc::new(RecordingProvider::new());
    let pipeline = offline_pipeline(store, provider);

    let id = InvestigationId::from("malformed");
    let raw = "{broken json\n{\"message\":\"Failed password for root\"}\n";
    let outcome = pipeline.investigate(&id, raw, 3).await.unwrap();

    assert_eq!(outcome.extraction.parsed, 1);
    assert_eq!(outcome.extraction.flagged, 1);
}

#[tokio::test]
async fn distinct_addresses_fan_out_one_lookup_each() {
    let store = Arc::new(MemoryStore::new());
    let provider = Arc::new(RecordingProvider::new().malicious_on("10.9.9.9"));
    let pipeline = offline_pipeline(store, Arc::clone(&provider));

    let id = InvestigationId::from("fanout");
    let raw = concat!(
        "{\"message\":\"Failed password for root\",\"src_ip\":\"10.0.0.5\"}\n",
        "{\"message\":\"authentication failure\",\"src_ip\":\"10.9.9.9\"}\n",
        "{\"message\":\"authentication failure\",\"ip\":\"172.16.0.2\"}\n",
    );
    let outcome = pipeline.investigate(&id, raw, 3).await.unwrap();

    assert_eq!(provider.call_count(), 3);
    assert_eq!(outcome.enrichment.len(), 3);
    let flagged = outcome.enrichment["10.9.9.9"].as_ref().unwrap();
    assert_eq!(flagged.score, 1.0);
}

#[tokio::test]
async fn scripted_model_drives_findings_and_report() {
    let store = Arc::new(MemoryStore::new());
    let provider = Arc::new(RecordingProvider::new());
    let plan_json = r#"{
        "attack_summary": "SSH brute force from one source.",
        "mitre_techniques": ["T1110 - Brute Force"],
        "severity": "Critical",
        "remediation_steps": ["Block the source address."],
        "ioc_list": ["10.0.0.5"]
    }"#;
    let model = Arc::new(ScriptedModel::with_responses([
        plan_json,
        "Executive Summary\nTimeline\nIndicators of Compromise\nRemediation",
    ]));
    let pipeline = Pipeline::new(Arc::clone(&store), provider, Some(model.clone()));

    let id = InvestigationId::from("scripted");
    let outcome = pipeline
        .investigate(
            &id,
            "{\"message\":\"Failed password for root\",\"src_ip\":\"10.0.0.5\"}",
            1,
        )
        .await
        .unwrap();

    // One synthesis call plus one refinement iteration.
    assert_eq!(model.call_count(), 2);
    assert!(matches!(outcome.findings, Findings::Model(_)));
    assert_eq!(outcome.findings.plan().unwrap().severity, "Critical");
    assert_eq!(outcome.report.iterations, 1);
    assert!(!outcome.report.placeholder);

    let evaluation = evaluate_report(&outcome.report);
    assert_eq!(evaluation.score, 4);
}

/// Model double whose calls always fail, to exercise the stage-fatal path.
struct BrokenModel;

#[async_trait]
impl NarrativeModel for BrokenModel {
    async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
        Err(LlmError::EmptyResponse)
    }
}

#[tokio::test]
async fn stage_failure_is_tagged_and_partial_artifacts_survive() {
    let store = Arc::new(MemoryStore::new());
    let provider = Arc::new(RecordingProvider::new());
    let pipeline = Pipeline::new(Arc::clone(&store), provider, Some(Arc::new(BrokenModel)));

    let id = InvestigationId::from("broken");
    let error = pipeline
        .investigate(
            &id,
            "{\"message\":\"Failed password for root\",\"src_ip\":\"10.0.0.5\"}",
            3,
        )
        .await
        .unwrap_err();

    assert_eq!(error.stage, Stage::Synthesis);

    // Stages 1 and 2 completed; their artifacts are still inspectable.
    let flagged: Vec<Record> = store
        .get(&id, ArtifactKey::FlaggedRecords)
        .unwrap()
        .unwrap();
    assert_eq!(flagged.len(), 1);
    assert!(store.get_raw(&id, ArtifactKey::EnrichmentResults).is_some());

    // Stages 3 and 4 never wrote theirs.
    assert!(store.get_raw(&id, ArtifactKey::Findings).is_none());
    let report: Option<Report> = store.get(&id, ArtifactKey::Report).unwrap();
    assert!(report.is_none());
}
