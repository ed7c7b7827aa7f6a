//! HTTP serving surface.
//!
//! Two routes: a liveness message at `/` and `POST /investigate`, which runs
//! the full pipeline on the request body and replies with the consolidated
//! result, or a stage-tagged error with status 500.

use serde_json::json;
use std::convert::Infallible;
use std::sync::Arc;
use tracing::{error, info};
use triage_memory::InvestigationId;
use triage_pipeline::{evaluate_report, Pipeline};
use warp::http::StatusCode;
use warp::hyper::body::Bytes;
use warp::{Filter, Rejection, Reply};

/// Assemble the route tree.
pub(crate) fn routes(
    pipeline: Arc<Pipeline>,
    max_iterations: u32,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let root = warp::path::end().and(warp::get()).map(|| {
        warp::reply::json(&json!({
            "message": "SOC triage pipeline is running. Use POST /investigate with raw log text."
        }))
    });

    let investigate = warp::path("investigate")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::bytes())
        .and(with_pipeline(pipeline))
        .and(warp::any().map(move || max_iterations))
        .and_then(handle_investigate);

    root.or(investigate)
}

/// Serve the routes until the process is stopped.
pub(crate) async fn serve(pipeline: Arc<Pipeline>, max_iterations: u32, port: u16) {
    info!(port, "serving triage API");
    warp::serve(routes(pipeline, max_iterations))
        .run(([0, 0, 0, 0], port))
        .await;
}

fn with_pipeline(
    pipeline: Arc<Pipeline>,
) -> impl Filter<Extract = (Arc<Pipeline>,), Error = Infallible> + Clone {
    warp::any().map(move || Arc::clone(&pipeline))
}

async fn handle_investigate(
    body: Bytes,
    pipeline: Arc<Pipeline>,
    max_iterations: u32,
) -> Result<impl Reply, Infallible> {
    let log_text = String::from_utf8_lossy(&body);
    let id = InvestigationId::new();
    info!(investigation = %id, bytes = body.len(), "investigation request");

    match pipeline.investigate(&id, &log_text, max_iterations).await {
        Ok(outcome) => {
            let evaluation = evaluate_report(&outcome.report);
            let reply = warp::reply::json(&json!({
                "investigation_id": outcome.id,
                "log_summary": outcome.extraction.to_string(),
                "threat_intel": outcome.enrichment,
                "findings": outcome.findings,
                "incident_report": outcome.report,
                "evaluation": evaluation,
            }));
            Ok(warp::reply::with_status(reply, StatusCode::OK))
        }
        Err(failure) => {
            error!(investigation = %id, stage = %failure.stage, error = %failure, "investigation failed");
            let reply = warp::reply::json(&json!({
                "investigation_id": id,
                "stage": failure.stage,
                "error": failure.to_string(),
            }));
            Ok(warp::reply::with_status(
                reply,
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use triage_memory::MemoryStore;
    use triage_pipeline::TriageConfig;

    fn offline_pipeline() -> Arc<Pipeline> {
        let store = Arc::new(MemoryStore::new());
        Arc::new(Pipeline::from_config(store, &TriageConfig::offline()).unwrap())
    }

    #[tokio::test]
    async fn root_replies_with_liveness_message() {
        let routes = routes(offline_pipeline(), 3);

        let response = warp::test::request().method("GET").path("/").reply(&routes).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert!(body["message"].as_str().unwrap().contains("investigate"));
    }

    #[tokio::test]
    async fn investigate_runs_offline_pipeline() {
        let routes = routes(offline_pipeline(), 3);

        let response = warp::test::request()
            .method("POST")
            .path("/investigate")
            .body(r#"{"message":"Failed password for root"}"#)
            .reply(&routes)
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["findings"]["origin"], "placeholder");
        assert_eq!(body["findings"]["severity"], "High");
        assert_eq!(body["incident_report"]["iterations"], 1);
        assert_eq!(
            body["log_summary"],
            "Parsed 1 records; found 1 suspicious events."
        );
    }

    #[tokio::test]
    async fn investigate_rejects_get() {
        let routes = routes(offline_pipeline(), 3);

        let response = warp::test::request()
            .method("GET")
            .path("/investigate")
            .reply(&routes)
            .await;

        assert_ne!(response.status(), StatusCode::OK);
    }
}
