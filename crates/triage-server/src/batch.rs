//! Batch mode: run the pipeline over every sample log file in a directory.

use anyhow::Context;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;
use triage_memory::InvestigationId;
use triage_pipeline::{evaluate_report, Pipeline};

/// Investigate every `*.json` file under `dir`, printing each result.
pub(crate) async fn run(
    pipeline: Arc<Pipeline>,
    dir: &Path,
    max_iterations: u32,
) -> anyhow::Result<()> {
    let mut files: Vec<_> = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read sample directory {}", dir.display()))?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();

    if files.is_empty() {
        println!("No log files found in {}", dir.display());
        return Ok(());
    }
    println!("Found {} sample log files.\n", files.len());

    for path in files {
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(error) => {
                warn!(path = %path.display(), %error, "could not read sample file");
                continue;
            }
        };

        let id = InvestigationId::new();
        println!("\n{}", "=".repeat(80));
        println!("Processing: {}", path.display());
        println!("{}", "=".repeat(80));

        match pipeline.investigate(&id, &raw, max_iterations).await {
            Ok(outcome) => {
                println!("\n=== LOG SUMMARY ===");
                println!("{}", outcome.extraction);

                println!("\n=== THREAT INTEL (per address) ===");
                println!("{}", serde_json::to_string_pretty(&outcome.enrichment)?);

                println!("\n=== FINDINGS ===");
                println!("{}", serde_json::to_string_pretty(&outcome.findings)?);

                println!("\n=== INCIDENT REPORT ===");
                println!("{}", outcome.report.draft);

                println!("\n=== EVALUATION ===");
                let evaluation = evaluate_report(&outcome.report);
                println!("{}", serde_json::to_string_pretty(&evaluation)?);

                println!("\nFinished processing: {}", path.display());
            }
            Err(failure) => {
                println!(
                    "\nInvestigation {id} failed in the {} stage: {failure}",
                    failure.stage
                );
            }
        }
    }

    Ok(())
}
