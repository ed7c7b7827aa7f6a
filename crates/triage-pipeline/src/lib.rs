//! Triage Pipeline - staged SOC log investigation
//!
//! Coordinates a fixed sequence of analysis stages over one batch of log
//! text, threading intermediate results through a shared per-investigation
//! memory store:
//! 1. Extraction: raw text to tagged records
//! 2. Enrichment: concurrent reputation lookups with a join barrier
//! 3. Synthesis: one structuring call to the narrative model
//! 4. Refinement: bounded iterative report drafting
//!
//! Stages never call each other; everything flows through
//! [`triage_memory::MemoryStore`]. Collaborators are optional, and every
//! fallback value is tagged so callers can tell placeholder content from a
//! genuine model answer.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use triage_memory::{InvestigationId, MemoryStore};
//! use triage_pipeline::{Pipeline, TriageConfig, DEFAULT_MAX_ITERATIONS};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(MemoryStore::new());
//! let pipeline = Pipeline::from_config(Arc::clone(&store), &TriageConfig::from_env())?;
//!
//! let id = InvestigationId::new();
//! let outcome = pipeline
//!     .investigate(&id, r#"{"message":"Failed password for root"}"#, DEFAULT_MAX_ITERATIONS)
//!     .await?;
//!
//! println!("{}", outcome.report.draft);
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]

pub mod config;
pub mod enrich;
pub mod error;
pub mod evaluate;
pub mod extract;
pub mod findings;
pub mod pipeline;
pub mod records;
pub mod refine;
pub mod synthesize;

// Re-exports for convenience
pub use config::{TriageConfig, DEFAULT_GEMINI_MODEL, DEFAULT_MAX_ITERATIONS};
pub use enrich::{Enrichment, EnrichmentMap, EnrichmentSummary};
pub use error::{PipelineError, Stage, StageError};
pub use evaluate::{evaluate_report, Evaluation};
pub use extract::{Extraction, ExtractionSummary};
pub use findings::{Findings, Report, ResponsePlan};
pub use pipeline::{BuildError, InvestigationOutcome, Pipeline};
pub use records::{parse_records, tags_for_message, Record, Tag};
pub use refine::{Refinement, PLACEHOLDER_DRAFT};
pub use synthesize::Synthesis;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
