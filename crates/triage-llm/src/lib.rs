//! Triage LLM - narrative generation backend
//!
//! The external narrative/structuring collaborator boundary:
//! - [`NarrativeModel`]: prompt in, free text out
//! - [`GeminiClient`]: Gemini `generateContent` over HTTP
//! - [`testing::ScriptedModel`]: deterministic double for offline tests
//!
//! The pipeline tolerates running with no model at all; in that case stages
//! substitute fixed placeholder values and this crate is never called.

#![warn(unreachable_pub)]

mod gemini;
mod model;
pub mod testing;

pub use gemini::GeminiClient;
pub use model::{LlmError, NarrativeModel};
