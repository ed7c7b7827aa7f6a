//! Triage Intel - address reputation enrichment
//!
//! The external enrichment collaborator boundary of the pipeline:
//! - [`IntelProvider`]: one async lookup per address, owning its own
//!   timeout/retry behavior
//! - [`HttpIntelClient`]: queries three reputation sources (AbuseIPDB,
//!   VirusTotal, OTX), skipping any that are unconfigured and degrading a
//!   per-source failure to a null verdict
//! - [`ScorePolicy`]: replaceable aggregate scoring over the source verdicts
//!
//! A failed lookup is a value, not an exception: callers receive either a
//! report or an error they are expected to fold into "checked, nothing
//! found".

#![warn(unreachable_pub)]

mod client;
mod provider;
mod report;
pub mod testing;

pub use client::{HttpIntelClient, IntelApiKeys};
pub use provider::{IntelError, IntelProvider};
pub use report::{IntelReport, ScorePolicy, SourceFraction, SourceVerdict};
