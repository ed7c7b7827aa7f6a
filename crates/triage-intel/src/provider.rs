//! The enrichment collaborator trait.

use crate::report::IntelReport;
use async_trait::async_trait;

/// Errors raised by an enrichment lookup.
///
/// The fan-out stage treats any of these as "no result for this address";
/// they never abort a batch.
#[derive(Debug, thiserror::Error)]
pub enum IntelError {
    /// HTTP transport or decoding failure.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider-specific failure (used mainly by test doubles).
    #[error("provider failure: {0}")]
    Provider(String),
}

/// One reputation lookup per address.
///
/// Implementations own their timeout and per-source fallback behavior; a
/// single call must never block indefinitely.
#[async_trait]
pub trait IntelProvider: Send + Sync {
    /// Look up reputation for one address-like key.
    async fn check_address(&self, address: &str) -> Result<IntelReport, IntelError>;
}
