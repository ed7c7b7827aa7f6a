//! Stage 2: enrichment fan-out.
//!
//! The one genuinely concurrent stage. A deduplicated address set is derived
//! from the flagged records, one lookup per address is launched against the
//! intel provider, and the stage suspends on a join barrier until every
//! lookup has resolved. A failed lookup becomes a null map entry; it never
//! aborts the batch, and no partial results are exposed downstream.

use crate::error::StageError;
use crate::records::Record;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{info, warn};
use triage_intel::{IntelProvider, IntelReport};
use triage_memory::{ArtifactKey, InvestigationId, MemoryStore};

/// Merged fan-out output: every looked-up address, failed lookups included.
pub type EnrichmentMap = BTreeMap<String, Option<IntelReport>>;

/// Addresses and results returned by the enrichment stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentSummary {
    /// Deduplicated addresses that were looked up.
    pub addresses: Vec<String>,
    /// Address to result mapping, exactly one entry per address.
    pub results: EnrichmentMap,
}

/// The enrichment fan-out stage.
pub struct Enrichment {
    provider: Arc<dyn IntelProvider>,
}

impl Enrichment {
    /// Stage backed by `provider`.
    #[inline]
    #[must_use]
    pub fn new(provider: Arc<dyn IntelProvider>) -> Self {
        Self { provider }
    }

    /// Fan out one lookup per distinct address and merge the results.
    ///
    /// With an empty address set the provider is never invoked and the
    /// stored mapping is empty.
    ///
    /// # Errors
    /// - [`StageError::Memory`] if an artifact read or write fails
    pub async fn run(
        &self,
        store: &MemoryStore,
        id: &InvestigationId,
    ) -> Result<EnrichmentSummary, StageError> {
        let flagged: Vec<Record> = store.get_or_default(id, ArtifactKey::FlaggedRecords)?;

        // Each distinct address is looked up at most once per investigation,
        // no matter how many records reference it.
        let addresses: BTreeSet<String> = flagged
            .iter()
            .filter_map(Record::enrichment_key)
            .map(str::to_string)
            .collect();

        info!(
            investigation = %id,
            addresses = addresses.len(),
            "running enrichment fan-out"
        );

        let results: EnrichmentMap = if addresses.is_empty() {
            EnrichmentMap::new()
        } else {
            let lookups = addresses.iter().map(|address| {
                let provider = Arc::clone(&self.provider);
                async move {
                    match provider.check_address(address).await {
                        Ok(report) => (address.clone(), Some(report)),
                        Err(error) => {
                            warn!(address = %address, %error, "enrichment lookup failed");
                            (address.clone(), None)
                        }
                    }
                }
            });
            // Join barrier: all lookups resolve before the merge is written.
            join_all(lookups).await.into_iter().collect()
        };

        store.put(id, ArtifactKey::EnrichmentResults, &results)?;
        Ok(EnrichmentSummary {
            addresses: addresses.into_iter().collect(),
            results,
        })
    }
}

impl std::fmt::Debug for Enrichment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Enrichment").finish_non_exhaustive()
    }
}
