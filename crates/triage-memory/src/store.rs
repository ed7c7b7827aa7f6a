//! The partitioned artifact store.
//!
//! One `MemoryStore` is constructed per process and passed by reference into
//! every stage. Partitions for unrelated investigations may be touched
//! concurrently (e.g. parallel HTTP requests), so both maps are lock-free
//! concurrent maps; the entry API makes first-writer partition creation
//! atomic.

use crate::error::MemoryError;
use crate::types::{ArtifactKey, InvestigationId};
use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

type Partition = Arc<DashMap<ArtifactKey, Value>>;

/// Process-wide keyed store of investigation artifacts.
#[derive(Debug, Default)]
pub struct MemoryStore {
    partitions: DashMap<InvestigationId, Partition>,
}

impl MemoryStore {
    /// Create an empty store.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an artifact, creating the partition if absent.
    ///
    /// Last writer wins per key; there is no versioning.
    ///
    /// # Errors
    /// - [`MemoryError::Encode`] if the value cannot be serialized
    pub fn put<T: Serialize>(
        &self,
        id: &InvestigationId,
        key: ArtifactKey,
        value: &T,
    ) -> Result<(), MemoryError> {
        let encoded =
            serde_json::to_value(value).map_err(|source| MemoryError::Encode { key, source })?;
        self.partition(id).insert(key, encoded);
        Ok(())
    }

    /// Read an artifact, or `None` if it was never written.
    ///
    /// # Errors
    /// - [`MemoryError::Decode`] if the stored value does not match `T`
    pub fn get<T: DeserializeOwned>(
        &self,
        id: &InvestigationId,
        key: ArtifactKey,
    ) -> Result<Option<T>, MemoryError> {
        let Some(partition) = self.partitions.get(id) else {
            return Ok(None);
        };
        let Some(value) = partition.get(&key).map(|v| v.value().clone()) else {
            return Ok(None);
        };
        serde_json::from_value(value)
            .map(Some)
            .map_err(|source| MemoryError::Decode { key, source })
    }

    /// Read an artifact, substituting `T::default()` if absent.
    ///
    /// # Errors
    /// - [`MemoryError::Decode`] if the stored value does not match `T`
    pub fn get_or_default<T: DeserializeOwned + Default>(
        &self,
        id: &InvestigationId,
        key: ArtifactKey,
    ) -> Result<T, MemoryError> {
        Ok(self.get(id, key)?.unwrap_or_default())
    }

    /// Raw JSON view of an artifact, for inspection surfaces.
    #[must_use]
    pub fn get_raw(&self, id: &InvestigationId, key: ArtifactKey) -> Option<Value> {
        self.partitions
            .get(id)
            .and_then(|partition| partition.get(&key).map(|v| v.value().clone()))
    }

    /// Keys currently present in an investigation's partition.
    #[must_use]
    pub fn keys(&self, id: &InvestigationId) -> Vec<ArtifactKey> {
        self.partitions
            .get(id)
            .map(|partition| partition.iter().map(|entry| *entry.key()).collect())
            .unwrap_or_default()
    }

    /// Number of live partitions.
    #[inline]
    #[must_use]
    pub fn partition_count(&self) -> usize {
        self.partitions.len()
    }

    fn partition(&self, id: &InvestigationId) -> Partition {
        self.partitions
            .entry(id.clone())
            .or_default()
            .value()
            .clone()
    }
}
