//! Memory store errors.
//!
//! The store itself never fails on lookup or insert; the only failure mode is
//! an artifact that cannot be encoded to or decoded from its stored JSON
//! form. Stages treat that as fatal.

use crate::types::ArtifactKey;

/// Errors raised by [`crate::MemoryStore`].
#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    /// Artifact value could not be encoded for storage.
    #[error("failed to encode artifact {key}: {source}")]
    Encode {
        /// Artifact being written.
        key: ArtifactKey,
        /// Underlying serializer error.
        source: serde_json::Error,
    },

    /// Stored artifact could not be decoded into the requested type.
    #[error("failed to decode artifact {key}: {source}")]
    Decode {
        /// Artifact being read.
        key: ArtifactKey,
        /// Underlying deserializer error.
        source: serde_json::Error,
    },
}
