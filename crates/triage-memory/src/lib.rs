//! Triage Memory - shared investigation memory
//!
//! Process-wide store of intermediate pipeline artifacts, partitioned by
//! investigation:
//! - Each investigation owns an isolated partition, created lazily
//! - Artifacts are named by a fixed key set and stored as JSON values
//! - Writes are last-writer-wins per key; stages never patch in place
//!
//! Stages communicate exclusively through this store, so they can be tested
//! (and reordered) independently of each other.
//!
//! # Example
//!
//! ```rust
//! use triage_memory::{ArtifactKey, InvestigationId, MemoryStore};
//!
//! let store = MemoryStore::new();
//! let id = InvestigationId::new();
//!
//! store.put(&id, ArtifactKey::ParsedRecords, &vec!["rec"]).unwrap();
//! let records: Vec<String> = store.get_or_default(&id, ArtifactKey::ParsedRecords).unwrap();
//! assert_eq!(records, vec!["rec"]);
//! ```

#![warn(unreachable_pub)]

mod error;
mod store;
mod types;

pub use error::MemoryError;
pub use store::MemoryStore;
pub use types::{ArtifactKey, InvestigationId};
