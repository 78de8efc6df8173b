//! Storage contract for fragment metadata and payloads.
//!
//! A fragment is two records keyed by `(owner, id)`: a metadata record
//! ([`FragmentRecord`]) and a raw byte payload. Both live behind the
//! [`FragmentStore`] trait; implementations decide placement (memory,
//! object store, database). The entity layer keeps the halves consistent
//! by following every payload write with a metadata save.
//!
//! The two writes are sequential, not atomic: concurrent writers to the
//! same key can leave the recorded size out of step with the stored
//! payload. Callers that need strict consistency must serialize writes to
//! a key externally.

mod memory;
mod record;

pub use memory::MemoryStore;
pub use record::FragmentRecord;

use async_trait::async_trait;
use thiserror::Error;

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record exists for the `(owner, id)` pair.
    #[error("fragment not found: {0}/{1}")]
    NotFound(String, String),

    /// Backend failure (connection, serialization, lock poisoning, ...).
    #[error("storage error: {0}")]
    Backend(String),
}

/// An owner-scoped listing: bare ids, or full records when expanded.
#[derive(Debug, Clone, PartialEq)]
pub enum FragmentListing {
    Ids(Vec<String>),
    Records(Vec<FragmentRecord>),
}

impl FragmentListing {
    /// Number of fragments in the listing.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Ids(ids) => ids.len(),
            Self::Records(records) => records.len(),
        }
    }

    /// Returns true when the owner has no fragments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The storage collaborator consumed by the fragment entity.
///
/// All operations are keyed by `(owner, id)`. Reads return `None` for
/// absent records; only [`FragmentStore::delete_fragment`] treats absence
/// as an error.
#[async_trait]
pub trait FragmentStore: Send + Sync {
    /// Reads a metadata record.
    async fn read_fragment(
        &self,
        owner_id: &str,
        id: &str,
    ) -> StoreResult<Option<FragmentRecord>>;

    /// Writes (creates or replaces) a metadata record.
    async fn write_fragment(&self, record: FragmentRecord) -> StoreResult<()>;

    /// Lists the owner's fragments: ids, or full records when `expand`.
    async fn list_fragments(&self, owner_id: &str, expand: bool) -> StoreResult<FragmentListing>;

    /// Deletes the metadata record and the payload for `id`.
    ///
    /// Fails with [`StoreError::NotFound`] when no metadata record exists.
    async fn delete_fragment(&self, owner_id: &str, id: &str) -> StoreResult<()>;

    /// Reads the payload bytes.
    async fn read_fragment_data(&self, owner_id: &str, id: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Writes (creates or replaces) the payload bytes.
    async fn write_fragment_data(
        &self,
        owner_id: &str,
        id: &str,
        data: Vec<u8>,
    ) -> StoreResult<()>;
}
