//! Error types for the fragment model.

use fragments_convert::ConvertError;
use fragments_store::StoreError;
use thiserror::Error;

/// Result type for fragment operations.
pub type FragmentResult<T> = Result<T, FragmentError>;

/// Errors surfaced by fragment operations.
///
/// Each variant is a distinct failure kind; mapping kinds to transport
/// status codes is the caller's concern. No operation retries internally.
#[derive(Debug, Error)]
pub enum FragmentError {
    /// A construction invariant was violated (owner, type or size).
    #[error("validation error: {0}")]
    Validation(String),

    /// No fragment exists for the `(owner, id)` pair.
    #[error("fragment not found: {owner_id}/{id}")]
    NotFound { owner_id: String, id: String },

    /// A conversion failed: unsupported pair, parse error or codec error.
    #[error(transparent)]
    Convert(#[from] ConvertError),

    /// The storage collaborator failed.
    #[error("storage error: {0}")]
    Store(String),
}

impl From<StoreError> for FragmentError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(owner_id, id) => Self::NotFound { owner_id, id },
            StoreError::Backend(msg) => Self::Store(msg),
        }
    }
}
