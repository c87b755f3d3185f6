use strand_store::StoreError;
use strand_types::ObjectId;

/// Errors from store-backed diff operations.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// A root object named by the caller was not found in the store.
    #[error("object not found: {0:?}")]
    ObjectNotFound(ObjectId),

    /// Store operation failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The trie engine failed (cancellation, node access, malformed change).
    #[error(transparent)]
    Engine(#[from] strand_trie::DiffError),
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
