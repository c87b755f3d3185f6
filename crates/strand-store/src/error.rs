use strand_types::ObjectId;

use crate::object::ObjectKind;

/// Errors from object storage.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No object with this id exists.
    #[error("unknown object {0}")]
    UnknownObject(ObjectId),

    /// The object exists but is filed under a different kind.
    #[error("object {id} is not a {want} (found {got})")]
    WrongKind {
        id: ObjectId,
        want: ObjectKind,
        got: ObjectKind,
    },

    /// A typed object failed to serialize.
    #[error("object failed to encode: {0}")]
    Encode(String),

    /// A stored payload does not decode as its kind.
    #[error("object {id} failed to decode: {reason}")]
    Decode { id: ObjectId, reason: String },

    /// The storage backend itself failed.
    #[error("storage backend error: {0}")]
    Backend(#[from] std::io::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
