use crate::node::NodeError;

/// Errors produced while diffing two tries.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// The caller's cancellation token was tripped.
    #[error("operation canceled")]
    Cancelled,

    /// A node's backing source failed while materialising children.
    #[error("node access failed: {0}")]
    NodeAccess(#[from] NodeError),

    /// A change record was constructed with neither endpoint.
    ///
    /// This indicates an internal logic bug; it is surfaced, not recovered.
    #[error("malformed change: neither side is present")]
    MalformedChange,
}

/// Result alias for diff operations.
pub type DiffResult<T> = Result<T, DiffError>;
