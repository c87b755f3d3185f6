use strand_types::ObjectId;

/// Failure while materialising a node from its backing source.
///
/// Node implementations backed by real storage (an object store, a
/// filesystem) wrap whatever error the backend produced; the differ halts
/// and surfaces it as [`DiffError::NodeAccess`](crate::DiffError).
#[derive(Debug, thiserror::Error)]
#[error("{source}")]
pub struct NodeError {
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
}

impl NodeError {
    /// Wrap an arbitrary backend error.
    pub fn new(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

/// Result alias for node access operations.
pub type NodeResult<T> = Result<T, NodeError>;

/// A node of a Merkle trie.
///
/// A node is either a *leaf* (a named terminal carrying content identity)
/// or an *internal* node (a named container of children). One trait covers
/// both kinds; leaves return an empty children vector.
///
/// Implementations are cheap handles (the engine clones them freely when
/// assembling paths), typically a reference-counted pointer or a small
/// struct of borrows. The engine never mutates a node and never retains one
/// past the call that produced it.
///
/// # Contract
///
/// - `name` is the node's label within its parent; root nodes use `""`.
///   Names are compared as raw bytes, no Unicode normalisation is applied.
/// - `hash` identifies the node's content and, for internal nodes, the
///   recursive content of its subtree. The engine assumes this and does not
///   verify it.
/// - Within one parent, no two children share the same name.
/// - `children` may allocate and may block on backing I/O. Repeated calls
///   must return the same content. The engine calls it at most once per
///   internal node visited.
pub trait Node: Clone {
    /// The node's label within its parent.
    fn name(&self) -> &str;

    /// Content identity of this node (subtree-covering for internal nodes).
    fn hash(&self) -> ObjectId;

    /// Returns `true` for leaves, `false` for internal nodes.
    fn is_leaf(&self) -> bool;

    /// The node's children. Empty for leaves.
    fn children(&self) -> NodeResult<Vec<Self>>;
}
