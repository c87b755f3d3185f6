//! Merkle trie iteration and differencing for Strand.
//!
//! A Strand snapshot is a Merkle trie: a tree of named nodes where every
//! node carries a content-derived identifier that covers, for internal
//! nodes, the entire subtree beneath it. This crate computes the minimal
//! set of path-level changes (insertions, deletions, modifications) that
//! transform one trie into another, pruning whole subtrees whenever both
//! sides carry the same identity, so diff cost is proportional to the size
//! of the change rather than the size of the trees.
//!
//! The engine is storage-agnostic: trees are accessed through the [`Node`]
//! trait and compared through a caller-supplied hash-equality predicate.
//!
//! # Key Types
//!
//! - [`Node`] -- capability trait for trie nodes (name, hash, kind, children)
//! - [`TrieIter`] -- depth-first pre-order iterator with subtree pruning
//! - [`NodePath`] -- root-exclusive path to a node, with canonical ordering
//! - [`Change`] / [`Changes`] -- path-level change records
//! - [`diff_tree`] / [`diff_tree_with_cancel`] -- the differ entry points
//! - [`CancelToken`] -- cooperative cancellation flag
//! - [`fsnode::FsNode`] -- synthetic in-memory trees, buildable from a
//!   one-line textual description (used heavily by tests)

pub mod change;
pub mod difftree;
pub mod error;
pub mod fsnode;
pub mod iter;
pub mod node;
pub mod path;

pub use change::{Action, Change, Changes};
pub use difftree::{diff_tree, diff_tree_with_cancel, CancelToken};
pub use error::{DiffError, DiffResult};
pub use iter::TrieIter;
pub use node::{Node, NodeError, NodeResult};
pub use path::NodePath;
