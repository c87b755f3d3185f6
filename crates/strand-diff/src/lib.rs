//! Store-backed snapshot diffing for Strand.
//!
//! Bridges the storage-agnostic trie engine (`strand-trie`) and the object
//! store (`strand-store`): [`TreeNode`] lazily materialises stored `Tree`
//! objects as trie nodes, and [`diff_trees`] / [`diff_snapshots`] compare
//! two stored trees, classifying every engine change into a [`TreeChange`]
//! (added, deleted, modified, or mode-changed entry).
//!
//! # Key Types
//!
//! - [`TreeNode`] -- lazy trie node over a stored tree
//! - [`TreeDiff`] / [`TreeChange`] -- classified comparison result
//! - [`diff_trees`] / [`diff_trees_with_cancel`] / [`diff_snapshots`] -- entry points
//! - [`DiffError`] / [`DiffResult`] -- error surface

pub mod error;
pub mod tree_diff;
pub mod tree_node;

pub use error::{DiffError, DiffResult};
pub use tree_diff::{diff_snapshots, diff_trees, diff_trees_with_cancel, TreeChange, TreeDiff};
pub use tree_node::TreeNode;
