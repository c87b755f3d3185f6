//! Tree-level diff: compare two stored trees and produce a list of changes.
//!
//! The comparison runs the trie engine over [`TreeNode`] adapters, so it
//! recurses through nested directories, prunes identical subtrees by
//! object id, and reports full slash-separated paths. Engine changes are
//! classified here: an entry whose content is unchanged but whose mode
//! changed becomes [`TreeChange::ModeChanged`] rather than a content
//! modification.

use strand_store::{EntryMode, ObjectCodec, ObjectSource, Snapshot};
use strand_trie::{diff_tree_with_cancel, CancelToken, Change, Node, NodePath};
use strand_types::ObjectId;

use crate::error::{DiffError, DiffResult};
use crate::tree_node::TreeNode;

/// The result of comparing two trees.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TreeDiff {
    /// The list of changes between the old and new trees, in traversal
    /// order. Sort by path for a canonical order.
    pub changes: Vec<TreeChange>,
}

impl TreeDiff {
    /// Create an empty tree diff.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if there are no changes.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Number of changes.
    pub fn len(&self) -> usize {
        self.changes.len()
    }
}

/// A single change between two trees. Paths are slash-separated and always
/// designate leaves (blobs, symlinks); directories never appear themselves.
#[derive(Clone, Debug, PartialEq)]
pub enum TreeChange {
    /// A new entry was added.
    Added {
        path: String,
        new_id: ObjectId,
        mode: EntryMode,
    },
    /// An existing entry was deleted.
    Deleted {
        path: String,
        old_id: ObjectId,
        mode: EntryMode,
    },
    /// An entry's content changed (same path, different object id).
    Modified {
        path: String,
        old_id: ObjectId,
        new_id: ObjectId,
        mode: EntryMode,
    },
    /// An entry's mode changed but content is the same.
    ModeChanged {
        path: String,
        id: ObjectId,
        old_mode: EntryMode,
        new_mode: EntryMode,
    },
}

impl TreeChange {
    /// The path this change is about.
    pub fn path(&self) -> &str {
        match self {
            Self::Added { path, .. }
            | Self::Deleted { path, .. }
            | Self::Modified { path, .. }
            | Self::ModeChanged { path, .. } => path,
        }
    }
}

/// Compare two stored trees and produce a diff.
///
/// - `old_tree`: the previous root tree (or `None` for an empty tree).
/// - `new_tree`: the current root tree (or `None` for an empty tree).
///
/// Both roots are validated against the source up front; subtrees are
/// fetched lazily as the engine descends into directories whose ids
/// differ.
pub fn diff_trees(
    store: &dyn ObjectSource,
    old_tree: Option<&ObjectId>,
    new_tree: Option<&ObjectId>,
) -> DiffResult<TreeDiff> {
    diff_trees_with_cancel(store, old_tree, new_tree, &CancelToken::new())
}

/// As [`diff_trees`], but cancellable: the token is polled once per engine
/// round, and a tripped token surfaces as a cancellation error with no
/// partial result.
pub fn diff_trees_with_cancel(
    store: &dyn ObjectSource,
    old_tree: Option<&ObjectId>,
    new_tree: Option<&ObjectId>,
    cancel: &CancelToken,
) -> DiffResult<TreeDiff> {
    for id in [old_tree, new_tree].into_iter().flatten() {
        if !store.contains(id)? {
            return Err(DiffError::ObjectNotFound(*id));
        }
    }

    let from = old_tree.map(|id| TreeNode::root(store, *id));
    let to = new_tree.map(|id| TreeNode::root(store, *id));

    // Mode is part of entry identity here: a mode-only change must not be
    // pruned, and classify() picks it back apart below.
    let changes = diff_tree_with_cancel(
        from.as_ref(),
        to.as_ref(),
        |a, b| a.hash() == b.hash() && a.mode() == b.mode(),
        cancel,
    )?;

    let mut diff = TreeDiff::new();
    for change in changes {
        diff.changes.push(classify(change)?);
    }
    tracing::debug!(changes = diff.len(), "tree diff complete");
    Ok(diff)
}

/// Compare the root trees of two stored snapshots.
pub fn diff_snapshots(
    store: &dyn ObjectSource,
    old_snapshot: &ObjectId,
    new_snapshot: &ObjectId,
) -> DiffResult<TreeDiff> {
    let old = load_snapshot(store, old_snapshot)?;
    let new = load_snapshot(store, new_snapshot)?;
    diff_trees(store, Some(&old.root_tree), Some(&new.root_tree))
}

fn load_snapshot(store: &dyn ObjectSource, id: &ObjectId) -> DiffResult<Snapshot> {
    let stored = store.fetch(id)?.ok_or(DiffError::ObjectNotFound(*id))?;
    Ok(Snapshot::decode(&stored)?)
}

fn classify(change: Change<TreeNode<'_>>) -> DiffResult<TreeChange> {
    match (change.from, change.to) {
        (None, Some(to)) => Ok(TreeChange::Added {
            path: to.to_string(),
            new_id: to.hash(),
            mode: mode_of(&to),
        }),
        (Some(from), None) => Ok(TreeChange::Deleted {
            path: from.to_string(),
            old_id: from.hash(),
            mode: mode_of(&from),
        }),
        (Some(from), Some(to)) => {
            if from.hash() == to.hash() {
                Ok(TreeChange::ModeChanged {
                    path: to.to_string(),
                    id: to.hash(),
                    old_mode: mode_of(&from),
                    new_mode: mode_of(&to),
                })
            } else {
                Ok(TreeChange::Modified {
                    path: to.to_string(),
                    old_id: from.hash(),
                    new_id: to.hash(),
                    mode: mode_of(&to),
                })
            }
        }
        (None, None) => Err(strand_trie::DiffError::MalformedChange.into()),
    }
}

fn mode_of(path: &NodePath<TreeNode<'_>>) -> EntryMode {
    path.node().mode()
}
