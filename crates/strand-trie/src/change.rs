use std::fmt;

use crate::error::{DiffError, DiffResult};
use crate::iter::TrieIter;
use crate::node::Node;
use crate::path::NodePath;

/// The kind of edit a [`Change`] represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    /// The path exists only in the target tree.
    Insert,
    /// The path exists only in the source tree.
    Delete,
    /// The path exists in both trees with different content.
    Modify,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Insert => write!(f, "insert"),
            Self::Delete => write!(f, "delete"),
            Self::Modify => write!(f, "modify"),
        }
    }
}

/// A single path-level edit between two trees.
///
/// Carries the path on each side it exists on; the action is derived from
/// which sides are present rather than stored. A change is computed once
/// and never mutated.
#[derive(Clone)]
pub struct Change<N> {
    /// The path in the source tree, absent for insertions.
    pub from: Option<NodePath<N>>,
    /// The path in the target tree, absent for deletions.
    pub to: Option<NodePath<N>>,
}

impl<N: Node> fmt::Debug for Change<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Change")
            .field("from", &self.from)
            .field("to", &self.to)
            .finish()
    }
}

impl<N: Node> Change<N> {
    /// A path that exists only in the target tree.
    pub fn insert(to: NodePath<N>) -> Self {
        Self {
            from: None,
            to: Some(to),
        }
    }

    /// A path that exists only in the source tree.
    pub fn delete(from: NodePath<N>) -> Self {
        Self {
            from: Some(from),
            to: None,
        }
    }

    /// A path present in both trees with different content. Both sides
    /// must designate leaves at the same path.
    pub fn modify(from: NodePath<N>, to: NodePath<N>) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    /// Derive the action from the endpoints present.
    ///
    /// Errors with [`DiffError::MalformedChange`] if neither endpoint is
    /// present, which can only result from a logic bug in the producer.
    pub fn action(&self) -> DiffResult<Action> {
        match (&self.from, &self.to) {
            (Some(_), Some(_)) => Ok(Action::Modify),
            (Some(_), None) => Ok(Action::Delete),
            (None, Some(_)) => Ok(Action::Insert),
            (None, None) => Err(DiffError::MalformedChange),
        }
    }

    /// The path this change is about: the target side if present, the
    /// source side otherwise.
    pub fn path(&self) -> Option<&NodePath<N>> {
        self.to.as_ref().or(self.from.as_ref())
    }
}

impl<N: Node> fmt::Display for Change<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.action(), self.path()) {
            (Ok(action), Some(path)) => write!(f, "<{action} {path}>"),
            _ => write!(f, "<malformed change>"),
        }
    }
}

/// The result of diffing two trees: an unordered multiset of changes, in
/// emission (traversal) order. Callers needing a canonical order sort it
/// themselves.
#[derive(Clone)]
pub struct Changes<N> {
    changes: Vec<Change<N>>,
}

impl<N: Node> fmt::Debug for Changes<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Changes")
            .field("changes", &self.changes)
            .finish()
    }
}

impl<N> Default for Changes<N> {
    fn default() -> Self {
        Self {
            changes: Vec::new(),
        }
    }
}

impl<N: Node> Changes<N> {
    /// An empty change set.
    pub fn new() -> Self {
        Self {
            changes: Vec::new(),
        }
    }

    /// Number of changes.
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Returns `true` if no changes were recorded.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Append a single change.
    pub fn push(&mut self, change: Change<N>) {
        self.changes.push(change);
    }

    /// Iterate over the recorded changes in emission order.
    pub fn iter(&self) -> std::slice::Iter<'_, Change<N>> {
        self.changes.iter()
    }

    /// The recorded changes as a slice.
    pub fn as_slice(&self) -> &[Change<N>] {
        &self.changes
    }

    /// Record an insertion for every leaf in the subtree at `root`.
    ///
    /// Internal nodes produce no records of their own: a subtree without
    /// leaves contributes nothing. `root` itself is included when it is a
    /// leaf.
    pub fn add_recursive_insert(&mut self, root: NodePath<N>) -> DiffResult<()> {
        self.add_recursive(root, Change::insert)
    }

    /// Record a deletion for every leaf in the subtree at `root`.
    pub fn add_recursive_delete(&mut self, root: NodePath<N>) -> DiffResult<()> {
        self.add_recursive(root, Change::delete)
    }

    fn add_recursive(
        &mut self,
        root: NodePath<N>,
        make: fn(NodePath<N>) -> Change<N>,
    ) -> DiffResult<()> {
        if root.is_leaf() {
            self.push(make(root));
            return Ok(());
        }
        let mut iter = TrieIter::from_path(root)?;
        while let Some(path) = iter.step()? {
            if path.is_leaf() {
                self.push(make(path));
            }
        }
        Ok(())
    }
}

impl<N: Node> IntoIterator for Changes<N> {
    type Item = Change<N>;
    type IntoIter = std::vec::IntoIter<Change<N>>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}

impl<'a, N: Node> IntoIterator for &'a Changes<N> {
    type Item = &'a Change<N>;
    type IntoIter = std::slice::Iter<'a, Change<N>>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.iter()
    }
}
