use strand_store::{EntryMode, ObjectCodec, ObjectSource, StoreError, Tree};
use strand_trie::{Node, NodeError, NodeResult};
use strand_types::ObjectId;

/// A trie node backed by `Tree` objects in an [`ObjectSource`].
///
/// The node is a small handle: a borrowed source reference plus the
/// entry's name, object id and mode. Children are materialised lazily,
/// one fetch per directory, at the moment the diff engine descends into
/// the node. Blobs and symlinks are leaves; directory entries are
/// internal nodes whose hash is the subtree-covering tree object id.
#[derive(Clone)]
pub struct TreeNode<'a> {
    store: &'a dyn ObjectSource,
    name: String,
    id: ObjectId,
    mode: EntryMode,
}

impl<'a> TreeNode<'a> {
    /// The unnamed root node for the tree object at `tree_id`.
    pub fn root(store: &'a dyn ObjectSource, tree_id: ObjectId) -> Self {
        Self {
            store,
            name: String::new(),
            id: tree_id,
            mode: EntryMode::Directory,
        }
    }

    /// The entry mode this node was recorded with.
    pub fn mode(&self) -> EntryMode {
        self.mode
    }
}

impl Node for TreeNode<'_> {
    fn name(&self) -> &str {
        &self.name
    }

    fn hash(&self) -> ObjectId {
        self.id
    }

    fn is_leaf(&self) -> bool {
        !self.mode.is_directory()
    }

    fn children(&self) -> NodeResult<Vec<Self>> {
        if self.is_leaf() {
            return Ok(Vec::new());
        }
        let stored = self
            .store
            .fetch(&self.id)
            .map_err(NodeError::new)?
            .ok_or_else(|| NodeError::new(StoreError::UnknownObject(self.id)))?;
        let tree = Tree::decode(&stored).map_err(NodeError::new)?;
        Ok(tree
            .entries
            .into_iter()
            .map(|(name, entry)| Self {
                store: self.store,
                name,
                id: entry.id,
                mode: entry.mode,
            })
            .collect())
    }
}

impl std::fmt::Debug for TreeNode<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeNode")
            .field("name", &self.name)
            .field("id", &self.id)
            .field("mode", &self.mode)
            .finish()
    }
}
