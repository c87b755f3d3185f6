use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use strand_crypto::HashDomain;
use strand_types::ObjectId;

use crate::error::{StoreError, StoreResult};

/// What a stored payload is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    /// Opaque leaf content.
    Blob,
    /// A directory listing.
    Tree,
    /// A recorded filesystem state.
    Snapshot,
}

impl ObjectKind {
    /// The digest namespace objects of this kind are filed under.
    pub fn domain(self) -> HashDomain {
        match self {
            Self::Blob => HashDomain::Blob,
            Self::Tree => HashDomain::Tree,
            Self::Snapshot => HashDomain::Snapshot,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Blob => "blob",
            Self::Tree => "tree",
            Self::Snapshot => "snapshot",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An object exactly as the store holds it: a kind tag over opaque bytes.
///
/// The id is derived, never stored: [`StoredObject::id`] digests the
/// payload under the kind's namespace, so an object cannot sit in a store
/// under an id its content does not justify.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredObject {
    /// The kind tag deciding the digest namespace and the decode target.
    pub kind: ObjectKind,
    /// The serialized payload.
    pub data: Vec<u8>,
}

impl StoredObject {
    /// Wrap already-serialized bytes under a kind tag.
    pub fn new(kind: ObjectKind, data: Vec<u8>) -> Self {
        Self { kind, data }
    }

    /// A blob payload. Leaf content needs no codec: the diff layer only
    /// ever compares blob ids, it never looks at the bytes.
    pub fn blob(data: Vec<u8>) -> Self {
        Self::new(ObjectKind::Blob, data)
    }

    /// The content-derived id this object files under.
    pub fn id(&self) -> ObjectId {
        self.kind.domain().digest(&self.data)
    }
}

/// Typed objects that encode to and decode from [`StoredObject`] payloads.
///
/// One implementation line per type; the kind check and the serde plumbing
/// live here once.
pub trait ObjectCodec: Serialize + DeserializeOwned {
    /// The kind tag this type is stored under.
    const KIND: ObjectKind;

    /// Serialize into a storable object.
    fn encode(&self) -> StoreResult<StoredObject> {
        let data = serde_json::to_vec(self).map_err(|e| StoreError::Encode(e.to_string()))?;
        Ok(StoredObject::new(Self::KIND, data))
    }

    /// Decode from a stored object, checking the kind tag first.
    fn decode(obj: &StoredObject) -> StoreResult<Self> {
        if obj.kind != Self::KIND {
            return Err(StoreError::WrongKind {
                id: obj.id(),
                want: Self::KIND,
                got: obj.kind,
            });
        }
        serde_json::from_slice(&obj.data).map_err(|e| StoreError::Decode {
            id: obj.id(),
            reason: e.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tree
// ---------------------------------------------------------------------------

/// How a directory entry should be materialised on disk.
///
/// Only `Directory` matters to the diff walk (it marks internal nodes);
/// the other modes ride along so mode-aware equality predicates can see
/// them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryMode {
    /// Normal file.
    Regular,
    /// Executable file.
    Executable,
    /// Symbolic link.
    Symlink,
    /// Subtree.
    Directory,
}

impl EntryMode {
    /// Returns `true` for entries that reference a subtree.
    pub fn is_directory(self) -> bool {
        matches!(self, Self::Directory)
    }
}

/// What a directory entry points at: an object plus how to materialise it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRef {
    /// Content-derived id of the referenced object.
    pub id: ObjectId,
    /// Materialisation mode.
    pub mode: EntryMode,
}

/// A directory listing: child names mapped to references.
///
/// The map representation does double duty. Names are unique because a
/// map cannot hold two entries under one key, and serialization walks the
/// map in key order, so equal listings always encode to the same bytes
/// and therefore the same id, no matter what order entries were inserted
/// in.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tree {
    /// Entries by child name.
    pub entries: BTreeMap<String, EntryRef>,
}

impl Tree {
    /// An empty listing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the entry for `name`, returning the displaced
    /// reference if there was one.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        mode: EntryMode,
        id: ObjectId,
    ) -> Option<EntryRef> {
        self.entries.insert(name.into(), EntryRef { id, mode })
    }

    /// Look up an entry by child name.
    pub fn get(&self, name: &str) -> Option<&EntryRef> {
        self.entries.get(name)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the listing has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ObjectCodec for Tree {
    const KIND: ObjectKind = ObjectKind::Tree;
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// A recorded filesystem state: the root tree plus lineage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Root tree of the recorded state.
    pub root_tree: ObjectId,
    /// Snapshots this one was derived from (empty for the first).
    pub parents: Vec<ObjectId>,
    /// Free-form description.
    pub message: String,
}

impl Snapshot {
    /// Create a snapshot pointing at a root tree.
    pub fn new(root_tree: ObjectId, parents: Vec<ObjectId>, message: impl Into<String>) -> Self {
        Self {
            root_tree,
            parents,
            message: message.into(),
        }
    }
}

impl ObjectCodec for Snapshot {
    const KIND: ObjectKind = ObjectKind::Snapshot;
}
