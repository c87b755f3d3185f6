use strand_types::ObjectId;

/// Namespace for content digests.
///
/// Every digest is keyed by what the bytes *are*: leaf content, a tree
/// listing, or a snapshot record. Each namespace derives its own BLAKE3
/// key, so the id spaces are disjoint by construction: identical bytes
/// filed under different kinds never share an id, and a crafted blob can
/// never impersonate a subtree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HashDomain {
    /// Leaf content (file bytes).
    Blob,
    /// Directory listings.
    Tree,
    /// Snapshot records.
    Snapshot,
}

impl HashDomain {
    /// The key-derivation context string for this namespace. Changing one
    /// of these re-keys every id in the repository, so they are versioned.
    fn context(self) -> &'static str {
        match self {
            Self::Blob => "strand.dev 2025-11 blob v1",
            Self::Tree => "strand.dev 2025-11 tree v1",
            Self::Snapshot => "strand.dev 2025-11 snapshot v1",
        }
    }

    /// A streaming hasher keyed to this namespace, for callers that build
    /// a digest out of several pieces (a tree hashing its entries, say)
    /// without assembling an intermediate buffer.
    pub fn hasher(self) -> blake3::Hasher {
        blake3::Hasher::new_derive_key(self.context())
    }

    /// Digest a complete byte slice in this namespace.
    pub fn digest(self, data: &[u8]) -> ObjectId {
        self.hasher().update(data).finalize().into()
    }

    /// Returns `true` if `data` digests to `expected` in this namespace.
    pub fn confirms(self, data: &[u8], expected: &ObjectId) -> bool {
        self.digest(data) == *expected
    }
}
