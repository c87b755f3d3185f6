use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::IdParseError;

/// Identity of a stored object or trie node.
///
/// An id is a 32-byte BLAKE3 digest of content. The diff machinery never
/// looks inside one: ids are compared for equality (equal ids label
/// identical subtrees, which is what makes whole-subtree pruning sound)
/// and rendered as lowercase hex for humans. How content maps to an id,
/// including the separation between object kinds, is the hashing layer's
/// business; this type just carries the result around.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId {
    bytes: [u8; 32],
}

impl ObjectId {
    /// Width of an id in bytes.
    pub const LEN: usize = 32;

    /// The all-zero id, for contexts that need a "no object" marker. No
    /// real content digests to it.
    pub const ZERO: Self = Self { bytes: [0; 32] };

    /// Digest raw content into an id.
    pub fn digest(data: &[u8]) -> Self {
        blake3::hash(data).into()
    }

    /// Returns `true` for [`ObjectId::ZERO`].
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// The raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    /// Parse the 64-character hex form produced by `Display`.
    pub fn parse_hex(input: &str) -> Result<Self, IdParseError> {
        if input.len() != 2 * Self::LEN {
            return Err(IdParseError::WrongLength {
                want: 2 * Self::LEN,
                got: input.len(),
            });
        }
        let mut bytes = [0u8; Self::LEN];
        hex::decode_to_slice(input, &mut bytes)
            .map_err(|_| IdParseError::NotHex(input.to_string()))?;
        Ok(Self { bytes })
    }

    /// Returns `true` if the id's hex form begins with `prefix`
    /// (case-insensitive).
    ///
    /// Abbreviated hex is how humans refer to objects; relaxed
    /// hash-equality predicates for diffing can be built on this too.
    pub fn matches_hex_prefix(&self, prefix: &str) -> bool {
        if prefix.len() > 2 * Self::LEN {
            return false;
        }
        // The rendered form is pure ASCII, so slicing by the prefix
        // length cannot split a character.
        self.to_string()[..prefix.len()].eq_ignore_ascii_case(prefix)
    }
}

impl From<blake3::Hash> for ObjectId {
    fn from(hash: blake3::Hash) -> Self {
        Self {
            bytes: *hash.as_bytes(),
        }
    }
}

impl From<[u8; 32]> for ObjectId {
    fn from(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.bytes {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Abbreviated to the conventional 8 hex characters; full ids
        // drown debug output.
        write!(f, "ObjectId(")?;
        for byte in &self.bytes[..4] {
            write!(f, "{byte:02x}")?;
        }
        write!(f, ")")
    }
}
