//! Content-addressed object storage for Strand.
//!
//! Everything a Strand repository records -- leaf content, directory
//! listings, snapshots -- is an immutable object filed under the digest of
//! its bytes (namespaced by kind, see `strand-crypto`). This crate defines
//! the object shapes the diff layers walk and the access interface they
//! walk them through.
//!
//! # Object Types
//!
//! - blobs: opaque leaf bytes, built with [`StoredObject::blob`]
//! - [`Tree`] -- a directory listing, canonical by construction
//! - [`Snapshot`] -- a recorded filesystem state (root tree plus lineage)
//!
//! # Access
//!
//! Diffing is read-only, so the shared interface is [`ObjectSource`]
//! (fetch + existence probe, payloads shared out as `Arc`s); writing is
//! each backend's own affair. [`MemoryStore`] is the in-memory backend
//! used by tests and embedded repositories.

pub mod error;
pub mod memory;
pub mod object;
pub mod source;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use object::{EntryMode, EntryRef, ObjectCodec, ObjectKind, Snapshot, StoredObject, Tree};
pub use source::ObjectSource;
