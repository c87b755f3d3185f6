//! Foundation types for Strand.
//!
//! Strand is a content-addressed version control client: every stored piece
//! of data is identified by a digest of its content. This crate provides the
//! identifier type shared by every other Strand crate.
//!
//! # Key Types
//!
//! - [`ObjectId`] -- Content-derived identity of an object or trie node
//! - [`IdParseError`] -- Error parsing an id from its hex form

pub mod error;
pub mod object;

pub use error::IdParseError;
pub use object::ObjectId;
