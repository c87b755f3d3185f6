//! Synthetic in-memory trees.
//!
//! `FsNode` is the in-memory [`Node`] implementation used by tests and
//! tooling. Trees can be assembled directly with [`FsNode::file`] and
//! [`FsNode::dir`], or parsed from a one-line description:
//!
//! ```text
//! (a<1> b(c<> d(e<2>)))
//! ```
//!
//! describes a root with a file `a` (contents `1`), and a directory `b`
//! holding an empty file `c` and a directory `d` with a file `e`. A name
//! before the opening parenthesis names the root, which diffs ignore.
//! Identity works like stored objects: files digest their contents in the
//! blob namespace, directories digest their sorted `(name, hash)` entries
//! in the tree namespace.

use std::fmt;
use std::sync::Arc;

use strand_crypto::HashDomain;
use strand_types::ObjectId;

use crate::node::{Node, NodeResult};

#[derive(Debug)]
enum Inner {
    File {
        name: String,
        contents: String,
        hash: ObjectId,
    },
    Dir {
        name: String,
        hash: ObjectId,
        children: Vec<FsNode>,
    },
}

/// An in-memory trie node: a file with string contents, or a directory of
/// children. Cheap to clone (nodes share their contents through a
/// reference count).
#[derive(Clone, Debug)]
pub struct FsNode(Arc<Inner>);

impl FsNode {
    /// A file node. The hash is derived from the contents, so files with
    /// equal contents are identical and files with different contents are
    /// not, empty contents included.
    pub fn file(name: impl Into<String>, contents: impl Into<String>) -> Self {
        let contents = contents.into();
        let hash = HashDomain::Blob.digest(contents.as_bytes());
        Self(Arc::new(Inner::File {
            name: name.into(),
            contents,
            hash,
        }))
    }

    /// A directory node. Children are sorted by name; the hash covers the
    /// sorted `(name, hash)` sequence, so directory identity is a pure
    /// function of contents, independent of the order children were given
    /// in. Callers must not pass two children with the same name.
    pub fn dir(name: impl Into<String>, mut children: Vec<FsNode>) -> Self {
        children.sort_by(|a, b| a.name().cmp(b.name()));
        let mut hasher = HashDomain::Tree.hasher();
        for child in &children {
            hasher.update(child.name().as_bytes());
            hasher.update(&[0]);
            hasher.update(child.hash().as_bytes());
        }
        let hash = ObjectId::from(hasher.finalize());
        Self(Arc::new(Inner::Dir {
            name: name.into(),
            hash,
            children,
        }))
    }

    /// Parse a tree description (see the module docs for the grammar).
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        Parser::new(input).parse_root()
    }
}

impl Node for FsNode {
    fn name(&self) -> &str {
        match &*self.0 {
            Inner::File { name, .. } | Inner::Dir { name, .. } => name,
        }
    }

    fn hash(&self) -> ObjectId {
        match &*self.0 {
            Inner::File { hash, .. } | Inner::Dir { hash, .. } => *hash,
        }
    }

    fn is_leaf(&self) -> bool {
        matches!(&*self.0, Inner::File { .. })
    }

    fn children(&self) -> NodeResult<Vec<Self>> {
        match &*self.0 {
            Inner::File { .. } => Ok(Vec::new()),
            Inner::Dir { children, .. } => Ok(children.clone()),
        }
    }
}

impl fmt::Display for FsNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.0 {
            Inner::File { name, contents, .. } => write!(f, "{name}<{contents}>"),
            Inner::Dir { name, children, .. } => {
                write!(f, "{name}(")?;
                let mut sep = "";
                for child in children {
                    write!(f, "{sep}{child}")?;
                    sep = " ";
                }
                write!(f, ")")
            }
        }
    }
}

/// Errors from parsing a tree description.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unexpected end of input")]
    UnexpectedEnd,

    #[error("unexpected character {found:?} at byte {at}")]
    UnexpectedChar { found: char, at: usize },

    #[error("trailing input after root directory at byte {at}")]
    TrailingInput { at: usize },

    #[error("duplicate child name {name:?}")]
    DuplicateChild { name: String },
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn expect(&mut self, want: char) -> Result<(), ParseError> {
        match self.bump() {
            Some(c) if c == want => Ok(()),
            Some(c) => Err(ParseError::UnexpectedChar {
                found: c,
                at: self.pos - c.len_utf8(),
            }),
            None => Err(ParseError::UnexpectedEnd),
        }
    }

    /// Name characters are anything except structure characters and
    /// whitespace. An empty name is permitted only for the root.
    fn parse_name(&mut self) -> String {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if matches!(c, '(' | ')' | '<' | '>') || c.is_whitespace() {
                break;
            }
            self.bump();
        }
        self.input[start..self.pos].to_string()
    }

    fn parse_root(&mut self) -> Result<FsNode, ParseError> {
        self.skip_whitespace();
        let name = self.parse_name();
        let children = self.parse_dir_body()?;
        self.skip_whitespace();
        if self.peek().is_some() {
            return Err(ParseError::TrailingInput { at: self.pos });
        }
        Ok(FsNode::dir(name, children))
    }

    fn parse_dir_body(&mut self) -> Result<Vec<FsNode>, ParseError> {
        self.expect('(')?;
        let mut children: Vec<FsNode> = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(')') => {
                    self.bump();
                    return Ok(children);
                }
                Some(_) => {
                    let child = self.parse_node()?;
                    if children.iter().any(|c| c.name() == child.name()) {
                        return Err(ParseError::DuplicateChild {
                            name: child.name().to_string(),
                        });
                    }
                    children.push(child);
                }
                None => return Err(ParseError::UnexpectedEnd),
            }
        }
    }

    fn parse_node(&mut self) -> Result<FsNode, ParseError> {
        let name = self.parse_name();
        match self.peek() {
            Some('(') if !name.is_empty() => {
                let children = self.parse_dir_body()?;
                Ok(FsNode::dir(name, children))
            }
            Some('<') if !name.is_empty() => {
                self.bump();
                let contents = self.parse_contents()?;
                Ok(FsNode::file(name, contents))
            }
            Some(c) => Err(ParseError::UnexpectedChar {
                found: c,
                at: self.pos,
            }),
            None => Err(ParseError::UnexpectedEnd),
        }
    }

    fn parse_contents(&mut self) -> Result<String, ParseError> {
        let start = self.pos;
        loop {
            match self.peek() {
                Some('>') => {
                    let contents = self.input[start..self.pos].to_string();
                    self.bump();
                    return Ok(contents);
                }
                Some(_) => {
                    self.bump();
                }
                None => return Err(ParseError::UnexpectedEnd),
            }
        }
    }
}
