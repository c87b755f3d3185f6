use thiserror::Error;

/// Error parsing an [`ObjectId`](crate::ObjectId) from its hex form.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdParseError {
    #[error("object ids are {want} hex characters, got {got}")]
    WrongLength { want: usize, got: usize },

    #[error("object ids are hex only: {0:?}")]
    NotHex(String),
}
