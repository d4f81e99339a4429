use std::io;
use std::path::PathBuf;

use crate::tree::NodeId;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("'{}' is not a directory", .0.display())]
    NotADirectory(PathBuf),

    /// Children can only be attached to folders.
    #[error("node {0} is a leaf and cannot have children")]
    LeafParent(NodeId),

    #[error("predicate failed: {0}")]
    Predicate(String),
}

pub type Result<T> = std::result::Result<T, Error>;
