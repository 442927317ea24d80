//! Graph construction errors.

use super::node::NodeId;
use thiserror::Error;

/// Errors raised while building a graph in memory.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructionError {
    #[error("label has {found} components, the schema declares {expected}")]
    Arity { expected: usize, found: usize },

    #[error("label component {position} must be an index into a closed domain")]
    ExpectedIndex { position: usize },

    #[error("label component {position} must be a string for an open domain")]
    ExpectedString { position: usize },

    #[error("label component {position} indexes {index}, the domain has {len} tokens")]
    IndexOutOfRange {
        position: usize,
        index: i64,
        len: usize,
    },

    #[error("'{token}' is not a token of closed domain {position}")]
    UnknownToken { position: usize, token: String },

    #[error("closed domain {position} has no tokens")]
    EmptyDomain { position: usize },

    #[error("closed domain {position} lists '{token}' more than once")]
    DuplicateToken { position: usize, token: String },

    #[error("node {0} is not part of this graph")]
    UnknownNode(NodeId),

    #[error("graph has no root node")]
    MissingRoot,
}
