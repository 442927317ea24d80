//! Codec error types.

use crate::graph::ConstructionError;
use std::io;
use thiserror::Error;

/// The stream is not a well-formed encoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("bad magic header {found:?}, expected \"BCUL\"")]
    BadMagic { found: [u8; 4] },

    #[error("stream ends inside a field at byte {offset}")]
    Truncated { offset: u64 },

    #[error("integer at byte {offset} claims {width} bytes, at most 8 allowed")]
    IntegerWidth { offset: u64, width: u8 },

    #[error("float at byte {offset} claims {width} bytes, expected 8")]
    FloatWidth { offset: u64, width: u8 },

    #[error("negative length {value} at byte {offset}")]
    NegativeLength { offset: u64, value: i64 },

    #[error("{field} of {found} exceeds the limit of {limit}")]
    LimitExceeded {
        field: &'static str,
        found: u64,
        limit: u64,
    },

    #[error("string at byte {offset} is not valid UTF-8")]
    InvalidUtf8 { offset: u64 },

    #[error("marker byte {value} at byte {offset} is neither 0 nor 1")]
    BadMarker { offset: u64, value: u8 },

    #[error("invalid schema: {0}")]
    InvalidSchema(#[source] ConstructionError),

    #[error("edge label of node {node} does not fit the schema: {source}")]
    Label {
        node: usize,
        #[source]
        source: ConstructionError,
    },

    #[error("node {node} references node {target}, which does not exist")]
    DanglingReference { node: usize, target: usize },

    #[error("unexpected data after the last node at byte {offset}")]
    TrailingData { offset: u64 },

    #[error("invalid payload: {0}")]
    Payload(String),
}

/// A decoded graph breaks a structural invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("no node is marked as root")]
    NoRoot,

    #[error("{count} nodes are marked as root, expected exactly one")]
    MultipleRoots { count: usize },
}

/// Errors that can occur while encoding or decoding a graph
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("format error: {0}")]
    Format(#[from] FormatError),

    #[error("invariant violated: {0}")]
    Invariant(#[from] InvariantViolation),

    #[error("construction error: {0}")]
    Construction(#[from] ConstructionError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
