//! Persistence error types.

use crate::codec::CodecError;
use crate::core::AutomatonError;
use crate::engine::RegistryError;
use crate::graph::ConstructionError;
use thiserror::Error;

/// Errors that can occur while saving or loading an automaton
#[derive(Debug, Error)]
pub enum PersistError {
    /// Encoding or decoding the graph failed
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Graph(#[from] ConstructionError),

    /// The engine settings attachment could not be (de)serialized
    #[error("engine settings: {0}")]
    Settings(#[from] bincode::Error),

    /// Saved by a newer or older format this version cannot read
    #[error("Unsupported format version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// The graph decoded but does not describe an automaton
    #[error("malformed automaton graph: {0}")]
    Malformed(String),

    #[error(transparent)]
    Automaton(#[from] AutomatonError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}
