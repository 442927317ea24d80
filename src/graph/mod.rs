//! Rooted directed graphs with schema-checked edge labels.
//!
//! A [`Graph`] is the in-memory form handled by the [codec](crate::codec). It
//! is an arena: nodes are addressed by [`NodeId`], so a node may be shared by
//! many edges and cycles (including self-loops) are ordinary edges.

mod error;
mod node;
mod schema;

pub use error::ConstructionError;
pub use node::{Edge, Graph, GraphNode, NodeId};
pub use schema::{Domain, Label, Schema, Token};
