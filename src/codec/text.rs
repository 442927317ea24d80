//! Human-readable JSON form of a graph.
//!
//! ```json
//! {
//!   "schema": [["next", "prev"], []],
//!   "nodes": [
//!     { "payload": "a", "root": true,
//!       "connections": [{ "label": [0, "x"], "node_idx": 1 }] }
//!   ]
//! }
//! ```
//!
//! An empty domain list marks an open domain. Nodes appear in the same
//! breadth-first order as in the binary format, and `node_idx` refers to that
//! order. `attachment` is omitted when empty.

use super::error::{CodecError, FormatError};
use super::resolve::{resolve, PendingNode};
use crate::graph::{Domain, Graph, Label, Schema};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use tracing::{debug, warn};

#[derive(Serialize, Deserialize)]
struct TextDocument<P> {
    schema: Vec<Vec<String>>,
    nodes: Vec<TextNode<P>>,
}

#[derive(Serialize, Deserialize)]
struct TextNode<P> {
    payload: P,
    root: bool,
    connections: Vec<TextConnection>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    attachment: Vec<u8>,
}

#[derive(Serialize, Deserialize)]
struct TextConnection {
    label: Label,
    node_idx: usize,
}

/// Number nodes breadth-first and lay the graph out as a document.
fn document<P>(graph: &Graph<P>) -> Result<TextDocument<&P>, CodecError> {
    let order = graph.bfs_order()?;
    let mut position = vec![0usize; graph.len()];
    for (index, id) in order.iter().enumerate() {
        position[id.index()] = index;
    }

    let schema = graph
        .schema()
        .domains()
        .iter()
        .map(|domain| match domain {
            Domain::Closed(tokens) => tokens.clone(),
            Domain::Open => Vec::new(),
        })
        .collect();

    let nodes = order
        .iter()
        .filter_map(|&id| graph.node(id))
        .map(|node| TextNode {
            payload: node.payload(),
            root: node.is_root(),
            connections: node
                .edges()
                .iter()
                .map(|edge| TextConnection {
                    label: edge.label.clone(),
                    node_idx: position[edge.target.index()],
                })
                .collect(),
            attachment: node.attachment().to_vec(),
        })
        .collect();

    Ok(TextDocument { schema, nodes })
}

/// Encode `graph` as pretty-printed JSON.
pub fn encode_text<P: Serialize, W: Write>(graph: &Graph<P>, out: W) -> Result<(), CodecError> {
    let document = document(graph)?;
    serde_json::to_writer_pretty(out, &document)?;
    debug!(nodes = document.nodes.len(), "encoded text graph");
    Ok(())
}

pub fn to_text<P: Serialize>(graph: &Graph<P>) -> Result<String, CodecError> {
    let document = document(graph)?;
    let text = serde_json::to_string_pretty(&document)?;
    debug!(nodes = document.nodes.len(), "encoded text graph");
    Ok(text)
}

pub fn decode_text<P: DeserializeOwned, R: Read>(input: R) -> Result<Graph<P>, CodecError> {
    let result = serde_json::from_reader(input)
        .map_err(CodecError::from)
        .and_then(build);
    if let Err(err) = &result {
        warn!(error = %err, "rejected text graph");
    }
    result
}

pub fn from_text<P: DeserializeOwned>(text: &str) -> Result<Graph<P>, CodecError> {
    decode_text(text.as_bytes())
}

fn build<P>(document: TextDocument<P>) -> Result<Graph<P>, CodecError> {
    let domains = document
        .schema
        .into_iter()
        .map(|tokens| {
            if tokens.is_empty() {
                Domain::Open
            } else {
                Domain::Closed(tokens)
            }
        })
        .collect();
    let schema = Schema::new(domains).map_err(FormatError::InvalidSchema)?;

    let mut pending = Vec::with_capacity(document.nodes.len());
    for (node, entry) in document.nodes.into_iter().enumerate() {
        let mut edges = Vec::with_capacity(entry.connections.len());
        for connection in entry.connections {
            schema
                .check(&connection.label)
                .map_err(|source| FormatError::Label { node, source })?;
            edges.push((connection.label, connection.node_idx));
        }
        pending.push(PendingNode {
            payload: entry.payload,
            edges,
            attachment: entry.attachment,
            root: entry.root,
        });
    }

    debug!(nodes = pending.len(), "read text graph");
    resolve(schema, pending)
}
