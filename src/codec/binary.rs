//! The `BCUL` binary format.
//!
//! Layout: the magic bytes, the schema (domain count, then per domain its
//! token count and tokens, zero meaning open), the node count, then every
//! node in breadth-first order from the root:
//!
//! ```text
//! payload fields | edge count | edges | attachment blob | root marker
//! ```
//!
//! An edge is one field per label component (integer index for a closed
//! domain, string for an open one) followed by the target node's position.

use super::error::{CodecError, FormatError};
use super::field::{DecodeLimits, FieldReader, FieldWriter, Payload};
use super::resolve::{resolve, PendingNode};
use crate::graph::{ConstructionError, Domain, Graph, Label, Schema, Token};
use std::io::{Read, Write};
use tracing::{debug, warn};

pub const MAGIC: &[u8; 4] = b"BCUL";

/// Encode `graph` into `out`.
///
/// Only nodes reachable from the root are written. Node ids in the stream
/// are breadth-first positions, so encoding is deterministic and a node
/// referenced many times is written once.
pub fn encode_binary<P: Payload, W: Write>(graph: &Graph<P>, out: W) -> Result<(), CodecError> {
    let order = graph.bfs_order()?;
    let mut position = vec![None; graph.len()];
    for (index, id) in order.iter().enumerate() {
        position[id.index()] = Some(index);
    }

    let mut out = FieldWriter::new(out);
    out.write_raw(MAGIC)?;
    write_schema(&mut out, graph.schema())?;
    out.write_len(order.len())?;

    for &id in &order {
        let node = graph.node(id).ok_or(ConstructionError::UnknownNode(id))?;
        node.payload().write_fields(&mut out)?;
        out.write_len(node.edges().len())?;
        for edge in node.edges() {
            for token in edge.label.tokens() {
                match token {
                    Token::Int(index) => out.write_int(*index)?,
                    Token::Str(value) => out.write_str(value)?,
                }
            }
            let target = position[edge.target.index()]
                .ok_or(ConstructionError::UnknownNode(edge.target))?;
            out.write_len(target)?;
        }
        out.write_bytes(node.attachment())?;
        out.write_bool(node.is_root())?;
    }
    out.flush()?;

    debug!(nodes = order.len(), "encoded binary graph");
    Ok(())
}

pub fn to_binary<P: Payload>(graph: &Graph<P>) -> Result<Vec<u8>, CodecError> {
    let mut bytes = Vec::new();
    encode_binary(graph, &mut bytes)?;
    Ok(bytes)
}

/// Decode a graph with the default [`DecodeLimits`].
pub fn decode_binary<P: Payload, R: Read>(input: R) -> Result<Graph<P>, CodecError> {
    decode_binary_with(input, DecodeLimits::default())
}

pub fn decode_binary_with<P: Payload, R: Read>(
    input: R,
    limits: DecodeLimits,
) -> Result<Graph<P>, CodecError> {
    let mut input = FieldReader::new(input, limits);
    let result = read_graph(&mut input);
    if let Err(err) = &result {
        warn!(offset = input.offset(), error = %err, "rejected binary graph");
    }
    result
}

pub fn from_binary<P: Payload>(bytes: &[u8]) -> Result<Graph<P>, CodecError> {
    decode_binary(bytes)
}

fn read_graph<P: Payload, R: Read>(input: &mut FieldReader<R>) -> Result<Graph<P>, CodecError> {
    let mut magic = [0u8; 4];
    input.read_raw(&mut magic)?;
    if &magic != MAGIC {
        return Err(FormatError::BadMagic { found: magic }.into());
    }

    let schema = read_schema(input)?;
    let limits = *input.limits();
    let count = input.read_len("node count", limits.max_nodes)?;

    let mut pending = Vec::with_capacity(count.min(1024));
    for node in 0..count {
        let payload = P::read_fields(input)?;
        let edge_count = input.read_len("edge count", limits.max_edges)?;
        let mut edges = Vec::with_capacity(edge_count.min(64));
        for _ in 0..edge_count {
            let label = read_label(input, &schema)?;
            schema
                .check(&label)
                .map_err(|source| FormatError::Label { node, source })?;
            let target = input.read_len("node id", usize::MAX)?;
            edges.push((label, target));
        }
        let attachment = input.read_bytes()?;
        let root = input.read_bool()?;
        pending.push(PendingNode {
            payload,
            edges,
            attachment,
            root,
        });
    }
    input.expect_end()?;

    debug!(nodes = count, "read binary graph");
    resolve(schema, pending)
}

fn write_schema<W: Write>(out: &mut FieldWriter<W>, schema: &Schema) -> Result<(), CodecError> {
    out.write_len(schema.arity())?;
    for domain in schema.domains() {
        match domain {
            Domain::Closed(tokens) => {
                out.write_len(tokens.len())?;
                for token in tokens {
                    out.write_str(token)?;
                }
            }
            Domain::Open => out.write_len(0)?,
        }
    }
    Ok(())
}

fn read_schema<R: Read>(input: &mut FieldReader<R>) -> Result<Schema, CodecError> {
    let limits = *input.limits();
    let arity = input.read_len("domain count", limits.max_domains)?;
    let mut domains = Vec::with_capacity(arity);
    for _ in 0..arity {
        let len = input.read_len("domain length", limits.max_domain_tokens)?;
        if len == 0 {
            domains.push(Domain::Open);
            continue;
        }
        let tokens = (0..len)
            .map(|_| input.read_str())
            .collect::<Result<Vec<_>, _>>()?;
        domains.push(Domain::Closed(tokens));
    }
    Schema::new(domains).map_err(|source| FormatError::InvalidSchema(source).into())
}

fn read_label<R: Read>(input: &mut FieldReader<R>, schema: &Schema) -> Result<Label, CodecError> {
    let tokens = schema
        .domains()
        .iter()
        .map(|domain| match domain {
            Domain::Closed(_) => input.read_int().map(Token::Int),
            Domain::Open => input.read_str().map(Token::Str),
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Label::new(tokens))
}
