//! Binary and textual encodings of rooted, possibly cyclic graphs.
//!
//! Both formats number nodes by a breadth-first walk from the root, so a
//! node reachable along several paths (or along a cycle back to itself) is
//! written once and referenced by its position everywhere else. Decoding
//! first reads every node with raw target positions, then resolves them into
//! [`Graph`](crate::graph::Graph) links and checks that exactly one node is
//! marked as root.
//!
//! # Example
//!
//! ```rust
//! use automata_engine::codec::{from_binary, from_text, to_binary, to_text};
//! use automata_engine::graph::{Graph, Schema};
//!
//! let schema = Schema::open(1);
//! let mut graph = Graph::new(schema.clone());
//! let root = graph.add_node("root".to_string());
//! let child = graph.add_node("child".to_string());
//! graph.set_root(root).unwrap();
//! graph.connect(root, schema.label(&["down"]).unwrap(), child).unwrap();
//! graph.connect(child, schema.label(&["up"]).unwrap(), root).unwrap();
//!
//! let bytes = to_binary(&graph).unwrap();
//! assert_eq!(&bytes[..4], b"BCUL");
//! assert_eq!(from_binary::<String>(&bytes).unwrap(), graph);
//!
//! let text = to_text(&graph).unwrap();
//! assert_eq!(from_text::<String>(&text).unwrap(), graph);
//! ```

mod binary;
mod error;
mod field;
mod resolve;
mod text;

pub use binary::{decode_binary, decode_binary_with, encode_binary, from_binary, to_binary, MAGIC};
pub use error::{CodecError, FormatError, InvariantViolation};
pub use field::{DecodeLimits, FieldReader, FieldWriter, Payload};
pub use text::{decode_text, encode_text, from_text, to_text};
