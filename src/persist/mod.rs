//! Saving and loading automata through the graph codec.
//!
//! An automaton is projected onto a [`Graph`] of [`NodeRecord`]s:
//!
//! - the root node names the variant and carries the engine settings as a
//!   `bincode` attachment tagged with [`FORMAT_VERSION`]
//! - every state is a node linked from the root by a `member` edge
//! - the root has one `start` edge to the start state, if there is one
//! - every transition is a `transition` edge between two state nodes whose
//!   remaining label components are the condition tokens
//!
//! Runtime data (input, cursor, activation flags, history) is not saved.
//!
//! # Example
//!
//! ```rust
//! use automata_engine::builder::AutomatonBuilder;
//! use automata_engine::core::symbols;
//! use automata_engine::engine::Registry;
//! use automata_engine::persist;
//!
//! let dfa = AutomatonBuilder::dfa()
//!     .state("q0")
//!     .accepting("q1")
//!     .start("q0")
//!     .transition("q0", "q1", ["a"])
//!     .build()
//!     .unwrap();
//!
//! let bytes = persist::to_bytes(dfa.as_ref()).unwrap();
//! let mut loaded = persist::from_bytes(&bytes, &Registry::default()).unwrap();
//!
//! loaded.set_input(symbols("a"));
//! assert!(loaded.simulate().unwrap().is_accepted());
//! ```

mod error;
mod record;

pub use error::PersistError;
pub use record::NodeRecord;

use crate::codec;
use crate::core::{Condition, State, StateId, StateKind, Transition};
use crate::engine::{Automaton, EngineConfig, Registry};
use crate::graph::{ConstructionError, Domain, Graph, GraphNode, NodeId, Schema};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

/// Version identifier for the persisted automaton layout
pub const FORMAT_VERSION: u32 = 1;

const MEMBER: &str = "member";
const START: &str = "start";
const TRANSITION: &str = "transition";

#[derive(Serialize, Deserialize)]
struct StoredSettings {
    version: u32,
    config: EngineConfig,
}

/// Label schema for a variant with `arity` condition tokens: an edge role
/// followed by one open component per token.
pub fn schema_for(arity: usize) -> Result<Schema, ConstructionError> {
    let mut domains = vec![Domain::closed([MEMBER, START, TRANSITION])];
    domains.extend(std::iter::repeat(Domain::Open).take(arity));
    Schema::new(domains)
}

/// Project `automaton` onto a graph.
pub fn to_graph(automaton: &dyn Automaton) -> Result<Graph<NodeRecord>, PersistError> {
    let arity = automaton.condition_arity();
    let schema = schema_for(arity)?;
    let machine = automaton.machine();
    let mut graph = Graph::new(schema.clone());

    let root = graph.add_node(NodeRecord::Automaton {
        variant: automaton.variant().to_string(),
    });
    graph.set_root(root)?;
    let settings = StoredSettings {
        version: FORMAT_VERSION,
        config: automaton.config().clone(),
    };
    if let Some(node) = graph.node_mut(root) {
        node.set_attachment(bincode::serialize(&settings)?);
    }

    let padding = vec![""; arity];
    let role = |name: &'static str| {
        let mut names = vec![name];
        names.extend_from_slice(&padding);
        schema.label(&names)
    };

    let mut nodes = BTreeMap::new();
    for (id, state) in machine.states() {
        let node = graph.add_node(NodeRecord::State {
            name: state.name().to_string(),
            position: state.position(),
            accepting: machine.is_accepting(id),
        });
        graph.connect(root, role(MEMBER)?, node)?;
        nodes.insert(id, node);
    }

    if let Some(start) = machine.start_state().and_then(|id| nodes.get(&id)) {
        graph.connect(root, role(START)?, *start)?;
    }

    for (id, transition) in machine.transitions() {
        let (Some(&from), Some(&to)) = (nodes.get(&transition.from()), nodes.get(&transition.to()))
        else {
            return Err(malformed(format!(
                "transition {id} connects a state that is not in the machine"
            )));
        };
        let mut names = vec![TRANSITION];
        names.extend(transition.condition().tokens().iter().map(String::as_str));
        graph.connect(from, schema.label(&names)?, to)?;
    }

    Ok(graph)
}

/// Rebuild an automaton from its graph, creating the engine through `registry`.
pub fn from_graph(
    graph: &Graph<NodeRecord>,
    registry: &Registry,
) -> Result<Box<dyn Automaton>, PersistError> {
    let root = graph
        .root_node()
        .ok_or_else(|| malformed("graph has no root"))?;
    let NodeRecord::Automaton { variant } = root.payload() else {
        return Err(malformed("root node does not describe an automaton"));
    };

    let settings: StoredSettings = bincode::deserialize(root.attachment())?;
    if settings.version != FORMAT_VERSION {
        return Err(PersistError::UnsupportedVersion {
            found: settings.version,
            supported: FORMAT_VERSION,
        });
    }

    let mut automaton = registry.create(variant, settings.config)?;
    let schema = graph.schema();
    if *schema != schema_for(automaton.condition_arity())? {
        return Err(malformed(format!(
            "label schema does not fit variant '{variant}'"
        )));
    }

    let mut states: BTreeMap<NodeId, StateId> = BTreeMap::new();
    let mut start = None;
    for edge in root.edges() {
        let names = schema.names(&edge.label)?;
        match names[0] {
            MEMBER => {
                let node = graph
                    .node(edge.target)
                    .ok_or_else(|| malformed("member edge leads nowhere"))?;
                let (state, kind) = state_from(node)?;
                states.insert(edge.target, automaton.add_state(state, kind)?);
            }
            START => start = Some(edge.target),
            other => {
                return Err(malformed(format!("root carries a '{other}' edge")));
            }
        }
    }

    let lookup = |node: NodeId| {
        states
            .get(&node)
            .copied()
            .ok_or_else(|| malformed(format!("{node} is not a member state")))
    };

    for (&node, &from) in &states {
        let Some(state_node) = graph.node(node) else {
            continue;
        };
        for edge in state_node.edges() {
            let names = schema.names(&edge.label)?;
            if names[0] != TRANSITION {
                return Err(malformed(format!("state carries a '{}' edge", names[0])));
            }
            let condition = Condition::new(names[1..].iter().copied());
            automaton.add_transition(Transition::new(from, lookup(edge.target)?, condition))?;
        }
    }

    if let Some(start) = start {
        automaton.set_start_state(lookup(start)?)?;
    }

    Ok(automaton)
}

fn state_from(node: &GraphNode<NodeRecord>) -> Result<(State, StateKind), PersistError> {
    match node.payload() {
        NodeRecord::State {
            name,
            position,
            accepting,
        } => {
            let kind = if *accepting {
                StateKind::Accepting
            } else {
                StateKind::Default
            };
            Ok((State::new(name.clone()).with_position(*position), kind))
        }
        NodeRecord::Automaton { .. } => Err(malformed("member edge targets the automaton node")),
    }
}

fn malformed(reason: impl Into<String>) -> PersistError {
    PersistError::Malformed(reason.into())
}

/// Save `automaton` in the binary format.
pub fn to_bytes(automaton: &dyn Automaton) -> Result<Vec<u8>, PersistError> {
    let bytes = codec::to_binary(&to_graph(automaton)?)?;
    info!(
        variant = automaton.variant(),
        bytes = bytes.len(),
        "saved automaton"
    );
    Ok(bytes)
}

pub fn from_bytes(bytes: &[u8], registry: &Registry) -> Result<Box<dyn Automaton>, PersistError> {
    let automaton = from_graph(&codec::from_binary(bytes)?, registry)?;
    info!(variant = automaton.variant(), "loaded automaton");
    Ok(automaton)
}

/// Save `automaton` in the textual format.
pub fn to_json(automaton: &dyn Automaton) -> Result<String, PersistError> {
    let text = codec::to_text(&to_graph(automaton)?)?;
    info!(variant = automaton.variant(), "saved automaton as text");
    Ok(text)
}

pub fn from_json(text: &str, registry: &Registry) -> Result<Box<dyn Automaton>, PersistError> {
    let automaton = from_graph(&codec::from_text(text)?, registry)?;
    info!(variant = automaton.variant(), "loaded automaton from text");
    Ok(automaton)
}
