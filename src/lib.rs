//! Automata Engine: stepwise automaton simulation with cycle-safe graph persistence
//!
//! The crate has two halves. The simulation half runs deterministic finite
//! automata, Mealy machines and Turing machines one transition at a time,
//! flagging the active state and transition after every step so a renderer can
//! follow along. The persistence half stores any rooted, possibly-cyclic graph
//! in a compact binary form or a diffable JSON form, numbering nodes in
//! breadth-first order so shared and back-referenced nodes are written once.
//!
//! # Core Concepts
//!
//! - **Machine**: the state/transition bookkeeping shared by every variant
//! - **Automaton**: the uniform step/run contract implemented by each engine
//! - **Graph**: an arena of payload-carrying nodes with schema-checked labels
//! - **Codec**: binary (`BCUL`) and textual encoders/decoders for graphs
//! - **Persist**: projection of an automaton into a graph and back
//!
//! # Example
//!
//! ```rust
//! use automata_engine::builder::AutomatonBuilder;
//! use automata_engine::core::symbols;
//!
//! // Accepts strings over {a, b} that end in "ab".
//! let mut dfa = AutomatonBuilder::dfa()
//!     .state("q0")
//!     .state("q1")
//!     .accepting("q2")
//!     .start("q0")
//!     .transition("q0", "q1", ["a"])
//!     .transition("q0", "q0", ["b"])
//!     .transition("q1", "q1", ["a"])
//!     .transition("q1", "q2", ["b"])
//!     .transition("q2", "q1", ["a"])
//!     .transition("q2", "q0", ["b"])
//!     .build()
//!     .unwrap();
//!
//! dfa.set_input(symbols("aab"));
//! assert!(dfa.simulate().unwrap().is_accepted());
//!
//! dfa.set_input(symbols("aba"));
//! assert!(!dfa.simulate().unwrap().is_accepted());
//! ```

pub mod builder;
pub mod codec;
pub mod core;
pub mod engine;
pub mod graph;
pub mod persist;
pub mod validation;

// Re-export commonly used types
pub use crate::core::{
    Condition, Machine, ReturnValue, State, StateId, StateKind, Step, StepOutcome, Transition,
    TransitionError, TransitionId, Verdict,
};
pub use crate::engine::{Automaton, Dfa, EngineConfig, Mealy, Registry, TuringMachine};
pub use crate::graph::{Domain, Graph, GraphNode, Label, NodeId, Schema, Token};
