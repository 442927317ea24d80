//! Variant engines and the registry that creates them.
//!
//! Every variant implements [`Automaton`] on top of a shared
//! [`Machine`](crate::core::Machine):
//!
//! - [`Dfa`]: single-token conditions, accept/reject on input exhaustion
//! - [`Mealy`]: `(input, output)` conditions, emits one symbol per step
//! - [`TuringMachine`]: `(read, write, move)` conditions over a sparse [`Tape`]
//!
//! Engines are created by name through a [`Registry`], which is how persisted
//! automata are reconstructed.

mod automaton;
mod config;
mod cursor;
mod dfa;
mod mealy;
mod registry;
mod turing;

pub use automaton::Automaton;
pub use config::EngineConfig;
pub use dfa::Dfa;
pub use mealy::Mealy;
pub use registry::{Registry, RegistryError};
pub use turing::{Move, Tape, TuringMachine};
