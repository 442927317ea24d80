//! Core automaton types and bookkeeping.
//!
//! This module contains everything the variant engines share:
//! - States and transitions, addressed by stable ids
//! - The [`Machine`] that owns them and implements the activation protocol
//! - Step results, verdicts and the recoverable [`TransitionError`]
//! - Timestamped run history
//!
//! Nothing here knows about a particular variant's matching rules; those live
//! in [`crate::engine`].

mod error;
mod history;
mod machine;
mod outcome;
mod state;
mod transition;

pub use error::AutomatonError;
pub use history::{RunHistory, StepRecord};
pub use machine::Machine;
pub use outcome::{ReturnValue, Step, StepOutcome, TapeSnapshot, TransitionError, Verdict};
pub use state::{Position, State, StateId, StateKind};
pub use transition::{Condition, Transition, TransitionId};

/// Split a string into single-character input symbols.
///
/// # Example
///
/// ```rust
/// use automata_engine::core::symbols;
///
/// assert_eq!(symbols("ab"), vec!["a".to_string(), "b".to_string()]);
/// assert!(symbols("").is_empty());
/// ```
pub fn symbols(input: &str) -> Vec<String> {
    input.chars().map(String::from).collect()
}
