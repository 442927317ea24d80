//! Accumulating well-formedness validation for automata.
//!
//! Checks use stillwater's `Validation` so that one pass reports every
//! problem: a missing start state, transitions pointing at unregistered
//! states, conditions the variant cannot interpret, and pairs of transitions
//! that make a state nondeterministic.
//!
//! # Example
//!
//! ```rust
//! use automata_engine::core::{State, StateKind, Transition};
//! use automata_engine::engine::{Automaton, Dfa};
//! use automata_engine::validation::{validate, RulesBuilder};
//!
//! let mut dfa = Dfa::default();
//! let q0 = dfa.add_state(State::new("q0"), StateKind::Default).unwrap();
//! dfa.add_transition(Transition::new(q0, q0, ["a"])).unwrap();
//! dfa.add_transition(Transition::new(q0, q0, ["a"])).unwrap();
//!
//! // No start state, and two transitions on "a".
//! assert!(validate(&dfa).is_failure());
//!
//! dfa.set_start_state(q0).unwrap();
//! let rules = RulesBuilder::new()
//!     .require_pred(|a| a.machine().state_count() > 0, "empty automaton")
//!     .build();
//! assert!(rules.validate(&dfa).is_failure());
//! ```

pub mod builder;
pub mod rules;
pub mod violations;

pub use builder::RulesBuilder;
pub use rules::{Checked, ValidationRules};
pub use violations::Violation;

use crate::engine::Automaton;

/// Run the structural checks against `automaton`.
pub fn validate(automaton: &dyn Automaton) -> Checked {
    ValidationRules::structural().validate(automaton)
}
