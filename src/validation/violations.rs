//! Well-formedness problems found by validation.

use crate::core::{StateId, TransitionId};
use thiserror::Error;

/// A problem that keeps an automaton from running as intended
#[derive(Debug, Clone, Error, PartialEq)]
pub enum Violation {
    #[error("no start state is set")]
    MissingStartState,

    #[error("no accepting state is declared")]
    NoAcceptingState,

    #[error("transition {transition} references unregistered state {state}")]
    DanglingEndpoint {
        transition: TransitionId,
        state: StateId,
    },

    #[error("transition {transition} has an invalid condition: {reason}")]
    InvalidCondition {
        transition: TransitionId,
        reason: String,
    },

    #[error("transitions {first} and {second} leave '{state}' on the same symbol '{symbol}'")]
    Nondeterministic {
        state: String,
        symbol: String,
        first: TransitionId,
        second: TransitionId,
    },

    #[error("custom check failed: {message}")]
    CustomCheckFailed { message: String },
}
