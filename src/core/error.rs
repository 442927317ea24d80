//! Errors raised while editing an automaton.

use super::state::StateId;
use super::transition::TransitionId;
use thiserror::Error;

/// Errors from adding, removing or reconfiguring states and transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AutomatonError {
    #[error("state {0} is not registered")]
    UnknownState(StateId),

    #[error("transition {0} is not registered")]
    UnknownTransition(TransitionId),

    #[error("a state named '{0}' already exists")]
    DuplicateStateName(String),

    #[error("{variant} transitions take {expected} condition tokens, got {found}")]
    ConditionArity {
        variant: String,
        expected: usize,
        found: usize,
    },

    #[error("invalid head move '{0}' (expected L, R or H)")]
    InvalidMove(String),
}
