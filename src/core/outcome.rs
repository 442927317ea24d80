//! Step results, verdicts and recoverable simulation failures.

use super::state::StateId;
use super::transition::TransitionId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Record of one transition taken by a simulation step.
///
/// Carries the highlighted delta explicitly so a renderer does not have to
/// scan every state and transition for activation flags.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// State the machine left
    pub from: StateId,
    /// State the machine entered (now active)
    pub to: StateId,
    /// Transition taken (now active)
    pub transition: TransitionId,
    /// Input or tape symbol the transition matched
    pub symbol: String,
    /// Cursor or head position after the step
    pub index: i64,
}

/// Terminal result of a run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// The run ended in an accepting state
    Accepted { state: StateId },
    /// The run ended in a non-accepting state
    Rejected { state: StateId },
    /// A Mealy run consumed its input and produced this output sequence
    Output(Vec<String>),
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    /// Final state for accept/reject verdicts.
    pub fn state(&self) -> Option<StateId> {
        match self {
            Self::Accepted { state } | Self::Rejected { state } => Some(*state),
            Self::Output(_) => None,
        }
    }
}

/// Result of a single `simulate_one_step` call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// A transition was taken and the run continues
    Running(Step),

    /// The run has terminated.
    ///
    /// `step` is the transition that completed the run, or `None` when the run
    /// was already over (empty input, or a repeated call after termination).
    Finished { verdict: Verdict, step: Option<Step> },
}

impl StepOutcome {
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Finished { .. })
    }

    pub fn step(&self) -> Option<&Step> {
        match self {
            Self::Running(step) => Some(step),
            Self::Finished { step, .. } => step.as_ref(),
        }
    }

    pub fn verdict(&self) -> Option<&Verdict> {
        match self {
            Self::Running(_) => None,
            Self::Finished { verdict, .. } => Some(verdict),
        }
    }
}

/// Copy of a Turing machine tape.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TapeSnapshot {
    pub cells: BTreeMap<i64, String>,
    pub head: i64,
}

impl TapeSnapshot {
    /// Symbol stored at `position`, if the cell was ever visited.
    pub fn symbol_at(&self, position: i64) -> Option<&str> {
        self.cells.get(&position).map(String::as_str)
    }

    /// Concatenate every populated cell from left to right.
    pub fn contents(&self) -> String {
        self.cells.values().map(String::as_str).collect()
    }
}

/// Variant-specific output of the most recent step.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ReturnValue {
    /// DFAs produce nothing
    #[default]
    None,
    /// Last symbol emitted by a Mealy machine
    Output(Option<String>),
    /// Current Turing machine tape
    Tape(TapeSnapshot),
}

/// Recoverable failures reported by `simulate` and `simulate_one_step`.
///
/// These are ordinary values; a caller can render them and keep the automaton.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("no valid transition from '{state}' on symbol '{symbol}'")]
    NoValidTransition { state: String, symbol: String },

    #[error("{count} transitions from '{state}' match symbol '{symbol}'")]
    Nondeterministic {
        state: String,
        symbol: String,
        count: usize,
    },

    #[error("transition {transition} targets unregistered state {target}")]
    InvalidTargetState {
        transition: TransitionId,
        target: StateId,
    },

    #[error("head cannot move to cell {position}: the bounded tape spans [{min}, {max}]")]
    TapeBoundExceeded { position: i64, min: i64, max: i64 },

    #[error("no start state is set")]
    MissingStartState,

    #[error("start state {0} is not registered")]
    UnregisteredStartState(StateId),

    #[error("run did not finish within {limit} steps")]
    StepLimitExceeded { limit: usize },
}
