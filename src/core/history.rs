//! Run history tracking.
//!
//! Every transition taken during a run is recorded with a timestamp so a
//! caller can replay or inspect the path after the fact.

use super::state::StateId;
use super::transition::TransitionId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single transition taken during a run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    /// The state being left
    pub from: StateId,
    /// The state being entered
    pub to: StateId,
    /// The transition that was taken
    pub transition: TransitionId,
    /// The input or tape symbol that was matched
    pub symbol: String,
    /// When the step happened
    pub timestamp: DateTime<Utc>,
}

/// Ordered history of the steps taken in the current run.
///
/// # Example
///
/// ```rust
/// use automata_engine::builder::AutomatonBuilder;
/// use automata_engine::core::symbols;
///
/// let mut dfa = AutomatonBuilder::dfa()
///     .state("even")
///     .state("odd")
///     .start("even")
///     .transition("even", "odd", ["1"])
///     .transition("odd", "even", ["1"])
///     .build()
///     .unwrap();
///
/// dfa.set_input(symbols("11"));
/// dfa.simulate().unwrap();
///
/// let history = dfa.machine().history();
/// assert_eq!(history.len(), 2);
/// assert_eq!(history.path().len(), 3); // even -> odd -> even
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RunHistory {
    steps: Vec<StepRecord>,
}

impl RunHistory {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Append a step to the history.
    pub fn record(&mut self, step: StepRecord) {
        self.steps.push(step);
    }

    /// Forget every recorded step.
    pub fn clear(&mut self) {
        self.steps.clear();
    }

    /// Get the path of states traversed.
    ///
    /// Returns the first step's source state followed by the target of each
    /// step, in order. Empty when nothing was recorded.
    pub fn path(&self) -> Vec<StateId> {
        let mut path = Vec::with_capacity(self.steps.len() + 1);
        if let Some(first) = self.steps.first() {
            path.push(first.from);
        }
        path.extend(self.steps.iter().map(|step| step.to));
        path
    }

    /// Time elapsed between the first and last recorded step.
    ///
    /// Returns `None` if there are no steps.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.steps.first(), self.steps.last()) {
            last.timestamp
                .signed_duration_since(first.timestamp)
                .to_std()
                .ok()
        } else {
            None
        }
    }

    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
