//! The uniform contract every variant engine implements.

use crate::core::{
    AutomatonError, Condition, Machine, ReturnValue, State, StateId, StateKind, StepOutcome,
    Transition, TransitionError, TransitionId, Verdict,
};
use crate::engine::config::EngineConfig;
use std::fmt::Debug;
use tracing::{info, warn};

/// A steppable automaton.
///
/// Editing operations have default implementations that delegate to the
/// shared [`Machine`]; a variant supplies its condition shape, its input model
/// and its step algorithm.
///
/// Stepping is synchronous and not reentrant. The trait requires `Send` so a
/// caller may drive playback from a worker thread, but it must ensure only one
/// step call is in flight per instance.
pub trait Automaton: Send + Debug {
    /// Registry name of the variant, e.g. `"dfa"`.
    fn variant(&self) -> &str;

    /// Number of tokens in every transition condition.
    fn condition_arity(&self) -> usize;

    fn config(&self) -> &EngineConfig;

    fn machine(&self) -> &Machine;

    fn machine_mut(&mut self) -> &mut Machine;

    /// Reject conditions this variant cannot interpret.
    fn check_condition(&self, condition: &Condition) -> Result<(), AutomatonError> {
        let expected = self.condition_arity();
        if condition.len() != expected {
            return Err(AutomatonError::ConditionArity {
                variant: self.variant().to_string(),
                expected,
                found: condition.len(),
            });
        }
        Ok(())
    }

    fn add_state(&mut self, state: State, kind: StateKind) -> Result<StateId, AutomatonError> {
        self.machine_mut().add_state(state, kind)
    }

    /// Remove a state and, atomically with it, every incident transition.
    ///
    /// Deleting the state a run is currently in abandons that run: input
    /// position, outputs and tape are reset along with it.
    fn delete_state(&mut self, id: StateId) -> Result<State, AutomatonError> {
        let interrupts_run = self.machine().current_state() == Some(id);
        let state = self.machine_mut().delete_state(id)?;
        if interrupts_run {
            self.reset();
        }
        Ok(state)
    }

    fn add_transition(&mut self, transition: Transition) -> Result<TransitionId, AutomatonError> {
        self.check_condition(transition.condition())?;
        self.machine_mut().insert_transition(transition)
    }

    fn delete_transition(&mut self, id: TransitionId) -> Result<Transition, AutomatonError> {
        self.machine_mut().delete_transition(id)
    }

    fn set_start_state(&mut self, id: StateId) -> Result<(), AutomatonError> {
        self.machine_mut().set_start_state(id)
    }

    fn set_accepting(&mut self, id: StateId, accepting: bool) -> Result<(), AutomatonError> {
        self.machine_mut().set_accepting(id, accepting)
    }

    /// Load a new input and rewind to its beginning.
    fn set_input(&mut self, input: Vec<String>);

    /// The input loaded by the last `set_input` call.
    fn input(&self) -> &[String];

    /// Rewind the current input without replacing it.
    fn reset(&mut self);

    /// Take exactly one transition.
    ///
    /// The first call of a run enters the start state, failing with
    /// [`TransitionError::MissingStartState`] if there is none.
    fn simulate_one_step(&mut self) -> Result<StepOutcome, TransitionError>;

    /// Rewind and run the loaded input to completion.
    ///
    /// Honors [`EngineConfig::max_steps`]; there is no other way to interrupt a
    /// full run.
    fn simulate(&mut self) -> Result<Verdict, TransitionError> {
        self.reset();
        let limit = self.config().max_steps;
        let mut taken = 0usize;

        loop {
            match self.simulate_one_step() {
                Ok(StepOutcome::Running(_)) => {
                    taken += 1;
                    if let Some(limit) = limit {
                        if taken >= limit {
                            warn!(variant = self.variant(), limit, "step limit reached");
                            return Err(TransitionError::StepLimitExceeded { limit });
                        }
                    }
                }
                Ok(StepOutcome::Finished { verdict, step }) => {
                    if step.is_some() {
                        taken += 1;
                    }
                    info!(variant = self.variant(), steps = taken, ?verdict, "run finished");
                    return Ok(verdict);
                }
                Err(err) => {
                    warn!(variant = self.variant(), steps = taken, error = %err, "run failed");
                    return Err(err);
                }
            }
        }
    }

    /// Cursor position (DFA, Mealy) or head position (Turing machine).
    fn current_index(&self) -> i64;

    /// Output of the most recent step; see [`ReturnValue`].
    fn current_return_value(&self) -> ReturnValue;
}
