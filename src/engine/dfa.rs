//! Deterministic finite automaton engine.

use crate::core::{Machine, ReturnValue, StepOutcome, TransitionError};
use crate::engine::automaton::Automaton;
use crate::engine::config::EngineConfig;
use crate::engine::cursor::InputCursor;

/// Accepts or rejects a finite input.
///
/// Each step follows the one transition whose single condition token equals
/// the current input symbol. The run ends when the input is exhausted and
/// succeeds iff the final state is accepting.
///
/// # Example
///
/// ```rust
/// use automata_engine::core::{symbols, State, StateKind, StepOutcome, Transition};
/// use automata_engine::engine::{Automaton, Dfa};
///
/// let mut dfa = Dfa::default();
/// let q0 = dfa.add_state(State::new("q0"), StateKind::Default).unwrap();
/// let q1 = dfa.add_state(State::new("q1"), StateKind::Accepting).unwrap();
/// dfa.add_transition(Transition::new(q0, q1, ["a"])).unwrap();
/// dfa.set_start_state(q0).unwrap();
///
/// dfa.set_input(symbols("a"));
/// let outcome = dfa.simulate_one_step().unwrap();
/// assert!(outcome.verdict().unwrap().is_accepted());
/// assert!(dfa.machine().state(q1).unwrap().is_active());
/// ```
#[derive(Clone, Debug, Default)]
pub struct Dfa {
    machine: Machine,
    config: EngineConfig,
    cursor: InputCursor,
}

impl Dfa {
    pub const NAME: &'static str = "dfa";

    pub fn new(config: EngineConfig) -> Self {
        Self {
            machine: Machine::new(),
            config,
            cursor: InputCursor::default(),
        }
    }
}

impl Automaton for Dfa {
    fn variant(&self) -> &str {
        Self::NAME
    }

    fn condition_arity(&self) -> usize {
        1
    }

    fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn machine(&self) -> &Machine {
        &self.machine
    }

    fn machine_mut(&mut self) -> &mut Machine {
        &mut self.machine
    }

    fn set_input(&mut self, input: Vec<String>) {
        self.cursor.load(input);
        self.machine.rewind();
    }

    fn input(&self) -> &[String] {
        self.cursor.symbols()
    }

    fn reset(&mut self) {
        self.cursor.rewind();
        self.machine.rewind();
    }

    fn simulate_one_step(&mut self) -> Result<StepOutcome, TransitionError> {
        let current = self.machine.begin_run()?;
        let Some(symbol) = self.cursor.current().map(str::to_owned) else {
            return Ok(StepOutcome::Finished {
                verdict: self.machine.verdict(current),
                step: None,
            });
        };

        let chosen = self.machine.select(current, &symbol, None)?;
        let index = self.cursor.next_position() as i64;
        let step = self
            .machine
            .enter(&chosen, &symbol, index, self.config.history_capacity())?;
        self.cursor.advance();

        if self.cursor.is_exhausted() {
            Ok(StepOutcome::Finished {
                verdict: self.machine.verdict(step.to),
                step: Some(step),
            })
        } else {
            Ok(StepOutcome::Running(step))
        }
    }

    fn current_index(&self) -> i64 {
        self.cursor.position() as i64
    }

    fn current_return_value(&self) -> ReturnValue {
        ReturnValue::None
    }
}
