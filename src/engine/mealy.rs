//! Mealy machine engine.

use crate::core::{Machine, ReturnValue, StepOutcome, TransitionError, Verdict};
use crate::engine::automaton::Automaton;
use crate::engine::config::EngineConfig;
use crate::engine::cursor::InputCursor;

/// Finite transducer emitting one output symbol per transition.
///
/// Conditions are `(expected, output)`. An expected token equal to
/// [`EngineConfig::wildcard`] matches any input symbol, but an exact match on
/// the same state takes precedence. The run ends when the input is exhausted
/// and reports the accumulated output instead of an accept/reject verdict.
#[derive(Clone, Debug, Default)]
pub struct Mealy {
    machine: Machine,
    config: EngineConfig,
    cursor: InputCursor,
    outputs: Vec<String>,
}

impl Mealy {
    pub const NAME: &'static str = "mealy";

    pub fn new(config: EngineConfig) -> Self {
        Self {
            machine: Machine::new(),
            config,
            cursor: InputCursor::default(),
            outputs: Vec::new(),
        }
    }

    /// Output produced so far in the current run.
    pub fn outputs(&self) -> &[String] {
        &self.outputs
    }
}

impl Automaton for Mealy {
    fn variant(&self) -> &str {
        Self::NAME
    }

    fn condition_arity(&self) -> usize {
        2
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
        self.outputs.clear();
        self.machine.rewind();
    }

    fn input(&self) -> &[String] {
        self.cursor.symbols()
    }

    fn reset(&mut self) {
        self.cursor.rewind();
        self.outputs.clear();
        self.machine.rewind();
    }

    fn simulate_one_step(&mut self) -> Result<StepOutcome, TransitionError> {
        let current = self.machine.begin_run()?;
        let Some(symbol) = self.cursor.current().map(str::to_owned) else {
            return Ok(StepOutcome::Finished {
                verdict: Verdict::Output(self.outputs.clone()),
                step: None,
            });
        };

        let chosen =
            self.machine
                .select(current, &symbol, Some(self.config.wildcard.as_str()))?;
        let index = self.cursor.next_position() as i64;
        let step = self
            .machine
            .enter(&chosen, &symbol, index, self.config.history_capacity())?;

        self.cursor.advance();
        if let Some(output) = chosen.condition.token(1) {
            self.outputs.push(output.to_string());
        }

        if self.cursor.is_exhausted() {
            Ok(StepOutcome::Finished {
                verdict: Verdict::Output(self.outputs.clone()),
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
        ReturnValue::Output(self.outputs.last().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{symbols, State, StateId, StateKind, Transition};

    /// Emits "1" whenever the current symbol differs from the previous one.
    fn edge_detector() -> (Mealy, StateId, StateId) {
        let mut mealy = Mealy::default();
        let zero = mealy
            .add_state(State::new("seen0"), StateKind::Default)
            .unwrap();
        let one = mealy
            .add_state(State::new("seen1"), StateKind::Default)
            .unwrap();
        for (from, to, input, output) in [
            (zero, zero, "0", "0"),
            (zero, one, "1", "1"),
            (one, one, "1", "0"),
            (one, zero, "0", "1"),
        ] {
            mealy
                .add_transition(Transition::new(from, to, [input, output]))
                .unwrap();
        }
        mealy.set_start_state(zero).unwrap();
        (mealy, zero, one)
    }

    #[test]
    fn accumulates_one_output_per_symbol() {
        let (mut mealy, _, _) = edge_detector();
        mealy.set_input(symbols("0110"));

        let verdict = mealy.simulate().unwrap();
        assert_eq!(
            verdict,
            Verdict::Output(symbols("0101"))
        );
        assert_eq!(mealy.outputs(), symbols("0101").as_slice());
    }

    #[test]
    fn return_value_is_the_last_output() {
        let (mut mealy, _, one) = edge_detector();
        mealy.set_input(symbols("01"));

        assert_eq!(mealy.current_return_value(), ReturnValue::Output(None));

        mealy.simulate_one_step().unwrap();
        assert_eq!(
            mealy.current_return_value(),
            ReturnValue::Output(Some("0".to_string()))
        );

        let outcome = mealy.simulate_one_step().unwrap();
        assert_eq!(outcome.step().map(|s| s.to), Some(one));
        assert_eq!(
            mealy.current_return_value(),
            ReturnValue::Output(Some("1".to_string()))
        );
    }

    #[test]
    fn wildcard_matches_any_symbol() {
        let mut mealy = Mealy::default();
        let s = mealy.add_state(State::new("s"), StateKind::Default).unwrap();
        mealy
            .add_transition(Transition::new(s, s, ["*", "x"]))
            .unwrap();
        mealy
            .add_transition(Transition::new(s, s, ["a", "A"]))
            .unwrap();
        mealy.set_start_state(s).unwrap();

        mealy.set_input(symbols("abc"));
        assert_eq!(mealy.simulate(), Ok(Verdict::Output(symbols("Axx"))));
    }

    #[test]
    fn empty_input_produces_empty_output() {
        let (mut mealy, _, _) = edge_detector();
        mealy.set_input(Vec::new());
        assert_eq!(mealy.simulate(), Ok(Verdict::Output(Vec::new())));
    }

    #[test]
    fn simulate_restarts_from_the_beginning() {
        let (mut mealy, _, _) = edge_detector();
        mealy.set_input(symbols("01"));
        mealy.simulate_one_step().unwrap();

        assert_eq!(mealy.simulate(), Ok(Verdict::Output(symbols("01"))));
    }

    #[test]
    fn unmatched_symbol_fails() {
        let (mut mealy, _, _) = edge_detector();
        mealy.set_input(symbols("2"));
        assert!(matches!(
            mealy.simulate(),
            Err(TransitionError::NoValidTransition { .. })
        ));
    }
}
