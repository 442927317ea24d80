//! Turing machine engine over a sparse, optionally bounded tape.

use crate::core::{
    AutomatonError, Condition, Machine, ReturnValue, StepOutcome, TapeSnapshot, TransitionError,
};
use crate::engine::automaton::Automaton;
use crate::engine::config::EngineConfig;
use std::collections::BTreeMap;

/// Head movement encoded in the third condition token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Move {
    Left,
    Right,
    Halt,
}

impl Move {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "L" => Some(Self::Left),
            "R" => Some(Self::Right),
            "H" => Some(Self::Halt),
            _ => None,
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            Self::Left => "L",
            Self::Right => "R",
            Self::Halt => "H",
        }
    }

    fn offset(self) -> i64 {
        match self {
            Self::Left => -1,
            Self::Right => 1,
            Self::Halt => 0,
        }
    }
}

/// Sparse tape keyed by cell position.
///
/// A cell that was never populated reads as the blank symbol. Moving the head
/// onto a cell materializes it as blank, so the populated range is always
/// contiguous and doubles as the bound of a linear-bounded machine.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tape {
    cells: BTreeMap<i64, String>,
}

impl Tape {
    /// Replace the contents with `symbols` starting at cell 0.
    ///
    /// An empty input still allocates one blank cell under the head.
    pub fn load(&mut self, symbols: &[String], blank: &str) {
        self.cells = (0..)
            .zip(symbols.iter().cloned())
            .collect::<BTreeMap<i64, String>>();
        if self.cells.is_empty() {
            self.cells.insert(0, blank.to_string());
        }
    }

    pub fn read<'a>(&'a self, position: i64, blank: &'a str) -> &'a str {
        self.cells
            .get(&position)
            .map(String::as_str)
            .unwrap_or(blank)
    }

    pub fn write(&mut self, position: i64, symbol: &str) {
        self.cells.insert(position, symbol.to_string());
    }

    /// Populate `position` with blank unless it already holds a symbol.
    pub fn visit(&mut self, position: i64, blank: &str) {
        self.cells
            .entry(position)
            .or_insert_with(|| blank.to_string());
    }

    pub fn contains(&self, position: i64) -> bool {
        self.cells.contains_key(&position)
    }

    /// Leftmost and rightmost populated cells.
    pub fn bounds(&self) -> (i64, i64) {
        let min = self.cells.keys().next().copied().unwrap_or(0);
        let max = self.cells.keys().next_back().copied().unwrap_or(0);
        (min, max)
    }

    pub fn snapshot(&self, head: i64) -> TapeSnapshot {
        TapeSnapshot {
            cells: self.cells.clone(),
            head,
        }
    }
}

/// Turing machine with read/write/move semantics.
///
/// Conditions are `(expected, write, move)` where move is `L`, `R` or `H`.
/// The expected token may be the wildcard; a wildcard write leaves the cell
/// unchanged. A transition always writes before moving; `H` ends the run
/// without moving, and the run succeeds iff the halting state is accepting.
///
/// # Example
///
/// ```rust
/// use automata_engine::builder::AutomatonBuilder;
/// use automata_engine::core::{symbols, ReturnValue};
///
/// // Overwrite every symbol with "x" until the first blank.
/// let mut tm = AutomatonBuilder::turing()
///     .state("scan")
///     .accepting("done")
///     .start("scan")
///     .transition("scan", "scan", ["*", "x", "R"])
///     .transition("scan", "done", ["_", "_", "H"])
///     .build()
///     .unwrap();
///
/// tm.set_input(symbols("abc"));
/// assert!(tm.simulate().unwrap().is_accepted());
///
/// let ReturnValue::Tape(tape) = tm.current_return_value() else { unreachable!() };
/// assert_eq!(tape.contents(), "xxx_");
/// assert_eq!(tape.head, 3);
/// ```
#[derive(Clone, Debug, Default)]
pub struct TuringMachine {
    machine: Machine,
    config: EngineConfig,
    input: Vec<String>,
    tape: Tape,
    head: i64,
    halted: bool,
}

impl TuringMachine {
    pub const NAME: &'static str = "turing";

    pub fn new(config: EngineConfig) -> Self {
        let mut tape = Tape::default();
        tape.load(&[], &config.blank);
        Self {
            machine: Machine::new(),
            config,
            input: Vec::new(),
            tape,
            head: 0,
            halted: false,
        }
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn head(&self) -> i64 {
        self.head
    }

    pub fn is_linear_bounded(&self) -> bool {
        self.config.linear_bounded
    }

    pub fn set_linear_bounded(&mut self, linear_bounded: bool) {
        self.config.linear_bounded = linear_bounded;
    }
}

impl Automaton for TuringMachine {
    fn variant(&self) -> &str {
        Self::NAME
    }

    fn condition_arity(&self) -> usize {
        3
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

    fn check_condition(&self, condition: &Condition) -> Result<(), AutomatonError> {
        if condition.len() != self.condition_arity() {
            return Err(AutomatonError::ConditionArity {
                variant: Self::NAME.to_string(),
                expected: self.condition_arity(),
                found: condition.len(),
            });
        }
        let movement = condition.token(2).unwrap_or_default();
        match Move::from_token(movement) {
            Some(_) => Ok(()),
            None => Err(AutomatonError::InvalidMove(movement.to_string())),
        }
    }

    fn set_input(&mut self, input: Vec<String>) {
        self.input = input;
        self.reset();
    }

    fn input(&self) -> &[String] {
        &self.input
    }

    fn reset(&mut self) {
        self.tape.load(&self.input, &self.config.blank);
        self.head = 0;
        self.halted = false;
        self.machine.rewind();
    }

    fn simulate_one_step(&mut self) -> Result<StepOutcome, TransitionError> {
        let current = self.machine.begin_run()?;
        if self.halted {
            return Ok(StepOutcome::Finished {
                verdict: self.machine.verdict(current),
                step: None,
            });
        }

        let read = self.tape.read(self.head, &self.config.blank).to_string();
        let chosen =
            self.machine
                .select(current, &read, Some(self.config.wildcard.as_str()))?;
        let movement = chosen
            .condition
            .token(2)
            .and_then(Move::from_token)
            .ok_or_else(|| TransitionError::NoValidTransition {
                state: current.to_string(),
                symbol: read.clone(),
            })?;

        let target = self.head + movement.offset();
        if self.config.linear_bounded && !self.tape.contains(target) {
            let (min, max) = self.tape.bounds();
            return Err(TransitionError::TapeBoundExceeded {
                position: target,
                min,
                max,
            });
        }

        let step = self
            .machine
            .enter(&chosen, &read, target, self.config.history_capacity())?;

        if let Some(write) = chosen.condition.token(1) {
            if write != self.config.wildcard {
                self.tape.write(self.head, write);
            }
        }
        match movement {
            Move::Halt => self.halted = true,
            Move::Left | Move::Right => {
                self.head = target;
                self.tape.visit(target, &self.config.blank);
            }
        }

        if self.halted {
            Ok(StepOutcome::Finished {
                verdict: self.machine.verdict(step.to),
                step: Some(step),
            })
        } else {
            Ok(StepOutcome::Running(step))
        }
    }

    fn current_index(&self) -> i64 {
        self.head
    }

    fn current_return_value(&self) -> ReturnValue {
        ReturnValue::Tape(self.tape.snapshot(self.head))
    }
}
