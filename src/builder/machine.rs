//! Builder for constructing automata by state name.

use crate::builder::error::BuildError;
use crate::core::{Condition, Position, State, StateId, StateKind, Transition};
use crate::engine::{Automaton, Dfa, EngineConfig, Mealy, Registry, TuringMachine};
use crate::validation::ValidationRules;
use stillwater::validation::Validation;

struct PendingState {
    name: String,
    kind: StateKind,
    position: Option<Position>,
}

struct PendingTransition {
    from: String,
    to: String,
    condition: Condition,
}

/// Builder for constructing automata with a fluent API.
///
/// States are referred to by name; ids are assigned when the automaton is
/// built. `build` fails on the first editing error and otherwise runs the
/// configured [`ValidationRules`], reporting every violation at once.
pub struct AutomatonBuilder {
    variant: String,
    config: EngineConfig,
    states: Vec<PendingState>,
    start: Option<String>,
    transitions: Vec<PendingTransition>,
    rules: ValidationRules,
}

impl AutomatonBuilder {
    /// Create a builder for the variant registered under `variant`.
    pub fn new(variant: impl Into<String>) -> Self {
        Self {
            variant: variant.into(),
            config: EngineConfig::default(),
            states: Vec::new(),
            start: None,
            transitions: Vec::new(),
            rules: ValidationRules::structural(),
        }
    }

    pub fn dfa() -> Self {
        Self::new(Dfa::NAME)
    }

    pub fn mealy() -> Self {
        Self::new(Mealy::NAME)
    }

    pub fn turing() -> Self {
        Self::new(TuringMachine::NAME)
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Add a non-accepting state.
    pub fn state(self, name: impl Into<String>) -> Self {
        self.push_state(name.into(), StateKind::Default)
    }

    /// Add an accepting state.
    pub fn accepting(self, name: impl Into<String>) -> Self {
        self.push_state(name.into(), StateKind::Accepting)
    }

    /// Place the most recently added state at `(x, y)`.
    pub fn at(mut self, x: f64, y: f64) -> Self {
        if let Some(state) = self.states.last_mut() {
            state.position = Some(Position::new(x, y));
        }
        self
    }

    /// Set the start state (required).
    pub fn start(mut self, name: impl Into<String>) -> Self {
        self.start = Some(name.into());
        self
    }

    pub fn transition(
        mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        condition: impl Into<Condition>,
    ) -> Self {
        self.transitions.push(PendingTransition {
            from: from.into(),
            to: to.into(),
            condition: condition.into(),
        });
        self
    }

    /// Replace the validation rules applied by `build`.
    pub fn rules(mut self, rules: ValidationRules) -> Self {
        self.rules = rules;
        self
    }

    /// Build against the built-in variants.
    pub fn build(self) -> Result<Box<dyn Automaton>, BuildError> {
        self.build_with(&Registry::with_builtins())
    }

    /// Build using a caller-supplied registry, e.g. one holding custom variants.
    pub fn build_with(self, registry: &Registry) -> Result<Box<dyn Automaton>, BuildError> {
        let mut automaton = registry.create(&self.variant, self.config)?;

        for pending in self.states {
            let mut state = State::new(pending.name);
            if let Some(position) = pending.position {
                state = state.with_position(position);
            }
            automaton.add_state(state, pending.kind)?;
        }

        for pending in self.transitions {
            let from = resolve(automaton.as_ref(), &pending.from)?;
            let to = resolve(automaton.as_ref(), &pending.to)?;
            automaton.add_transition(Transition::new(from, to, pending.condition))?;
        }

        let start = self.start.ok_or(BuildError::MissingStartState)?;
        let start = resolve(automaton.as_ref(), &start)?;
        automaton.set_start_state(start)?;

        match self.rules.validate(automaton.as_ref()) {
            Validation::Success(_) => Ok(automaton),
            Validation::Failure(violations) => {
                Err(BuildError::Invalid(violations.iter().cloned().collect()))
            }
        }
    }

    fn push_state(mut self, name: String, kind: StateKind) -> Self {
        self.states.push(PendingState {
            name,
            kind,
            position: None,
        });
        self
    }
}

fn resolve(automaton: &dyn Automaton, name: &str) -> Result<StateId, BuildError> {
    automaton
        .machine()
        .find_state(name)
        .ok_or_else(|| BuildError::UnknownState(name.to_string()))
}
