//! Validation rules over a whole automaton.

use crate::engine::Automaton;
use crate::validation::violations::Violation;
use std::collections::BTreeMap;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Result of validating an automaton: unit, or every violation found
pub type Checked = Validation<(), NonEmptyVec<Violation>>;

/// Type alias for caller-supplied checks
pub type ValidationCheck = Box<dyn Fn(&dyn Automaton) -> Checked + Send + Sync>;

/// Well-formedness rules for an automaton.
///
/// The structural checks (start state, transition endpoints, condition shape
/// and determinism) always run. Accepting-state and custom checks are opt-in.
/// Every check runs even after one fails, so a single call reports all
/// violations at once.
pub struct ValidationRules {
    pub(crate) require_accepting: bool,
    pub(crate) required_checks: Vec<ValidationCheck>,
}

impl ValidationRules {
    /// Rules with only the structural checks.
    pub fn structural() -> Self {
        Self {
            require_accepting: false,
            required_checks: Vec::new(),
        }
    }

    pub fn validate(&self, automaton: &dyn Automaton) -> Checked {
        let mut checks: Vec<Checked> = Vec::new();

        checks.push(check_start(automaton));
        checks.extend(check_endpoints(automaton));
        checks.extend(check_conditions(automaton));
        checks.extend(check_determinism(automaton));

        if self.require_accepting {
            let check = if automaton.machine().accepting_states().next().is_some() {
                Validation::success(())
            } else {
                Validation::fail(Violation::NoAcceptingState)
            };
            checks.push(check);
        }

        for check_fn in &self.required_checks {
            checks.push(check_fn(automaton));
        }

        Validation::all_vec(checks).map(|_| ())
    }
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self::structural()
    }
}

fn check_start(automaton: &dyn Automaton) -> Checked {
    let machine = automaton.machine();
    match machine.start_state() {
        Some(start) if machine.state(start).is_some() => Validation::success(()),
        _ => Validation::fail(Violation::MissingStartState),
    }
}

fn check_endpoints(automaton: &dyn Automaton) -> Vec<Checked> {
    let machine = automaton.machine();
    machine
        .transitions()
        .flat_map(|(id, t)| [(id, t.from()), (id, t.to())])
        .filter(|(_, state)| machine.state(*state).is_none())
        .map(|(transition, state)| {
            Validation::fail(Violation::DanglingEndpoint { transition, state })
        })
        .collect()
}

fn check_conditions(automaton: &dyn Automaton) -> Vec<Checked> {
    automaton
        .machine()
        .transitions()
        .filter_map(|(id, t)| {
            automaton
                .check_condition(t.condition())
                .err()
                .map(|err| (id, err))
        })
        .map(|(transition, err)| {
            Validation::fail(Violation::InvalidCondition {
                transition,
                reason: err.to_string(),
            })
        })
        .collect()
}

/// Flag every pair of transitions leaving one state on the same first token.
///
/// A wildcard next to exact matches is fine since the exact match wins, but
/// two wildcards on one state collide like any other duplicate.
fn check_determinism(automaton: &dyn Automaton) -> Vec<Checked> {
    let machine = automaton.machine();
    let mut seen = BTreeMap::new();
    let mut checks = Vec::new();

    for (id, t) in machine.transitions() {
        let Some(symbol) = t.condition().token(0) else {
            continue;
        };
        match seen.get(&(t.from(), symbol)) {
            Some(&first) => {
                let state = machine
                    .state(t.from())
                    .map(|s| s.name().to_string())
                    .unwrap_or_else(|| t.from().to_string());
                checks.push(Validation::fail(Violation::Nondeterministic {
                    state,
                    symbol: symbol.to_string(),
                    first,
                    second: id,
                }));
            }
            None => {
                seen.insert((t.from(), symbol), id);
            }
        }
    }
    checks
}
