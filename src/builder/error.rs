//! Build errors for the automaton builder.

use crate::core::AutomatonError;
use crate::engine::RegistryError;
use crate::validation::Violation;
use thiserror::Error;

/// Errors that can occur when building an automaton.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Start state not specified. Call .start(name) before .build()")]
    MissingStartState,

    #[error("Unknown state '{0}'. Declare it with .state(name) or .accepting(name)")]
    UnknownState(String),

    #[error(transparent)]
    Automaton(#[from] AutomatonError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("automaton is not well formed: {}", describe(.0))]
    Invalid(Vec<Violation>),
}

fn describe(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(Violation::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
