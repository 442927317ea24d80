//! States of an automaton.
//!
//! A state is a named node. It owns no transitions; transitions refer to it
//! through its [`StateId`]. The activation flag is runtime-only feedback for
//! renderers and is never persisted.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle to a state registered in a [`Machine`](super::Machine).
///
/// Ids are handed out by the owning machine and never reused, so a stale id
/// simply stops resolving after its state is deleted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StateId(pub(crate) u32);

impl StateId {
    /// Raw numeric value of the id.
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}

/// How a state is registered.
///
/// The start state is chosen separately with
/// [`Machine::set_start_state`](super::Machine::set_start_state).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StateKind {
    #[default]
    Default,
    Accepting,
}

/// Editor coordinates of a state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A named automaton state.
///
/// # Example
///
/// ```rust
/// use automata_engine::core::{Position, State};
///
/// let state = State::new("q0").with_position(Position::new(40.0, 80.0));
/// assert_eq!(state.name(), "q0");
/// assert_eq!(state.position().x, 40.0);
/// assert!(!state.is_active());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct State {
    name: String,
    position: Position,
    #[serde(skip)]
    active: bool,
}

impl State {
    /// Create an inactive state at the origin.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: Position::default(),
            active: false,
        }
    }

    /// Place the state at the given editor position.
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    /// Whether the last simulation step entered this state.
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}
