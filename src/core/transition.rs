//! Transitions between states.

use super::state::StateId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle to a transition registered in a [`Machine`](super::Machine).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TransitionId(pub(crate) u32);

impl TransitionId {
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TransitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// Ordered tuple of tokens guarding a transition.
///
/// What each position means depends on the variant:
///
/// | variant | tokens                          |
/// |---------|---------------------------------|
/// | DFA     | `(symbol)`                      |
/// | Mealy   | `(expected, output)`            |
/// | Turing  | `(expected, write, move)`       |
///
/// # Example
///
/// ```rust
/// use automata_engine::core::Condition;
///
/// let condition = Condition::from(["1", "0", "R"]);
/// assert_eq!(condition.len(), 3);
/// assert_eq!(condition.token(2), Some("R"));
/// assert_eq!(condition.to_string(), "1, 0, R");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Condition(Vec<String>);

impl Condition {
    pub fn new<I, T>(tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self(tokens.into_iter().map(Into::into).collect())
    }

    pub fn tokens(&self) -> &[String] {
        &self.0
    }

    pub fn token(&self, position: usize) -> Option<&str> {
        self.0.get(position).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T: Into<String>, const N: usize> From<[T; N]> for Condition {
    fn from(tokens: [T; N]) -> Self {
        Self::new(tokens)
    }
}

impl From<Vec<String>> for Condition {
    fn from(tokens: Vec<String>) -> Self {
        Self(tokens)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(", "))
    }
}

/// Directed edge between two registered states.
///
/// The source and target are non-owning handles; the owning machine rejects a
/// transition whose endpoints it does not know, and deleting a state removes
/// every transition touching it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    from: StateId,
    to: StateId,
    condition: Condition,
    #[serde(skip)]
    active: bool,
}

impl Transition {
    pub fn new(from: StateId, to: StateId, condition: impl Into<Condition>) -> Self {
        Self {
            from,
            to,
            condition: condition.into(),
            active: false,
        }
    }

    pub fn from(&self) -> StateId {
        self.from
    }

    pub fn to(&self) -> StateId {
        self.to
    }

    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    /// Whether this transition was taken by the last simulation step.
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub(crate) fn touches(&self, state: StateId) -> bool {
        self.from == state || self.to == state
    }
}
