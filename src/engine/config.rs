//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Settings shared by every variant engine.
///
/// Settings a variant does not use are ignored (a DFA has no blank symbol).
/// The whole struct is persisted with the automaton so a reloaded machine
/// behaves identically.
///
/// # Example
///
/// ```rust
/// use automata_engine::engine::EngineConfig;
///
/// let config = EngineConfig::default()
///     .with_blank("B")
///     .with_max_steps(10_000)
///     .linear_bounded(true);
///
/// assert_eq!(config.blank, "B");
/// assert_eq!(config.wildcard, "*");
/// assert_eq!(config.max_steps, Some(10_000));
///
/// let loaded = EngineConfig::from_json(r##"{ "blank": "#" }"##).unwrap();
/// assert_eq!(loaded.blank, "#");
/// assert!(loaded.record_history);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Expected-symbol token that matches any input or tape symbol
    pub wildcard: String,

    /// Symbol read from, and written into, unvisited tape cells
    pub blank: String,

    /// Refuse to grow the tape past the cells populated by the input
    pub linear_bounded: bool,

    /// Maximum transitions a full `simulate` run may take; `None` is unbounded
    pub max_steps: Option<usize>,

    /// Keep a timestamped record of every step in the machine's history.
    ///
    /// With `max_steps` set, recording stops once that many steps are held;
    /// otherwise a run that never terminates grows the history without bound.
    pub record_history: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            wildcard: "*".to_string(),
            blank: "_".to_string(),
            linear_bounded: false,
            max_steps: None,
            record_history: true,
        }
    }
}

impl EngineConfig {
    /// Parse a JSON object; absent fields take their default values.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_wildcard(mut self, wildcard: impl Into<String>) -> Self {
        self.wildcard = wildcard.into();
        self
    }

    pub fn with_blank(mut self, blank: impl Into<String>) -> Self {
        self.blank = blank.into();
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    pub fn linear_bounded(mut self, linear_bounded: bool) -> Self {
        self.linear_bounded = linear_bounded;
        self
    }

    pub fn record_history(mut self, record_history: bool) -> Self {
        self.record_history = record_history;
        self
    }

    /// How many steps the run history may hold; `None` is unbounded.
    pub fn history_capacity(&self) -> Option<usize> {
        if self.record_history {
            self.max_steps
        } else {
            Some(0)
        }
    }
}
