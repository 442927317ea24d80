//! Builder API for creating validation rules.

use crate::engine::Automaton;
use crate::validation::rules::{Checked, ValidationCheck, ValidationRules};
use crate::validation::violations::Violation;
use stillwater::validation::Validation;

/// Builder for creating validation rules
pub struct RulesBuilder {
    require_accepting: bool,
    required_checks: Vec<ValidationCheck>,
}

impl RulesBuilder {
    pub fn new() -> Self {
        Self {
            require_accepting: false,
            required_checks: Vec::new(),
        }
    }

    /// Require at least one accepting state
    pub fn require_accepting_state(mut self) -> Self {
        self.require_accepting = true;
        self
    }

    /// Add a custom validation check
    pub fn require<F>(mut self, check: F) -> Self
    where
        F: Fn(&dyn Automaton) -> Checked + Send + Sync + 'static,
    {
        self.required_checks.push(Box::new(check));
        self
    }

    /// Add a simple predicate check with error message
    pub fn require_pred<F>(mut self, predicate: F, message: impl Into<String>) -> Self
    where
        F: Fn(&dyn Automaton) -> bool + Send + Sync + 'static,
    {
        let message = message.into();
        let check = move |automaton: &dyn Automaton| {
            if predicate(automaton) {
                Validation::success(())
            } else {
                Validation::fail(Violation::CustomCheckFailed {
                    message: message.clone(),
                })
            }
        };
        self.required_checks.push(Box::new(check));
        self
    }

    pub fn build(self) -> ValidationRules {
        ValidationRules {
            require_accepting: self.require_accepting,
            required_checks: self.required_checks,
        }
    }
}

impl Default for RulesBuilder {
    fn default() -> Self {
        Self::new()
    }
}
