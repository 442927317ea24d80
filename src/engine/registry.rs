//! Name-keyed factory of automaton variants.

use crate::engine::automaton::Automaton;
use crate::engine::config::EngineConfig;
use crate::engine::{Dfa, Mealy, TuringMachine};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use tracing::debug;

type Factory = Box<dyn Fn(EngineConfig) -> Box<dyn Automaton> + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("variant '{0}' is already registered")]
    Duplicate(String),

    #[error("factory registered as '{registered}' builds variant '{built}'")]
    NameMismatch { registered: String, built: String },

    #[error("factory for '{0}' must build an automaton with no states or transitions")]
    NotEmpty(String),

    #[error("unknown variant '{0}'")]
    Unknown(String),
}

/// Maps variant names to factories producing empty automata.
///
/// Registration probes the factory once and rejects it unless it builds an
/// empty automaton reporting the registered name, so every later `create`
/// call can be trusted.
///
/// # Example
///
/// ```rust
/// use automata_engine::engine::{EngineConfig, Registry};
///
/// let registry = Registry::default();
/// assert_eq!(registry.variants().collect::<Vec<_>>(), ["dfa", "mealy", "turing"]);
///
/// let tm = registry.create("turing", EngineConfig::default()).unwrap();
/// assert_eq!(tm.condition_arity(), 3);
/// assert!(registry.create("pda", EngineConfig::default()).is_err());
/// ```
pub struct Registry {
    factories: BTreeMap<String, Factory>,
}

impl Registry {
    /// A registry with no variants.
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// A registry holding the DFA, Mealy and Turing machine variants.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.insert_builtin(Dfa::NAME, Dfa::new);
        registry.insert_builtin(Mealy::NAME, Mealy::new);
        registry.insert_builtin(TuringMachine::NAME, TuringMachine::new);
        registry
    }

    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> Result<(), RegistryError>
    where
        F: Fn(EngineConfig) -> Box<dyn Automaton> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.factories.contains_key(&name) {
            return Err(RegistryError::Duplicate(name));
        }

        let probe = factory(EngineConfig::default());
        if probe.variant() != name {
            return Err(RegistryError::NameMismatch {
                registered: name,
                built: probe.variant().to_string(),
            });
        }
        if probe.machine().state_count() != 0 || probe.machine().transition_count() != 0 {
            return Err(RegistryError::NotEmpty(name));
        }

        debug!(variant = %name, "registered automaton variant");
        self.factories.insert(name, Box::new(factory));
        Ok(())
    }

    fn insert_builtin<A>(&mut self, name: &str, build: fn(EngineConfig) -> A)
    where
        A: Automaton + 'static,
    {
        let factory: Factory =
            Box::new(move |config| -> Box<dyn Automaton> { Box::new(build(config)) });
        self.factories.insert(name.to_string(), factory);
    }

    /// Build a fresh, empty automaton of the named variant.
    pub fn create(
        &self,
        name: &str,
        config: EngineConfig,
    ) -> Result<Box<dyn Automaton>, RegistryError> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| RegistryError::Unknown(name.to_string()))?;
        Ok(factory(config))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn variants(&self) -> impl Iterator<Item = &str> + '_ {
        self.factories.keys().map(String::as_str)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("variants", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{State, StateKind};

    #[test]
    fn builtins_create_empty_automata_with_the_given_config() {
        let registry = Registry::with_builtins();
        let mealy = registry
            .create("mealy", EngineConfig::default().with_wildcard("?"))
            .unwrap();

        assert_eq!(mealy.variant(), "mealy");
        assert_eq!(mealy.config().wildcard, "?");
        assert_eq!(mealy.machine().state_count(), 0);
    }

    #[test]
    fn unknown_variant_is_an_error() {
        let registry = Registry::new();
        assert_eq!(
            registry.create("dfa", EngineConfig::default()).unwrap_err(),
            RegistryError::Unknown("dfa".to_string())
        );
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut registry = Registry::with_builtins();
        let result = registry.register("dfa", |config| Box::new(Dfa::new(config)));
        assert_eq!(result, Err(RegistryError::Duplicate("dfa".to_string())));
    }

    #[test]
    fn factory_must_report_its_registered_name() {
        let mut registry = Registry::new();
        let result = registry.register("acceptor", |config| Box::new(Dfa::new(config)));
        assert_eq!(
            result,
            Err(RegistryError::NameMismatch {
                registered: "acceptor".to_string(),
                built: "dfa".to_string(),
            })
        );
        assert!(!registry.contains("acceptor"));
    }

    #[test]
    fn factory_must_build_an_empty_automaton() {
        let mut registry = Registry::new();
        let result = registry.register("dfa", |config| {
            let mut dfa = Dfa::new(config);
            let _ = dfa.add_state(State::new("q0"), StateKind::Default);
            Box::new(dfa)
        });
        assert_eq!(result, Err(RegistryError::NotEmpty("dfa".to_string())));
    }

    #[test]
    fn registered_factories_are_listed() {
        let mut registry = Registry::new();
        registry
            .register("turing", |config| Box::new(TuringMachine::new(config)))
            .unwrap();
        assert_eq!(registry.variants().collect::<Vec<_>>(), ["turing"]);
    }
}
