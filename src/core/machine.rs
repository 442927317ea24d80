//! State and transition bookkeeping shared by every variant engine.
//!
//! The [`Machine`] exclusively owns the canonical state and transition
//! collections. It also implements the step protocol common to all variants:
//! clear every activation flag, pick a transition, then flag the entered
//! state and the transition taken.

use super::error::AutomatonError;
use super::history::{RunHistory, StepRecord};
use super::outcome::{Step, TransitionError, Verdict};
use super::state::{State, StateId, StateKind};
use super::transition::{Condition, Transition, TransitionId};
use chrono::Utc;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Transition picked by [`Machine::select`], copied out so the caller can
/// commit variant-specific side effects before entering the target.
#[derive(Clone, Debug)]
pub(crate) struct Chosen {
    pub id: TransitionId,
    pub from: StateId,
    pub to: StateId,
    pub condition: Condition,
}

/// Owner of an automaton's states, transitions and run cursor.
///
/// # Example
///
/// ```rust
/// use automata_engine::core::{Machine, State, StateKind};
///
/// let mut machine = Machine::new();
/// let q0 = machine.add_state(State::new("q0"), StateKind::Default).unwrap();
/// let q1 = machine.add_state(State::new("q1"), StateKind::Accepting).unwrap();
/// machine.set_start_state(q0).unwrap();
///
/// assert!(machine.is_accepting(q1));
/// assert_eq!(machine.find_state("q1"), Some(q1));
///
/// // Deleting the start state clears it.
/// machine.delete_state(q0).unwrap();
/// assert_eq!(machine.start_state(), None);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Machine {
    states: BTreeMap<StateId, State>,
    transitions: BTreeMap<TransitionId, Transition>,
    accepting: BTreeSet<StateId>,
    start: Option<StateId>,
    current: Option<StateId>,
    next_state: u32,
    next_transition: u32,
    history: RunHistory,
}

impl Machine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a state. Names must be unique within the machine.
    pub fn add_state(&mut self, state: State, kind: StateKind) -> Result<StateId, AutomatonError> {
        if self.find_state(state.name()).is_some() {
            return Err(AutomatonError::DuplicateStateName(state.name().to_string()));
        }

        let id = StateId(self.next_state);
        self.next_state += 1;
        if kind == StateKind::Accepting {
            self.accepting.insert(id);
        }
        self.states.insert(id, state);
        Ok(id)
    }

    /// Remove a state together with every transition touching it.
    ///
    /// Clears the start state and the run cursor if they pointed at it.
    pub fn delete_state(&mut self, id: StateId) -> Result<State, AutomatonError> {
        let state = self
            .states
            .remove(&id)
            .ok_or(AutomatonError::UnknownState(id))?;

        let before = self.transitions.len();
        self.transitions.retain(|_, t| !t.touches(id));
        self.accepting.remove(&id);
        if self.start == Some(id) {
            self.start = None;
        }
        if self.current == Some(id) {
            self.current = None;
        }

        debug!(
            state = %id,
            removed_transitions = before - self.transitions.len(),
            "deleted state"
        );
        Ok(state)
    }

    /// Register a transition whose endpoints are both known states.
    ///
    /// Variant-specific condition checks happen in
    /// [`Automaton::add_transition`](crate::engine::Automaton::add_transition)
    /// before this is called.
    pub(crate) fn insert_transition(
        &mut self,
        transition: Transition,
    ) -> Result<TransitionId, AutomatonError> {
        for endpoint in [transition.from(), transition.to()] {
            if !self.states.contains_key(&endpoint) {
                return Err(AutomatonError::UnknownState(endpoint));
            }
        }

        let id = TransitionId(self.next_transition);
        self.next_transition += 1;
        self.transitions.insert(id, transition);
        Ok(id)
    }

    /// Insert a transition without checking its endpoints.
    #[cfg(test)]
    pub(crate) fn insert_unchecked(&mut self, transition: Transition) -> TransitionId {
        let id = TransitionId(self.next_transition);
        self.next_transition += 1;
        self.transitions.insert(id, transition);
        id
    }

    pub fn delete_transition(&mut self, id: TransitionId) -> Result<Transition, AutomatonError> {
        self.transitions
            .remove(&id)
            .ok_or(AutomatonError::UnknownTransition(id))
    }

    pub fn set_start_state(&mut self, id: StateId) -> Result<(), AutomatonError> {
        if !self.states.contains_key(&id) {
            return Err(AutomatonError::UnknownState(id));
        }
        self.start = Some(id);
        Ok(())
    }

    pub fn start_state(&self) -> Option<StateId> {
        self.start
    }

    /// State the current run is in, if a run has started.
    pub fn current_state(&self) -> Option<StateId> {
        self.current
    }

    pub fn set_accepting(&mut self, id: StateId, accepting: bool) -> Result<(), AutomatonError> {
        if !self.states.contains_key(&id) {
            return Err(AutomatonError::UnknownState(id));
        }
        if accepting {
            self.accepting.insert(id);
        } else {
            self.accepting.remove(&id);
        }
        Ok(())
    }

    pub fn is_accepting(&self, id: StateId) -> bool {
        self.accepting.contains(&id)
    }

    pub fn accepting_states(&self) -> impl Iterator<Item = StateId> + '_ {
        self.accepting.iter().copied()
    }

    pub fn state(&self, id: StateId) -> Option<&State> {
        self.states.get(&id)
    }

    pub fn state_mut(&mut self, id: StateId) -> Option<&mut State> {
        self.states.get_mut(&id)
    }

    pub fn find_state(&self, name: &str) -> Option<StateId> {
        self.states
            .iter()
            .find(|(_, state)| state.name() == name)
            .map(|(id, _)| *id)
    }

    /// All states in id order.
    pub fn states(&self) -> impl Iterator<Item = (StateId, &State)> + '_ {
        self.states.iter().map(|(id, state)| (*id, state))
    }

    pub fn transition(&self, id: TransitionId) -> Option<&Transition> {
        self.transitions.get(&id)
    }

    /// All transitions in id order.
    pub fn transitions(&self) -> impl Iterator<Item = (TransitionId, &Transition)> + '_ {
        self.transitions.iter().map(|(id, t)| (*id, t))
    }

    /// Transitions leaving `from`, in id order.
    pub fn outgoing(&self, from: StateId) -> impl Iterator<Item = (TransitionId, &Transition)> + '_ {
        self.transitions().filter(move |(_, t)| t.from() == from)
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    /// Steps recorded since the current run started.
    pub fn history(&self) -> &RunHistory {
        &self.history
    }

    /// Enter the start state if no run is in progress; return the current state.
    pub(crate) fn begin_run(&mut self) -> Result<StateId, TransitionError> {
        if let Some(current) = self.current {
            return Ok(current);
        }

        let start = self.start.ok_or(TransitionError::MissingStartState)?;
        if !self.states.contains_key(&start) {
            return Err(TransitionError::UnregisteredStartState(start));
        }

        self.clear_activation();
        if let Some(state) = self.states.get_mut(&start) {
            state.set_active(true);
        }
        self.current = Some(start);
        self.history.clear();
        debug!(state = %start, "run started");
        Ok(start)
    }

    /// Abandon the current run so the next step starts from the start state.
    pub(crate) fn rewind(&mut self) {
        self.current = None;
        self.history.clear();
        self.clear_activation();
    }

    pub(crate) fn clear_activation(&mut self) {
        for state in self.states.values_mut() {
            state.set_active(false);
        }
        for transition in self.transitions.values_mut() {
            transition.set_active(false);
        }
    }

    /// Clear activation, then pick the single transition leaving `state` whose
    /// first condition token matches `symbol`.
    ///
    /// An exact match wins over a `wildcard` match. More than one candidate at
    /// the winning precedence is reported as nondeterminism.
    pub(crate) fn select(
        &mut self,
        state: StateId,
        symbol: &str,
        wildcard: Option<&str>,
    ) -> Result<Chosen, TransitionError> {
        self.clear_activation();

        let mut exact = Vec::new();
        let mut fallback = Vec::new();
        for (id, t) in self.outgoing(state) {
            match t.condition().token(0) {
                Some(expected) if expected == symbol => exact.push((id, t)),
                Some(expected) if wildcard == Some(expected) => fallback.push((id, t)),
                _ => {}
            }
        }

        let candidates = if exact.is_empty() { fallback } else { exact };
        match candidates.as_slice() {
            [(id, t)] => Ok(Chosen {
                id: *id,
                from: t.from(),
                to: t.to(),
                condition: t.condition().clone(),
            }),
            [] => Err(TransitionError::NoValidTransition {
                state: self.state_name(state),
                symbol: symbol.to_string(),
            }),
            many => Err(TransitionError::Nondeterministic {
                state: self.state_name(state),
                symbol: symbol.to_string(),
                count: many.len(),
            }),
        }
    }

    /// Move into the chosen transition's target and flag it active.
    ///
    /// The step is recorded while the history holds fewer than `capacity`
    /// steps; `None` records every step.
    pub(crate) fn enter(
        &mut self,
        chosen: &Chosen,
        symbol: &str,
        index: i64,
        capacity: Option<usize>,
    ) -> Result<Step, TransitionError> {
        if !self.states.contains_key(&chosen.to) {
            return Err(TransitionError::InvalidTargetState {
                transition: chosen.id,
                target: chosen.to,
            });
        }

        if let Some(state) = self.states.get_mut(&chosen.to) {
            state.set_active(true);
        }
        if let Some(transition) = self.transitions.get_mut(&chosen.id) {
            transition.set_active(true);
        }
        self.current = Some(chosen.to);

        if capacity.map_or(true, |cap| self.history.len() < cap) {
            self.history.record(StepRecord {
                from: chosen.from,
                to: chosen.to,
                transition: chosen.id,
                symbol: symbol.to_string(),
                timestamp: Utc::now(),
            });
        }

        debug!(
            from = %chosen.from,
            to = %chosen.to,
            transition = %chosen.id,
            symbol,
            index,
            "step"
        );

        Ok(Step {
            from: chosen.from,
            to: chosen.to,
            transition: chosen.id,
            symbol: symbol.to_string(),
            index,
        })
    }

    /// Accept/reject verdict for a run ending in `state`.
    pub(crate) fn verdict(&self, state: StateId) -> Verdict {
        if self.is_accepting(state) {
            Verdict::Accepted { state }
        } else {
            Verdict::Rejected { state }
        }
    }

    fn state_name(&self, id: StateId) -> String {
        self.states
            .get(&id)
            .map(|state| state.name().to_string())
            .unwrap_or_else(|| id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_states() -> (Machine, StateId, StateId) {
        let mut machine = Machine::new();
        let a = machine.add_state(State::new("a"), StateKind::Default).unwrap();
        let b = machine
            .add_state(State::new("b"), StateKind::Accepting)
            .unwrap();
        (machine, a, b)
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let (mut machine, _, _) = two_states();
        let result = machine.add_state(State::new("a"), StateKind::Default);
        assert_eq!(
            result,
            Err(AutomatonError::DuplicateStateName("a".to_string()))
        );
    }

    #[test]
    fn transition_endpoints_must_be_registered() {
        let (mut machine, a, _) = two_states();
        let result = machine.insert_transition(Transition::new(a, StateId(99), ["x"]));
        assert_eq!(result, Err(AutomatonError::UnknownState(StateId(99))));
        assert_eq!(machine.transition_count(), 0);
    }

    #[test]
    fn deleting_a_state_cascades_to_its_transitions() {
        let (mut machine, a, b) = two_states();
        machine
            .insert_transition(Transition::new(a, b, ["x"]))
            .unwrap();
        machine
            .insert_transition(Transition::new(b, a, ["y"]))
            .unwrap();
        let keep = machine
            .insert_transition(Transition::new(a, a, ["z"]))
            .unwrap();

        machine.delete_state(b).unwrap();

        assert_eq!(machine.transition_count(), 1);
        assert!(machine.transition(keep).is_some());
        assert!(!machine.is_accepting(b));
    }

    #[test]
    fn deleting_start_state_clears_start() {
        let (mut machine, a, b) = two_states();
        machine.set_start_state(a).unwrap();
        machine.delete_state(b).unwrap();
        assert_eq!(machine.start_state(), Some(a));

        machine.delete_state(a).unwrap();
        assert_eq!(machine.start_state(), None);
    }

    #[test]
    fn start_state_must_be_registered() {
        let (mut machine, _, _) = two_states();
        assert_eq!(
            machine.set_start_state(StateId(42)),
            Err(AutomatonError::UnknownState(StateId(42)))
        );
    }

    #[test]
    fn accepting_membership_can_be_toggled() {
        let (mut machine, a, b) = two_states();
        machine.set_accepting(a, true).unwrap();
        machine.set_accepting(b, false).unwrap();
        assert_eq!(machine.accepting_states().collect::<Vec<_>>(), vec![a]);
    }

    #[test]
    fn begin_run_requires_start_state() {
        let (mut machine, a, _) = two_states();
        assert_eq!(machine.begin_run(), Err(TransitionError::MissingStartState));

        machine.set_start_state(a).unwrap();
        assert_eq!(machine.begin_run(), Ok(a));
        assert!(machine.state(a).unwrap().is_active());
    }

    #[test]
    fn select_prefers_exact_over_wildcard() {
        let (mut machine, a, b) = two_states();
        machine
            .insert_transition(Transition::new(a, a, ["*"]))
            .unwrap();
        let exact = machine
            .insert_transition(Transition::new(a, b, ["x"]))
            .unwrap();

        let chosen = machine.select(a, "x", Some("*")).unwrap();
        assert_eq!(chosen.id, exact);

        let chosen = machine.select(a, "y", Some("*")).unwrap();
        assert_eq!(chosen.to, a);
    }

    #[test]
    fn select_reports_ambiguity_and_absence() {
        let (mut machine, a, b) = two_states();
        machine
            .insert_transition(Transition::new(a, a, ["x"]))
            .unwrap();
        machine
            .insert_transition(Transition::new(a, b, ["x"]))
            .unwrap();

        assert!(matches!(
            machine.select(a, "x", None),
            Err(TransitionError::Nondeterministic { count: 2, .. })
        ));
        assert!(matches!(
            machine.select(a, "q", None),
            Err(TransitionError::NoValidTransition { ref state, .. }) if state == "a"
        ));
    }

    #[test]
    fn enter_activates_exactly_the_taken_edge_and_target() {
        let (mut machine, a, b) = two_states();
        let ab = machine
            .insert_transition(Transition::new(a, b, ["x"]))
            .unwrap();
        let ba = machine
            .insert_transition(Transition::new(b, a, ["x"]))
            .unwrap();
        machine.set_start_state(a).unwrap();
        machine.begin_run().unwrap();

        let chosen = machine.select(a, "x", None).unwrap();
        let step = machine.enter(&chosen, "x", 1, None).unwrap();

        assert_eq!(step.to, b);
        assert!(machine.state(b).unwrap().is_active());
        assert!(!machine.state(a).unwrap().is_active());
        assert!(machine.transition(ab).unwrap().is_active());
        assert!(!machine.transition(ba).unwrap().is_active());
        assert_eq!(machine.current_state(), Some(b));
        assert_eq!(machine.history().len(), 1);
    }

    #[test]
    fn enter_rejects_unregistered_target() {
        let (mut machine, a, _) = two_states();
        let chosen = Chosen {
            id: TransitionId(9),
            from: a,
            to: StateId(77),
            condition: Condition::from(["x"]),
        };
        assert_eq!(
            machine.enter(&chosen, "x", 1, Some(0)),
            Err(TransitionError::InvalidTargetState {
                transition: TransitionId(9),
                target: StateId(77),
            })
        );
    }

    #[test]
    fn rewind_clears_cursor_and_flags() {
        let (mut machine, a, _) = two_states();
        machine.set_start_state(a).unwrap();
        machine.begin_run().unwrap();
        machine.rewind();

        assert_eq!(machine.current_state(), None);
        assert!(machine.states().all(|(_, s)| !s.is_active()));
    }
}
