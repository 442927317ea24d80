//! Property-based tests for the simulation engines and the graph codec.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated automata, inputs and graphs.

use automata_engine::codec::{from_binary, from_text, to_binary, to_text, MAGIC};
use automata_engine::core::{State, StateId, StateKind, StepOutcome, Transition, Verdict};
use automata_engine::engine::{Automaton, Dfa};
use automata_engine::graph::{Domain, Graph, Label, Schema};
use proptest::collection::vec;
use proptest::prelude::*;

const ALPHABET: [&str; 2] = ["a", "b"];

/// A complete DFA over {a, b}: `targets[state * 2 + symbol]` is the next state.
#[derive(Clone, Debug)]
struct DfaTable {
    targets: Vec<usize>,
    accepting: Vec<bool>,
}

prop_compose! {
    fn arbitrary_dfa()(states in 1..6usize)(
        targets in vec(0..states, states * 2),
        accepting in vec(any::<bool>(), states),
    ) -> DfaTable {
        DfaTable { targets, accepting }
    }
}

prop_compose! {
    fn arbitrary_input()(picks in vec(0..2usize, 0..24)) -> Vec<String> {
        picks.into_iter().map(|i| ALPHABET[i].to_string()).collect()
    }
}

fn build(table: &DfaTable) -> (Dfa, Vec<StateId>) {
    let mut dfa = Dfa::default();
    let ids: Vec<StateId> = table
        .accepting
        .iter()
        .enumerate()
        .map(|(i, &accepting)| {
            let kind = if accepting {
                StateKind::Accepting
            } else {
                StateKind::Default
            };
            dfa.add_state(State::new(format!("q{i}")), kind).unwrap()
        })
        .collect();
    for (slot, &target) in table.targets.iter().enumerate() {
        let (from, symbol) = (slot / 2, ALPHABET[slot % 2]);
        dfa.add_transition(Transition::new(ids[from], ids[target], [symbol]))
            .unwrap();
    }
    dfa.set_start_state(ids[0]).unwrap();
    (dfa, ids)
}

/// Reference run computed straight from the table.
fn expected_verdict(table: &DfaTable, ids: &[StateId], input: &[String]) -> Verdict {
    let last = input.iter().fold(0, |state, symbol| {
        let offset = usize::from(symbol == "b");
        table.targets[state * 2 + offset]
    });
    if table.accepting[last] {
        Verdict::Accepted { state: ids[last] }
    } else {
        Verdict::Rejected { state: ids[last] }
    }
}

/// A random graph: node payloads, edges as (from, to, role, text), and a root.
#[derive(Clone, Debug)]
struct GraphShape {
    payloads: Vec<i64>,
    edges: Vec<(usize, usize, usize, String)>,
    attachments: Vec<Vec<u8>>,
    root: usize,
}

prop_compose! {
    fn arbitrary_graph()(nodes in 1..12usize)(
        payloads in vec(any::<i64>(), nodes),
        edges in vec((0..nodes, 0..nodes, 0..3usize, "[a-z]{0,4}"), 0..nodes * 3),
        attachments in vec(vec(any::<u8>(), 0..4), nodes),
        root in 0..nodes,
    ) -> GraphShape {
        GraphShape { payloads, edges, attachments, root }
    }
}

fn graph_of(shape: &GraphShape) -> Graph<i64> {
    let schema = Schema::new(vec![Domain::closed(["x", "y", "z"]), Domain::Open]).unwrap();
    let mut graph = Graph::new(schema.clone());
    let ids: Vec<_> = shape.payloads.iter().map(|&p| graph.add_node(p)).collect();
    for (id, attachment) in ids.iter().zip(&shape.attachments) {
        graph.node_mut(*id).unwrap().set_attachment(attachment.clone());
    }
    for (from, to, role, text) in &shape.edges {
        let role = ["x", "y", "z"][*role];
        let label = schema.label(&[role, text.as_str()]).unwrap();
        graph.connect(ids[*from], label, ids[*to]).unwrap();
    }
    graph.set_root(ids[shape.root]).unwrap();
    graph
}

/// Node contents in breadth-first order with edges pointing at BFS positions.
///
/// Two graphs with the same canonical form are isomorphic as seen from
/// their roots.
fn canonical(graph: &Graph<i64>) -> Vec<(i64, Vec<u8>, bool, Vec<(Label, usize)>)> {
    let order = graph.bfs_order().unwrap();
    let position = |target| order.iter().position(|id| *id == target).unwrap();
    order
        .iter()
        .map(|&id| {
            let node = graph.node(id).unwrap();
            let edges = node
                .edges()
                .iter()
                .map(|edge| (edge.label.clone(), position(edge.target)))
                .collect();
            (
                *node.payload(),
                node.attachment().to_vec(),
                node.is_root(),
                edges,
            )
        })
        .collect()
}

proptest! {
    #[test]
    fn dfa_simulate_matches_the_transition_table(
        table in arbitrary_dfa(),
        input in arbitrary_input(),
    ) {
        let (mut dfa, ids) = build(&table);
        dfa.set_input(input.clone());
        prop_assert_eq!(dfa.simulate().unwrap(), expected_verdict(&table, &ids, &input));
    }

    #[test]
    fn dfa_simulate_equals_repeated_steps(
        table in arbitrary_dfa(),
        input in arbitrary_input(),
    ) {
        let (mut dfa, _) = build(&table);
        dfa.set_input(input.clone());
        let verdict = dfa.simulate().unwrap();
        let index_after_run = dfa.current_index();

        dfa.set_input(input.clone());
        let mut steps = 0;
        let stepped = loop {
            match dfa.simulate_one_step().unwrap() {
                StepOutcome::Running(_) => steps += 1,
                StepOutcome::Finished { verdict, step } => {
                    steps += usize::from(step.is_some());
                    break verdict;
                }
            }
        };

        prop_assert_eq!(stepped, verdict);
        prop_assert_eq!(steps, input.len());
        prop_assert_eq!(dfa.current_index(), index_after_run);
        prop_assert_eq!(dfa.machine().history().len(), input.len());
    }

    #[test]
    fn dfa_highlights_exactly_the_current_state(
        table in arbitrary_dfa(),
        input in arbitrary_input(),
    ) {
        let (mut dfa, _) = build(&table);
        dfa.set_input(input);
        let verdict = dfa.simulate().unwrap();

        let active: Vec<StateId> = dfa
            .machine()
            .states()
            .filter(|(_, s)| s.is_active())
            .map(|(id, _)| id)
            .collect();
        prop_assert_eq!(active, vec![verdict.state().unwrap()]);
    }

    #[test]
    fn binary_round_trip_is_isomorphic(shape in arbitrary_graph()) {
        let graph = graph_of(&shape);
        let decoded: Graph<i64> = from_binary(&to_binary(&graph).unwrap()).unwrap();
        prop_assert_eq!(canonical(&decoded), canonical(&graph));
    }

    #[test]
    fn text_round_trip_is_isomorphic(shape in arbitrary_graph()) {
        let graph = graph_of(&shape);
        let decoded: Graph<i64> = from_text(&to_text(&graph).unwrap()).unwrap();
        prop_assert_eq!(canonical(&decoded), canonical(&graph));
    }

    #[test]
    fn encoding_is_idempotent(shape in arbitrary_graph()) {
        let graph = graph_of(&shape);
        let first = to_binary(&graph).unwrap();
        prop_assert_eq!(&to_binary(&graph).unwrap(), &first);

        let decoded: Graph<i64> = from_binary(&first).unwrap();
        prop_assert_eq!(to_binary(&decoded).unwrap(), first);
        prop_assert_eq!(to_text(&decoded).unwrap(), to_text(&graph).unwrap());
    }

    #[test]
    fn arbitrary_bytes_never_panic(body in vec(any::<u8>(), 0..64)) {
        let mut bytes = MAGIC.to_vec();
        bytes.extend(body);
        // Any outcome is fine as long as it is a value.
        let _ = from_binary::<i64>(&bytes);
    }

    #[test]
    fn every_truncation_of_a_valid_stream_fails(
        shape in arbitrary_graph(),
        cut in any::<prop::sample::Index>(),
    ) {
        let bytes = to_binary(&graph_of(&shape)).unwrap();
        let len = cut.index(bytes.len());
        prop_assert!(from_binary::<i64>(&bytes[..len]).is_err());
    }
}
