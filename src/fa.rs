use bitvec::prelude::BitVec;
use std::collections::HashMap;

use crate::automaton::Automaton;

/// Index based view over a finite automaton, used to render it as a graph.
pub trait FA {
    fn get_num_states(&self) -> usize;
    fn get_state_label(&self, state_id: usize) -> &str;
    /// The start state, if it refers to a known node
    fn get_start_state(&self) -> Option<usize>;
    fn get_acceptor_states(&self) -> &BitVec<u8>;
    fn get_state_transitions(&self, state_id: usize) -> Vec<(&str, usize)>;
}

/// Numbered snapshot of an automaton's states and transitions.
///
/// Nodes are the union of declared states, the initial state, final states and every state that
/// appears in the transition table, numbered in order of first appearance.
#[derive(Debug)]
pub struct StateGraph {
    labels: Vec<String>,
    start_state: Option<usize>,
    accept_states: BitVec<u8>,
    transitions: Vec<Vec<(String, usize)>>,
}

impl StateGraph {
    fn new() -> Self {
        StateGraph {
            labels: Vec::new(),
            start_state: None,
            accept_states: BitVec::new(),
            transitions: Vec::new(),
        }
    }

    fn add_state(&mut self, ids: &mut HashMap<String, usize>, label: &str) -> usize {
        if let Some(id) = ids.get(label) {
            return *id;
        }
        let state_id = self.labels.len();
        self.labels.push(label.to_string());
        self.accept_states.push(false);
        self.transitions.push(Vec::new());
        ids.insert(label.to_string(), state_id);
        state_id
    }

    pub fn from_automaton(automaton: &Automaton) -> Self {
        let mut graph = StateGraph::new();
        let mut ids: HashMap<String, usize> = HashMap::new();

        for state in automaton.get_states() {
            graph.add_state(&mut ids, state);
        }

        // An unset initial state has no node
        let initial_state = automaton.get_initial_state();
        if !initial_state.is_empty() {
            graph.start_state = Some(graph.add_state(&mut ids, initial_state));
        }

        for state in automaton.get_final_states() {
            let state_id = graph.add_state(&mut ids, state);
            graph.accept_states.set(state_id, true);
        }

        for (source, targets) in automaton.get_delta() {
            let source_id = graph.add_state(&mut ids, source);
            for (symbol, target) in targets {
                let target_id = graph.add_state(&mut ids, target);
                graph.transitions[source_id].push((symbol.clone(), target_id));
            }
        }

        graph
    }
}

impl FA for StateGraph {
    fn get_num_states(&self) -> usize {
        self.labels.len()
    }

    fn get_state_label(&self, state_id: usize) -> &str {
        &self.labels[state_id]
    }

    fn get_start_state(&self) -> Option<usize> {
        self.start_state
    }

    fn get_acceptor_states(&self) -> &BitVec<u8> {
        &self.accept_states
    }

    fn get_state_transitions(&self, state_id: usize) -> Vec<(&str, usize)> {
        self.transitions[state_id]
            .iter()
            .map(|(symbol, target)| (symbol.as_str(), *target))
            .collect()
    }
}
