/* The compiled deterministic finite automaton and its step function. Everything except the
 * current state is fixed once the compiler hands the automaton over. */

use petgraph::dot::Dot;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::fa::{StateGraph, FA};
use crate::tape::Tape;

/// Transition table grouped by source state, then input symbol
pub type Delta = BTreeMap<String, BTreeMap<String, String>>;

/// List of possible errors while executing or exporting an automaton
#[derive(Debug, PartialEq, Eq)]
pub enum AutomatonError {
    /// The current state has no transition for the symbol that was read. `position` is the tape
    /// index of the symbol when the failure happened during a run.
    UndefinedTransition {
        state: String,
        symbol: String,
        position: Option<usize>,
    },
    FileWriteError(String),
}

impl std::fmt::Display for AutomatonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AutomatonError::UndefinedTransition {
                state,
                symbol,
                position,
            } => {
                write!(
                    f,
                    "Error: No transition defined from state `{}` on input `{}`",
                    state, symbol
                )?;
                match position {
                    Some(position) => write!(f, " at tape position {}.", position),
                    None => write!(f, "."),
                }
            }
            AutomatonError::FileWriteError(err_line) => write!(f, "{}", err_line),
        }
    }
}

impl std::error::Error for AutomatonError {}

/// Result of running an automaton over a whole tape
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunOutcome {
    pub final_state: String,
    pub accepted: bool,
    pub steps: usize,
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.final_state)?;
        write!(f, "State is in finalstates: {}", self.accepted)
    }
}

/// Snapshot of the declared parts of an automaton, for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AutomatonDump {
    pub alphabet: Vec<String>,
    pub states: Vec<String>,
    #[serde(rename = "initialstate")]
    pub initial_state: String,
    #[serde(rename = "finalstates")]
    pub final_states: Vec<String>,
    pub delta: Delta,
}

impl AutomatonDump {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for AutomatonDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "auto.alphabet:\n\t{:?}", self.alphabet)?;
        writeln!(f, "auto.states:\n\t{:?}", self.states)?;
        writeln!(f, "auto.initialstate:\n\t{:?}", self.initial_state)?;
        writeln!(f, "auto.finalstates:\n\t{:?}", self.final_states)?;
        write!(f, "auto.delta:\n\t{:?}", self.delta)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Automaton {
    alphabet: Vec<String>,
    states: Vec<String>,
    initial_state: String,
    final_states: Vec<String>,
    delta: Delta,
    current_state: String,
}

impl Automaton {
    /// Create an automaton positioned on its initial state
    pub fn new(
        alphabet: Vec<String>,
        states: Vec<String>,
        initial_state: String,
        final_states: Vec<String>,
        delta: Delta,
    ) -> Self {
        let current_state = initial_state.clone();
        Automaton {
            alphabet,
            states,
            initial_state,
            final_states,
            delta,
            current_state,
        }
    }

    pub fn get_alphabet(&self) -> &[String] {
        &self.alphabet
    }

    pub fn get_states(&self) -> &[String] {
        &self.states
    }

    pub fn get_initial_state(&self) -> &str {
        &self.initial_state
    }

    pub fn get_final_states(&self) -> &[String] {
        &self.final_states
    }

    pub fn get_delta(&self) -> &Delta {
        &self.delta
    }

    pub fn get_current_state(&self) -> &str {
        &self.current_state
    }

    /// Whether the current state is one of the final states
    pub fn is_accepting(&self) -> bool {
        self.final_states.contains(&self.current_state)
    }

    /// Move back to the initial state
    pub fn reset(&mut self) {
        self.current_state = self.initial_state.clone();
    }

    /// Follow the transition for `symbol` out of the current state and return the new state.
    /// On failure the current state is left untouched.
    pub fn process(&mut self, symbol: &str) -> Result<&str, AutomatonError> {
        let next_state = self
            .delta
            .get(&self.current_state)
            .and_then(|transitions| transitions.get(symbol))
            .cloned();

        match next_state {
            Some(next_state) => {
                tracing::trace!(from = %self.current_state, symbol, to = %next_state, "step");
                self.current_state = next_state;
                Ok(&self.current_state)
            }
            None => Err(AutomatonError::UndefinedTransition {
                state: self.current_state.clone(),
                symbol: symbol.to_string(),
                position: None,
            }),
        }
    }

    /// Consume the rest of the tape one symbol at a time and report where the automaton ended up.
    pub fn run(&mut self, tape: &mut Tape) -> Result<RunOutcome, AutomatonError> {
        let mut steps = 0;

        while tape.has_next() {
            let position = tape.position();
            let symbol = tape.next();

            if let Err(err) = self.process(symbol) {
                tracing::debug!(position, %err, "run aborted");
                return Err(match err {
                    AutomatonError::UndefinedTransition { state, symbol, .. } => {
                        AutomatonError::UndefinedTransition {
                            state,
                            symbol,
                            position: Some(position),
                        }
                    }
                    err => err,
                });
            }
            steps += 1;
        }

        let outcome = RunOutcome {
            final_state: self.current_state.clone(),
            accepted: self.is_accepting(),
            steps,
        };
        tracing::info!(
            final_state = %outcome.final_state,
            accepted = outcome.accepted,
            steps,
            "run finished"
        );

        Ok(outcome)
    }

    /// Run a fresh tape from the initial state and return whether it is accepted
    pub fn accepts(&mut self, tape_text: &str) -> Result<bool, AutomatonError> {
        self.reset();
        let mut tape = Tape::from_text(tape_text);
        let outcome = self.run(&mut tape)?;
        Ok(outcome.accepted)
    }

    pub fn dump(&self) -> AutomatonDump {
        AutomatonDump {
            alphabet: self.alphabet.clone(),
            states: self.states.clone(),
            initial_state: self.initial_state.clone(),
            final_states: self.final_states.clone(),
            delta: self.delta.clone(),
        }
    }

    pub fn state_graph(&self) -> StateGraph {
        StateGraph::from_automaton(self)
    }

    /// Render the transition graph in Graphviz DOT format. Symbols sharing a source and target are
    /// joined onto a single edge.
    pub fn to_dot(&self) -> String {
        let state_graph = self.state_graph();
        let mut graph: DiGraph<String, String> = DiGraph::new();

        let num_states = state_graph.get_num_states();

        let mut edge_map: HashMap<(NodeIndex, NodeIndex), EdgeIndex> = HashMap::new();

        for state_idx in 0..num_states {
            let label = state_graph.get_state_label(state_idx);
            let is_accept = state_graph.get_acceptor_states()[state_idx];
            let is_start = state_graph.get_start_state() == Some(state_idx);

            let node_label = match (is_start, is_accept) {
                (true, true) => format!("-> (({}))", label),
                (true, false) => format!("-> {}", label),
                (false, true) => format!("(({}))", label),
                (false, false) => label.to_string(),
            };
            graph.add_node(node_label);
        }

        for state_idx in 0..num_states {
            for (symbol, target) in state_graph.get_state_transitions(state_idx) {
                let key = (NodeIndex::new(state_idx), NodeIndex::new(target));

                match edge_map.get(&key) {
                    Some(edge_idx) => {
                        let old_label = &graph[*edge_idx];
                        let new_label = format!("{}, {}", old_label, symbol);
                        graph[*edge_idx] = new_label;
                    }
                    None => {
                        let edge_idx = graph.add_edge(key.0, key.1, symbol.to_string());
                        edge_map.insert(key, edge_idx);
                    }
                }
            }
        }

        format!("{}", Dot::new(&graph))
    }

    /// Write the DOT rendering of the automaton to `file_path`
    pub fn save_dot(&self, file_path: &Path) -> Result<(), AutomatonError> {
        let mut dot_file = match File::create(file_path) {
            Ok(file) => file,
            Err(error) => {
                let err_line = format!("Error: Failed to create dot file {}", error);
                return Err(AutomatonError::FileWriteError(err_line));
            }
        };

        if let Err(error) = dot_file.write_all(self.to_dot().as_bytes()) {
            let err_line = format!("Error: Failed to write dot file {}", error);
            return Err(AutomatonError::FileWriteError(err_line));
        }

        tracing::info!(path = %file_path.display(), "saved automaton graph");
        Ok(())
    }
}

impl fmt::Display for Automaton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dump())
    }
}
