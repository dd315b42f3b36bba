//! # finauto
//!
//! A runtime for deterministic finite automata written in a small line-oriented description
//! language.
//!
//! This library provides functionality to:
//! - Compile an automaton description into a DFA
//! - Run the DFA over a tape of whitespace separated symbols
//! - Dump the compiled automaton as text or JSON
//! - Export the transition graph to Graphviz DOT
//! - Visualize the automaton state machine

// Re-export the modules
pub mod automaton;
pub mod compiler;
pub mod fa;
pub mod tape;
pub mod visualizer;

// Re-export commonly used functions for convenience
pub use automaton::{Automaton, AutomatonError, RunOutcome};
pub use compiler::{compile, compile_str, compile_with, read_automaton_file, CompileOptions};
pub use tape::{read_tape_file, Tape};
pub use visualizer::visualize;
