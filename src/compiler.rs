/* Compiler for the automaton description language. The source is read one line at a time by a
 * small machine with three scopes:
 *
 *   global --define delta--> delta --define state <name>--> state
 *   state  --end state-----> delta --end delta-----------> global
 *
 * Every line is split on whitespace and matched against the fixed command shapes of the active
 * scope. */

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use crate::automaton::{Automaton, Delta};

/// The grammatical context of the compiler, which decides the commands that are accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Global,
    Delta,
    /// Transitions are being defined for the named state
    State(String),
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Global => write!(f, "global"),
            Scope::Delta => write!(f, "delta"),
            Scope::State(name) => write!(f, "state `{}`", name),
        }
    }
}

/// List of possible errors while compiling an automaton description
#[derive(Debug, PartialEq, Eq)]
pub enum CompileError {
    /// A known command was given a target or keyword it does not accept
    UnexpectedToken {
        token: String,
        line: usize,
        suggestion: Option<String>,
    },
    /// The line does not have the shape of any command valid in the current scope
    UnexpectedCommand { tokens: String, line: usize },
    Redefinition { state: String, line: usize },
    /// Input ended inside a `delta` or `state` block. Strict mode only.
    UnterminatedBlock { scope: Scope },
    /// No `set initialstate` command was found. Strict mode only.
    MissingInitialState,
    FileOpenError(String),
    FileReadError(String),
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::UnexpectedToken {
                token,
                line,
                suggestion,
            } => {
                write!(f, "Error: Unexpected token `{}` found on line {}.", token, line)?;
                if let Some(suggestion) = suggestion {
                    write!(f, " Did you mean `{}`?", suggestion)?;
                }
                Ok(())
            }
            CompileError::UnexpectedCommand { tokens, line } => {
                write!(
                    f,
                    "Error: Unexpected command `{}` found on line {}.",
                    tokens, line
                )
            }
            CompileError::Redefinition { state, line } => write!(
                f,
                "Error: State `{}` has already been defined, but is being redefined on line {}.",
                state, line
            ),
            CompileError::UnterminatedBlock { scope } => write!(
                f,
                "Error: Reached the end of the input inside an unterminated {} block.",
                scope
            ),
            CompileError::MissingInitialState => {
                write!(f, "Error: No initial state was set.")
            }
            CompileError::FileOpenError(err_line) => write!(f, "{}", err_line),
            CompileError::FileReadError(err_line) => write!(f, "{}", err_line),
        }
    }
}

impl std::error::Error for CompileError {}

/// Declared lists that can be extended with `append`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListTarget {
    Alphabet,
    States,
    FinalStates,
}

/// A single validated line of the description language
#[derive(Debug, PartialEq, Eq)]
pub enum Command<'a> {
    Append(ListTarget, &'a str),
    SetInitialState(&'a str),
    DefineDelta,
    DefineState(&'a str),
    EndDelta,
    Transition { symbol: &'a str, target: &'a str },
    EndState,
}

fn unexpected_token(token: &str, line: usize, suggestion: Option<&str>) -> CompileError {
    CompileError::UnexpectedToken {
        token: token.to_string(),
        line,
        suggestion: suggestion.map(str::to_string),
    }
}

fn unexpected_command(tokens: &[&str], line: usize) -> CompileError {
    CompileError::UnexpectedCommand {
        tokens: tokens.join(" "),
        line,
    }
}

impl<'a> Command<'a> {
    /// Match the tokens of one line against the command shapes allowed in `scope`
    pub fn parse(scope: &Scope, tokens: &[&'a str], line: usize) -> Result<Self, CompileError> {
        match scope {
            Scope::Global => Self::parse_global(tokens, line),
            Scope::Delta => Self::parse_delta(tokens, line),
            Scope::State(_) => Self::parse_state(tokens, line),
        }
    }

    fn parse_global(tokens: &[&'a str], line: usize) -> Result<Self, CompileError> {
        match *tokens {
            ["append", target, value] => {
                let target = match target {
                    "alphabet" => ListTarget::Alphabet,
                    "states" => ListTarget::States,
                    "finalstates" => ListTarget::FinalStates,
                    _ => return Err(unexpected_token(target, line, None)),
                };
                Ok(Command::Append(target, value))
            }
            ["set", target, value] => {
                if target != "initialstate" {
                    return Err(unexpected_token(target, line, None));
                }
                Ok(Command::SetInitialState(value))
            }
            ["define", target] => {
                if target != "delta" {
                    return Err(unexpected_token(target, line, Some("delta")));
                }
                Ok(Command::DefineDelta)
            }
            _ => Err(unexpected_command(tokens, line)),
        }
    }

    fn parse_delta(tokens: &[&'a str], line: usize) -> Result<Self, CompileError> {
        match *tokens {
            ["define", target, name] => {
                if target != "state" {
                    return Err(unexpected_token(target, line, Some("state")));
                }
                Ok(Command::DefineState(name))
            }
            ["end", target] => {
                if target != "delta" {
                    return Err(unexpected_token(target, line, Some("delta")));
                }
                Ok(Command::EndDelta)
            }
            _ => Err(unexpected_command(tokens, line)),
        }
    }

    fn parse_state(tokens: &[&'a str], line: usize) -> Result<Self, CompileError> {
        match *tokens {
            ["if", "input", symbol, "then", "set", "state", target] => {
                Ok(Command::Transition { symbol, target })
            }
            ["end", target] => {
                if target != "state" {
                    return Err(unexpected_token(target, line, Some("state")));
                }
                Ok(Command::EndState)
            }
            _ => Err(unexpected_command(tokens, line)),
        }
    }
}

/// Options controlling how much validation the compiler performs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileOptions {
    /// Reject unterminated blocks and a missing initial state at the end of the input
    pub strict: bool,
}

struct Compiler {
    alphabet: Vec<String>,
    states: Vec<String>,
    initial_state: Option<String>,
    final_states: Vec<String>,
    delta: Delta,
    scope: Scope,
}

impl Compiler {
    fn new() -> Self {
        Compiler {
            alphabet: Vec::new(),
            states: Vec::new(),
            initial_state: None,
            final_states: Vec::new(),
            delta: Delta::new(),
            scope: Scope::Global,
        }
    }

    fn compile_line(&mut self, line: &str, line_number: usize) -> Result<(), CompileError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();

        if tokens.is_empty() {
            return Ok(());
        }

        let command = Command::parse(&self.scope, &tokens, line_number)?;
        tracing::debug!(line = line_number, scope = %self.scope, ?command, "compiling");

        match command {
            Command::Append(target, value) => {
                let list = match target {
                    ListTarget::Alphabet => &mut self.alphabet,
                    ListTarget::States => &mut self.states,
                    ListTarget::FinalStates => &mut self.final_states,
                };
                list.push(value.to_string());
            }
            Command::SetInitialState(value) => {
                self.initial_state = Some(value.to_string());
            }
            Command::DefineDelta => {
                self.scope = Scope::Delta;
            }
            Command::DefineState(name) => {
                if self.delta.contains_key(name) {
                    return Err(CompileError::Redefinition {
                        state: name.to_string(),
                        line: line_number,
                    });
                }
                self.delta.insert(name.to_string(), Default::default());
                self.scope = Scope::State(name.to_string());
            }
            Command::EndDelta => {
                self.scope = Scope::Global;
            }
            Command::Transition { symbol, target } => {
                if let Scope::State(open_state) = &self.scope {
                    // Repeated symbols overwrite the earlier target
                    self.delta
                        .entry(open_state.clone())
                        .or_default()
                        .insert(symbol.to_string(), target.to_string());
                }
            }
            Command::EndState => {
                self.scope = Scope::Delta;
            }
        }

        Ok(())
    }

    fn finish(self, options: CompileOptions) -> Result<Automaton, CompileError> {
        if self.scope != Scope::Global {
            if options.strict {
                return Err(CompileError::UnterminatedBlock { scope: self.scope });
            }
            tracing::warn!(scope = %self.scope, "input ended inside an unterminated block");
        }

        let initial_state = match self.initial_state {
            Some(initial_state) => initial_state,
            None if options.strict => return Err(CompileError::MissingInitialState),
            None => {
                tracing::warn!("no initial state set, using the empty state name");
                String::new()
            }
        };

        Ok(Automaton::new(
            self.alphabet,
            self.states,
            initial_state,
            self.final_states,
            self.delta,
        ))
    }
}

/// Compile the lines of an automaton description with the given options. Line numbers in errors
/// are 1-based and count blank lines.
pub fn compile_with<I, S>(lines: I, options: CompileOptions) -> Result<Automaton, CompileError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut compiler = Compiler::new();

    for (index, line) in lines.into_iter().enumerate() {
        compiler.compile_line(line.as_ref(), index + 1)?;
    }

    compiler.finish(options)
}

/// Compile the lines of an automaton description
pub fn compile<I, S>(lines: I) -> Result<Automaton, CompileError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    compile_with(lines, CompileOptions::default())
}

/// Compile a whole automaton description held in a string
pub fn compile_str(source: &str) -> Result<Automaton, CompileError> {
    compile(source.lines())
}

/// Read the lines of an automaton description file
pub fn read_automaton_file(file_path: &str) -> Result<Vec<String>, CompileError> {
    let file_path = PathBuf::from(file_path);

    let file = match File::open(&file_path) {
        Ok(file) => file,
        Err(error) => {
            let err_line = format!("Error: Failed to open the automaton file {}", error);
            return Err(CompileError::FileOpenError(err_line));
        }
    };
    let reader = BufReader::new(file);

    let mut lines: Vec<String> = Vec::new();

    for (line_number, line) in reader.lines().enumerate() {
        match line {
            Ok(line) => lines.push(line),
            Err(error) => {
                let err_line = format!(
                    "Error: Failed to read line number {} in automaton file {}",
                    line_number + 1,
                    error
                );
                return Err(CompileError::FileReadError(err_line));
            }
        }
    }

    tracing::debug!(path = %file_path.display(), lines = lines.len(), "read automaton file");

    Ok(lines)
}
