/* The tape is the ordered list of input symbols that an automaton consumes. Symbols are trimmed
 * once on construction and read strictly left to right through a forward cursor. */

use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::PathBuf;

/// List of possible errors while loading a tape
#[derive(Debug)]
pub enum TapeError {
    FileOpenError(String),
    FileReadError(String),
}

impl std::fmt::Display for TapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TapeError::FileOpenError(err_line) => write!(f, "{}", err_line),
            TapeError::FileReadError(err_line) => write!(f, "{}", err_line),
        }
    }
}

impl std::error::Error for TapeError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    tokens: Vec<String>,
    index: usize,
}

impl Tape {
    /// Build a tape from a list of symbols. Every symbol is trimmed of surrounding whitespace.
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokens = tokens
            .into_iter()
            .map(|token| token.as_ref().trim().to_string())
            .collect();
        Tape { tokens, index: 0 }
    }

    /// Build a tape by splitting raw text on whitespace
    pub fn from_text(text: &str) -> Self {
        Tape::new(text.split_whitespace())
    }

    /// Return the symbol under the cursor and move the cursor forward by one.
    ///
    /// Panics if the tape is exhausted. Callers must check [`Tape::has_next`] first.
    pub fn next(&mut self) -> &str {
        let position = self.index;
        self.index += 1;
        &self.tokens[position]
    }

    pub fn has_next(&self) -> bool {
        self.index < self.tokens.len()
    }

    /// Move the cursor to an arbitrary position
    pub fn reset(&mut self, position: usize) {
        self.index = position;
    }

    pub fn position(&self) -> usize {
        self.index
    }

    /// Read a symbol by index without touching the cursor
    pub fn get(&self, index: usize) -> Option<&str> {
        self.tokens.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl fmt::Display for Tape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tape@{}: {:?}", self.index, self.tokens)
    }
}

/// Read a file of whitespace separated symbols into a tape
pub fn read_tape_file(file_path: &str) -> Result<Tape, TapeError> {
    let file_path = PathBuf::from(file_path);

    let file = match File::open(&file_path) {
        Ok(file) => file,
        Err(error) => {
            let err_line = format!("Error: Failed to open the tape file {}", error);
            return Err(TapeError::FileOpenError(err_line));
        }
    };

    let mut reader = BufReader::new(file);
    let mut contents = String::new();

    if let Err(error) = reader.read_to_string(&mut contents) {
        let err_line = format!("Error: Failed to read the tape file {}", error);
        return Err(TapeError::FileReadError(err_line));
    }

    let tape = Tape::from_text(&contents);
    tracing::debug!(
        path = %file_path.display(),
        symbols = tape.len(),
        "loaded tape"
    );

    Ok(tape)
}

#[cfg(test)]
mod tape_tests {
    use super::{read_tape_file, Tape, TapeError};

    #[test]
    fn test_tape_trims_tokens() {
        let tape = Tape::new(vec![" 1", "0 ", "\t1\n"]);
        assert_eq!(tape.len(), 3);
        assert_eq!(tape.get(0), Some("1"));
        assert_eq!(tape.get(1), Some("0"));
        assert_eq!(tape.get(2), Some("1"));
    }

    #[test]
    fn test_tape_reads_in_order() {
        let mut tape = Tape::from_text("1 0  1\n1 0");
        let mut contents = Vec::new();

        while tape.has_next() {
            contents.push(tape.next().to_string());
        }

        assert_eq!(contents, vec!["1", "0", "1", "1", "0"]);
        assert_eq!(tape.position(), 5);
        assert!(!tape.has_next());
    }

    #[test]
    fn test_tape_reset() {
        let mut tape = Tape::from_text("a b c");
        tape.next();
        tape.next();

        tape.reset(1);
        assert_eq!(tape.position(), 1);
        assert_eq!(tape.next(), "b");

        tape.reset(0);
        assert_eq!(tape.next(), "a");
    }

    #[test]
    fn test_empty_tape() {
        let tape = Tape::from_text("   \n ");
        assert!(tape.is_empty());
        assert!(!tape.has_next());
    }

    #[test]
    #[should_panic]
    fn test_tape_read_past_end() {
        let mut tape = Tape::from_text("a");
        tape.next();
        tape.next();
    }

    #[test]
    fn test_tape_display() {
        let mut tape = Tape::from_text("x y");
        tape.next();
        assert_eq!(tape.to_string(), "tape@1: [\"x\", \"y\"]");
    }

    #[test]
    fn test_missing_tape_file() {
        let result = read_tape_file("test_data/does_not_exist.tape");
        match result {
            Err(TapeError::FileOpenError(_)) => {}
            other => panic!("Expected FileOpenError, got {:?}", other),
        }
    }
}
