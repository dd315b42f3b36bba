mod integration_tests_helper {

    use finauto::{compile, read_automaton_file, read_tape_file, Automaton, Tape};

    pub fn get_automaton(auto_path: &str) -> Automaton {
        let lines = read_automaton_file(auto_path);

        // assert that reading the file was successful
        assert!(lines.is_ok());

        let automaton = compile(lines.unwrap());

        // assert that compiling the description was successful
        assert!(automaton.is_ok(), "{:?}", automaton);

        automaton.unwrap()
    }

    pub fn get_tape(tape_path: &str) -> Tape {
        let tape = read_tape_file(tape_path);
        assert!(tape.is_ok());
        tape.unwrap()
    }
}

mod integration_tests {
    use crate::integration_tests_helper::{get_automaton, get_tape};

    use finauto::compiler::{compile_str, read_automaton_file, CompileError};
    use finauto::{compile, AutomatonError, Tape};

    #[test]
    fn test_canonical_run() {
        let mut automaton = get_automaton("test_data/canonical.auto");
        let mut tape = get_tape("test_data/canonical.tape");

        let outcome = automaton.run(&mut tape);
        assert!(outcome.is_ok());

        let outcome = outcome.unwrap();
        assert_eq!(outcome.final_state, "q3");
        assert!(outcome.accepted);
        assert_eq!(outcome.steps, 5);
        assert_eq!(
            outcome.to_string(),
            "q3\nState is in finalstates: true"
        );
    }

    #[test]
    fn test_canonical_dump() {
        let automaton = get_automaton("test_data/canonical.auto");
        let dump = automaton.dump();

        assert_eq!(dump.alphabet, vec!["0", "1"]);
        assert_eq!(dump.states, vec!["q1", "q2", "q3", "q4"]);
        assert_eq!(dump.initial_state, "q1");
        assert_eq!(dump.final_states, vec!["q2", "q3", "q4"]);
        assert_eq!(dump.delta.len(), 4);
        assert_eq!(dump.delta["q1"]["1"], "q2");
        assert_eq!(dump.delta["q1"]["0"], "q4");
        assert_eq!(dump.delta["q4"]["0"], "q4");

        let text = dump.to_string();
        assert!(text.starts_with("auto.alphabet:\n\t[\"0\", \"1\"]\n"));
        assert!(text.contains("auto.initialstate:\n\t\"q1\"\n"));
    }

    #[test]
    fn test_empty_tape_stays_on_initial_state() {
        let mut automaton = get_automaton("test_data/canonical.auto");
        let mut tape = get_tape("test_data/empty.tape");

        let outcome = automaton.run(&mut tape).unwrap();
        assert_eq!(outcome.final_state, "q1");
        assert!(!outcome.accepted);
        assert_eq!(outcome.steps, 0);

        let mut even = get_automaton("test_data/even_zeros.auto");
        assert_eq!(even.accepts(""), Ok(true));
    }

    #[test]
    fn test_undefined_transition_mid_tape() {
        let mut automaton = get_automaton("test_data/canonical.auto");
        let mut tape = get_tape("test_data/undefined.tape");

        let result = automaton.run(&mut tape);
        assert!(result.is_err());

        match result.unwrap_err() {
            AutomatonError::UndefinedTransition {
                state,
                symbol,
                position,
            } => {
                assert_eq!(state, "q3");
                assert_eq!(symbol, "2");
                assert_eq!(position, Some(2));
            }
            err => panic!("Expected UndefinedTransition, got {:?}", err),
        }

        // The steps before the failing symbol still took effect
        assert_eq!(automaton.get_current_state(), "q3");
        assert_eq!(tape.position(), 3);
    }

    #[test]
    fn test_redefinition_file() {
        let lines = read_automaton_file("test_data/redefinition.auto").unwrap();

        match compile(lines) {
            Err(CompileError::Redefinition { state, line }) => {
                assert_eq!(state, "s");
                assert_eq!(line, 13);
            }
            other => panic!("Expected Redefinition, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_lines_do_not_change_automaton() {
        let spaced = get_automaton("test_data/even_zeros.auto");

        let compact = compile_str(
            "append alphabet 0\n\
             append alphabet 1\n\
             append states even\n\
             append states odd\n\
             set initialstate even\n\
             append finalstates even\n\
             define delta\n\
             define state even\n\
             if input 0 then set state odd\n\
             if input 1 then set state even\n\
             end state\n\
             define state odd\n\
             if input 0 then set state even\n\
             if input 1 then set state odd\n\
             end state\n\
             end delta",
        )
        .unwrap();

        assert_eq!(spaced.dump(), compact.dump());
    }

    #[test]
    fn test_identical_sources_behave_identically() {
        let mut first = get_automaton("test_data/canonical.auto");
        let mut second = get_automaton("test_data/canonical.auto");

        assert_eq!(first, second);

        for tape in ["", "0", "1", "1 0", "0 0 0", "1 1 1 0 1", "1 0 1 1 0"] {
            assert_eq!(first.accepts(tape), second.accepts(tape), "tape {:?}", tape);
            assert_eq!(first.get_current_state(), second.get_current_state());
        }
    }

    #[test]
    fn test_alphabet_is_not_validated() {
        // `x` is never declared in the alphabet but is wired into the table
        let mut automaton = compile_str(
            "append alphabet 0\n\
             set initialstate s\n\
             append finalstates t\n\
             define delta\n\
             define state s\n\
             if input x then set state t\n\
             end state\n\
             end delta",
        )
        .unwrap();

        assert_eq!(automaton.accepts("x"), Ok(true));

        // `0` is declared but has no transition
        let err = automaton.accepts("0").unwrap_err();
        assert_eq!(
            err,
            AutomatonError::UndefinedTransition {
                state: "s".to_string(),
                symbol: "0".to_string(),
                position: Some(0),
            }
        );
    }

    #[test]
    fn test_manual_stepping() {
        let mut automaton = get_automaton("test_data/canonical.auto");
        let mut tape = Tape::new(vec!["1", " 0 "]);

        while tape.has_next() {
            let symbol = tape.next();
            assert!(automaton.process(symbol).is_ok());
        }

        assert_eq!(automaton.get_current_state(), "q3");
        assert!(automaton.is_accepting());

        automaton.reset();
        assert_eq!(automaton.get_current_state(), "q1");
    }

    #[test]
    fn test_canonical_dot_export() {
        let automaton = get_automaton("test_data/canonical.auto");
        let dot = automaton.to_dot();

        // q4 loops to itself on both symbols, which collapses into one labelled edge
        assert!(dot.contains("0, 1") || dot.contains("1, 0"));
        assert!(dot.contains("-> q1"));
        assert!(dot.contains("((q3))"));
    }
}
