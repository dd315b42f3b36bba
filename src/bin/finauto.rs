use clap::{Parser, Subcommand};
use color_eyre::eyre::{eyre, Result};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use finauto::compiler::{compile_with, read_automaton_file, CompileOptions};
use finauto::tape::read_tape_file;
use finauto::visualize;

const FORMATS: &str = "Formats

Example of <AUTOFILE> format:
`
append alphabet 0
append alphabet 1
append states q1
append states q2
append states q3
append states q4
set initialstate q1
append finalstates q2
append finalstates q3
append finalstates q4

define delta
    define state q1
        if input 1 then set state q2
        if input 0 then set state q4
    end state

    define state q2
        if input 1 then set state q2
        if input 0 then set state q3
    end state

    define state q3
        if input 1 then set state q2
        if input 0 then set state q3
    end state

    define state q4
        if input 1 then set state q4
        if input 0 then set state q4
    end state
end delta
`

Example of <TAPEFILE> format (example corresponds to autofile example):
`1 0 1 1 0`

These examples together will give the resulting state of `q3`, due to the tape starting with 1 and ending with 0.";

#[derive(Parser)]
#[command(name = "finauto", version, about = "Finite Automaton Runtime")]
struct Cli {
    /// Print debug logs of compilation and execution
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display an automaton from a file containing an automaton description
    Display {
        #[arg(value_name = "AUTOFILE")]
        autofile: PathBuf,
        /// Print the automaton as JSON
        #[arg(long)]
        json: bool,
        /// Save the transition graph in Graphviz DOT format
        #[arg(long, value_name = "DOT FILE")]
        dot: Option<PathBuf>,
        /// Open the transition graph in an interactive window
        #[arg(long)]
        visualize: bool,
        /// Reject unterminated blocks and a missing initial state
        #[arg(long)]
        strict: bool,
    },
    /// Run an automaton from a file on a tape in a different file
    Run {
        #[arg(value_name = "AUTOFILE")]
        autofile: PathBuf,
        #[arg(value_name = "TAPEFILE")]
        tapefile: PathBuf,
        /// Reject unterminated blocks and a missing initial state
        #[arg(long)]
        strict: bool,
    },
    /// Describe the accepted file formats
    Formats,
}

fn path_str(path: &Path) -> Result<&str> {
    path.to_str()
        .ok_or_else(|| eyre!("Error: {} is not a valid UTF-8 path", path.display()))
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    match cli.command {
        Commands::Display {
            autofile,
            json,
            dot,
            visualize: show_window,
            strict,
        } => {
            let lines = read_automaton_file(path_str(&autofile)?)?;
            let automaton = compile_with(lines, CompileOptions { strict })?;

            let dump = automaton.dump();
            if json {
                println!("{}", dump.to_json()?);
            } else {
                println!("{}", dump);
            }

            if let Some(dot_path) = dot {
                automaton.save_dot(&dot_path)?;
            }

            if show_window {
                visualize(&automaton.state_graph())
                    .map_err(|err| eyre!("Error: Failed to open the visualizer {}", err))?;
            }
        }
        Commands::Run {
            autofile,
            tapefile,
            strict,
        } => {
            let lines = read_automaton_file(path_str(&autofile)?)?;
            let mut automaton = compile_with(lines, CompileOptions { strict })?;
            let mut tape = read_tape_file(path_str(&tapefile)?)?;

            let outcome = automaton.run(&mut tape)?;
            println!("{}", outcome);
        }
        Commands::Formats => {
            println!("{}", FORMATS);
        }
    }

    Ok(())
}
