use clap::{Parser, Subcommand, ValueEnum};
use std::fmt::Display;
use std::path::PathBuf;
use std::process::ExitCode;

mod determinize;
mod machine;
mod minimize;
mod regex;

#[derive(Debug, Parser)]
#[command(
    name = "kleene",
    version,
    about = "Finite automata transformations over Graphviz DOT files"
)]
pub struct KleeneArgs {
    /// Suppress progress output (errors still go to stderr)
    #[arg(long, global = true)]
    pub quiet: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compile a regular expression into a minimized DFA
    Regex(RegexArgs),
    /// Convert an NFA or a regular grammar into a DFA via the subset
    /// construction
    Determinize(DeterminizeArgs),
    /// Minimize a DFA
    Minimize(MinimizeArgs),
    /// Convert between Mealy and Moore machines
    Machine(MachineArgs),
}

#[derive(Debug, clap::Args)]
pub struct RegexArgs {
    /// File containing the regular expression
    pub input: PathBuf,
    /// File to write the minimized DFA to, as DOT
    pub output: PathBuf,
}

#[derive(Debug, clap::Args)]
pub struct DeterminizeArgs {
    /// Representation of the input file
    #[arg(long, value_enum, default_value = "nfa")]
    pub from: Source,
    /// Input file: an NFA in DOT, or a grammar
    pub input: PathBuf,
    /// File to write the DFA to, as DOT
    pub output: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Source {
    Nfa,
    Grammar,
}

#[derive(Debug, clap::Args)]
pub struct MinimizeArgs {
    /// File containing a DFA in DOT
    pub input: PathBuf,
    /// File to write the minimized DFA to, as DOT
    pub output: PathBuf,
}

#[derive(Debug, clap::Args)]
pub struct MachineArgs {
    /// Which conversion to perform
    #[arg(long, value_enum)]
    pub direction: Direction,
    /// File containing the machine in DOT
    pub input: PathBuf,
    /// File to write the converted machine to, as DOT
    pub output: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Direction {
    MealyToMoore,
    MooreToMealy,
}

fn main() -> ExitCode {
    let args = KleeneArgs::parse();
    let result = match &args.command {
        Command::Regex(cmd) => regex::run(&args, cmd),
        Command::Determinize(cmd) => determinize::run(&args, cmd),
        Command::Minimize(cmd) => minimize::run(&args, cmd),
        Command::Machine(cmd) => machine::run(&args, cmd),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

/// Progress output, suppressed by --quiet
pub fn log(args: &KleeneArgs, message: impl Display) {
    if !args.quiet {
        println!("{message}");
    }
}
