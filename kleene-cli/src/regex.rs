use crate::{log, KleeneArgs, RegexArgs};
use kleene::regex::{Regex, RegexParseError, ThompsonError};
use std::{fs, io};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("error reading input file: {0}")]
    InputFile(io::Error),
    #[error("error writing output file: {0}")]
    OutputFile(io::Error),
    #[error("error parsing regex: {0}")]
    Parse(#[from] RegexParseError),
    #[error("error building NFA: {0}")]
    Thompson(#[from] ThompsonError),
}

pub fn run(main_args: &KleeneArgs, args: &RegexArgs) -> Result<(), String> {
    run_regex(main_args, args).map_err(|e| e.to_string())
}

fn run_regex(main_args: &KleeneArgs, args: &RegexArgs) -> Result<(), Error> {
    let text = fs::read_to_string(&args.input).map_err(Error::InputFile)?;

    let regex = Regex::parse(&text)?;
    log(
        main_args,
        format!("Parsed regular expression (postfix: {})", regex.postfix()),
    );

    let nfa = regex.to_nfa()?;
    log(main_args, format!("Thompson NFA has {} states", nfa.states().len()));

    let dfa = nfa.to_dfa();
    log(
        main_args,
        format!("Subset construction produced {} states", dfa.states().len()),
    );

    let minimized = dfa.minimize();
    log(
        main_args,
        format!("Minimized DFA has {} states", minimized.states().len()),
    );

    fs::write(&args.output, minimized.to_dot()).map_err(Error::OutputFile)?;
    log(
        main_args,
        format!("Wrote minimized DFA to {}", args.output.display()),
    );
    Ok(())
}
