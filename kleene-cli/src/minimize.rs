use crate::{log, KleeneArgs, MinimizeArgs};
use kleene::dfa::{Dfa, DfaFromDotError};
use kleene::parser;
use std::{fs, io};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error<'a> {
    #[error("error reading input file: {0}")]
    InputFile(io::Error),
    #[error("error writing output file: {0}")]
    OutputFile(io::Error),
    #[error("error parsing DOT graph: {0}")]
    DotParse(nom::error::Error<&'a str>),
    #[error("error validating DFA: {0}")]
    Dfa(DfaFromDotError<'a>),
}

pub fn run(main_args: &KleeneArgs, args: &MinimizeArgs) -> Result<(), String> {
    let text = fs::read_to_string(&args.input).map_err(|e| Error::InputFile(e).to_string())?;
    run_minimize(main_args, args, &text).map_err(|e| e.to_string())
}

fn run_minimize<'a>(
    main_args: &KleeneArgs,
    args: &MinimizeArgs,
    text: &'a str,
) -> Result<(), Error<'a>> {
    let dfa: Dfa = parser::dot(text)
        .map_err(Error::DotParse)?
        .try_into()
        .map_err(Error::Dfa)?;
    log(main_args, format!("Parsed DFA with {} states", dfa.states().len()));

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
