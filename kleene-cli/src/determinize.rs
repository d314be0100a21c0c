use crate::{log, DeterminizeArgs, KleeneArgs, Source};
use kleene::grammar::{Grammar, GrammarError};
use kleene::nfa::{Nfa, NfaFromDotError};
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
    #[error("error validating NFA: {0}")]
    Nfa(NfaFromDotError),
    #[error("error parsing grammar: {0}")]
    GrammarParse(nom::error::Error<&'a str>),
    #[error("error validating grammar: {0}")]
    Grammar(GrammarError<'a>),
}

pub fn run(main_args: &KleeneArgs, args: &DeterminizeArgs) -> Result<(), String> {
    let text = fs::read_to_string(&args.input).map_err(|e| Error::InputFile(e).to_string())?;
    run_determinize(main_args, args, &text).map_err(|e| e.to_string())
}

fn run_determinize<'a>(
    main_args: &KleeneArgs,
    args: &DeterminizeArgs,
    text: &'a str,
) -> Result<(), Error<'a>> {
    let nfa = match args.from {
        Source::Nfa => {
            let nfa: Nfa = parser::dot(text)
                .map_err(Error::DotParse)?
                .try_into()
                .map_err(Error::Nfa)?;
            log(main_args, format!("Parsed NFA with {} states", nfa.states().len()));
            nfa
        }
        Source::Grammar => {
            let grammar: Grammar = parser::grammar(text)
                .map_err(Error::GrammarParse)?
                .try_into()
                .map_err(Error::Grammar)?;
            log(
                main_args,
                format!(
                    "Parsed {}-linear grammar with {} non-terminals",
                    if grammar.is_left_linear() { "left" } else { "right" },
                    grammar.nonterminals().len(),
                ),
            );
            grammar.to_nfa()
        }
    };

    let dfa = nfa.to_dfa();
    log(
        main_args,
        format!("Subset construction produced {} states", dfa.states().len()),
    );

    fs::write(&args.output, dfa.to_dot()).map_err(Error::OutputFile)?;
    log(main_args, format!("Wrote DFA to {}", args.output.display()));
    Ok(())
}
