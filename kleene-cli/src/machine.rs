use crate::{log, Direction, KleeneArgs, MachineArgs};
use kleene::machine::{MealyFromDotError, MealyMachine, MooreFromDotError, MooreMachine};
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
    #[error("error validating Mealy machine: {0}")]
    Mealy(MealyFromDotError<'a>),
    #[error("error validating Moore machine: {0}")]
    Moore(MooreFromDotError<'a>),
}

pub fn run(main_args: &KleeneArgs, args: &MachineArgs) -> Result<(), String> {
    let text = fs::read_to_string(&args.input).map_err(|e| Error::InputFile(e).to_string())?;
    run_machine(main_args, args, &text).map_err(|e| e.to_string())
}

fn run_machine<'a>(
    main_args: &KleeneArgs,
    args: &MachineArgs,
    text: &'a str,
) -> Result<(), Error<'a>> {
    let parsed = parser::dot(text).map_err(Error::DotParse)?;

    let (dot, states) = match args.direction {
        Direction::MealyToMoore => {
            let mealy: MealyMachine = parsed.try_into().map_err(Error::Mealy)?;
            log(
                main_args,
                format!("Parsed Mealy machine with {} states", mealy.states().len()),
            );
            let moore = mealy.to_moore();
            (moore.to_dot(), moore.states().len())
        }
        Direction::MooreToMealy => {
            let moore: MooreMachine = parsed.try_into().map_err(Error::Moore)?;
            log(
                main_args,
                format!("Parsed Moore machine with {} states", moore.states().len()),
            );
            let mealy = moore.to_mealy();
            (mealy.to_dot(), mealy.states().len())
        }
    };
    log(main_args, format!("Converted machine has {states} states"));

    fs::write(&args.output, dot).map_err(Error::OutputFile)?;
    log(
        main_args,
        format!("Wrote converted machine to {}", args.output.display()),
    );
    Ok(())
}
