use crate::machine::{MealyMachine, MealyState, MealyTransition, MooreMachine, MooreState};
use crate::parser::{DotStatement, ParsedDot};
use std::collections::HashMap;
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MooreFromDotError<'a> {
    #[error("bad label '{1}' for state '{0}': a Moore node label is 'name/output'")]
    BadStateLabel(&'a str, &'a str),
    #[error("state '{0}' is declared multiple times")]
    DuplicateState(&'a str),
    #[error("state '{0}' is used in a transition but has no label declaring its output")]
    UndeclaredState(&'a str),
    #[error("there are two (or more) start states")]
    MultipleStartStates,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MealyFromDotError<'a> {
    #[error("bad label '{1}' on the transition from '{0}': a Mealy edge label is 'input/output'")]
    BadTransitionLabel(&'a str, &'a str),
    #[error("there are two (or more) start states")]
    MultipleStartStates,
}

impl<'a> TryFrom<ParsedDot<'a>> for MooreMachine {
    type Error = MooreFromDotError<'a>;

    fn try_from(value: ParsedDot<'a>) -> Result<Self, Self::Error> {
        use MooreFromDotError::*;

        let mut states: Vec<MooreState> = Vec::new();
        let mut state_index: HashMap<&str, usize> = HashMap::new();
        let mut edges: Vec<(&'a str, &'a str, &'a str)> = Vec::new();
        let mut start = None;

        for statement in value.statements {
            match statement {
                DotStatement::NodeLabel { name, label } => {
                    // the part after the slash is the output; the part before
                    // it just repeats the node name for rendering
                    let output = match label.split_once('/') {
                        Some((_, output)) => output.trim(),
                        None => return Err(BadStateLabel(name, label)),
                    };
                    if state_index.insert(name, states.len()).is_some() {
                        return Err(DuplicateState(name));
                    }
                    states.push(MooreState {
                        name: Rc::from(name),
                        output: Rc::from(output),
                        transitions: Vec::new(),
                    });
                }
                DotStatement::StartEdge(state) => {
                    if start.replace(state).is_some() {
                        return Err(MultipleStartStates);
                    }
                }
                DotStatement::Edge { from, to, label } => edges.push((from, to, label)),
                DotStatement::RankDir(_)
                | DotStatement::StartAnchor
                | DotStatement::NodeShape { .. } => {}
            }
        }

        for (from, to, input) in edges {
            let destination = *state_index.get(to).ok_or(UndeclaredState(to))?;
            let source = *state_index.get(from).ok_or(UndeclaredState(from))?;
            states[source]
                .transitions
                .push((Rc::from(input.trim()), destination));
        }

        let initial_state = match start {
            Some(name) => Some(*state_index.get(name).ok_or(UndeclaredState(name))?),
            None => None,
        };

        Ok(MooreMachine {
            states,
            initial_state,
        })
    }
}

impl<'a> TryFrom<ParsedDot<'a>> for MealyMachine {
    type Error = MealyFromDotError<'a>;

    fn try_from(value: ParsedDot<'a>) -> Result<Self, Self::Error> {
        use MealyFromDotError::*;

        let mut states: Vec<MealyState> = Vec::new();
        let mut state_index: HashMap<&'a str, usize> = HashMap::new();
        let mut register = |name: &'a str, states: &mut Vec<MealyState>| {
            *state_index.entry(name).or_insert_with(|| {
                states.push(MealyState {
                    name: Rc::from(name),
                    transitions: Vec::new(),
                });
                states.len() - 1
            })
        };
        let mut start = None;

        for statement in value.statements {
            match statement {
                DotStatement::NodeLabel { name, .. } => {
                    register(name, &mut states);
                }
                DotStatement::StartEdge(state) => {
                    if start.replace(state).is_some() {
                        return Err(MultipleStartStates);
                    }
                    register(state, &mut states);
                }
                DotStatement::Edge { from, to, label } => {
                    let (input, output) = label
                        .split_once('/')
                        .ok_or(BadTransitionLabel(from, label))?;
                    let destination = register(to, &mut states);
                    let source = register(from, &mut states);
                    states[source].transitions.push(MealyTransition {
                        input: Rc::from(input.trim()),
                        destination,
                        output: Rc::from(output.trim()),
                    });
                }
                DotStatement::RankDir(_)
                | DotStatement::StartAnchor
                | DotStatement::NodeShape { .. } => {}
            }
        }

        let initial_state = start.map(|name| state_index[name]);

        Ok(MealyMachine {
            states,
            initial_state,
        })
    }
}
