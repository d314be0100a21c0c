use crate::dfa::{Dfa, DfaState};
use crate::parser::{DotStatement, ParsedDot};
use crate::util::{EPSILON, EPSILON_WORD};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DfaFromDotError<'a> {
    #[error("there is no start state (no 'start -> …;' edge)")]
    MissingStartState,
    #[error("there are two (or more) start states")]
    MultipleStartStates,
    #[error("nondeterministic transition from '{0}' on symbol '{1}'")]
    NondeterministicTransition(&'a str, &'a str),
    #[error("ε-transition from '{0}' is not allowed in a DFA")]
    EpsilonTransition(&'a str),
}

impl<'a> TryFrom<ParsedDot<'a>> for Dfa {
    type Error = DfaFromDotError<'a>;

    fn try_from(value: ParsedDot<'a>) -> Result<Self, Self::Error> {
        use DfaFromDotError::*;

        let mut names: HashSet<&str> = HashSet::new();
        let mut accepting: HashSet<&str> = HashSet::new();
        let mut edges: Vec<(&'a str, &'a str, &'a str)> = Vec::new();
        let mut start = None;

        for statement in value.statements {
            match statement {
                DotStatement::NodeShape {
                    accepting: double_circle,
                    states,
                } => {
                    names.extend(&states);
                    if double_circle {
                        accepting.extend(states);
                    }
                }
                DotStatement::StartEdge(state) => {
                    if start.replace(state).is_some() {
                        return Err(MultipleStartStates);
                    }
                    names.insert(state);
                }
                DotStatement::Edge { from, to, label } => {
                    if [EPSILON, EPSILON_WORD].contains(&label) {
                        return Err(EpsilonTransition(from));
                    }
                    names.insert(from);
                    names.insert(to);
                    edges.push((from, to, label));
                }
                DotStatement::RankDir(_)
                | DotStatement::StartAnchor
                | DotStatement::NodeLabel { .. } => {}
            }
        }

        let start = start.ok_or(MissingStartState)?;

        let names = {
            let mut names: Vec<&str> = names.into_iter().collect();
            names.sort_unstable();
            names
        };
        let state_index: HashMap<&str, usize> = names
            .iter()
            .enumerate()
            .map(|(idx, name)| (*name, idx))
            .collect();

        let alphabet = {
            let mut alphabet: Vec<&str> = edges.iter().map(|(_, _, label)| *label).collect();
            alphabet.sort_unstable();
            alphabet.dedup();
            alphabet
        };
        let symbol_index: HashMap<&str, usize> = alphabet
            .iter()
            .enumerate()
            .map(|(idx, symbol)| (*symbol, idx))
            .collect();

        let mut transitions = vec![vec![None; alphabet.len()]; names.len()];
        for (from, to, label) in edges {
            let slot = &mut transitions[state_index[from]][symbol_index[label]];
            if slot.replace(state_index[to]).is_some() {
                return Err(NondeterministicTransition(from, label));
            }
        }

        let initial_state = state_index[start];
        let states = names
            .iter()
            .zip(transitions)
            .enumerate()
            .map(|(idx, (name, transitions))| DfaState {
                name: Rc::from(*name),
                initial: idx == initial_state,
                accepting: accepting.contains(name),
                transitions,
            })
            .collect();

        Ok(Dfa {
            alphabet: alphabet.into_iter().map(Rc::from).collect(),
            states,
            initial_state,
        })
    }
}
