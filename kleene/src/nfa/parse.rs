use crate::nfa::{Nfa, NfaState};
use crate::parser::{DotStatement, ParsedDot};
use crate::util::{EPSILON, EPSILON_WORD};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NfaFromDotError {
    #[error("there is no start state (no 'start -> …;' edge)")]
    MissingStartState,
    #[error("there are two (or more) start states")]
    MultipleStartStates,
}

impl<'a> TryFrom<ParsedDot<'a>> for Nfa {
    type Error = NfaFromDotError;

    fn try_from(value: ParsedDot<'a>) -> Result<Self, Self::Error> {
        use NfaFromDotError::*;

        let mut names: HashSet<&str> = HashSet::new();
        let mut accepting: HashSet<&str> = HashSet::new();
        let mut edges: Vec<(&str, &str, &str)> = Vec::new();
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
                    names.insert(from);
                    names.insert(to);
                    edges.push((from, to, label));
                }
                // direction, the invisible anchor and node labels carry no
                // automaton structure
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
            let mut alphabet: Vec<&str> = edges
                .iter()
                .map(|(_, _, label)| *label)
                .filter(|label| ![EPSILON, EPSILON_WORD].contains(label))
                .collect();
            alphabet.sort_unstable();
            alphabet.dedup();
            alphabet
        };
        let symbol_index: HashMap<&str, usize> = alphabet
            .iter()
            .enumerate()
            .map(|(idx, symbol)| (*symbol, idx))
            .collect();

        let mut epsilon_transitions = vec![Vec::new(); names.len()];
        let mut transitions = vec![vec![Vec::new(); alphabet.len()]; names.len()];
        for (from, to, label) in edges {
            let from = state_index[from];
            let to = state_index[to];
            if [EPSILON, EPSILON_WORD].contains(&label) {
                epsilon_transitions[from].push(to);
            } else {
                transitions[from][symbol_index[label]].push(to);
            }
        }

        let initial_state = state_index[start];
        let states = names
            .iter()
            .zip(epsilon_transitions)
            .zip(transitions)
            .enumerate()
            .map(|(idx, ((name, epsilon_transitions), transitions))| NfaState {
                name: Rc::from(*name),
                initial: idx == initial_state,
                accepting: accepting.contains(name),
                epsilon_transitions,
                transitions,
            })
            .collect();

        Ok(Nfa {
            alphabet: alphabet.into_iter().map(Rc::from).collect(),
            states,
            initial_state,
        })
    }
}
