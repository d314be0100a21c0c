//! The Thompson construction: postfix form drives a stack of NFA fragments
//! over a scratch arena of integer-indexed states. Each fragment is an
//! `(entry, exit)` pair; operators pop fragments, wire them together with
//! ε-moves, and push the combined fragment.

use crate::nfa::{Nfa, NfaState};
use crate::regex::shunt::{is_operand, CONCAT};
use std::collections::HashMap;
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ThompsonError {
    #[error("operator '{operator}' requires {required} operands but only {available} are available")]
    MissingOperands {
        operator: char,
        required: usize,
        available: usize,
    },
    #[error("construction finished with {0} fragments on the stack, expected exactly 1")]
    UnbalancedStack(usize),
}

/// An NFA fragment under construction, identified by its entry and exit
/// states in the scratch arena
#[derive(Debug, Clone, Copy)]
struct Fragment {
    entry: usize,
    exit: usize,
}

#[derive(Debug, Default)]
struct ScratchState {
    epsilon: Vec<usize>,
    /// `(alphabet index, destination)` pairs
    transitions: Vec<(usize, usize)>,
}

#[derive(Debug, Default)]
struct Builder {
    states: Vec<ScratchState>,
    stack: Vec<Fragment>,
    alphabet: Vec<Rc<str>>,
    symbol_indices: HashMap<Rc<str>, usize>,
}

pub(crate) fn build(postfix: &str) -> Result<Nfa, ThompsonError> {
    let mut builder = Builder::default();

    if postfix.is_empty() {
        // The empty expression accepts exactly the empty string
        let lone = builder.new_state();
        return Ok(builder.into_nfa(Fragment {
            entry: lone,
            exit: lone,
        }));
    }

    for token in postfix.chars() {
        match token {
            CONCAT => builder.concatenate()?,
            '|' => builder.alternate()?,
            '*' => builder.star()?,
            '+' => builder.plus()?,
            operand => {
                debug_assert!(is_operand(operand), "the shunter only emits operands");
                builder.operand(operand);
            }
        }
    }

    if builder.stack.len() != 1 {
        return Err(ThompsonError::UnbalancedStack(builder.stack.len()));
    }
    let fragment = builder.stack[0];
    Ok(builder.into_nfa(fragment))
}

impl Builder {
    fn new_state(&mut self) -> usize {
        self.states.push(ScratchState::default());
        self.states.len() - 1
    }

    fn pop_one(&mut self, operator: char) -> Result<Fragment, ThompsonError> {
        self.stack.pop().ok_or(ThompsonError::MissingOperands {
            operator,
            required: 1,
            available: 0,
        })
    }

    fn pop_two(&mut self, operator: char) -> Result<(Fragment, Fragment), ThompsonError> {
        if self.stack.len() < 2 {
            return Err(ThompsonError::MissingOperands {
                operator,
                required: 2,
                available: self.stack.len(),
            });
        }
        let second = self.stack.pop().expect("stack length checked");
        let first = self.stack.pop().expect("stack length checked");
        Ok((first, second))
    }

    /// `a`: a fresh entry transitions to a fresh exit on the operand. An ε
    /// operand becomes an ε-move instead and stays out of the alphabet.
    fn operand(&mut self, symbol: char) {
        let entry = self.new_state();
        let exit = self.new_state();
        if symbol == 'ε' {
            self.states[entry].epsilon.push(exit);
        } else {
            let symbol: Rc<str> = Rc::from(symbol.to_string());
            let next_index = self.alphabet.len();
            let index = *self
                .symbol_indices
                .entry(symbol.clone())
                .or_insert(next_index);
            if index == next_index {
                self.alphabet.push(symbol);
            }
            self.states[entry].transitions.push((index, exit));
        }
        self.stack.push(Fragment { entry, exit });
    }

    /// `F₁F₂`: the exit of the first fragment ε-moves into the entry of the
    /// second
    fn concatenate(&mut self) -> Result<(), ThompsonError> {
        let (first, second) = self.pop_two(CONCAT)?;
        self.states[first.exit].epsilon.push(second.entry);
        self.stack.push(Fragment {
            entry: first.entry,
            exit: second.exit,
        });
        Ok(())
    }

    /// `F₁|F₂`: a fresh entry ε-moves into both fragments, both exits ε-move
    /// into a fresh exit
    fn alternate(&mut self) -> Result<(), ThompsonError> {
        let (first, second) = self.pop_two('|')?;
        let entry = self.new_state();
        let exit = self.new_state();
        self.states[entry].epsilon.push(first.entry);
        self.states[entry].epsilon.push(second.entry);
        self.states[first.exit].epsilon.push(exit);
        self.states[second.exit].epsilon.push(exit);
        self.stack.push(Fragment { entry, exit });
        Ok(())
    }

    /// `F*`: like plus, with an additional ε bypass from the fresh entry to
    /// the fresh exit accepting the empty string
    fn star(&mut self) -> Result<(), ThompsonError> {
        let inner = self.pop_one('*')?;
        let entry = self.new_state();
        let exit = self.new_state();
        self.states[entry].epsilon.push(inner.entry);
        self.states[entry].epsilon.push(exit);
        self.states[inner.exit].epsilon.push(inner.entry);
        self.states[inner.exit].epsilon.push(exit);
        self.stack.push(Fragment { entry, exit });
        Ok(())
    }

    /// `F+`: the fragment must run at least once, so there is no entry→exit
    /// bypass
    fn plus(&mut self) -> Result<(), ThompsonError> {
        let inner = self.pop_one('+')?;
        let entry = self.new_state();
        let exit = self.new_state();
        self.states[entry].epsilon.push(inner.entry);
        self.states[inner.exit].epsilon.push(inner.entry);
        self.states[inner.exit].epsilon.push(exit);
        self.stack.push(Fragment { entry, exit });
        Ok(())
    }

    /// Exports the scratch arena as an [Nfa]. States keep their creation
    /// order and are named `S<index>`; the fragment's exit becomes the only
    /// accepting state.
    fn into_nfa(self, fragment: Fragment) -> Nfa {
        let Builder {
            states, alphabet, ..
        } = self;

        #[cfg(debug_assertions)]
        debug_assert_eq!(
            reachable_from(&states, fragment.entry),
            states.len(),
            "every state of a well-formed fragment stack is reachable from the entry"
        );

        let alphabet_len = alphabet.len();
        let states = states
            .into_iter()
            .enumerate()
            .map(|(index, scratch)| {
                let mut transitions = vec![Vec::new(); alphabet_len];
                for (symbol, target) in scratch.transitions {
                    transitions[symbol].push(target);
                }
                NfaState {
                    name: Rc::from(format!("S{index}")),
                    initial: index == fragment.entry,
                    accepting: index == fragment.exit,
                    epsilon_transitions: scratch.epsilon,
                    transitions,
                }
            })
            .collect();

        Nfa {
            alphabet: alphabet.into(),
            states,
            initial_state: fragment.entry,
        }
    }
}

/// Number of states reachable from `entry` through any transition, used to
/// check the exported graph is connected
#[cfg(debug_assertions)]
fn reachable_from(states: &[ScratchState], entry: usize) -> usize {
    let mut seen = vec![false; states.len()];
    seen[entry] = true;
    let mut queue = vec![entry];
    while let Some(state) = queue.pop() {
        let targets = states[state]
            .epsilon
            .iter()
            .copied()
            .chain(states[state].transitions.iter().map(|&(_, target)| target));
        for target in targets {
            if !seen[target] {
                seen[target] = true;
                queue.push(target);
            }
        }
    }
    seen.iter().filter(|&&s| s).count()
}
