//! # Regular grammars
//! The grammar module includes the [Grammar] struct which represents a
//! right-linear or left-linear
//! [regular grammar](https://en.wikipedia.org/wiki/Regular_grammar), and its
//! lowering to an [Nfa] recognizing the language the grammar generates.
//!
//! A grammar is written one production per line, with `|` separating
//! alternatives. Each right-hand side is `eps` (the empty string), a single
//! terminal, or a two-symbol string: `aB` (right-linear) or `Ba`
//! (left-linear). The non-terminals are exactly the symbols appearing on a
//! left-hand side, and the first line's left-hand side is the start symbol.
//! Grammars mixing left- and right-linear productions are rejected, as are
//! two-symbol productions where both symbols name non-terminals.
//!
//! ## Example
//! ```
//! use kleene::grammar::Grammar;
//! use kleene::parser;
//!
//! // Strings of an even number of a:s followed by a single a or b
//! let input = "
//! S -> aA | b
//! A -> aS | a
//! ";
//! let grammar: Grammar = parser::grammar(input).unwrap().try_into().unwrap();
//! let nfa = grammar.to_nfa();
//!
//! // One state per non-terminal plus the reserved final state H
//! let names: Vec<_> = nfa.states().iter().map(|s| s.name()).collect();
//! assert_eq!(names, ["S", "A", "H"]);
//! assert_eq!(nfa.initial_state().name(), "S");
//! assert!(nfa.states()[2].is_accepting());
//! ```
//!
//! ## Lowering
//! A right-linear grammar lowers directly: `A → aB` becomes the transition
//! `A —a→ B`, `A → a` becomes `A —a→ H` where `H` is a reserved accepting
//! state, and `A → ε` marks `A` itself accepting. The start state is the
//! start symbol.
//!
//! A left-linear grammar is lowered by reversing it into an automaton for the
//! same language: a fresh start state `F` is introduced, `A → Ba` becomes
//! `B —a→ A`, `A → a` becomes `F —a→ A`, and the accepting states are the
//! start symbol plus every ε-producing non-terminal.

use crate::nfa::{Nfa, NfaState};
use std::collections::HashMap;
use std::rc::Rc;

pub mod parse;

pub use parse::GrammarError;

/// Name of the reserved accepting state a right-linear grammar lowers its
/// terminal-only productions into
pub(crate) const FINAL_STATE: &str = "H";

/// Name of the fresh start state introduced when lowering a left-linear
/// grammar
pub(crate) const FRESH_START: &str = "F";

/// A validated regular grammar. All productions are guaranteed to have one of
/// the allowed shapes, and the grammar is guaranteed to be single-direction:
/// either no production is left-linear, or none is right-linear.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grammar<'a> {
    pub(crate) nonterminals: Vec<&'a str>,
    pub(crate) start: &'a str,
    pub(crate) productions: Vec<Production<'a>>,
    pub(crate) left_linear: bool,
}

/// A single production `lhs → body`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Production<'a> {
    pub(crate) lhs: &'a str,
    pub(crate) body: ProductionBody<'a>,
}

/// The classified right-hand side of a production
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProductionBody<'a> {
    /// `A → ε`
    Epsilon,
    /// `A → a`
    Terminal(&'a str),
    /// `A → aB`
    RightLinear {
        terminal: &'a str,
        nonterminal: &'a str,
    },
    /// `A → Ba`
    LeftLinear {
        nonterminal: &'a str,
        terminal: &'a str,
    },
}

impl Grammar<'_> {
    /// Gets the non-terminals of this grammar, in declaration order
    pub fn nonterminals(&self) -> &[&str] {
        &self.nonterminals
    }

    /// Gets the start symbol of this grammar
    pub fn start_symbol(&self) -> &str {
        self.start
    }

    /// Checks if this grammar is left-linear. A grammar without any two-symbol
    /// production counts as right-linear.
    pub fn is_left_linear(&self) -> bool {
        self.left_linear
    }

    /// Lowers this grammar to an NFA recognizing the language it generates.
    /// See the [module-level documentation](crate::grammar) for the
    /// construction. The lowered NFA has one state per non-terminal, in
    /// declaration order, followed by the reserved state (`H` or `F`), and
    /// contains no ε-transitions: ε-productions only mark states accepting.
    pub fn to_nfa(&self) -> Nfa {
        let reserved = if self.left_linear {
            FRESH_START
        } else {
            FINAL_STATE
        };
        let state_names: Vec<&str> = self
            .nonterminals
            .iter()
            .copied()
            .chain(std::iter::once(reserved))
            .collect();
        let state_index: HashMap<&str, usize> = state_names
            .iter()
            .enumerate()
            .map(|(idx, name)| (*name, idx))
            .collect();
        let reserved_index = state_names.len() - 1;

        // The alphabet is the set of terminals, in first-seen order
        let mut alphabet: Vec<Rc<str>> = Vec::new();
        let mut symbol_index: HashMap<&str, usize> = HashMap::new();
        for production in &self.productions {
            if let Some(terminal) = production.body.terminal() {
                if !symbol_index.contains_key(terminal) {
                    symbol_index.insert(terminal, alphabet.len());
                    alphabet.push(Rc::from(terminal));
                }
            }
        }

        let mut transitions = vec![vec![Vec::new(); alphabet.len()]; state_names.len()];
        let mut accepting = vec![false; state_names.len()];

        if self.left_linear {
            accepting[state_index[self.start]] = true;
        } else {
            accepting[reserved_index] = true;
        }

        for production in &self.productions {
            let lhs = state_index[production.lhs];
            match &production.body {
                ProductionBody::Epsilon => accepting[lhs] = true,
                ProductionBody::Terminal(terminal) => {
                    let symbol = symbol_index[terminal];
                    if self.left_linear {
                        // reversed grammar: the fresh start consumes the
                        // terminal and enters the producing non-terminal
                        transitions[reserved_index][symbol].push(lhs);
                    } else {
                        transitions[lhs][symbol].push(reserved_index);
                    }
                }
                ProductionBody::RightLinear {
                    terminal,
                    nonterminal,
                } => {
                    transitions[lhs][symbol_index[terminal]].push(state_index[nonterminal]);
                }
                ProductionBody::LeftLinear {
                    nonterminal,
                    terminal,
                } => {
                    // reversed: A → Ba emits B —a→ A
                    transitions[state_index[nonterminal]][symbol_index[terminal]].push(lhs);
                }
            }
        }

        let initial_state = if self.left_linear {
            reserved_index
        } else {
            state_index[self.start]
        };

        let states = state_names
            .iter()
            .zip(transitions)
            .zip(accepting)
            .enumerate()
            .map(|(idx, ((name, transitions), accepting))| NfaState {
                name: Rc::from(*name),
                initial: idx == initial_state,
                accepting,
                epsilon_transitions: Vec::new(),
                transitions,
            })
            .collect();

        Nfa {
            alphabet: alphabet.into(),
            states,
            initial_state,
        }
    }
}

impl ProductionBody<'_> {
    fn terminal(&self) -> Option<&str> {
        match self {
            ProductionBody::Epsilon => None,
            ProductionBody::Terminal(terminal)
            | ProductionBody::RightLinear { terminal, .. }
            | ProductionBody::LeftLinear { terminal, .. } => Some(*terminal),
        }
    }
}
