//! # Nondeterministic Finite Automaton, with or without ε-moves
//! The NFA module includes the [Nfa] struct which represents a
//! [Nondeterministic finite automaton](https://en.wikipedia.org/wiki/Nondeterministic_finite_automaton)
//! with or without ε-moves. An [Nfa] is created by compiling a
//! [Regex](crate::regex::Regex), by lowering a [Grammar](crate::grammar::Grammar),
//! or by parsing a DOT graph.
//!
//! ## Example
//! A DOT graph is parsed in two steps, the first one parsing into a
//! [ParsedDot](crate::parser::ParsedDot) and the second one checking the
//! invariants of the described automaton and converting it into an [Nfa] with
//! [TryInto]:
//! ```
//! use kleene::nfa::Nfa;
//! use kleene::parser;
//!
//! // An NFA accepting all strings of a:s and b:s ending with "ab"
//! let input = r#"
//! digraph FiniteStateMachine {
//!     rankdir=LR;
//!     node [shape = doublecircle]; C;
//!     node [shape = circle]; A B;
//!     start [shape=point, style=invis];
//!     start -> A;
//!     A -> A [label = "a"];
//!     A -> A [label = "b"];
//!     A -> B [label = "a"];
//!     B -> C [label = "b"];
//! }"#;
//! let nfa: Nfa = parser::dot(input).unwrap().try_into().unwrap();
//! assert_eq!(nfa.states().len(), 3);
//! assert_eq!(nfa.initial_state().name(), "A");
//!
//! // The subset construction gives an equivalent DFA whose states are the
//! // reachable sets of NFA states
//! let dfa = nfa.to_dfa();
//! let names: Vec<_> = dfa.states().iter().map(|s| s.name()).collect();
//! assert_eq!(names, ["A", "A_B", "A_C"]);
//! ```
//!
//! ## Operations
//! * [Determinizing the NFA](Nfa::to_dfa) via the subset construction
//! * [Computing ε-closures](Nfa::closure)
//! * [Serializing back to DOT](Nfa::to_dot)
//!
//! The state arena and the alphabet are shared `Rc` values, so cloning an
//! [Nfa] never copies any strings.

use crate::dot::FsmGraph;
use crate::util::EPSILON;
use std::collections::HashSet;
use std::mem;
use std::rc::Rc;

mod determinize;
pub mod parse;

pub use parse::NfaFromDotError;

/// A non-deterministic finite automaton, denoted by its alphabet, states and
/// the initial state. The alphabet never contains ε; ε-moves are stored
/// separately per state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Nfa {
    pub(crate) alphabet: Rc<[Rc<str>]>,
    pub(crate) states: Vec<NfaState>,
    pub(crate) initial_state: usize,
}

/// A state in an NFA, which consists of its name, if it is the initial state
/// or not, if it is accepting or not, any amount of epsilon transitions and
/// any amount of transitions for each element of the alphabet
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NfaState {
    pub(crate) name: Rc<str>,
    pub(crate) initial: bool,
    pub(crate) accepting: bool,
    pub(crate) epsilon_transitions: Vec<usize>,
    pub(crate) transitions: Vec<Vec<usize>>,
}

impl NfaState {
    /// Gets the name of this state
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Checks if this state is the initial state
    pub fn is_initial(&self) -> bool {
        self.initial
    }

    /// Checks if this state is accepting
    pub fn is_accepting(&self) -> bool {
        self.accepting
    }

    /// Gets a list of transitions, as sets of state indices for each element
    /// of the alphabet, in the alphabet's ordering
    pub fn transitions(&self) -> &[Vec<usize>] {
        self.transitions.as_slice()
    }

    /// Gets the epsilon transitions as a set of state indices
    pub fn epsilon_transitions(&self) -> &[usize] {
        self.epsilon_transitions.as_slice()
    }
}

impl Nfa {
    /// Gives the epsilon closure of a state, given the state index: the state
    /// itself and every state reachable through ε-moves alone. Returns `None`
    /// if the index is out of bounds.
    ///
    /// ```
    /// use kleene::nfa::Nfa;
    /// use kleene::parser;
    ///
    /// let input = r#"
    /// digraph FiniteStateMachine {
    ///     node [shape = circle]; X Y Z;
    ///     start [shape=point, style=invis];
    ///     start -> X;
    ///     X -> Y [label = "ε"];
    ///     Y -> Z [label = "eps"];
    ///     Z -> X [label = "a"];
    /// }"#;
    /// let nfa: Nfa = parser::dot(input).unwrap().try_into().unwrap();
    /// // States are ordered X, Y, Z; the closure of X is all three
    /// let closure = nfa.closure(0).unwrap();
    /// assert_eq!(closure.len(), 3);
    /// assert_eq!(nfa.closure(1).unwrap().len(), 2);
    /// ```
    pub fn closure(&self, start: usize) -> Option<HashSet<usize>> {
        if start >= self.states.len() {
            return None;
        }
        let mut all = HashSet::new();
        all.insert(start);
        let mut new = vec![start];
        while !new.is_empty() {
            let old_new = mem::take(&mut new);
            for state in old_new {
                for &eps_target in &self.states[state].epsilon_transitions {
                    if all.insert(eps_target) {
                        new.push(eps_target)
                    }
                }
            }
        }
        Some(all)
    }

    /// The epsilon closure of a set of states, as a sorted, deduplicated list
    /// of state indices
    pub(crate) fn closure_of(&self, seed: &[usize]) -> Vec<usize> {
        let mut all: HashSet<usize> = seed.iter().copied().collect();
        let mut new: Vec<usize> = seed.to_vec();
        while !new.is_empty() {
            let old_new = mem::take(&mut new);
            for state in old_new {
                for &eps_target in &self.states[state].epsilon_transitions {
                    if all.insert(eps_target) {
                        new.push(eps_target)
                    }
                }
            }
        }
        let mut result: Vec<usize> = all.into_iter().collect();
        result.sort_unstable();
        result
    }

    /// Serializes this NFA as a DOT graph in the `FiniteStateMachine` dialect.
    /// Every transition becomes one labeled edge; ε-moves are labeled `ε`.
    /// The output is sorted and deterministic.
    pub fn to_dot(&self) -> String {
        let (accepting, non_accepting): (Vec<_>, Vec<_>) = self
            .states
            .iter()
            .partition(|s| s.accepting);

        let mut edges = Vec::new();
        for state in &self.states {
            for &target in &state.epsilon_transitions {
                edges.push((state.name.as_ref(), self.states[target].name.as_ref(), EPSILON));
            }
            for (elem, targets) in state.transitions.iter().enumerate() {
                for &target in targets {
                    edges.push((
                        state.name.as_ref(),
                        self.states[target].name.as_ref(),
                        self.alphabet[elem].as_ref(),
                    ));
                }
            }
        }

        FsmGraph {
            accepting: accepting.into_iter().map(|s| s.name.as_ref()).collect(),
            non_accepting: non_accepting.into_iter().map(|s| s.name.as_ref()).collect(),
            start: &self.states[self.initial_state].name,
            edges,
        }
        .render()
    }

    /// Gets the alphabet of this NFA (never containing ε)
    pub fn alphabet(&self) -> &[Rc<str>] {
        &self.alphabet
    }

    /// Gets the states of this NFA
    pub fn states(&self) -> &[NfaState] {
        self.states.as_slice()
    }

    /// Gets the initial state of this NFA
    pub fn initial_state(&self) -> &NfaState {
        &self.states[self.initial_state]
    }

    /// Get the index of the initial state of this NFA
    pub fn initial_state_index(&self) -> usize {
        self.initial_state
    }
}
