//! # Deterministic Finite Automaton
//! The DFA module includes the [Dfa] struct which represents a
//! [Deterministic finite automaton](https://en.wikipedia.org/wiki/Deterministic_finite_automaton).
//! A [Dfa] is created by [determinizing an Nfa](crate::nfa::Nfa::to_dfa) or by
//! parsing a DOT graph.
//!
//! The DFA is *partial*: a state may lack a transition for some alphabet
//! symbols, in which case the automaton rejects on that symbol. No implicit
//! sink state is ever materialized.
//!
//! ## Example
//! ```
//! use kleene::dfa::Dfa;
//! use kleene::parser;
//!
//! // A DFA accepting all strings with an odd number of a:s
//! let input = r#"
//! digraph FiniteStateMachine {
//!     rankdir=LR;
//!     node [shape = doublecircle]; odd;
//!     node [shape = circle]; even;
//!     start [shape=point, style=invis];
//!     start -> even;
//!     even -> odd [label = "a"];
//!     even -> even [label = "b"];
//!     odd -> even [label = "a"];
//!     odd -> odd [label = "b"];
//! }"#;
//! let dfa: Dfa = parser::dot(input).unwrap().try_into().unwrap();
//! assert_eq!(dfa.initial_state().name(), "even");
//!
//! // Minimization renames states canonically; this DFA is already minimal
//! let minimized = dfa.minimize();
//! assert_eq!(minimized.states().len(), 2);
//! assert!(minimized.equivalent_to(&dfa));
//! ```
//!
//! ## Operations
//! * [Minimizing the DFA](Dfa::minimize) (unreachable-state pruning followed
//!   by partition refinement and canonical renaming)
//! * [Checking language equivalence](Dfa::equivalent_to)
//! * [Serializing back to DOT](Dfa::to_dot)

use crate::dot::FsmGraph;
use crate::util::alphabet_equal;
use std::collections::HashSet;
use std::rc::Rc;

mod minimize;
pub mod parse;

pub use parse::DfaFromDotError;

/// A deterministic finite automaton, defined by its *alphabet* (sorted, never
/// containing ε), a *set of states*, one of the states being its *initial
/// state*, a subset of its states being *accepting states*, and a partial
/// *transition function* from each state upon seeing each element of the
/// alphabet to at most one state. See the
/// [module-level documentation](crate::dfa) for more info.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dfa {
    pub(crate) alphabet: Rc<[Rc<str>]>,
    pub(crate) states: Vec<DfaState>,
    pub(crate) initial_state: usize,
}

/// A state in a DFA, which consists of its name, if it is the initial state or
/// not, if it is accepting or not, and an optional transition for each element
/// of the alphabet
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DfaState {
    pub(crate) name: Rc<str>,
    pub(crate) initial: bool,
    pub(crate) accepting: bool,
    pub(crate) transitions: Vec<Option<usize>>,
}

impl DfaState {
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

    /// Gets the transitions of this state, as an optional state index for each
    /// element of the alphabet, in the alphabet's ordering. `None` means the
    /// automaton rejects on that symbol.
    pub fn transitions(&self) -> &[Option<usize>] {
        self.transitions.as_slice()
    }
}

impl Dfa {
    /// Checks if this DFA is equivalent to another DFA, that is, if they
    /// accept the same language. If the automatons have different alphabets
    /// they are never equivalent, but the order of the alphabet, the number of
    /// states and the state names don't matter. A missing transition is
    /// treated as a permanently rejecting sink.
    pub fn equivalent_to(&self, other: &Dfa) -> bool {
        // if the alphabets are different, they aren't equivalent
        if !alphabet_equal(&self.alphabet, &other.alphabet) {
            return false;
        }

        let alphabet_translation: Vec<usize> = self
            .alphabet
            .iter()
            .map(|elem1| {
                other
                    .alphabet
                    .iter()
                    .position(|elem2| elem1 == elem2)
                    .expect("Alphabets are equal as sets")
            })
            .collect();

        // initially, we explore the (pair of) initial states; `None` is the
        // implicit sink of a partial DFA
        let mut pairs_to_explore = vec![(Some(self.initial_state), Some(other.initial_state))];
        let mut explored_pairs = HashSet::new();
        explored_pairs.insert(pairs_to_explore[0]);

        while let Some((s1, s2)) = pairs_to_explore.pop() {
            // both states must be accepting or rejecting
            let accepting1 = s1.map_or(false, |s| self.states[s].accepting);
            let accepting2 = s2.map_or(false, |s| other.states[s].accepting);
            if accepting1 != accepting2 {
                return false;
            }
            // step both automata on each symbol; new pairs get explored
            for (elem, &other_elem) in alphabet_translation.iter().enumerate() {
                let d1 = s1.and_then(|s| self.states[s].transitions[elem]);
                let d2 = s2.and_then(|s| other.states[s].transitions[other_elem]);
                if explored_pairs.insert((d1, d2)) {
                    pairs_to_explore.push((d1, d2));
                }
            }
        }
        true
    }

    /// Serializes this DFA as a DOT graph in the `FiniteStateMachine` dialect.
    /// The output is sorted and deterministic: two equal DFAs serialize to
    /// equal text.
    pub fn to_dot(&self) -> String {
        let (accepting, non_accepting): (Vec<_>, Vec<_>) =
            self.states.iter().partition(|s| s.accepting);

        let mut edges = Vec::new();
        for state in &self.states {
            for (elem, target) in state.transitions.iter().enumerate() {
                if let Some(target) = target {
                    edges.push((
                        state.name.as_ref(),
                        self.states[*target].name.as_ref(),
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

    /// Gets the alphabet of this DFA, in sorted order
    pub fn alphabet(&self) -> &[Rc<str>] {
        &self.alphabet
    }

    /// Gets the states of this DFA
    pub fn states(&self) -> &[DfaState] {
        self.states.as_slice()
    }

    /// Gets the initial state of this DFA
    pub fn initial_state(&self) -> &DfaState {
        &self.states[self.initial_state]
    }

    /// Get the index of the initial state of this DFA
    pub fn initial_state_index(&self) -> usize {
        self.initial_state
    }
}
