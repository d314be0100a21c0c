//! The subset construction. Each DFA state corresponds to the set of NFA
//! states the automaton can be in, and carries a canonical name derived from
//! that set, so that equal subsets reached along different paths collapse to
//! the same DFA state.

use crate::dfa::{Dfa, DfaState};
use crate::nfa::Nfa;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

impl Nfa {
    /// Converts this NFA to an equivalent DFA using the subset construction.
    ///
    /// The construction starts from the ε-closure of the initial state and
    /// explores, for every alphabet symbol, the ε-closure of the set of states
    /// reachable from the current subset. Every distinct subset becomes one
    /// DFA state named by joining the member state names, sorted
    /// lexicographically, with `_`. A subset without a move on some symbol
    /// simply has no transition for it, so the resulting DFA is partial.
    ///
    /// The DFA alphabet is the NFA alphabet in sorted order. Symbols that no
    /// reachable subset moves on are kept. The resulting state list is sorted
    /// by name, and a DFA state is accepting iff its subset contains an
    /// accepting NFA state.
    ///
    /// ```
    /// use kleene::nfa::Nfa;
    /// use kleene::parser;
    ///
    /// let input = r#"
    /// digraph FiniteStateMachine {
    ///     node [shape = doublecircle]; C;
    ///     node [shape = circle]; A B;
    ///     start [shape=point, style=invis];
    ///     start -> A;
    ///     A -> A [label = "a"];
    ///     A -> B [label = "a"];
    ///     B -> C [label = "b"];
    /// }"#;
    /// let nfa: Nfa = parser::dot(input).unwrap().try_into().unwrap();
    /// let dfa = nfa.to_dfa();
    /// let names: Vec<_> = dfa.states().iter().map(|s| s.name()).collect();
    /// assert_eq!(names, ["A", "A_B", "C"]);
    /// assert_eq!(dfa.initial_state().name(), "A");
    /// assert!(dfa.states()[2].is_accepting());
    /// ```
    pub fn to_dfa(&self) -> Dfa {
        let alphabet = {
            let mut alphabet = self.alphabet.to_vec();
            alphabet.sort_unstable();
            alphabet
        };
        // alphabet_translation[i] is the index in the NFA alphabet of the
        // i'th symbol of the sorted DFA alphabet
        let alphabet_translation: Vec<usize> = alphabet
            .iter()
            .map(|symbol| {
                self.alphabet
                    .iter()
                    .position(|elem| elem == symbol)
                    .expect("DFA alphabet is a permutation of the NFA alphabet")
            })
            .collect();

        let mut subsets: Vec<Vec<usize>> = Vec::new();
        let mut subset_index: HashMap<Vec<usize>, usize> = HashMap::new();
        let mut transitions: Vec<Vec<Option<usize>>> = Vec::new();
        let mut queue = VecDeque::new();

        let start_subset = self.closure_of(&[self.initial_state]);
        subset_index.insert(start_subset.clone(), 0);
        subsets.push(start_subset);
        transitions.push(Vec::new());
        queue.push_back(0);

        while let Some(current) = queue.pop_front() {
            let mut row = vec![None; alphabet.len()];
            for (elem, &nfa_elem) in alphabet_translation.iter().enumerate() {
                let moved = self.move_set(&subsets[current], nfa_elem);
                if moved.is_empty() {
                    continue;
                }
                let closure = self.closure_of(&moved);
                // a subset reached before maps to the state it already has
                let target = match subset_index.get(&closure) {
                    Some(&index) => index,
                    None => {
                        let index = subsets.len();
                        subset_index.insert(closure.clone(), index);
                        subsets.push(closure);
                        transitions.push(Vec::new());
                        queue.push_back(index);
                        index
                    }
                };
                row[elem] = Some(target);
            }
            transitions[current] = row;
        }

        self.finalize_dfa(alphabet, subsets, transitions)
    }

    /// The union of all moves from `states` on the alphabet element with
    /// index `elem`, as a sorted, deduplicated list of state indices
    fn move_set(&self, states: &[usize], elem: usize) -> Vec<usize> {
        let mut destinations: Vec<usize> = states
            .iter()
            .flat_map(|&state| self.states[state].transitions[elem].iter().copied())
            .collect();
        destinations.sort_unstable();
        destinations.dedup();
        destinations
    }

    /// The canonical name of a subset: member names sorted lexicographically,
    /// joined with `_`
    fn subset_name(&self, subset: &[usize]) -> Rc<str> {
        let mut names: Vec<&str> = subset.iter().map(|&idx| self.states[idx].name()).collect();
        names.sort_unstable();
        Rc::from(names.join("_"))
    }

    fn finalize_dfa(
        &self,
        alphabet: Vec<Rc<str>>,
        subsets: Vec<Vec<usize>>,
        transitions: Vec<Vec<Option<usize>>>,
    ) -> Dfa {
        let names: Vec<Rc<str>> = subsets.iter().map(|s| self.subset_name(s)).collect();

        // Sort states by canonical name; slot_of maps registration order to
        // the final state index
        let order = {
            let mut order: Vec<usize> = (0..subsets.len()).collect();
            order.sort_unstable_by_key(|&idx| names[idx].clone());
            order
        };
        let mut slot_of = vec![0; subsets.len()];
        for (slot, &idx) in order.iter().enumerate() {
            slot_of[idx] = slot;
        }

        let states = order
            .iter()
            .map(|&idx| DfaState {
                name: names[idx].clone(),
                initial: idx == 0,
                accepting: subsets[idx]
                    .iter()
                    .any(|&state| self.states[state].accepting),
                transitions: transitions[idx]
                    .iter()
                    .map(|target| target.map(|t| slot_of[t]))
                    .collect(),
            })
            .collect();

        Dfa {
            alphabet: alphabet.into(),
            states,
            initial_state: slot_of[0],
        }
    }
}
