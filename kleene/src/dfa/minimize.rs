//! DFA minimization: unreachable-state pruning, Moore-style partition
//! refinement and canonical renaming. The result accepts the same language as
//! the input, has no unreachable states and no pair of equivalent states.

use crate::dfa::{Dfa, DfaState};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

impl Dfa {
    /// Minimizes this DFA, returning a new DFA accepting the same language in
    /// which every state is reachable and no two states are equivalent.
    ///
    /// Minimization proceeds in three phases:
    ///
    /// 1. Unreachable states are dropped (breadth-first from the initial
    ///    state). If at most one state remains, it is returned as-is, keeping
    ///    its original name.
    /// 2. The states are partitioned into accepting and non-accepting blocks,
    ///    then refined: two states stay in the same block only if, for every
    ///    alphabet symbol, their transitions lead into the same block (a
    ///    missing transition only matches a missing transition). This repeats
    ///    until the number of blocks is stable.
    /// 3. Blocks are renamed `S0, S1, …`: the block holding the initial state
    ///    first, the rest ordered by their lexicographically least member
    ///    name. The state list of the result is sorted by name.
    ///
    /// ```
    /// use kleene::dfa::Dfa;
    /// use kleene::parser;
    ///
    /// // q1 and q2 are equivalent, and q3 is unreachable
    /// let input = r#"
    /// digraph FiniteStateMachine {
    ///     node [shape = doublecircle]; q1 q2;
    ///     node [shape = circle]; q0 q3;
    ///     start [shape=point, style=invis];
    ///     start -> q0;
    ///     q0 -> q1 [label = "a"];
    ///     q0 -> q2 [label = "b"];
    ///     q1 -> q1 [label = "a"];
    ///     q2 -> q2 [label = "a"];
    ///     q3 -> q0 [label = "a"];
    /// }"#;
    /// let dfa: Dfa = parser::dot(input).unwrap().try_into().unwrap();
    /// let minimized = dfa.minimize();
    /// let names: Vec<_> = minimized.states().iter().map(|s| s.name()).collect();
    /// assert_eq!(names, ["S0", "S1"]);
    /// assert!(minimized.equivalent_to(&dfa));
    /// ```
    pub fn minimize(&self) -> Dfa {
        let pruned = self.reachable_part();
        if pruned.states.len() <= 1 {
            return pruned;
        }
        let (block_of, num_blocks) = pruned.refine_partitions();
        pruned.rename_blocks(&block_of, num_blocks)
    }

    /// The sub-automaton of states reachable from the initial state, with
    /// state order and names preserved
    fn reachable_part(&self) -> Dfa {
        let mut reachable = vec![false; self.states.len()];
        reachable[self.initial_state] = true;
        let mut queue = VecDeque::from([self.initial_state]);
        while let Some(state) = queue.pop_front() {
            for target in self.states[state].transitions.iter().flatten() {
                if !reachable[*target] {
                    reachable[*target] = true;
                    queue.push_back(*target);
                }
            }
        }

        let mut new_index = vec![usize::MAX; self.states.len()];
        let mut next = 0;
        for (idx, keep) in reachable.iter().enumerate() {
            if *keep {
                new_index[idx] = next;
                next += 1;
            }
        }

        let states = self
            .states
            .iter()
            .enumerate()
            .filter(|(idx, _)| reachable[*idx])
            .map(|(_, state)| DfaState {
                name: state.name.clone(),
                initial: state.initial,
                accepting: state.accepting,
                transitions: state
                    .transitions
                    .iter()
                    .map(|target| target.map(|t| new_index[t]))
                    .collect(),
            })
            .collect();

        Dfa {
            alphabet: self.alphabet.clone(),
            states,
            initial_state: new_index[self.initial_state],
        }
    }

    /// Moore-style refinement: returns the block index of every state and the
    /// number of blocks. Block indices of one round carry no meaning into the
    /// next; only the grouping matters.
    fn refine_partitions(&self) -> (Vec<usize>, usize) {
        let num_states = self.states.len();
        let has_accepting = self.states.iter().any(|s| s.accepting);
        let has_rejecting = self.states.iter().any(|s| !s.accepting);

        let mut block_of: Vec<usize> = self
            .states
            .iter()
            .map(|s| usize::from(s.accepting && has_rejecting))
            .collect();
        let mut num_blocks = 1 + usize::from(has_accepting && has_rejecting);

        // States are visited in lexicographic name order, so that block
        // numbering within a round is deterministic
        let order = {
            let mut order: Vec<usize> = (0..num_states).collect();
            order.sort_unstable_by_key(|&idx| self.states[idx].name.clone());
            order
        };

        while num_blocks < num_states {
            let mut group_ids: HashMap<(usize, Vec<i64>), usize> = HashMap::new();
            let mut next_blocks = vec![0; num_states];
            for &state in &order {
                let signature: Vec<i64> = self.states[state]
                    .transitions
                    .iter()
                    .map(|target| target.map_or(-1, |t| block_of[t] as i64))
                    .collect();
                let next_id = group_ids.len();
                let id = *group_ids
                    .entry((block_of[state], signature))
                    .or_insert(next_id);
                next_blocks[state] = id;
            }
            if group_ids.len() == num_blocks {
                break;
            }
            num_blocks = group_ids.len();
            block_of = next_blocks;
        }
        (block_of, num_blocks)
    }

    /// Canonical renaming: the block containing the initial state becomes
    /// `S0`, the remaining blocks follow ordered by their lexicographically
    /// least member name
    fn rename_blocks(&self, block_of: &[usize], num_blocks: usize) -> Dfa {
        let mut members: Vec<Vec<usize>> = vec![Vec::new(); num_blocks];
        let order = {
            let mut order: Vec<usize> = (0..self.states.len()).collect();
            order.sort_unstable_by_key(|&idx| self.states[idx].name.clone());
            order
        };
        for &state in &order {
            members[block_of[state]].push(state);
        }

        let canonical_blocks = {
            let mut blocks: Vec<usize> = (0..num_blocks).collect();
            blocks.sort_unstable_by(|&a, &b| {
                let a_start = members[a].contains(&self.initial_state);
                let b_start = members[b].contains(&self.initial_state);
                b_start
                    .cmp(&a_start)
                    .then_with(|| self.states[members[a][0]].name.cmp(&self.states[members[b][0]].name))
            });
            blocks
        };

        // rank_of_block[b] is the canonical number of block b, so the new name
        // of every state in b is S<rank>
        let mut rank_of_block = vec![0; num_blocks];
        for (rank, &block) in canonical_blocks.iter().enumerate() {
            rank_of_block[block] = rank;
        }

        let names: Vec<Rc<str>> = (0..num_blocks)
            .map(|rank| Rc::from(format!("S{rank}")))
            .collect();

        // The final state list is sorted by name ("S10" sorts before "S2")
        let final_order = {
            let mut final_order: Vec<usize> = (0..num_blocks).collect();
            final_order.sort_unstable_by_key(|&rank| names[rank].clone());
            final_order
        };
        let mut slot_of_rank = vec![0; num_blocks];
        for (slot, &rank) in final_order.iter().enumerate() {
            slot_of_rank[rank] = slot;
        }

        let states = final_order
            .iter()
            .map(|&rank| {
                let representative = members[canonical_blocks[rank]][0];
                let state = &self.states[representative];
                DfaState {
                    name: names[rank].clone(),
                    initial: rank == 0,
                    accepting: state.accepting,
                    transitions: state
                        .transitions
                        .iter()
                        .map(|target| target.map(|t| slot_of_rank[rank_of_block[block_of[t]]]))
                        .collect(),
                }
            })
            .collect();

        Dfa {
            alphabet: self.alphabet.clone(),
            states,
            initial_state: slot_of_rank[0],
        }
    }
}
