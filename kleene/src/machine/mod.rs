//! # Mealy and Moore machines
//! The machine module includes the [MealyMachine] and [MooreMachine] structs,
//! two kinds of finite-state transducers: a
//! [Moore machine](https://en.wikipedia.org/wiki/Moore_machine) attaches an
//! output symbol to every *state*, while a
//! [Mealy machine](https://en.wikipedia.org/wiki/Mealy_machine) attaches an
//! output symbol to every *transition*. Both kinds are parsed from and
//! serialized to DOT graphs: Moore nodes are labeled `name/output`, Mealy
//! edges are labeled `input/output`.
//!
//! ## Conversions
//! [MooreMachine::to_mealy] is the identity on states: every transition
//! `p —a→ q` becomes `p —a/out(q)→ q`. The output the Moore machine would
//! emit in its start state before reading any input has no place in the
//! Mealy model and is dropped.
//!
//! [MealyMachine::to_moore] reconstructs the state-output dependence by
//! splitting: each Mealy state `q` becomes one Moore state per distinct
//! output carried by a transition *entering* `q`, named by appending the
//! output to the state name (`S2` entered with `y1` and `y2` becomes `S2y1`
//! and `S2y2`). A state without incoming transitions stays a single state
//! with the placeholder output `λ`. Every outgoing transition of `q` is
//! replicated on each of its splits.
//!
//! ## Example
//! ```
//! use kleene::machine::{MealyMachine, MooreMachine};
//! use kleene::parser;
//!
//! let input = r#"
//! digraph MealyMachine {
//!   A [label="A"];
//!   B [label="B"];
//!   A -> B [label="x/high"];
//!   B -> B [label="x/low"];
//! }"#;
//! let mealy: MealyMachine = parser::dot(input).unwrap().try_into().unwrap();
//! let moore = mealy.to_moore();
//!
//! // A is never entered, so it keeps one λ-state; B is entered with two
//! // distinct outputs and splits in two
//! let names: Vec<_> = moore.states().iter().map(|s| s.name()).collect();
//! assert_eq!(names, ["A", "Bhigh", "Blow"]);
//! assert_eq!(moore.states()[0].output(), "λ");
//! assert_eq!(moore.states()[1].output(), "high");
//! assert_eq!(moore.states()[2].output(), "low");
//! ```

use std::collections::{BTreeSet, HashMap};
use std::fmt::Write;
use std::rc::Rc;

pub mod parse;

pub use parse::{MealyFromDotError, MooreFromDotError};

/// Output of a Moore state no incoming Mealy transition ever assigns
pub(crate) const LAMBDA: &str = "λ";

/// A Moore machine: states carrying an output symbol, with input-labeled
/// transitions between them. The initial state is optional; none of the
/// conversions require it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MooreMachine {
    pub(crate) states: Vec<MooreState>,
    pub(crate) initial_state: Option<usize>,
}

/// A state in a Moore machine: its name, its output, and one transition per
/// accepted input symbol
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MooreState {
    pub(crate) name: Rc<str>,
    pub(crate) output: Rc<str>,
    /// `(input, destination)` pairs
    pub(crate) transitions: Vec<(Rc<str>, usize)>,
}

/// A Mealy machine: states with output-carrying transitions. The initial
/// state is optional; none of the conversions require it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MealyMachine {
    pub(crate) states: Vec<MealyState>,
    pub(crate) initial_state: Option<usize>,
}

/// A state in a Mealy machine: its name and its outgoing transitions
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MealyState {
    pub(crate) name: Rc<str>,
    pub(crate) transitions: Vec<MealyTransition>,
}

/// One Mealy transition: on `input`, move to `destination` emitting `output`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MealyTransition {
    pub(crate) input: Rc<str>,
    pub(crate) destination: usize,
    pub(crate) output: Rc<str>,
}

impl MooreState {
    /// Gets the name of this state
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the output this state emits when entered
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Gets the transitions of this state as `(input, destination)` pairs
    pub fn transitions(&self) -> &[(Rc<str>, usize)] {
        &self.transitions
    }
}

impl MealyState {
    /// Gets the name of this state
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the transitions of this state
    pub fn transitions(&self) -> &[MealyTransition] {
        &self.transitions
    }
}

impl MealyTransition {
    /// Gets the input symbol triggering this transition
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Gets the index of the destination state
    pub fn destination(&self) -> usize {
        self.destination
    }

    /// Gets the output symbol this transition emits
    pub fn output(&self) -> &str {
        &self.output
    }
}

impl MooreMachine {
    /// Converts this Moore machine to a Mealy machine. States map one to one;
    /// each transition carries the output of the state it enters. The output
    /// of the start state itself is lost in this conversion.
    pub fn to_mealy(&self) -> MealyMachine {
        let states = self
            .states
            .iter()
            .map(|state| MealyState {
                name: state.name.clone(),
                transitions: state
                    .transitions
                    .iter()
                    .map(|(input, destination)| MealyTransition {
                        input: input.clone(),
                        destination: *destination,
                        output: self.states[*destination].output.clone(),
                    })
                    .collect(),
            })
            .collect();
        MealyMachine {
            states,
            initial_state: self.initial_state,
        }
    }

    /// Gets the states of this machine
    pub fn states(&self) -> &[MooreState] {
        &self.states
    }

    /// Gets the initial state of this machine, if one was declared
    pub fn initial_state(&self) -> Option<&MooreState> {
        self.initial_state.map(|idx| &self.states[idx])
    }

    /// Serializes this Moore machine as a DOT graph. Nodes are labeled
    /// `name/output`; edges are labeled with their input symbol. States and
    /// edges are emitted in sorted order.
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph MooreMachine {\n");

        let mut nodes: Vec<&MooreState> = self.states.iter().collect();
        nodes.sort_unstable_by_key(|state| state.name.clone());
        for state in &nodes {
            let _ = writeln!(out, "  {} [label=\"{}/{}\"];", state.name, state.name, state.output);
        }

        if let Some(initial) = self.initial_state {
            let _ = writeln!(out, "  start -> {};", self.states[initial].name);
        }

        let mut edges: Vec<(&str, &str, &str)> = self
            .states
            .iter()
            .flat_map(|state| {
                state.transitions.iter().map(move |(input, destination)| {
                    (
                        state.name.as_ref(),
                        self.states[*destination].name.as_ref(),
                        input.as_ref(),
                    )
                })
            })
            .collect();
        edges.sort_unstable_by_key(|&(from, to, input)| (from, input, to));
        for (from, to, input) in edges {
            let _ = writeln!(out, "  {from} -> {to} [label=\"{input}\"];");
        }

        out.push_str("}\n");
        out
    }
}

impl MealyMachine {
    /// Converts this Mealy machine to a Moore machine by splitting every
    /// state per distinct incoming output. See the
    /// [module-level documentation](crate::machine) for the construction.
    /// Splits of one state are emitted in output order, so the result is
    /// deterministic. The initial state survives only if it has no incoming
    /// transitions (otherwise its entry output, and hence its Moore image,
    /// is undefined).
    pub fn to_moore(&self) -> MooreMachine {
        // distinct outputs entering each state, in sorted order
        let mut incoming: Vec<BTreeSet<Rc<str>>> = vec![BTreeSet::new(); self.states.len()];
        for state in &self.states {
            for transition in &state.transitions {
                incoming[transition.destination].insert(transition.output.clone());
            }
        }

        let mut states = Vec::new();
        // image of (state, entry output), and the full expansion of a state
        let mut image: HashMap<(usize, Rc<str>), usize> = HashMap::new();
        let mut expansions: Vec<Vec<usize>> = vec![Vec::new(); self.states.len()];
        for (idx, state) in self.states.iter().enumerate() {
            if incoming[idx].is_empty() {
                expansions[idx].push(states.len());
                states.push(MooreState {
                    name: state.name.clone(),
                    output: Rc::from(LAMBDA),
                    transitions: Vec::new(),
                });
            } else {
                for output in &incoming[idx] {
                    image.insert((idx, output.clone()), states.len());
                    expansions[idx].push(states.len());
                    states.push(MooreState {
                        name: Rc::from(format!("{}{}", state.name, output)),
                        output: output.clone(),
                        transitions: Vec::new(),
                    });
                }
            }
        }

        // every outgoing transition is replicated on each split of its source
        for (idx, state) in self.states.iter().enumerate() {
            for transition in &state.transitions {
                let destination = image[&(transition.destination, transition.output.clone())];
                for &split in &expansions[idx] {
                    states[split]
                        .transitions
                        .push((transition.input.clone(), destination));
                }
            }
        }
        for state in &mut states {
            state.transitions.sort_by(|(a, _), (b, _)| a.cmp(b));
        }

        let initial_state = self
            .initial_state
            .filter(|&idx| incoming[idx].is_empty())
            .map(|idx| expansions[idx][0]);

        MooreMachine {
            states,
            initial_state,
        }
    }

    /// Gets the states of this machine
    pub fn states(&self) -> &[MealyState] {
        &self.states
    }

    /// Gets the initial state of this machine, if one was declared
    pub fn initial_state(&self) -> Option<&MealyState> {
        self.initial_state.map(|idx| &self.states[idx])
    }

    /// Serializes this Mealy machine as a DOT graph. Edges are labeled
    /// `input/output`. States and edges are emitted in sorted order.
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph MealyMachine {\n");

        let mut nodes: Vec<&str> = self.states.iter().map(|state| state.name.as_ref()).collect();
        nodes.sort_unstable();
        for name in &nodes {
            let _ = writeln!(out, "  {name} [label=\"{name}\"];");
        }

        if let Some(initial) = self.initial_state {
            let _ = writeln!(out, "  start -> {};", self.states[initial].name);
        }

        let mut edges: Vec<(&str, &str, &str, &str)> = self
            .states
            .iter()
            .flat_map(|state| {
                state.transitions.iter().map(move |transition| {
                    (
                        state.name.as_ref(),
                        self.states[transition.destination].name.as_ref(),
                        transition.input.as_ref(),
                        transition.output.as_ref(),
                    )
                })
            })
            .collect();
        edges.sort_unstable_by_key(|&(from, to, input, output)| (from, input, to, output));
        for (from, to, input, output) in edges {
            let _ = writeln!(out, "  {from} -> {to} [label=\"{input}/{output}\"];");
        }

        out.push_str("}\n");
        out
    }
}
