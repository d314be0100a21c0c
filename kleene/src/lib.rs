//!# kleene
//!
//! `kleene` is a Rust library for constructing and transforming finite
//! automata, built around the Graphviz DOT format as the interchange format.
//! It converts between four equivalent or reducible representations of
//! regular languages — regular expressions, right/left-linear regular
//! grammars, NFAs and DFAs — and additionally converts between Mealy and
//! Moore state machines.
//!
//! ## Usage
//!
//! ```rust
//! use kleene::regex::Regex;
//!
//! // The full pipeline: regex → NFA → DFA → minimized DFA → DOT
//! let regex = Regex::parse("(ab*a|b)*").unwrap();
//! let nfa = regex.to_nfa().unwrap();
//! let dfa = nfa.to_dfa().minimize();
//!
//! assert_eq!(dfa.to_dot(), r#"digraph FiniteStateMachine {
//! 	rankdir=LR;
//! 	node [shape = doublecircle]; S0;
//! 	node [shape = circle]; S1;
//! 	start [shape=point, style=invis];
//! 	start -> S0;
//! 	S0 -> S1 [label = "a"];
//! 	S0 -> S0 [label = "b"];
//! 	S1 -> S0 [label = "a"];
//! 	S1 -> S1 [label = "b"];
//! }
//! "#);
//! ```
//!
//! Every transformation consumes a finished value and produces a new one;
//! nothing is mutated in place, so independent pipelines can run on separate
//! threads without any coordination.
//!
//! ## Pipeline
//!
//! ```text
//! regex text ──▶ [shunting-yard] ──▶ postfix ──▶ [Thompson] ──▶ NFA ┐
//! grammar text ──▶ [grammar lowering] ────────────────────────▶ NFA ┤
//!                                                                   ▼
//!                              [subset construction] ──▶ DFA ──▶ [minimization] ──▶ DFA
//! Moore machine ──▶ Mealy machine, and back
//! ```
//!
//! ## Operations
//!
//! This library currently supports:
//!
//! * [Parsing regular expressions](regex::Regex::parse) and
//!   [compiling them to NFAs](regex::Regex::to_nfa) via the Thompson
//!   construction
//! * [Parsing regular grammars](parser::grammar) and
//!   [lowering them to NFAs](grammar::Grammar::to_nfa), for both right-linear
//!   and left-linear grammars
//! * [Parsing automata from DOT](parser::dot) and serializing them back
//!   ([Nfa](nfa::Nfa::to_dot), [Dfa](dfa::Dfa::to_dot),
//!   [MooreMachine](machine::MooreMachine::to_dot),
//!   [MealyMachine](machine::MealyMachine::to_dot))
//! * [Determinizing NFAs](nfa::Nfa::to_dfa) via the subset construction
//! * [Minimizing DFAs](dfa::Dfa::minimize) with unreachable-state pruning,
//!   partition refinement and canonical renaming
//! * [Checking two DFAs for language equivalence](dfa::Dfa::equivalent_to)
//! * [Converting Moore machines to Mealy machines](machine::MooreMachine::to_mealy)
//!   and [back](machine::MealyMachine::to_moore)

pub mod dfa;
pub mod grammar;
pub mod machine;
pub mod nfa;
pub mod parser;
pub mod regex;

mod dot;
mod util;

pub use util::EPSILON;

#[cfg(test)]
mod tests;
