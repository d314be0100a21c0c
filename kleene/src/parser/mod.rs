//! # kleene parser
//! This module contains the parsers for the two textual input formats: the
//! Graphviz DOT dialect used for automata and state machines, and the
//! line-oriented regular-grammar format.
//!
//! ## DOT dialect
//! One `digraph` with an arbitrary name, containing any of these statements
//! (whitespace-insensitive, each terminated by `;`):
//!
//! - `rankdir=LR;`
//! - `node [shape = doublecircle]; s1 s2;` — the listed states are accepting
//! - `node [shape = circle]; s3 s4;` — the listed states are not accepting
//! - `start [shape=point, style=invis];` — the invisible start anchor
//! - `start -> s1;` — marks `s1` as the initial state
//! - `a -> b [label = "x"];` — a transition; several edges between the same
//!   pair of states with different labels are independent
//! - `s [label = "…"];` — a node label; Moore machines use `name/output`
//!   labels on nodes, Mealy machines use `input/output` labels on edges
//!
//! On NFA edges the label `ε` (or `eps`) denotes an ε-move.
//!
//! The same parsed representation serves all four automaton kinds: convert a
//! [ParsedDot] with [TryInto] into an [Nfa](crate::nfa::Nfa),
//! [Dfa](crate::dfa::Dfa), [MooreMachine](crate::machine::MooreMachine) or
//! [MealyMachine](crate::machine::MealyMachine), which checks the invariants
//! of the respective kind.
//!
//! ## Grammar format
//! One production per line, `A -> rhs1 | rhs2 | …`, where each `rhs` is `eps`
//! (or `ε`), a single terminal, or a two-symbol string (`aB` right-linear,
//! `Ba` left-linear). Blank lines and `#` comments are ignored. The first
//! line's left-hand side is the start symbol. Validation and the
//! classification of right-hand sides happen when converting the
//! [ParsedGrammar] into a [Grammar](crate::grammar::Grammar) with [TryInto].

mod dot;
mod grammar;

use nom::{combinator::all_consuming, error::Error, Finish};

/// A parsed DOT graph: the graph name and its statements in file order. Not
/// yet checked against the invariants of any automaton kind.
#[derive(Debug, Clone)]
pub struct ParsedDot<'a> {
    pub graph_name: &'a str,
    pub statements: Vec<DotStatement<'a>>,
}

/// One statement of a DOT graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DotStatement<'a> {
    /// `rankdir=LR;`
    RankDir(&'a str),
    /// `node [shape = doublecircle]; a b;` or `node [shape = circle]; a b;`
    NodeShape {
        accepting: bool,
        states: Vec<&'a str>,
    },
    /// `start [shape=point, style=invis];`
    StartAnchor,
    /// `start -> a;`
    StartEdge(&'a str),
    /// `a -> b [label = "x"];`
    Edge {
        from: &'a str,
        to: &'a str,
        label: &'a str,
    },
    /// `a [label = "x"];`
    NodeLabel { name: &'a str, label: &'a str },
}

/// A parsed grammar: its productions in file order, one entry per line. Not
/// yet checked for the regular-grammar production shapes.
#[derive(Debug, Clone)]
pub struct ParsedGrammar<'a> {
    pub productions: Vec<ParsedProduction<'a>>,
}

/// One grammar line: a left-hand side and its `|`-separated alternatives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedProduction<'a> {
    pub lhs: &'a str,
    pub alternatives: Vec<&'a str>,
}

/// Parses a DOT graph according to the format above. The whole string must be
/// parsable, otherwise this function errors. Note that the result is a
/// [ParsedDot], which is not yet validated; use [TryInto::try_into] to convert
/// it into an automaton of the intended kind.
pub fn dot(input: &str) -> Result<ParsedDot, Error<&str>> {
    all_consuming(dot::full_dot)(input)
        .finish()
        .map(|(_, dot)| dot)
}

/// Parses a grammar according to the format above. The whole string must be
/// parsable, otherwise this function errors. Note that the result is a
/// [ParsedGrammar], which is not yet validated; use [TryInto::try_into] to
/// convert it into a [Grammar](crate::grammar::Grammar).
pub fn grammar(input: &str) -> Result<ParsedGrammar, Error<&str>> {
    all_consuming(grammar::full_grammar)(input)
        .finish()
        .map(|(_, grammar)| grammar)
}
