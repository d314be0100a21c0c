//! Writer for the `FiniteStateMachine` DOT dialect shared by [Nfa](crate::nfa::Nfa)
//! and [Dfa](crate::dfa::Dfa). Node declarations group states by shape
//! (`doublecircle` for accepting states), the start state is marked by an edge
//! from an invisible `start` anchor, and every transition becomes one labeled
//! edge. All state lists and edges are emitted in sorted order so that equal
//! automata serialize to equal text.

use std::fmt::Write;

pub(crate) struct FsmGraph<'a> {
    pub accepting: Vec<&'a str>,
    pub non_accepting: Vec<&'a str>,
    pub start: &'a str,
    /// `(from, to, label)` triples, one per edge.
    pub edges: Vec<(&'a str, &'a str, &'a str)>,
}

impl FsmGraph<'_> {
    pub fn render(mut self) -> String {
        self.accepting.sort_unstable();
        self.non_accepting.sort_unstable();
        self.edges
            .sort_unstable_by_key(|&(from, to, label)| (from, label, to));

        let mut out = String::from("digraph FiniteStateMachine {\n");
        out.push_str("\trankdir=LR;\n");
        if !self.accepting.is_empty() {
            let _ = writeln!(
                out,
                "\tnode [shape = doublecircle]; {};",
                self.accepting.join(" ")
            );
        }
        if !self.non_accepting.is_empty() {
            let _ = writeln!(
                out,
                "\tnode [shape = circle]; {};",
                self.non_accepting.join(" ")
            );
        }
        out.push_str("\tstart [shape=point, style=invis];\n");
        let _ = writeln!(out, "\tstart -> {};", self.start);
        for (from, to, label) in &self.edges {
            let _ = writeln!(out, "\t{from} -> {to} [label = \"{label}\"];");
        }
        out.push_str("}\n");
        out
    }
}
