use std::collections::HashSet;
use std::rc::Rc;

/// The empty-string symbol. Special on NFA edges, forbidden in DFA alphabets
/// and in grammar terminals.
pub const EPSILON: &str = "ε";

/// ASCII spelling of [EPSILON] accepted by the input formats.
pub const EPSILON_WORD: &str = "eps";

#[inline]
pub fn alphabet_equal(a: &[Rc<str>], b: &[Rc<str>]) -> bool {
    a.len() == b.len()
        && a.iter().collect::<HashSet<_>>() == b.iter().collect::<HashSet<_>>()
}
