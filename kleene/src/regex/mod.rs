//! # Regular expressions
//! Kleene implements the mathematical core of regular expressions: symbols,
//! concatenation, alternation, Kleene star/plus, grouping, and the empty
//! string ε. This is a subset of the regexes commonly found for pattern
//! matching in programming languages; there are no character classes, anchors
//! or backreferences.
//!
//! ## Syntax
//! Operands are ASCII letters and digits plus the literal `ε`. The operators
//! are `|` (alternation), `*` (zero or more), `+` (one or more) and `(`/`)`
//! for grouping. Concatenation is implicit: `ab` means `a` followed by `b`.
//! Leading and trailing whitespace is ignored; any other character is a
//! syntax error.
//!
//! Here are some examples:
//! * `(ab)+` matches `ab`, `abab`, `ababab`, …
//! * `(ab)*` matches the empty string, `ab`, `abab`, …
//! * `0*1(0|ε)` matches `1`, `10`, `0001` and all other strings containing
//!   the character `1` exactly once, with any zeros only before it and at
//!   most one zero after
//!
//! ## Compilation
//! Parsing runs the input through a shunting-yard pass that inserts the
//! explicit concatenation operator `·` and produces postfix form; the postfix
//! form drives the Thompson construction producing an [Nfa](crate::nfa::Nfa).
//! From there the usual pipeline applies: determinize, then minimize.
//!
//! ```
//! use kleene::regex::Regex;
//!
//! let regex = Regex::parse("(ab)+").unwrap();
//! assert_eq!(regex.postfix(), "ab·+");
//!
//! let regex = Regex::parse("(a*|b*)*").unwrap();
//! let dfa = regex.to_nfa().unwrap().to_dfa().minimize();
//! // Zero or more a:s and b:s in any order: one accepting state suffices
//! assert_eq!(dfa.states().len(), 1);
//! assert_eq!(dfa.states()[0].name(), "S0");
//! assert!(dfa.states()[0].is_accepting());
//! ```

use crate::nfa::Nfa;

mod shunt;
mod thompson;

pub use shunt::RegexParseError;
pub use thompson::ThompsonError;

/// A parsed regular expression, held in postfix form with explicit
/// concatenation (`·`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Regex {
    pub(crate) postfix: String,
}

impl Regex {
    /// Parses a regular expression, converting it from infix to postfix form
    /// with the shunting-yard algorithm. Errors on unbalanced parentheses and
    /// on characters that are neither operands nor operators.
    pub fn parse(input: &str) -> Result<Self, RegexParseError> {
        shunt::to_postfix(input.trim()).map(|postfix| Regex { postfix })
    }

    /// The postfix form of this regular expression
    pub fn postfix(&self) -> &str {
        &self.postfix
    }

    /// Compiles this regular expression to an NFA with ε-moves using the
    /// Thompson construction. The NFA has a single accepting state, and its
    /// alphabet is the set of symbols appearing in the expression. An empty
    /// expression yields a one-state NFA accepting only the empty string.
    pub fn to_nfa(&self) -> Result<Nfa, ThompsonError> {
        thompson::build(&self.postfix)
    }
}
