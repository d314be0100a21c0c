use crate::grammar::{Grammar, Production, ProductionBody, FINAL_STATE, FRESH_START};
use crate::parser::ParsedGrammar;
use crate::util::{EPSILON, EPSILON_WORD};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GrammarError<'a> {
    #[error("empty grammar")]
    EmptyGrammar,
    #[error("mixed grammar: both left-linear and right-linear productions are present")]
    MixedGrammar,
    #[error("ambiguous production '{0} -> {1}': '{2}' names a non-terminal where a terminal is expected")]
    AmbiguousSymbol(&'a str, &'a str, &'a str),
    #[error("production '{0} -> {1}' is not ε, a single terminal, aB or Ba")]
    InvalidProduction(&'a str, &'a str),
    #[error("non-terminal '{0}' collides with the reserved state of this grammar direction")]
    ReservedNonterminal(&'a str),
}

impl<'a> TryFrom<ParsedGrammar<'a>> for Grammar<'a> {
    type Error = GrammarError<'a>;

    fn try_from(value: ParsedGrammar<'a>) -> Result<Self, Self::Error> {
        use GrammarError::*;
        let ParsedGrammar { productions } = value;

        if productions.is_empty() {
            return Err(EmptyGrammar);
        }

        // Pass one: every left-hand side is a non-terminal, in declaration
        // order; the first one is the start symbol
        let mut nonterminals = Vec::new();
        let mut nonterminal_set = HashSet::new();
        for production in &productions {
            if nonterminal_set.insert(production.lhs) {
                nonterminals.push(production.lhs);
            }
        }
        let start = nonterminals[0];

        // Pass two: classify the right-hand sides
        let mut classified = Vec::new();
        for production in &productions {
            for &alternative in &production.alternatives {
                classified.push(Production {
                    lhs: production.lhs,
                    body: classify(production.lhs, alternative, &nonterminal_set)?,
                });
            }
        }

        let has_right = classified
            .iter()
            .any(|p| matches!(p.body, ProductionBody::RightLinear { .. }));
        let has_left = classified
            .iter()
            .any(|p| matches!(p.body, ProductionBody::LeftLinear { .. }));
        if has_right && has_left {
            return Err(MixedGrammar);
        }

        let reserved = if has_left { FRESH_START } else { FINAL_STATE };
        if nonterminal_set.contains(reserved) {
            return Err(ReservedNonterminal(reserved));
        }

        Ok(Grammar {
            nonterminals,
            start,
            productions: classified,
            left_linear: has_left,
        })
    }
}

fn classify<'a>(
    lhs: &'a str,
    body: &'a str,
    nonterminals: &HashSet<&'a str>,
) -> Result<ProductionBody<'a>, GrammarError<'a>> {
    use GrammarError::*;
    if body == EPSILON_WORD || body == EPSILON {
        return Ok(ProductionBody::Epsilon);
    }

    let mut boundaries = body.char_indices().map(|(idx, _)| idx);
    let (_, second) = (boundaries.next(), boundaries.next());
    match (second, boundaries.next()) {
        // one symbol is always a terminal, even when it collides with a
        // non-terminal name; only two-symbol bodies consult the non-terminal
        // set
        (None, _) => Ok(ProductionBody::Terminal(body)),
        // two symbols: aB, Ba, or ambiguous
        (Some(split), None) => {
            let (first, second) = body.split_at(split);
            match (nonterminals.contains(first), nonterminals.contains(second)) {
                (true, true) => Err(AmbiguousSymbol(lhs, body, first)),
                (false, true) => Ok(ProductionBody::RightLinear {
                    terminal: first,
                    nonterminal: second,
                }),
                (true, false) => Ok(ProductionBody::LeftLinear {
                    nonterminal: first,
                    terminal: second,
                }),
                (false, false) => Err(InvalidProduction(lhs, body)),
            }
        }
        _ => Err(InvalidProduction(lhs, body)),
    }
}
