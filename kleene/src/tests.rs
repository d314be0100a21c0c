use crate::dfa::{Dfa, DfaState};
use crate::grammar::{Grammar, GrammarError};
use crate::machine::{MealyMachine, MealyState, MealyTransition, MooreMachine, MooreState};
use crate::nfa::Nfa;
use crate::parser;
use crate::regex::{Regex, RegexParseError, ThompsonError};
use ::regex::Regex as LibRegex;
use proptest::prelude::*;
use rand::prelude::*;
use std::collections::HashSet;
use std::rc::Rc;

/// The full pipeline: regex text to minimized DFA
fn compile(regex: &str) -> Dfa {
    Regex::parse(regex)
        .unwrap()
        .to_nfa()
        .unwrap()
        .to_dfa()
        .minimize()
}

/// Runs a DFA over a string of single-character symbols. A symbol outside the
/// alphabet or a missing transition rejects.
fn dfa_accepts(dfa: &Dfa, input: &str) -> bool {
    let mut state = Some(dfa.initial_state_index());
    for c in input.chars() {
        state = state.and_then(|s| {
            dfa.alphabet()
                .iter()
                .position(|elem| elem.as_ref() == c.to_string())
                .and_then(|symbol| dfa.states()[s].transitions()[symbol])
        });
    }
    state.map_or(false, |s| dfa.states()[s].is_accepting())
}

/// Runs a DFA over a word of alphabet indices
fn dfa_accepts_indices(dfa: &Dfa, word: &[usize]) -> bool {
    let mut state = Some(dfa.initial_state_index());
    for &symbol in word {
        state = state.and_then(|s| dfa.states()[s].transitions()[symbol]);
    }
    state.map_or(false, |s| dfa.states()[s].is_accepting())
}

/// Reference subset evaluation of an NFA over a word of alphabet indices
fn nfa_accepts(nfa: &Nfa, word: &[usize]) -> bool {
    let mut current = nfa.closure_of(&[nfa.initial_state_index()]);
    for &symbol in word {
        let mut next: Vec<usize> = current
            .iter()
            .flat_map(|&state| nfa.states()[state].transitions()[symbol].iter().copied())
            .collect();
        next.sort_unstable();
        next.dedup();
        current = nfa.closure_of(&next);
    }
    current.iter().any(|&state| nfa.states()[state].is_accepting())
}

mod regex_pipeline {
    use super::*;

    #[test]
    fn kleene_star_of_alternation() {
        let expected = r#"digraph FiniteStateMachine {
	rankdir=LR;
	node [shape = doublecircle]; S0;
	node [shape = circle]; S1;
	start [shape=point, style=invis];
	start -> S0;
	S0 -> S1 [label = "a"];
	S0 -> S0 [label = "b"];
	S1 -> S0 [label = "a"];
	S1 -> S1 [label = "b"];
}
"#;
        assert_eq!(compile("(ab*a|b)*").to_dot(), expected);
    }

    #[test]
    fn everything_collapses_to_one_state() {
        let expected = r#"digraph FiniteStateMachine {
	rankdir=LR;
	node [shape = doublecircle]; S0;
	start [shape=point, style=invis];
	start -> S0;
	S0 -> S0 [label = "a"];
	S0 -> S0 [label = "b"];
}
"#;
        assert_eq!(compile("(a*|b*)*").to_dot(), expected);
    }

    #[test]
    fn strings_ending_in_b() {
        let expected = r#"digraph FiniteStateMachine {
	rankdir=LR;
	node [shape = doublecircle]; S1;
	node [shape = circle]; S0;
	start [shape=point, style=invis];
	start -> S0;
	S0 -> S0 [label = "a"];
	S0 -> S1 [label = "b"];
	S1 -> S0 [label = "a"];
	S1 -> S1 [label = "b"];
}
"#;
        assert_eq!(compile("(a*|b*|b)*b").to_dot(), expected);
    }

    #[test]
    fn chained_stars_need_five_states() {
        let expected = r#"digraph FiniteStateMachine {
	rankdir=LR;
	node [shape = doublecircle]; S2 S3;
	node [shape = circle]; S0 S1 S4;
	start [shape=point, style=invis];
	start -> S0;
	S0 -> S4 [label = "a"];
	S1 -> S1 [label = "a"];
	S1 -> S3 [label = "b"];
	S2 -> S1 [label = "a"];
	S2 -> S2 [label = "b"];
	S4 -> S1 [label = "a"];
	S4 -> S2 [label = "b"];
}
"#;
        assert_eq!(compile("ab*b*a*b").to_dot(), expected);
    }

    #[test]
    fn strings_containing_b() {
        let expected = r#"digraph FiniteStateMachine {
	rankdir=LR;
	node [shape = doublecircle]; S1;
	node [shape = circle]; S0;
	start [shape=point, style=invis];
	start -> S0;
	S0 -> S0 [label = "a"];
	S0 -> S1 [label = "b"];
	S0 -> S0 [label = "c"];
	S1 -> S1 [label = "a"];
	S1 -> S1 [label = "b"];
	S1 -> S1 [label = "c"];
}
"#;
        assert_eq!(compile("(a*c*a*)*b(a*b*c*)*").to_dot(), expected);
    }

    #[test]
    fn empty_regex_accepts_empty_string_only() {
        let nfa = Regex::parse("").unwrap().to_nfa().unwrap();
        assert_eq!(nfa.states().len(), 1);
        assert!(nfa.states()[0].is_initial());
        assert!(nfa.states()[0].is_accepting());
        assert!(nfa.alphabet().is_empty());
    }

    #[test]
    fn epsilon_is_an_operand() {
        let dfa = compile("0*1(0|ε)");
        assert!(dfa_accepts(&dfa, "1"));
        assert!(dfa_accepts(&dfa, "10"));
        assert!(dfa_accepts(&dfa, "0001"));
        assert!(!dfa_accepts(&dfa, "100"));
        assert!(!dfa_accepts(&dfa, ""));
    }
}

mod shunter {
    use super::*;

    #[test]
    fn inserts_implicit_concatenation() {
        assert_eq!(Regex::parse("ab").unwrap().postfix(), "ab·");
        assert_eq!(Regex::parse("(ab)+").unwrap().postfix(), "ab·+");
        assert_eq!(Regex::parse("a*b").unwrap().postfix(), "a*b·");
        assert_eq!(Regex::parse("a(b|c)").unwrap().postfix(), "abc|·");
        assert_eq!(Regex::parse("aεb").unwrap().postfix(), "aε·b·");
    }

    #[test]
    fn operator_precedence() {
        // alternation binds loosest, postfix repetition tightest
        assert_eq!(Regex::parse("a|b*").unwrap().postfix(), "ab*|");
        assert_eq!(Regex::parse("ab|c").unwrap().postfix(), "ab·c|");
        assert_eq!(Regex::parse("(ab*a|b)*").unwrap().postfix(), "ab*·a·b|*");
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(Regex::parse("  ab \n").unwrap().postfix(), "ab·");
    }

    #[test]
    fn unbalanced_parentheses_are_rejected() {
        assert_eq!(
            Regex::parse("(a"),
            Err(RegexParseError::UnbalancedParentheses)
        );
        assert_eq!(
            Regex::parse("a)"),
            Err(RegexParseError::UnbalancedParentheses)
        );
        assert_eq!(
            Regex::parse("((a)"),
            Err(RegexParseError::UnbalancedParentheses)
        );
    }

    #[test]
    fn unknown_characters_are_rejected() {
        assert_eq!(Regex::parse("a&b"), Err(RegexParseError::InvalidToken('&')));
        assert_eq!(Regex::parse("a b"), Err(RegexParseError::InvalidToken(' ')));
    }
}

mod thompson {
    use super::*;

    #[test]
    fn operand_arity_is_checked() {
        assert_eq!(
            Regex::parse("a|").unwrap().to_nfa(),
            Err(ThompsonError::MissingOperands {
                operator: '|',
                required: 2,
                available: 1,
            })
        );
        assert_eq!(
            Regex::parse("*").unwrap().to_nfa(),
            Err(ThompsonError::MissingOperands {
                operator: '*',
                required: 1,
                available: 0,
            })
        );
    }

    #[test]
    fn concatenation_wires_fragments_with_epsilon() {
        let nfa = Regex::parse("ab").unwrap().to_nfa().unwrap();
        // operand fragments in creation order: S0 —a→ S1, S2 —b→ S3,
        // concatenation adds S1 —ε→ S2
        let names: Vec<_> = nfa.states().iter().map(|s| s.name()).collect();
        assert_eq!(names, ["S0", "S1", "S2", "S3"]);
        assert_eq!(nfa.initial_state().name(), "S0");
        assert_eq!(nfa.states()[1].epsilon_transitions(), [2]);
        assert!(nfa.states()[3].is_accepting());
        assert_eq!(
            nfa.states().iter().filter(|s| s.is_accepting()).count(),
            1
        );
    }

    #[test]
    fn plus_has_no_bypass() {
        let star = Regex::parse("a*").unwrap().to_nfa().unwrap().to_dfa();
        let plus = Regex::parse("a+").unwrap().to_nfa().unwrap().to_dfa();
        assert!(!star.equivalent_to(&plus));
        assert!(dfa_accepts(&star, ""));
        assert!(!dfa_accepts(&plus, ""));
        assert!(dfa_accepts(&plus, "aa"));
    }
}

mod determinizer {
    use super::*;

    #[test]
    fn subsets_get_canonical_names() {
        let input = r#"
digraph FiniteStateMachine {
    rankdir=LR;
    node [shape = doublecircle]; C;
    node [shape = circle]; A B;
    start [shape=point, style=invis];
    start -> A;
    A -> A [label = "a"];
    A -> B [label = "a"];
    B -> C [label = "b"];
    B -> B [label = "ε"];
}"#;
        let nfa: Nfa = parser::dot(input).unwrap().try_into().unwrap();
        let dfa = nfa.to_dfa();
        let names: Vec<_> = dfa.states().iter().map(|s| s.name()).collect();
        assert_eq!(names, ["A", "A_B", "C"]);
        // the same subset reached along different paths collapses
        assert_eq!(dfa.initial_state().name(), "A");
        assert!(dfa.states()[2].is_accepting());
        assert!(!dfa.states()[0].is_accepting());
    }

    #[test]
    fn dead_symbols_stay_in_the_alphabet() {
        let input = r#"
digraph FiniteStateMachine {
    node [shape = doublecircle]; B;
    start [shape=point, style=invis];
    start -> A;
    A -> B [label = "a"];
    B -> B [label = "b"];
}"#;
        let nfa: Nfa = parser::dot(input).unwrap().try_into().unwrap();
        let dfa = nfa.to_dfa();
        let alphabet: Vec<_> = dfa.alphabet().iter().map(|s| s.as_ref()).collect();
        assert_eq!(alphabet, ["a", "b"]);
        // "a" has no move from B, "b" has none from A; both stay
        assert_eq!(dfa.states()[0].transitions(), [Some(1), None]);
        assert_eq!(dfa.states()[1].transitions(), [None, Some(1)]);
    }

    proptest! {
        /// The subset construction preserves the language: the DFA accepts a
        /// word exactly when the reference subset evaluation of the NFA does
        #[test]
        fn determinize_preserves_language(
            nfa in nfa_strategy(6, 2),
            words in prop::collection::vec(prop::collection::vec(0..2usize, 0..8), 16)
        ) {
            let dfa = nfa.to_dfa();
            for word in &words {
                prop_assert_eq!(dfa_accepts_indices(&dfa, word), nfa_accepts(&nfa, word));
            }
        }
    }
}

mod minimizer {
    use super::*;

    #[test]
    fn equivalent_and_unreachable_states_are_removed() {
        let input = include_str!("../tests/test_files/unreachable.dot");
        let dfa: Dfa = parser::dot(input).unwrap().try_into().unwrap();
        assert_eq!(dfa.states().len(), 6);

        let expected = r#"digraph FiniteStateMachine {
	rankdir=LR;
	node [shape = doublecircle]; S2;
	node [shape = circle]; S0 S1;
	start [shape=point, style=invis];
	start -> S0;
	S0 -> S1 [label = "0"];
	S0 -> S1 [label = "1"];
	S1 -> S2 [label = "0"];
	S1 -> S2 [label = "1"];
	S2 -> S2 [label = "0"];
	S2 -> S2 [label = "1"];
}
"#;
        assert_eq!(dfa.minimize().to_dot(), expected);
    }

    #[test]
    fn already_minimal_dfa_is_unchanged() {
        let input = r#"
digraph FiniteStateMachine {
    rankdir=LR;
    node [shape = doublecircle]; S1;
    node [shape = circle]; S0 S2;
    start [shape=point, style=invis];
    start -> S0;
    S0 -> S1 [label = "0"];
    S0 -> S2 [label = "1"];
    S1 -> S2 [label = "0"];
    S1 -> S1 [label = "1"];
    S2 -> S2 [label = "0"];
    S2 -> S2 [label = "1"];
}"#;
        let dfa: Dfa = parser::dot(input).unwrap().try_into().unwrap();
        assert_eq!(dfa.minimize(), dfa);
    }

    #[test]
    fn single_state_dfa_keeps_its_name() {
        let input = r#"
digraph FiniteStateMachine {
    node [shape = doublecircle]; only;
    start [shape=point, style=invis];
    start -> only;
    only -> only [label = "a"];
}"#;
        let dfa: Dfa = parser::dot(input).unwrap().try_into().unwrap();
        let minimized = dfa.minimize();
        assert_eq!(minimized.states().len(), 1);
        assert_eq!(minimized.states()[0].name(), "only");
    }

    proptest! {
        /// Minimization preserves the language, never grows the automaton,
        /// leaves no unreachable state, and is idempotent up to renaming
        #[test]
        fn minimize_contract(dfa in dfa_strategy(8, 3)) {
            let minimized = dfa.minimize();
            prop_assert!(minimized.equivalent_to(&dfa));
            prop_assert!(minimized.states().len() <= dfa.states().len());

            // every state of the result is reachable
            let mut reachable = HashSet::from([minimized.initial_state_index()]);
            let mut queue = vec![minimized.initial_state_index()];
            while let Some(state) = queue.pop() {
                for target in minimized.states()[state].transitions().iter().flatten() {
                    if reachable.insert(*target) {
                        queue.push(*target);
                    }
                }
            }
            prop_assert_eq!(reachable.len(), minimized.states().len());

            let twice = minimized.minimize();
            prop_assert!(twice.equivalent_to(&minimized));
            prop_assert_eq!(twice.states().len(), minimized.states().len());
        }
    }
}

mod equivalence {
    use super::*;

    #[test]
    fn different_languages_are_not_equivalent() {
        assert!(!compile("a*").equivalent_to(&compile("a+")));
        assert!(!compile("ab").equivalent_to(&compile("ba")));
    }

    #[test]
    fn different_alphabets_are_never_equivalent() {
        assert!(!compile("a").equivalent_to(&compile("b")));
    }

    #[test]
    fn state_names_and_counts_do_not_matter() {
        let minimized = compile("(ab)*");
        let unminimized = Regex::parse("(ab)*").unwrap().to_nfa().unwrap().to_dfa();
        assert!(minimized.equivalent_to(&unminimized));
    }
}

mod grammar {
    use super::*;

    fn parse_grammar(input: &str) -> Result<Grammar, GrammarError> {
        parser::grammar(input).unwrap().try_into()
    }

    #[test]
    fn right_linear_grammar_lowers_directly() {
        let grammar = parse_grammar("S -> aA | b\nA -> aS | a").unwrap();
        assert!(!grammar.is_left_linear());
        let nfa = grammar.to_nfa();

        let names: Vec<_> = nfa.states().iter().map(|s| s.name()).collect();
        assert_eq!(names, ["S", "A", "H"]);
        assert_eq!(nfa.initial_state().name(), "S");
        // alphabet in first-seen order: a then b
        assert_eq!(nfa.states()[0].transitions(), [vec![1], vec![2]]);
        assert_eq!(nfa.states()[1].transitions(), [vec![0, 2], vec![]]);
        assert!(nfa.states()[2].is_accepting());
        assert!(!nfa.states()[0].is_accepting());
    }

    #[test]
    fn right_linear_grammar_through_the_pipeline() {
        let grammar = parse_grammar("S -> aA | b\nA -> aS | a").unwrap();
        let dfa = grammar.to_nfa().to_dfa().minimize();

        // the grammar generates (aa)*(a|b)
        let expected = r#"digraph FiniteStateMachine {
	rankdir=LR;
	node [shape = doublecircle]; S2 S3;
	node [shape = circle]; S0 S1;
	start [shape=point, style=invis];
	start -> S0;
	S0 -> S1 [label = "a"];
	S0 -> S2 [label = "b"];
	S1 -> S3 [label = "a"];
	S3 -> S1 [label = "a"];
	S3 -> S2 [label = "b"];
}
"#;
        assert_eq!(dfa.to_dot(), expected);
    }

    #[test]
    fn epsilon_production_marks_accepting() {
        let grammar = parse_grammar("S -> aA | eps\nA -> aS").unwrap();
        let nfa = grammar.to_nfa();
        assert!(nfa.initial_state().is_accepting());
        // no ε-transitions are ever emitted
        assert!(nfa.states().iter().all(|s| s.epsilon_transitions().is_empty()));

        let dfa = nfa.to_dfa().minimize();
        assert!(dfa.equivalent_to(&compile("(aa)*")));
    }

    #[test]
    fn left_linear_grammar_is_reversed() {
        let grammar = parse_grammar("S -> Ab\nA -> Sa | a").unwrap();
        assert!(grammar.is_left_linear());
        let nfa = grammar.to_nfa();

        // fresh start F, accepting state = the start symbol
        let names: Vec<_> = nfa.states().iter().map(|s| s.name()).collect();
        assert_eq!(names, ["S", "A", "F"]);
        assert_eq!(nfa.initial_state().name(), "F");
        assert!(nfa.states()[0].is_accepting());

        let dfa = nfa.to_dfa().minimize();
        assert!(dfa.equivalent_to(&compile("(ab)+")));
    }

    #[test]
    fn left_linear_single_nonterminal() {
        let grammar = parse_grammar("S -> Sa | a").unwrap();
        let dfa = grammar.to_nfa().to_dfa().minimize();
        assert!(dfa.equivalent_to(&compile("a+")));
    }

    #[test]
    fn mixed_grammar_is_rejected() {
        assert_eq!(
            parse_grammar("S -> aA | Ba\nA -> a\nB -> b"),
            Err(GrammarError::MixedGrammar)
        );
    }

    #[test]
    fn ambiguous_symbols_are_rejected() {
        // two non-terminals in a row
        assert_eq!(
            parse_grammar("S -> AB\nA -> a\nB -> b"),
            Err(GrammarError::AmbiguousSymbol("S", "AB", "A"))
        );
    }

    #[test]
    fn single_symbol_bodies_are_terminals() {
        // a one-symbol body is a terminal even when it collides with a
        // non-terminal name; only two-symbol bodies consult the
        // non-terminal set
        let grammar = parse_grammar("S -> A\nA -> a").unwrap();
        let nfa = grammar.to_nfa();
        let alphabet: Vec<_> = nfa.alphabet().iter().map(|s| s.as_ref()).collect();
        assert_eq!(alphabet, ["A", "a"]);
        // both productions feed the reserved final state
        assert_eq!(nfa.states()[0].transitions(), [vec![2], vec![]]);
        assert_eq!(nfa.states()[1].transitions(), [vec![], vec![2]]);
    }

    #[test]
    fn empty_grammar_is_rejected() {
        let parsed = parser::ParsedGrammar {
            productions: Vec::new(),
        };
        let result: Result<Grammar, _> = parsed.try_into();
        assert_eq!(result.unwrap_err(), GrammarError::EmptyGrammar);
    }

    #[test]
    fn invalid_shapes_are_rejected() {
        assert_eq!(
            parse_grammar("S -> abc"),
            Err(GrammarError::InvalidProduction("S", "abc"))
        );
        assert_eq!(
            parse_grammar("S -> ab"),
            Err(GrammarError::InvalidProduction("S", "ab"))
        );
    }

    #[test]
    fn reserved_state_names_are_rejected() {
        assert_eq!(
            parse_grammar("S -> aH\nH -> a"),
            Err(GrammarError::ReservedNonterminal("H"))
        );
        assert_eq!(
            parse_grammar("S -> Fa\nF -> a"),
            Err(GrammarError::ReservedNonterminal("F"))
        );
    }
}

mod machines {
    use super::*;

    const INPUTS: [&str; 2] = ["x1", "x2"];
    const OUTPUTS: [&str; 3] = ["y1", "y2", "y3"];

    /// Runs a Moore machine from `start`, collecting the outputs of the
    /// states entered. Stops when an input has no transition.
    fn run_moore(moore: &MooreMachine, start: usize, inputs: &[&str]) -> Vec<String> {
        let mut outputs = Vec::new();
        let mut state = start;
        for input in inputs {
            let Some(transition) = moore.states()[state]
                .transitions()
                .iter()
                .find(|t| t.0.as_ref() == *input)
            else {
                break;
            };
            state = transition.1;
            outputs.push(moore.states()[state].output().to_string());
        }
        outputs
    }

    /// Runs a Mealy machine from `start`, collecting transition outputs
    fn run_mealy(mealy: &MealyMachine, start: usize, inputs: &[&str]) -> Vec<String> {
        let mut outputs = Vec::new();
        let mut state = start;
        for input in inputs {
            let Some(transition) = mealy.states()[state]
                .transitions()
                .iter()
                .find(|t| t.input() == *input)
            else {
                break;
            };
            outputs.push(transition.output().to_string());
            state = transition.destination();
        }
        outputs
    }

    #[test]
    fn mealy_to_moore_splits_by_incoming_output() {
        let input = include_str!("../tests/test_files/mealy.dot");
        let mealy: MealyMachine = parser::dot(input).unwrap().try_into().unwrap();
        let moore = mealy.to_moore();

        let expected = r#"digraph MooreMachine {
  S0 [label="S0/λ"];
  S1y2 [label="S1y2/y2"];
  S2y1 [label="S2y1/y1"];
  S2y2 [label="S2y2/y2"];
  S2y3 [label="S2y3/y3"];
  S3y1 [label="S3y1/y1"];
  S3y2 [label="S3y2/y2"];
  S0 -> S2y1 [label="x1"];
  S0 -> S3y1 [label="x2"];
  S1y2 -> S2y2 [label="x1"];
  S1y2 -> S3y2 [label="x2"];
  S2y1 -> S1y2 [label="x1"];
  S2y1 -> S3y1 [label="x2"];
  S2y2 -> S1y2 [label="x1"];
  S2y2 -> S3y1 [label="x2"];
  S2y3 -> S1y2 [label="x1"];
  S2y3 -> S3y1 [label="x2"];
  S3y1 -> S2y3 [label="x1"];
  S3y1 -> S3y2 [label="x2"];
  S3y2 -> S2y3 [label="x1"];
  S3y2 -> S3y2 [label="x2"];
}
"#;
        assert_eq!(moore.to_dot(), expected);
    }

    #[test]
    fn moore_to_mealy_moves_outputs_onto_transitions() {
        let input = include_str!("../tests/test_files/moore.dot");
        let moore: MooreMachine = parser::dot(input).unwrap().try_into().unwrap();
        let mealy = moore.to_mealy();

        let expected = r#"digraph MealyMachine {
  S0_ [label="S0_"];
  S1y2 [label="S1y2"];
  S2y1 [label="S2y1"];
  S2y2 [label="S2y2"];
  S2y3 [label="S2y3"];
  S3y1 [label="S3y1"];
  S3y2 [label="S3y2"];
  S0_ -> S2y1 [label="x1/y1"];
  S0_ -> S3y1 [label="x2/y1"];
  S1y2 -> S2y2 [label="x1/y2"];
  S1y2 -> S3y2 [label="x2/y2"];
  S2y1 -> S1y2 [label="x1/y2"];
  S2y1 -> S3y1 [label="x2/y1"];
  S2y2 -> S1y2 [label="x1/y2"];
  S2y2 -> S3y1 [label="x2/y1"];
  S2y3 -> S1y2 [label="x1/y2"];
  S2y3 -> S3y1 [label="x2/y1"];
  S3y1 -> S2y3 [label="x1/y3"];
  S3y1 -> S3y2 [label="x2/y2"];
  S3y2 -> S2y3 [label="x1/y3"];
  S3y2 -> S3y2 [label="x2/y2"];
}
"#;
        assert_eq!(mealy.to_dot(), expected);
    }

    proptest! {
        /// Moore→Mealy is the identity on states, so the transduction agrees
        /// from every state
        #[test]
        fn moore_to_mealy_preserves_transduction(
            moore in moore_strategy(5),
            words in prop::collection::vec(prop::collection::vec(0..2usize, 0..6), 8)
        ) {
            let mealy = moore.to_mealy();
            for start in 0..moore.states().len() {
                for word in &words {
                    let inputs: Vec<&str> = word.iter().map(|&i| INPUTS[i]).collect();
                    prop_assert_eq!(
                        run_moore(&moore, start, &inputs),
                        run_mealy(&mealy, start, &inputs)
                    );
                }
            }
        }

        /// Mealy→Moore splits every state once per distinct incoming output,
        /// and preserves the transduction from states whose Moore image is
        /// unique (those without incoming transitions)
        #[test]
        fn mealy_to_moore_preserves_transduction(
            mealy in mealy_strategy(5),
            words in prop::collection::vec(prop::collection::vec(0..2usize, 0..6), 8)
        ) {
            let moore = mealy.to_moore();

            let mut incoming: Vec<HashSet<&str>> = vec![HashSet::new(); mealy.states().len()];
            for state in mealy.states() {
                for transition in state.transitions() {
                    incoming[transition.destination()].insert(transition.output());
                }
            }
            let expected_states: usize = incoming.iter().map(|o| o.len().max(1)).sum();
            prop_assert_eq!(moore.states().len(), expected_states);

            for (idx, state) in mealy.states().iter().enumerate() {
                if !incoming[idx].is_empty() {
                    continue;
                }
                // a state without incoming edges keeps its name and gets λ
                let image = moore
                    .states()
                    .iter()
                    .position(|s| s.name() == state.name())
                    .expect("states without incoming edges keep their name");
                prop_assert_eq!(moore.states()[image].output(), "λ");
                for word in &words {
                    let inputs: Vec<&str> = word.iter().map(|&i| INPUTS[i]).collect();
                    prop_assert_eq!(
                        run_mealy(&mealy, idx, &inputs),
                        run_moore(&moore, image, &inputs)
                    );
                }
            }
        }
    }

    prop_compose! {
        fn mealy_strategy(max_states: usize)
            (num_states in 1..max_states)
            (
                transitions in prop::collection::vec(
                    prop::collection::vec(
                        prop::option::of((0..num_states, 0..OUTPUTS.len())),
                        INPUTS.len()..=INPUTS.len()
                    ),
                    num_states..=num_states
                ),
            )
        -> MealyMachine {
            let states = transitions.into_iter().enumerate().map(|(idx, row)| MealyState {
                name: Rc::from(format!("S{idx}")),
                transitions: row.into_iter().enumerate().filter_map(|(input, entry)|
                    entry.map(|(destination, output)| MealyTransition {
                        input: Rc::from(INPUTS[input]),
                        destination,
                        output: Rc::from(OUTPUTS[output]),
                    })
                ).collect(),
            }).collect();
            MealyMachine { states, initial_state: None }
        }
    }

    prop_compose! {
        fn moore_strategy(max_states: usize)
            (num_states in 1..max_states)
            (
                outputs in prop::collection::vec(0..OUTPUTS.len(), num_states..=num_states),
                transitions in prop::collection::vec(
                    prop::collection::vec(prop::option::of(0..num_states), INPUTS.len()..=INPUTS.len()),
                    num_states..=num_states
                ),
            )
        -> MooreMachine {
            let states = outputs.into_iter().zip(transitions).enumerate().map(|(idx, (output, row))| MooreState {
                name: Rc::from(format!("S{idx}")),
                output: Rc::from(OUTPUTS[output]),
                transitions: row.into_iter().enumerate().filter_map(|(input, destination)|
                    destination.map(|d| (Rc::from(INPUTS[input]), d))
                ).collect(),
            }).collect();
            MooreMachine { states, initial_state: None }
        }
    }
}

mod dot_format {
    use super::*;
    use crate::dfa::DfaFromDotError;
    use crate::machine::MooreFromDotError;
    use crate::nfa::NfaFromDotError;

    #[test]
    fn whitespace_is_insignificant() {
        let input = "digraph X{rankdir=LR;node[shape=doublecircle];A;start[shape=point,style=invis];start->A;A->A[label=\"a\"];}";
        let nfa: Nfa = parser::dot(input).unwrap().try_into().unwrap();
        assert_eq!(nfa.states().len(), 1);
        assert!(nfa.states()[0].is_accepting());
    }

    #[test]
    fn serialization_reparses_to_the_same_dfa() {
        let dfa = compile("ab*b*a*b");
        let reparsed: Dfa = parser::dot(&dfa.to_dot()).unwrap().try_into().unwrap();
        assert_eq!(reparsed, dfa);
    }

    #[test]
    fn missing_start_state_is_an_error() {
        let input = r#"
digraph FiniteStateMachine {
    node [shape = circle]; A;
    A -> A [label = "a"];
}"#;
        let parsed = parser::dot(input).unwrap();
        let result: Result<Nfa, _> = parsed.try_into();
        assert_eq!(result.unwrap_err(), NfaFromDotError::MissingStartState);
    }

    #[test]
    fn nondeterminism_is_rejected_for_dfas() {
        let input = r#"
digraph FiniteStateMachine {
    node [shape = circle]; A B;
    start [shape=point, style=invis];
    start -> A;
    A -> A [label = "a"];
    A -> B [label = "a"];
}"#;
        let parsed = parser::dot(input).unwrap();
        let result: Result<Dfa, _> = parsed.try_into();
        assert_eq!(
            result.unwrap_err(),
            DfaFromDotError::NondeterministicTransition("A", "a")
        );
        // the same graph is a perfectly fine NFA
        let nfa: Result<Nfa, _> = parser::dot(input).unwrap().try_into();
        assert!(nfa.is_ok());
    }

    #[test]
    fn epsilon_edges_are_rejected_for_dfas() {
        let input = r#"
digraph FiniteStateMachine {
    start [shape=point, style=invis];
    start -> A;
    A -> B [label = "ε"];
}"#;
        let result: Result<Dfa, _> = parser::dot(input).unwrap().try_into();
        assert_eq!(result.unwrap_err(), DfaFromDotError::EpsilonTransition("A"));
    }

    #[test]
    fn moore_labels_must_carry_an_output() {
        let input = r#"
digraph MooreMachine {
  S0 [label="S0"];
}"#;
        let result: Result<MooreMachine, _> = parser::dot(input).unwrap().try_into();
        assert_eq!(
            result.unwrap_err(),
            MooreFromDotError::BadStateLabel("S0", "S0")
        );
    }

    #[test]
    fn moore_transitions_require_declared_states() {
        let input = r#"
digraph MooreMachine {
  S0 [label="S0/y1"];
  S0 -> S1 [label="x1"];
}"#;
        let result: Result<MooreMachine, _> = parser::dot(input).unwrap().try_into();
        assert_eq!(result.unwrap_err(), MooreFromDotError::UndeclaredState("S1"));
    }
}

proptest! {
    /// The compiled pipeline agrees with the `regex` crate on random
    /// expressions built from the supported operators
    #[test]
    fn pipeline_matches_regex_library(
        regex_str in random_regex(),
        tests in prop::collection::vec("[a-d]{0,10}", 16)
    ) {
        let dfa = compile(&regex_str);
        let lib_regex = LibRegex::new(&format!("^({regex_str})$")).unwrap();
        let symbols: HashSet<char> = regex_str.chars().filter(char::is_ascii_alphanumeric).collect();

        for test in &tests {
            // restrict test strings to the symbols of the expression, since
            // everything else is outside the DFA alphabet anyway
            let s: String = test.chars().filter(|c| symbols.contains(c)).collect();
            prop_assert_eq!(dfa_accepts(&dfa, &s), lib_regex.is_match(&s));
        }
    }

    /// The subset construction does not depend on the order transitions were
    /// recorded in: shuffled copies of one NFA determinize to the same DFA
    #[test]
    fn determinization_ignores_transition_order(nfa in nfa_strategy(6, 2)) {
        let mut shuffled = nfa.clone();
        let mut rng = thread_rng();
        for state in &mut shuffled.states {
            state.epsilon_transitions.shuffle(&mut rng);
            for targets in &mut state.transitions {
                targets.shuffle(&mut rng);
            }
        }
        prop_assert_eq!(nfa.to_dfa(), shuffled.to_dfa());
    }
}

prop_compose! {
    fn dfa_strategy(max_states: usize, alphabet_size: usize)
        (num_states in 1..max_states)
        (
            initial_state in 0..num_states,
            accepting in prop::collection::vec(any::<bool>(), num_states..=num_states),
            transitions in prop::collection::vec(
                prop::collection::vec(prop::option::of(0..num_states), alphabet_size..=alphabet_size),
                num_states..=num_states
            ),
        )
    -> Dfa {
        let states = accepting.into_iter().zip(transitions).enumerate().map(|(idx, (accepting, transitions))| DfaState {
            name: Rc::from(format!("q{idx}")),
            initial: idx == initial_state,
            accepting,
            transitions,
        }).collect();
        let alphabet: Vec<Rc<str>> = ('a'..='z').take(alphabet_size).map(|c| Rc::from(c.to_string())).collect();
        Dfa { alphabet: alphabet.into(), states, initial_state }
    }
}

prop_compose! {
    fn nfa_strategy(max_states: usize, alphabet_size: usize)
        (num_states in 1..max_states)
        (
            initial_state in 0..num_states,
            accepting in prop::collection::vec(any::<bool>(), num_states..=num_states),
            epsilon in prop::collection::vec(subset(num_states), num_states..=num_states),
            transitions in prop::collection::vec(
                prop::collection::vec(subset(num_states), alphabet_size..=alphabet_size),
                num_states..=num_states
            ),
        )
    -> Nfa {
        use crate::nfa::NfaState;
        let states = accepting.into_iter()
            .zip(epsilon)
            .zip(transitions)
            .enumerate()
            .map(|(idx, ((accepting, epsilon_transitions), transitions))| NfaState {
                name: Rc::from(format!("q{idx}")),
                initial: idx == initial_state,
                accepting,
                epsilon_transitions,
                transitions,
            })
            .collect();
        let alphabet: Vec<Rc<str>> = ('a'..='z').take(alphabet_size).map(|c| Rc::from(c.to_string())).collect();
        Nfa { alphabet: alphabet.into(), states, initial_state }
    }
}

prop_compose! {
    /// A random subset of `0..size` as a list of indices
    fn subset(size: usize)(included in prop::collection::vec(any::<bool>(), size..=size)) -> Vec<usize> {
        included.into_iter().enumerate().filter_map(|(idx, b)| b.then_some(idx)).collect()
    }
}

fn random_regex() -> impl Strategy<Value = String> {
    "[a-d]".prop_recursive(8, 64, 10, |inner| {
        prop_oneof![
            10 => prop::collection::vec(inner.clone(), 1..8)
                .prop_map(|vec| format!("({})", vec.join(""))),
            10 => prop::collection::vec(inner.clone(), 1..8).prop_map(|vec| vec.join("|")),
            3 => inner.clone().prop_map(|r| format!("({r})*")),
            3 => inner.clone().prop_map(|r| format!("({r})+")),
        ]
    })
}
