//! Infix to postfix conversion for regular expressions: a pre-pass inserting
//! the explicit concatenation operator, then Dijkstra's shunting-yard.

use thiserror::Error;

/// The explicit concatenation operator inserted between adjacent units
pub(crate) const CONCAT: char = '·';

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegexParseError {
    #[error("unbalanced parentheses")]
    UnbalancedParentheses,
    #[error("'{0}' is not a valid regex token")]
    InvalidToken(char),
}

pub(crate) fn is_operand(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == 'ε'
}

fn precedence(op: char) -> Option<u8> {
    match op {
        '|' => Some(1),
        CONCAT => Some(2),
        '*' | '+' => Some(3),
        _ => None,
    }
}

/// Inserts [CONCAT] between every position where one unit ends (operand, `)`,
/// `*`, `+`) and the next begins (operand, `(`)
fn insert_concat(regex: &str) -> String {
    let mut result = String::with_capacity(regex.len() * 2);
    let mut previous = None;
    for current in regex.chars() {
        if let Some(previous) = previous {
            let ends_unit = is_operand(previous) || [')', '*', '+'].contains(&previous);
            let begins_unit = is_operand(current) || current == '(';
            if ends_unit && begins_unit {
                result.push(CONCAT);
            }
        }
        result.push(current);
        previous = Some(current);
    }
    result
}

/// Converts an infix regular expression to postfix form. Operands stream to
/// the output; `(` pushes; `)` pops down to the matching opener; an operator
/// pops while the stack top is an operator of higher or equal precedence.
/// All operators are left-associative.
pub(crate) fn to_postfix(regex: &str) -> Result<String, RegexParseError> {
    let mut output = String::new();
    let mut operators: Vec<char> = Vec::new();

    for token in insert_concat(regex).chars() {
        if is_operand(token) {
            output.push(token);
        } else if token == '(' {
            operators.push(token);
        } else if token == ')' {
            loop {
                match operators.pop() {
                    Some('(') => break,
                    Some(top) => output.push(top),
                    None => return Err(RegexParseError::UnbalancedParentheses),
                }
            }
        } else if let Some(prec) = precedence(token) {
            while let Some(&top) = operators.last() {
                if top == '(' || precedence(top).expect("only operators are pushed") < prec {
                    break;
                }
                output.push(top);
                operators.pop();
            }
            operators.push(token);
        } else {
            return Err(RegexParseError::InvalidToken(token));
        }
    }

    while let Some(top) = operators.pop() {
        if top == '(' {
            return Err(RegexParseError::UnbalancedParentheses);
        }
        output.push(top);
    }

    Ok(output)
}
