pub mod error;
pub mod lexer;
pub mod number;
pub mod operator;
pub mod parser;
pub mod syntax;
pub mod token;

use crate::interpreter::number::Number;
use crate::interpreter::parser::ParserConfig;
use crate::interpreter::token::Token;
use anyhow::{Context, Result};
use log::debug;
use string_builder::Builder;
use syntax::expression_tree::Node;

/// Evaluates the given arithmetic expression.
///
/// Trailing input after a complete expression is rejected. Use [`evaluate_with`]
/// to choose otherwise.
///
/// # Arguments
///
/// * `expression`: A text expression in infix format.
///
/// returns: The value of the expression.
///
/// # Examples
///
/// ```
/// use arithmetic_evaluator::interpreter::evaluate;
/// use arithmetic_evaluator::interpreter::number::Number;
/// # use anyhow::Result;
///
/// # fn main() -> Result<()> {
/// assert_eq!(evaluate("2 + 3 * 4")?, Number::Integer(14));
/// assert_eq!(evaluate("10 / 4")?, Number::Real(2.5));
/// # Ok::<(), anyhow::Error>(()) }
/// ```
pub fn evaluate(expression: &str) -> Result<Number> {
    evaluate_with(expression, ParserConfig::default())
}

/// Evaluates the given arithmetic expression with the given parser options.
///
/// # Arguments
///
/// * `expression`: A text expression in infix format.
/// * `config`: Options for the parse.
///
/// returns: The value of the expression.
///
/// # Examples
///
/// ```
/// use arithmetic_evaluator::interpreter::evaluate_with;
/// use arithmetic_evaluator::interpreter::number::Number;
/// use arithmetic_evaluator::interpreter::parser::{ParserConfig, TrailingInput};
/// # use anyhow::Result;
///
/// # fn main() -> Result<()> {
/// let config = ParserConfig::new().with_trailing_input(TrailingInput::Ignore);
/// assert_eq!(evaluate_with("2 3", config)?, Number::Integer(2));
/// # Ok::<(), anyhow::Error>(()) }
/// ```
pub fn evaluate_with(expression: &str, config: ParserConfig) -> Result<Number> {
    let value = parser::parse(expression, config)
        .with_context(|| format!("could not evaluate expression {:?}", expression))?;
    debug!("{:?} evaluated to {}", expression, value);
    Ok(value)
}

/// Converts the given input string into an equivalent expression tree,
/// which is easier to inspect than the original string.
///
/// # Arguments
///
/// * `expression`: The text-representation of the infix expression.
///
/// returns: The equivalent expression tree.
///
/// # Examples
///
/// ```
/// use arithmetic_evaluator::interpreter::{convert, tokens_to_string};
/// # use anyhow::Result;
///
/// # fn main() -> Result<()> {
/// let tree = convert("((2)) + (3 * 4)")?;
/// let regenerated = tokens_to_string(tree.to_infix())?;
/// assert_eq!(regenerated, "2 + 3 * 4");
/// # Ok::<(), anyhow::Error>(()) }
/// ```
pub fn convert(expression: &str) -> Result<Node> {
    convert_with(expression, ParserConfig::default())
}

/// Converts the given input string into an expression tree with the given
/// parser options.
pub fn convert_with(expression: &str, config: ParserConfig) -> Result<Node> {
    let tree = parser::parse_tree(expression, config)
        .with_context(|| format!("could not parse expression {:?}", expression))?;
    debug!("{:?} parsed into {:?}", expression, tree);
    Ok(tree)
}

/// Pretty-prints the given vector of tokens with added whitespace.
///
/// # Arguments
///
/// * `tokens`: The tokens to print.
///
/// returns: A pretty-printed text-version of the given tokens.
///
/// # Examples
///
/// ```
/// use arithmetic_evaluator::interpreter::tokens_to_string;
/// use arithmetic_evaluator::interpreter::token::{Token, TokenKind};
/// # use anyhow::Result;
///
/// # fn main() -> Result<()> {
/// let tokens = vec![
///     Token::new_number(2, 0),
///     Token::new_symbol(TokenKind::Times, 1),
///     Token::new_number(7, 2),
/// ];
/// let pretty_printed_tokens = tokens_to_string(tokens)?;
/// assert_eq!(pretty_printed_tokens, "2 * 7");
/// # Ok::<(), anyhow::Error>(()) }
/// ```
pub fn tokens_to_string(tokens: Vec<Token>) -> Result<String> {
    let mut builder = Builder::new(tokens.len());

    for token in tokens {
        let kind = token.kind();
        if kind.is_operator() {
            builder.append(" ");
            builder.append(token.text());
            builder.append(" ");
        } else if !token.is_end_of_input() {
            builder.append(token.text());
        }
    }

    builder.string().context("Failed to build token string")
}

#[cfg(test)]
mod interpreter_tests {
    use super::*;
    use crate::interpreter::error::{ExpressionError, LexError};
    use crate::interpreter::lexer::tokenize;
    use parameterized_macro::parameterized;
    use pretty_assertions::assert_eq;

    #[test]
    fn simple_expression_regenerates_to_itself() {
        let expression = "1 + 2";

        let tree = convert(expression).unwrap();
        let regenerated_expression = tokens_to_string(tree.to_infix()).unwrap();

        assert_eq!(regenerated_expression, expression)
    }

    #[test]
    fn complex_expression_regenerates_to_itself() {
        let expression = "1 + 2 * (3 - 4) / 5";

        let tree = convert(expression).unwrap();
        let regenerated_expression = tokens_to_string(tree.to_infix()).unwrap();

        assert_eq!(regenerated_expression, expression)
    }

    #[test]
    fn redundant_parentheses_are_stripped_when_regenerating() {
        let redundant_expression = "1 + ((2) * ((3 - 4)) / (5))";
        let expected_expression = "1 + 2 * (3 - 4) / 5";

        let tree = convert(redundant_expression).unwrap();
        let regenerated_expression = tokens_to_string(tree.to_infix()).unwrap();

        assert_eq!(regenerated_expression, expected_expression)
    }

    #[test]
    fn scanned_tokens_print_with_spaced_operators() {
        let tokens = tokenize("(1+2)*3").unwrap();

        assert_eq!(tokens_to_string(tokens).unwrap(), "(1 + 2) * 3");
    }

    #[parameterized(
    expression = {
    "2",
    "2 + 3",
    "2 + 3 * 4",
    "(2 + 3) * 4",
    "10 / 4",
    "8 - 3 - 2",
    "2+3",
    " 2 + 3 ",
    "6 / 3",
    },
    expected_value = {
    "2",
    "5",
    "14",
    "20",
    "2.5",
    "3",
    "5",
    "5",
    "2.0",
    }
    )]
    fn evaluate_expression_returns_correct_value(expression: &str, expected_value: &str) {
        let actual_value = evaluate(expression).unwrap();
        pretty_assertions::assert_eq!(actual_value.to_string(), expected_value);
    }

    #[test]
    fn evaluation_failure_keeps_typed_error() {
        let error = evaluate("2 & 3").unwrap_err();

        assert_eq!(
            error.downcast_ref::<ExpressionError>(),
            Some(&ExpressionError::Lex(LexError {
                character: '&',
                offset: 2
            }))
        );
        assert_eq!(error.to_string(), "could not evaluate expression \"2 & 3\"");
    }

    #[test]
    fn conversion_failure_names_the_expression() {
        let error = convert("(2 + 3").unwrap_err();

        assert!(error.to_string().contains("\"(2 + 3\""));
        assert!(matches!(
            error.downcast_ref::<ExpressionError>(),
            Some(ExpressionError::Syntax(_))
        ));
    }
}
