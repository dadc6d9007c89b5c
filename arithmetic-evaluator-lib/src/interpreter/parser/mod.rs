mod config;
pub mod reducer;

pub use crate::interpreter::parser::config::{ParserConfig, TrailingInput, DEFAULT_MAX_DEPTH};
use crate::interpreter::error::{ExpressionError, LexError, NestingError, SyntaxError};
use crate::interpreter::lexer::Lexer;
use crate::interpreter::number::Number;
use crate::interpreter::operator::{BinaryOperator, ADDITIVE, MULTIPLICATIVE};
use crate::interpreter::parser::reducer::{Evaluator, Reducer, TreeBuilder};
use crate::interpreter::syntax::expression_tree::Node;
use crate::interpreter::token::{Token, TokenKind};
use log::trace;

/// Where a parser's cursor is in its token stream.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CursorState {
    /// No token has been pulled from the lexer yet.
    BeforeStart,
    InProgress,
    /// The lookahead is the end-of-input token.
    Exhausted,
}

/// A reducer output paired with the operator height of the input it covers.
type Reduced<R> = (<R as Reducer>::Output, usize);

/// A recursive descent parser over the grammar
///
/// ```text
/// expr   ::= term   ( ('+' | '-') term )*
/// term   ::= factor ( ('*' | '/') factor )*
/// factor ::= NUMBER | '(' expr ')'
/// ```
///
/// with exactly one token of lookahead. Tokens are pulled from the lexer only
/// when the cursor advances. A parser is used for a single parse; parsing
/// consumes it.
///
/// Parenthesis nesting past [`ParserConfig::max_depth`] fails with a
/// [`NestingError`] rather than exhausting the stack.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    config: ParserConfig,
    /// The last consumed token.
    current: Option<Token>,
    /// The next unconsumed token.
    lookahead: Option<Token>,
    /// Parentheses currently open.
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(expression: &'a str, config: ParserConfig) -> Parser<'a> {
        Parser {
            lexer: Lexer::new(expression),
            config,
            current: None,
            lookahead: None,
            depth: 0,
        }
    }

    pub fn state(&self) -> CursorState {
        match &self.lookahead {
            None => CursorState::BeforeStart,
            Some(token) if token.is_end_of_input() => CursorState::Exhausted,
            Some(_) => CursorState::InProgress,
        }
    }

    pub fn current(&self) -> Option<&Token> {
        self.current.as_ref()
    }

    pub fn lookahead(&self) -> Option<&Token> {
        self.lookahead.as_ref()
    }

    /// Runs the grammar over the whole input, handing what it recognizes to
    /// the given reducer.
    pub fn parse_with<R: Reducer>(
        mut self,
        reducer: &mut R,
    ) -> Result<R::Output, ExpressionError> {
        self.advance()?;
        let (output, _) = self.expr(reducer)?;
        if self.config.trailing_input == TrailingInput::Reject {
            self.expect(TokenKind::EndOfInput)?;
        }
        Ok(output)
    }

    /// Consumes the lookahead and pulls the next token from the lexer.
    fn advance(&mut self) -> Result<(), LexError> {
        let next = match self.lexer.next_token()? {
            Some(token) => token,
            None => Token::end_of_input(self.lexer.offset()),
        };
        trace!("advancing to lookahead {:?}", next);
        self.current = self.lookahead.replace(next);
        Ok(())
    }

    fn lookahead_is(&self, kind: TokenKind) -> bool {
        matches!(&self.lookahead, Some(token) if token.kind() == kind)
    }

    /// Consumes the lookahead if it is of the given kind.
    fn accept(&mut self, kind: TokenKind) -> Result<bool, LexError> {
        if !self.lookahead_is(kind) {
            return Ok(false);
        }
        self.advance()?;
        Ok(true)
    }

    /// Consumes the lookahead, which must be of the given kind.
    fn expect(&mut self, kind: TokenKind) -> Result<(), ExpressionError> {
        if self.accept(kind)? {
            Ok(())
        } else {
            Err(self.syntax_error(&[kind]).into())
        }
    }

    /// Consumes the lookahead if it is one of the given operators.
    fn accept_operator(
        &mut self,
        operators: &[BinaryOperator],
    ) -> Result<Option<BinaryOperator>, LexError> {
        for operator in operators {
            if self.accept(operator.token_kind())? {
                return Ok(Some(*operator));
            }
        }
        Ok(None)
    }

    fn syntax_error(&self, expected: &[TokenKind]) -> SyntaxError {
        let found = match &self.lookahead {
            Some(token) => token.clone(),
            None => Token::end_of_input(self.lexer.offset()),
        };
        SyntaxError {
            expected: expected.to_vec(),
            found,
        }
    }

    fn nesting_error(&self, offset: usize) -> NestingError {
        NestingError {
            limit: self.config.max_depth,
            offset,
        }
    }

    fn current_offset(&self) -> usize {
        self.current.as_ref().map_or(0, Token::offset)
    }

    /// Height of an operator applied to operands of the given heights.
    fn operator_height<R: Reducer>(
        &self,
        reducer: &R,
        operator_offset: usize,
        left_height: usize,
        right_height: usize,
    ) -> Result<usize, NestingError> {
        let height = left_height.max(right_height) + 1;
        if reducer.nests_operands() && height > self.config.max_depth {
            return Err(self.nesting_error(operator_offset));
        }
        Ok(height)
    }

    /// `expr ::= term ( ('+' | '-') term )*`
    fn expr<R: Reducer>(&mut self, reducer: &mut R) -> Result<Reduced<R>, ExpressionError> {
        let (mut value, mut height) = self.term(reducer)?;
        while let Some(operator) = self.accept_operator(&ADDITIVE)? {
            let operator_offset = self.current_offset();
            let (right, right_height) = self.term(reducer)?;
            height = self.operator_height(reducer, operator_offset, height, right_height)?;
            value = reducer.binary(operator, value, right)?;
        }
        Ok((value, height))
    }

    /// `term ::= factor ( ('*' | '/') factor )*`
    fn term<R: Reducer>(&mut self, reducer: &mut R) -> Result<Reduced<R>, ExpressionError> {
        let (mut value, mut height) = self.factor(reducer)?;
        while let Some(operator) = self.accept_operator(&MULTIPLICATIVE)? {
            let operator_offset = self.current_offset();
            let (right, right_height) = self.factor(reducer)?;
            height = self.operator_height(reducer, operator_offset, height, right_height)?;
            value = reducer.binary(operator, value, right)?;
        }
        Ok((value, height))
    }

    /// `factor ::= NUMBER | '(' expr ')'`
    fn factor<R: Reducer>(&mut self, reducer: &mut R) -> Result<Reduced<R>, ExpressionError> {
        if self.accept(TokenKind::Number)? {
            return match &self.current {
                Some(literal) => Ok((reducer.number(literal)?, 0)),
                None => Err(self.syntax_error(&[TokenKind::Number]).into()),
            };
        }
        if self.accept(TokenKind::LeftParenthesis)? {
            if self.depth == self.config.max_depth {
                return Err(self.nesting_error(self.current_offset()).into());
            }
            self.depth += 1;
            let reduced = self.expr(reducer)?;
            self.expect(TokenKind::RightParenthesis)?;
            self.depth -= 1;
            return Ok(reduced);
        }
        Err(self
            .syntax_error(&[TokenKind::Number, TokenKind::LeftParenthesis])
            .into())
    }
}

/// Evaluates the expression in a single pass, without building a tree.
///
/// # Arguments
///
/// * `expression`: The arithmetic expression to evaluate.
/// * `config`: Options for this parse.
///
/// returns: The value of the expression, or the first error encountered.
pub fn parse(expression: &str, config: ParserConfig) -> Result<Number, ExpressionError> {
    Parser::new(expression, config).parse_with(&mut Evaluator)
}

/// Parses the expression into an expression tree, using the same grammar as
/// [`parse`].
pub fn parse_tree(expression: &str, config: ParserConfig) -> Result<Node, ExpressionError> {
    Parser::new(expression, config).parse_with(&mut TreeBuilder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::error::EvaluationError;
    use parameterized_macro::parameterized;
    use pretty_assertions::assert_eq;

    fn evaluate(expression: &str) -> Result<Number, ExpressionError> {
        parse(expression, ParserConfig::default())
    }

    fn syntax_error(expression: &str) -> SyntaxError {
        match evaluate(expression) {
            Err(ExpressionError::Syntax(error)) => error,
            other => panic!("expected a syntax error, got {:?}", other),
        }
    }

    #[parameterized(
    expression = {
    "2",
    "2 + 3",
    "2 + 3 * 4",
    "(2 + 3) * 4",
    "8 - 3 - 2",
    "2 * 3 - 4 * 5",
    "((((7))))",
    "100 - (20 - 5) * 2",
    },
    expected = {
    2,
    5,
    14,
    20,
    3,
    -14,
    7,
    70,
    }
    )]
    fn integer_expression_evaluates_to_integer(expression: &str, expected: i64) {
        pretty_assertions::assert_eq!(evaluate(expression).unwrap(), Number::Integer(expected));
    }

    #[parameterized(
    expression = {
    "10 / 4",
    "4 / 2",
    "1 + 6 / 4",
    "16 / 4 / 2",
    "(1 + 2) / (2 * 2)",
    },
    expected = {
    2.5,
    2.0,
    2.5,
    2.0,
    0.75,
    }
    )]
    fn division_makes_result_real(expression: &str, expected: f64) {
        pretty_assertions::assert_eq!(evaluate(expression).unwrap(), Number::Real(expected));
    }

    #[test]
    fn whitespace_does_not_change_result() {
        assert_eq!(evaluate("2+3").unwrap(), evaluate(" 2 + 3 ").unwrap());
        assert_eq!(evaluate("(1+2)*3").unwrap(), evaluate("\n( 1\t+ 2 )\r\n* 3").unwrap());
    }

    #[test]
    fn unknown_character_is_a_lex_error() {
        let error = evaluate("2 & 3").unwrap_err();

        assert_eq!(
            error,
            ExpressionError::Lex(LexError {
                character: '&',
                offset: 2
            })
        );
    }

    #[test]
    fn unterminated_group_expects_right_parenthesis() {
        let error = syntax_error("(2 + 3");

        assert_eq!(error.expected, [TokenKind::RightParenthesis]);
        assert_eq!(error.found, Token::end_of_input(6));
        assert_eq!(error.to_string(), "expected RPAREN, found END-OF-INPUT at offset 6");
    }

    #[test]
    fn missing_operand_fails_in_factor() {
        let error = syntax_error("2 +");

        assert_eq!(
            error.expected,
            [TokenKind::Number, TokenKind::LeftParenthesis]
        );
        assert!(error.found.is_end_of_input());
    }

    #[parameterized(
    expression = {
    "",
    ")",
    "* 2",
    "2 * / 3",
    "()",
    },
    offset = {
    0,
    0,
    0,
    4,
    1,
    }
    )]
    fn misplaced_token_is_not_a_factor(expression: &str, offset: usize) {
        let error = syntax_error(expression);

        assert!(error.expects(TokenKind::Number));
        assert!(error.expects(TokenKind::LeftParenthesis));
        pretty_assertions::assert_eq!(error.offset(), offset);
    }

    #[test]
    fn trailing_tokens_are_rejected_by_default() {
        let error = syntax_error("2 3");

        assert_eq!(error.expected, [TokenKind::EndOfInput]);
        assert_eq!(error.found, Token::new(TokenKind::Number, "3", 2));
    }

    #[test]
    fn unbalanced_right_parenthesis_is_trailing_input() {
        let error = syntax_error("(1 + 2))");

        assert_eq!(error.expected, [TokenKind::EndOfInput]);
        assert_eq!(error.offset(), 7);
    }

    #[test]
    fn trailing_tokens_can_be_ignored() {
        let config = ParserConfig::new().with_trailing_input(TrailingInput::Ignore);

        assert_eq!(parse("2 3", config).unwrap(), Number::Integer(2));
        assert_eq!(parse("(1 + 1) 4 5", config).unwrap(), Number::Integer(2));
    }

    #[test]
    fn lex_error_in_lookahead_aborts_even_when_ignoring_trailing_input() {
        let config = ParserConfig::new().with_trailing_input(TrailingInput::Ignore);

        assert!(matches!(
            parse("2 #", config),
            Err(ExpressionError::Lex(LexError { character: '#', .. }))
        ));
    }

    #[test]
    fn division_by_zero_aborts_the_parse() {
        assert_eq!(
            evaluate("1 / (3 - 3)").unwrap_err(),
            ExpressionError::Evaluation(EvaluationError::DivisionByZero)
        );
    }

    #[test]
    fn integer_overflow_aborts_the_parse() {
        assert_eq!(
            evaluate("9223372036854775807 + 1").unwrap_err(),
            ExpressionError::Evaluation(EvaluationError::IntegerOverflow {
                operator: BinaryOperator::Add
            })
        );
    }

    fn nested(depth: usize) -> String {
        format!("{}1{}", "(".repeat(depth), ")".repeat(depth))
    }

    #[test]
    fn nesting_up_to_limit_is_accepted() {
        let config = ParserConfig::new().with_max_depth(8);

        assert_eq!(parse(&nested(8), config).unwrap(), Number::Integer(1));
    }

    #[test]
    fn nesting_past_limit_fails_at_the_parenthesis() {
        let config = ParserConfig::new().with_max_depth(8);

        assert_eq!(
            parse(&nested(9), config).unwrap_err(),
            ExpressionError::Nesting(NestingError {
                limit: 8,
                offset: 8
            })
        );
    }

    #[test]
    fn deep_parentheses_fail_with_an_error() {
        for result in [
            evaluate(&nested(20_000)).map(|_| ()),
            parse_tree(&nested(20_000), ParserConfig::default()).map(|_| ()),
        ] {
            assert_eq!(
                result.unwrap_err(),
                ExpressionError::Nesting(NestingError {
                    limit: DEFAULT_MAX_DEPTH,
                    offset: DEFAULT_MAX_DEPTH
                })
            );
        }
    }

    #[test]
    fn long_operand_chain_evaluates_inline() {
        let expression = vec!["1"; 100_000].join(" + ");

        assert_eq!(evaluate(&expression).unwrap(), Number::Integer(100_000));
    }

    #[test]
    fn tree_height_up_to_limit_is_accepted() {
        let expression = vec!["1"; DEFAULT_MAX_DEPTH + 1].join(" + ");
        let tree = parse_tree(&expression, ParserConfig::default()).unwrap();

        assert_eq!(
            tree.evaluate().unwrap(),
            Number::Integer(DEFAULT_MAX_DEPTH as i64 + 1)
        );
    }

    #[test]
    fn long_operand_chain_is_too_high_for_a_tree() {
        let expression = vec!["1"; 100_000].join(" + ");

        // "1 + " repeats every four characters; the operator past the limit fails.
        assert_eq!(
            parse_tree(&expression, ParserConfig::default()).unwrap_err(),
            ExpressionError::Nesting(NestingError {
                limit: DEFAULT_MAX_DEPTH,
                offset: 2 + 4 * DEFAULT_MAX_DEPTH
            })
        );
    }

    #[test]
    fn cursor_moves_from_before_start_to_exhausted() {
        let mut parser = Parser::new("1", ParserConfig::default());
        assert_eq!(parser.state(), CursorState::BeforeStart);
        assert!(parser.current().is_none());

        parser.advance().unwrap();
        assert_eq!(parser.state(), CursorState::InProgress);
        assert!(parser.current().is_none());

        assert!(parser.accept(TokenKind::Number).unwrap());
        assert_eq!(parser.state(), CursorState::Exhausted);
        assert_eq!(parser.current().map(Token::text), Some("1"));
    }

    #[test]
    fn rejected_accept_leaves_cursor_unchanged() {
        let mut parser = Parser::new("(1)", ParserConfig::default());
        parser.advance().unwrap();

        assert!(!parser.accept(TokenKind::Number).unwrap());
        assert_eq!(
            parser.lookahead(),
            Some(&Token::new(TokenKind::LeftParenthesis, "(", 0))
        );
        assert!(parser.current().is_none());
    }

    #[test]
    fn advancing_past_end_of_input_stays_exhausted() {
        let mut parser = Parser::new("", ParserConfig::default());
        parser.advance().unwrap();

        assert!(parser.accept(TokenKind::EndOfInput).unwrap());
        assert_eq!(parser.state(), CursorState::Exhausted);
        assert!(parser.current().unwrap().is_end_of_input());
    }

    #[test]
    fn tree_has_left_associative_shape() {
        let tree = parse_tree("8 - 3 - 2", ParserConfig::default()).unwrap();

        let expected = Node::new_binary_operation(
            BinaryOperator::Subtract,
            Node::new_binary_operation(
                BinaryOperator::Subtract,
                Node::new_number(8),
                Node::new_number(3),
            ),
            Node::new_number(2),
        );
        assert_eq!(tree, expected);
    }

    #[test]
    fn tree_and_inline_evaluation_agree() {
        for expression in ["2 + 3 * 4", "(2 + 3) * 4", "10 / 4 - 1", "7 - (2 - 3) * 6 / 4"] {
            let tree = parse_tree(expression, ParserConfig::default()).unwrap();

            assert_eq!(tree.evaluate().unwrap(), evaluate(expression).unwrap());
        }
    }
}
