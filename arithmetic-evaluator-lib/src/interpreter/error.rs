use crate::interpreter::operator::BinaryOperator;
use crate::interpreter::token::{Token, TokenKind};
use itertools::Itertools;
use std::error::Error;
use std::fmt;
use std::fmt::Formatter;

/// A character that no token pattern matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub character: char,
    pub offset: usize,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unexpected character {:?} at offset {}",
            self.character, self.offset
        )
    }
}

impl Error for LexError {}

/// The lookahead token was not one the grammar allows at this point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    /// Kinds that would have been accepted, in the order they were tried.
    pub expected: Vec<TokenKind>,
    pub found: Token,
}

impl SyntaxError {
    pub fn offset(&self) -> usize {
        self.found.offset()
    }

    pub fn expects(&self, kind: TokenKind) -> bool {
        self.expected.contains(&kind)
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "expected {}, found {} at offset {}",
            self.expected.iter().join(" or "),
            self.found,
            self.offset()
        )
    }
}

impl Error for SyntaxError {}

/// Arithmetic that cannot produce a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvaluationError {
    LiteralOutOfRange { literal: String, offset: usize },
    IntegerOverflow { operator: BinaryOperator },
    DivisionByZero,
}

impl fmt::Display for EvaluationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            EvaluationError::LiteralOutOfRange { literal, offset } => write!(
                f,
                "literal {} at offset {} does not fit in a 64-bit integer",
                literal, offset
            ),
            EvaluationError::IntegerOverflow { operator } => {
                write!(f, "integer overflow in {}", operator)
            }
            EvaluationError::DivisionByZero => write!(f, "division by zero"),
        }
    }
}

impl Error for EvaluationError {}

/// The expression nests deeper than the parser's configured limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestingError {
    pub limit: usize,
    /// Offset of the parenthesis or operator that went past the limit.
    pub offset: usize,
}

impl fmt::Display for NestingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "more than {} levels deep at offset {}",
            self.limit, self.offset
        )
    }
}

impl Error for NestingError {}

/// Any failure that aborts a parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpressionError {
    Lex(LexError),
    Syntax(SyntaxError),
    Evaluation(EvaluationError),
    Nesting(NestingError),
}

impl fmt::Display for ExpressionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ExpressionError::Lex(error) => write!(f, "lexical error: {}", error),
            ExpressionError::Syntax(error) => write!(f, "syntax error: {}", error),
            ExpressionError::Evaluation(error) => write!(f, "evaluation error: {}", error),
            ExpressionError::Nesting(error) => write!(f, "nesting error: {}", error),
        }
    }
}

impl Error for ExpressionError {}

impl From<LexError> for ExpressionError {
    fn from(error: LexError) -> Self {
        ExpressionError::Lex(error)
    }
}

impl From<SyntaxError> for ExpressionError {
    fn from(error: SyntaxError) -> Self {
        ExpressionError::Syntax(error)
    }
}

impl From<EvaluationError> for ExpressionError {
    fn from(error: EvaluationError) -> Self {
        ExpressionError::Evaluation(error)
    }
}

impl From<NestingError> for ExpressionError {
    fn from(error: NestingError) -> Self {
        ExpressionError::Nesting(error)
    }
}
