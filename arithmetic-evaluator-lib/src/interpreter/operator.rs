use crate::interpreter::error::EvaluationError;
use crate::interpreter::number::Number;
use crate::interpreter::token::TokenKind;
use std::fmt;
use std::fmt::Formatter;

/// A binary mathematical operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

/// Operators folded by `expr`, in the order they are tried.
pub(crate) const ADDITIVE: [BinaryOperator; 2] = [BinaryOperator::Add, BinaryOperator::Subtract];

/// Operators folded by `term`, in the order they are tried.
pub(crate) const MULTIPLICATIVE: [BinaryOperator; 2] =
    [BinaryOperator::Multiply, BinaryOperator::Divide];

impl BinaryOperator {
    pub fn token_kind(&self) -> TokenKind {
        match self {
            BinaryOperator::Add => TokenKind::Plus,
            BinaryOperator::Subtract => TokenKind::Minus,
            BinaryOperator::Multiply => TokenKind::Times,
            BinaryOperator::Divide => TokenKind::Divide,
        }
    }

    pub fn from_token_kind(kind: TokenKind) -> Option<BinaryOperator> {
        match kind {
            TokenKind::Plus => Some(BinaryOperator::Add),
            TokenKind::Minus => Some(BinaryOperator::Subtract),
            TokenKind::Times => Some(BinaryOperator::Multiply),
            TokenKind::Divide => Some(BinaryOperator::Divide),
            _ => None,
        }
    }

    pub fn precedence(&self) -> u8 {
        match self {
            BinaryOperator::Add | BinaryOperator::Subtract => 0,
            BinaryOperator::Multiply | BinaryOperator::Divide => 1,
        }
    }

    pub(crate) fn precedence_eq(&self, other: &Self) -> bool {
        self.precedence().eq(&other.precedence())
    }

    pub(crate) fn precedence_gt(&self, other: &Self) -> bool {
        self.precedence().gt(&other.precedence())
    }

    /// Applies the operator to two already evaluated operands.
    pub fn evaluate(&self, a: Number, b: Number) -> Result<Number, EvaluationError> {
        match self {
            BinaryOperator::Add => a.checked_add(b),
            BinaryOperator::Subtract => a.checked_sub(b),
            BinaryOperator::Multiply => a.checked_mul(b),
            BinaryOperator::Divide => a.checked_div(b),
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token_kind().symbol().unwrap_or_default())
    }
}
