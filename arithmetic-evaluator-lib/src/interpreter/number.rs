use crate::interpreter::error::EvaluationError;
use crate::interpreter::operator::BinaryOperator;
use crate::interpreter::token::Token;
use std::fmt;
use std::fmt::Formatter;

/// The value of an expression.
///
/// A result stays an `Integer` until a division happens somewhere on the
/// evaluated path, after which it is `Real`. Division is always true division,
/// so `4 / 2` is `Real(2.0)`, not `Integer(2)`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Number {
    Integer(i64),
    Real(f64),
}

impl Number {
    /// Reads the integer value of a `NUMBER` token.
    pub fn from_literal(token: &Token) -> Result<Number, EvaluationError> {
        literal_value(token).map(Number::Integer)
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Number::Integer(_))
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Integer(value) => *value as f64,
            Number::Real(value) => *value,
        }
    }

    pub fn checked_add(self, other: Number) -> Result<Number, EvaluationError> {
        self.integer_or_real(other, BinaryOperator::Add, i64::checked_add, |a, b| a + b)
    }

    pub fn checked_sub(self, other: Number) -> Result<Number, EvaluationError> {
        self.integer_or_real(other, BinaryOperator::Subtract, i64::checked_sub, |a, b| {
            a - b
        })
    }

    pub fn checked_mul(self, other: Number) -> Result<Number, EvaluationError> {
        self.integer_or_real(other, BinaryOperator::Multiply, i64::checked_mul, |a, b| {
            a * b
        })
    }

    /// True division; the result is `Real` even when both operands are integers.
    pub fn checked_div(self, other: Number) -> Result<Number, EvaluationError> {
        let divisor = other.as_f64();
        if divisor == 0.0 {
            return Err(EvaluationError::DivisionByZero);
        }
        Ok(Number::Real(self.as_f64() / divisor))
    }

    fn integer_or_real(
        self,
        other: Number,
        operator: BinaryOperator,
        integer: fn(i64, i64) -> Option<i64>,
        real: fn(f64, f64) -> f64,
    ) -> Result<Number, EvaluationError> {
        match (self, other) {
            (Number::Integer(a), Number::Integer(b)) => integer(a, b)
                .map(Number::Integer)
                .ok_or(EvaluationError::IntegerOverflow { operator }),
            (a, b) => Ok(Number::Real(real(a.as_f64(), b.as_f64()))),
        }
    }
}

pub(crate) fn literal_value(token: &Token) -> Result<i64, EvaluationError> {
    token
        .text()
        .parse::<i64>()
        .map_err(|_| EvaluationError::LiteralOutOfRange {
            literal: token.text().to_string(),
            offset: token.offset(),
        })
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(value) => write!(f, "{}", value),
            // Debug formatting keeps the trailing `.0` of whole reals.
            Number::Real(value) => write!(f, "{:?}", value),
        }
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::Integer(value)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Real(value)
    }
}
