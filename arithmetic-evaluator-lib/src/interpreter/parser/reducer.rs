use crate::interpreter::error::EvaluationError;
use crate::interpreter::number::{literal_value, Number};
use crate::interpreter::operator::BinaryOperator;
use crate::interpreter::syntax::expression_tree::Node;
use crate::interpreter::token::Token;

/// What the grammar rules produce as they recognize input.
///
/// Each rule hands its operands to the reducer as soon as they are known, so
/// the same descent either folds values inline or builds a tree.
pub trait Reducer {
    type Output;

    /// Called for every `NUMBER` token consumed by `factor`.
    fn number(&mut self, literal: &Token) -> Result<Self::Output, EvaluationError>;

    /// Called once per operator application, left to right.
    fn binary(
        &mut self,
        operator: BinaryOperator,
        left_operand: Self::Output,
        right_operand: Self::Output,
    ) -> Result<Self::Output, EvaluationError>;

    /// Whether outputs nest as deeply as the operators that produced them.
    /// If so, the parser keeps their height within its depth limit.
    fn nests_operands(&self) -> bool {
        false
    }
}

/// Computes the value of the expression while it is parsed.
#[derive(Debug, Default, Copy, Clone)]
pub struct Evaluator;

impl Reducer for Evaluator {
    type Output = Number;

    fn number(&mut self, literal: &Token) -> Result<Number, EvaluationError> {
        Number::from_literal(literal)
    }

    fn binary(
        &mut self,
        operator: BinaryOperator,
        left_operand: Number,
        right_operand: Number,
    ) -> Result<Number, EvaluationError> {
        operator.evaluate(left_operand, right_operand)
    }
}

/// Builds an expression tree instead of a value.
#[derive(Debug, Default, Copy, Clone)]
pub struct TreeBuilder;

impl Reducer for TreeBuilder {
    type Output = Node;

    fn number(&mut self, literal: &Token) -> Result<Node, EvaluationError> {
        literal_value(literal).map(Node::new_number)
    }

    fn binary(
        &mut self,
        operator: BinaryOperator,
        left_operand: Node,
        right_operand: Node,
    ) -> Result<Node, EvaluationError> {
        Ok(Node::new_binary_operation(
            operator,
            left_operand,
            right_operand,
        ))
    }

    fn nests_operands(&self) -> bool {
        true
    }
}
