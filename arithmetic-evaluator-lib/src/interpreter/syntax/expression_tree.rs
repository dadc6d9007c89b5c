use crate::interpreter::error::EvaluationError;
use crate::interpreter::number::Number;
use crate::interpreter::operator::BinaryOperator;
use crate::interpreter::syntax::syntax_visitor::{walk_binary_operation, SyntaxVisitor};
use crate::interpreter::token::{Token, TokenKind};
use ptree::{write_tree, TreeBuilder};
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::mem;

/// An expression tree. Trees built by the parser are at most
/// [`ParserConfig::max_depth`](crate::interpreter::parser::ParserConfig::max_depth)
/// operators high.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Node {
    // Terminal symbols (leaves)
    Number(i64),
    // Non-terminal symbols (non-leaves)
    BinaryOperation {
        operator: BinaryOperator,
        left_operand: Box<Node>,
        right_operand: Box<Node>,
    },
}

/// Which side of its parent operator a node is on.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Operand {
    Left,
    Right,
}

impl Node {
    pub fn new_number(value: i64) -> Node {
        Node::Number(value)
    }

    pub fn new_binary_operation(
        operator: BinaryOperator,
        left_operand: Node,
        right_operand: Node,
    ) -> Node {
        Node::BinaryOperation {
            operator,
            left_operand: Box::new(left_operand),
            right_operand: Box::new(right_operand),
        }
    }

    /// Calls the correct visitor method for the node variant on the given visitor.
    pub(crate) fn accept(&self, visitor: &mut impl SyntaxVisitor) {
        match self {
            Node::Number(value) => visitor.visit_number(*value),
            Node::BinaryOperation {
                operator,
                left_operand,
                right_operand,
            } => visitor.visit_binary_operation(operator, left_operand, right_operand),
        }
    }

    /// Number of nodes in the tree, leaves included.
    pub fn size(&self) -> usize {
        let mut visitor = NodeCounter { count: 0 };
        self.accept(&mut visitor);
        visitor.count
    }

    /// Evaluates the tree with the same arithmetic as inline evaluation.
    pub fn evaluate(&self) -> Result<Number, EvaluationError> {
        match self {
            Node::Number(value) => Ok(Number::Integer(*value)),
            Node::BinaryOperation {
                operator,
                left_operand,
                right_operand,
            } => operator.evaluate(left_operand.evaluate()?, right_operand.evaluate()?),
        }
    }

    /// Regenerates infix tokens for the tree, with only the parentheses needed
    /// to parse back into the same tree.
    ///
    /// Token offsets are positions in the regenerated text written without spaces.
    pub fn to_infix(&self) -> Vec<Token> {
        let mut tokens = Vec::new();
        self.build_expression(None, &mut tokens);

        let mut offset = 0;
        tokens
            .into_iter()
            .map(|token| {
                let positioned = Token::new(token.kind(), token.text(), offset);
                offset += token.text().len();
                positioned
            })
            .collect()
    }

    fn build_expression(
        &self,
        parent: Option<(BinaryOperator, Operand)>,
        tokens: &mut Vec<Token>,
    ) {
        match self {
            Node::Number(value) => tokens.push(Token::new_number(*value, 0)),
            Node::BinaryOperation {
                operator,
                left_operand,
                right_operand,
            } => parenthesize_if(tokens, needs_parentheses(*operator, parent), |tokens| {
                left_operand.build_expression(Some((*operator, Operand::Left)), tokens);
                tokens.push(Token::new_symbol(operator.token_kind(), 0));
                right_operand.build_expression(Some((*operator, Operand::Right)), tokens);
            }),
        }
    }

    /// Moves the operands out of an operator node, leaving leaves in their place.
    fn take_operands(&mut self, pending: &mut Vec<Node>) {
        if let Node::BinaryOperation {
            left_operand,
            right_operand,
            ..
        } = self
        {
            pending.push(mem::replace(left_operand.as_mut(), Node::Number(0)));
            pending.push(mem::replace(right_operand.as_mut(), Node::Number(0)));
        }
    }

    fn format_tree(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut visitor = TreeBuilderVisitor {
            builder: TreeBuilder::new("expression".into()),
        };
        self.accept(&mut visitor);

        let mut buffer: Vec<u8> = Vec::new();
        match write_tree(&visitor.builder.build(), &mut buffer) {
            Ok(_) => {}
            Err(_) => return Err(fmt::Error),
        }
        let text = match std::str::from_utf8(&buffer) {
            Ok(text) => text,
            Err(_) => return Err(fmt::Error),
        };
        f.write_str(text)
    }
}

/// A child needs parentheses when its operator binds looser than its parent's,
/// or equally tight on the right, since every operator is left associative.
fn needs_parentheses(
    operator: BinaryOperator,
    parent: Option<(BinaryOperator, Operand)>,
) -> bool {
    let (parent_operator, side) = match parent {
        Some(parent) => parent,
        None => return false,
    };
    if parent_operator.precedence_gt(&operator) {
        return true;
    }
    parent_operator.precedence_eq(&operator) && side == Operand::Right
}

fn parenthesize_if(
    tokens: &mut Vec<Token>,
    predicate: bool,
    mut build_interior: impl FnMut(&mut Vec<Token>),
) {
    if predicate {
        tokens.push(Token::new_symbol(TokenKind::LeftParenthesis, 0));
    }

    build_interior(tokens);

    if predicate {
        tokens.push(Token::new_symbol(TokenKind::RightParenthesis, 0));
    }
}

// Dropping with an explicit work list keeps deep hand-built trees off the stack.
impl Drop for Node {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.take_operands(&mut pending);
        while let Some(mut node) = pending.pop() {
            node.take_operands(&mut pending);
        }
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.format_tree(f)
    }
}

impl Debug for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Node::Number(value) => write!(f, "{:?}", value),
            Node::BinaryOperation {
                operator,
                left_operand,
                right_operand,
            } => write!(f, "({} {:?} {:?})", operator, left_operand, right_operand),
        }
    }
}

struct TreeBuilderVisitor {
    builder: TreeBuilder,
}

impl SyntaxVisitor for TreeBuilderVisitor {
    fn visit_number(&mut self, value: i64) {
        self.builder.add_empty_child(format!("{}", value));
    }
    fn visit_binary_operation(
        &mut self,
        operator: &BinaryOperator,
        left_operand: &Node,
        right_operand: &Node,
    ) {
        self.builder.begin_child(format!("{}", operator));
        walk_binary_operation(self, left_operand, right_operand);
        self.builder.end_child();
    }
}

struct NodeCounter {
    count: usize,
}

impl SyntaxVisitor for NodeCounter {
    fn visit_number(&mut self, _value: i64) {
        self.count += 1;
    }
    fn visit_binary_operation(
        &mut self,
        _operator: &BinaryOperator,
        left_operand: &Node,
        right_operand: &Node,
    ) {
        self.count += 1;
        walk_binary_operation(self, left_operand, right_operand);
    }
}
