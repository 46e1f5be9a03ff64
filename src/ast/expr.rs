//! Expression AST nodes.
//!
//! Expressions are the value-producing nodes: variables, literals, unary
//! and binary operations, and array indexing. Operands are themselves
//! expression nodes, so an expression is a tree of arbitrary depth.

use serde_json::Value;

use super::{Node, NodeType};

/// An expression node with its location and metadata.
pub type ExprNode = Node<Expr>;

/// The expression-class node kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Variable reference: `x`, `count`
    Variable(Variable),
    /// Literal value: `42`, `"hi"`, `TRUE`
    Literal(Literal),
    /// Binary operation: `left op right`
    BinaryOp(BinaryOp),
    /// Unary operation: `op operand`
    UnaryOp(UnaryOp),
    /// Array indexing: `array[index]`
    ArrayAccess(ArrayAccess),
}

impl Expr {
    /// The `node_type` tag of this expression.
    pub fn node_type(&self) -> NodeType {
        match self {
            Expr::Variable(_) => NodeType::Variable,
            Expr::Literal(_) => NodeType::Literal,
            Expr::BinaryOp(_) => NodeType::BinaryOp,
            Expr::UnaryOp(_) => NodeType::UnaryOp,
            Expr::ArrayAccess(_) => NodeType::ArrayAccess,
        }
    }

    /// Shorthand for a variable expression.
    pub fn variable(name: impl Into<String>) -> Self {
        Expr::Variable(Variable::new(name))
    }

    /// Shorthand for a literal expression with the given type name.
    pub fn literal(value: impl Into<Value>, literal_type: impl Into<String>) -> Self {
        Expr::Literal(Literal {
            value: Some(value.into()),
            literal_type: literal_type.into(),
        })
    }

    /// Shorthand for a binary operation.
    pub fn binary(left: ExprNode, operator: Operator, right: ExprNode) -> Self {
        Expr::BinaryOp(BinaryOp {
            operator,
            left: Some(Box::new(left)),
            right: Some(Box::new(right)),
        })
    }
}

/// A named variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub name: String,
}

impl Variable {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A literal value.
///
/// The value is kept as raw JSON since the evaluator may send numbers,
/// strings, booleans or null.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub value: Option<Value>,
    /// Free-form type name (`int`, `string`, ...); `unknown` when absent.
    pub literal_type: String,
}

impl Default for Literal {
    fn default() -> Self {
        Self {
            value: None,
            literal_type: "unknown".to_string(),
        }
    }
}

/// `left operator right`
///
/// Operands are optional: the evaluator reports partially parsed
/// expressions with whatever sides it recovered.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOp {
    pub operator: Operator,
    pub left: Option<Box<ExprNode>>,
    pub right: Option<Box<ExprNode>>,
}

/// `operator operand`
#[derive(Debug, Clone, PartialEq)]
pub struct UnaryOp {
    pub operator: Operator,
    pub operand: Option<Box<ExprNode>>,
}

/// `array[index]`
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayAccess {
    pub array: Option<Box<ExprNode>>,
    pub index: Option<Box<ExprNode>>,
}

/// Operators understood by the evaluator.
///
/// Covers arithmetic, comparison, logical and (compound) assignment
/// operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    // Arithmetic
    /// `+`
    Add,
    /// `-`
    Subtract,
    /// `*`
    Multiply,
    /// `/`
    Divide,
    /// `%`
    Modulo,
    /// `^`
    Power,
    /// `//` - integer division
    FloorDivide,

    // Comparison
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `<`
    LessThan,
    /// `<=`
    LessEqual,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterEqual,

    // Logical
    /// `and`
    And,
    /// `or`
    Or,
    /// `not`
    Not,

    // Assignment
    /// `=`
    Assign,
    /// `+=`
    AddAssign,
    /// `-=`
    SubtractAssign,
    /// `*=`
    MultiplyAssign,
    /// `/=`
    DivideAssign,
}

impl Operator {
    pub const ALL: [Operator; 21] = [
        Operator::Add,
        Operator::Subtract,
        Operator::Multiply,
        Operator::Divide,
        Operator::Modulo,
        Operator::Power,
        Operator::FloorDivide,
        Operator::Equal,
        Operator::NotEqual,
        Operator::LessThan,
        Operator::LessEqual,
        Operator::GreaterThan,
        Operator::GreaterEqual,
        Operator::And,
        Operator::Or,
        Operator::Not,
        Operator::Assign,
        Operator::AddAssign,
        Operator::SubtractAssign,
        Operator::MultiplyAssign,
        Operator::DivideAssign,
    ];

    /// The wire spelling of the operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
            Operator::Modulo => "%",
            Operator::Power => "^",
            Operator::FloorDivide => "//",
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
            Operator::LessThan => "<",
            Operator::LessEqual => "<=",
            Operator::GreaterThan => ">",
            Operator::GreaterEqual => ">=",
            Operator::And => "and",
            Operator::Or => "or",
            Operator::Not => "not",
            Operator::Assign => "=",
            Operator::AddAssign => "+=",
            Operator::SubtractAssign => "-=",
            Operator::MultiplyAssign => "*=",
            Operator::DivideAssign => "/=",
        }
    }

    /// Parses the wire spelling of an operator.
    pub fn from_wire(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str() == s)
    }

    /// Returns true for `=` and the compound assignment operators.
    pub fn is_assignment(&self) -> bool {
        matches!(
            self,
            Operator::Assign
                | Operator::AddAssign
                | Operator::SubtractAssign
                | Operator::MultiplyAssign
                | Operator::DivideAssign
        )
    }
}
