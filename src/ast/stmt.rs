//! Statement and structural AST nodes.
//!
//! # Statement Categories
//!
//! - **Structure**: program, function, block
//! - **Control flow**: loop, conditional, return
//! - **Assignment**: `target op value`
//! - **Calls**: function_call, recursive_call

use super::{ExprNode, Node, NodeKind, NodeType, Variable};
use super::expr::ArrayAccess;
use super::Operator;

/// The root of a parsed program.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    /// Function definitions, in source order.
    pub functions: Vec<Node<Function>>,
    /// Statements outside any function.
    pub global_statements: Option<Node<Block>>,
}

/// A function or procedure definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub parameters: Vec<Node<Variable>>,
    pub body: Option<Node<Block>>,
    pub return_type: Option<String>,
    pub is_recursive: bool,
}

impl Function {
    /// A function with no parameters and no body.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            body: None,
            return_type: None,
            is_recursive: false,
        }
    }
}

/// An ordered sequence of statements.
///
/// Order is execution order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Block {
    pub statements: Vec<Node<NodeKind>>,
}

impl Block {
    pub fn new(statements: Vec<Node<NodeKind>>) -> Self {
        Self { statements }
    }
}

/// The flavour of a loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LoopType {
    /// Counted loop: `FOR i = start TO end STEP step`
    #[default]
    For,
    /// `FOR EACH x IN collection`
    ForEach,
    /// Pre-tested conditional loop
    While,
    /// Post-tested conditional loop
    DoWhile,
    /// `REPEAT ... UNTIL condition`
    RepeatUntil,
    /// The evaluator could not tell
    Unknown,
}

impl LoopType {
    pub const ALL: [LoopType; 6] = [
        LoopType::For,
        LoopType::ForEach,
        LoopType::While,
        LoopType::DoWhile,
        LoopType::RepeatUntil,
        LoopType::Unknown,
    ];

    /// The wire spelling of the loop type.
    pub fn as_str(&self) -> &'static str {
        match self {
            LoopType::For => "for",
            LoopType::ForEach => "for_each",
            LoopType::While => "while",
            LoopType::DoWhile => "do_while",
            LoopType::RepeatUntil => "repeat_until",
            LoopType::Unknown => "unknown",
        }
    }

    /// Parses the wire spelling of a loop type.
    pub fn from_wire(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }

    /// Returns true for loops driven by an iterator over a range.
    pub fn is_counted(&self) -> bool {
        matches!(self, LoopType::For)
    }
}

/// A loop of any flavour.
///
/// Counted loops use `iterator`/`start`/`end`/`step`; conditional and
/// collection loops use `collection`/`condition`.
#[derive(Debug, Clone, PartialEq)]
pub struct Loop {
    pub loop_type: LoopType,
    pub iterator: Option<Node<Variable>>,
    pub start: Option<Box<ExprNode>>,
    pub end: Option<Box<ExprNode>>,
    pub step: Option<Box<ExprNode>>,
    pub collection: Option<Box<ExprNode>>,
    pub condition: Option<Box<ExprNode>>,
    pub body: Node<Block>,
    /// Evaluator's estimate, e.g. `"n"` or `"log n"`.
    pub estimated_iterations: Option<String>,
    pub nesting_level: u32,
}

impl Loop {
    /// A loop of the given type with an empty body and no header fields.
    pub fn new(loop_type: LoopType, body: Node<Block>) -> Self {
        Self {
            loop_type,
            iterator: None,
            start: None,
            end: None,
            step: None,
            collection: None,
            condition: None,
            body,
            estimated_iterations: None,
            nesting_level: 0,
        }
    }
}

/// An if/elif/else chain.
#[derive(Debug, Clone, PartialEq)]
pub struct Conditional {
    pub condition: Box<ExprNode>,
    pub then_branch: Node<Block>,
    pub else_branch: Option<Node<Block>>,
    /// `ELSEIF` arms in order; each is a full conditional.
    pub elif_branches: Vec<Node<Conditional>>,
}

/// Left-hand side of an assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum AssignTarget {
    Variable(Variable),
    ArrayAccess(ArrayAccess),
}

impl AssignTarget {
    pub fn node_type(&self) -> NodeType {
        match self {
            AssignTarget::Variable(_) => NodeType::Variable,
            AssignTarget::ArrayAccess(_) => NodeType::ArrayAccess,
        }
    }
}

/// `target operator value`
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub target: Option<Node<AssignTarget>>,
    pub value: Option<Box<ExprNode>>,
    /// `=` unless a compound operator was used.
    pub operator: Operator,
}

/// `RETURN [value]`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Return {
    pub value: Option<Box<ExprNode>>,
}

/// A call to a named function.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub function_name: String,
    pub arguments: Vec<ExprNode>,
    pub is_recursive: bool,
}

/// A call from a function to itself.
///
/// Carries what the complexity analyzer needs to set up a recurrence.
#[derive(Debug, Clone, PartialEq)]
pub struct RecursiveCall {
    pub function_name: String,
    pub arguments: Vec<ExprNode>,
    pub is_recursive: bool,
    /// How the problem shrinks per call, e.g. `"n-1"` or `"n/2"`.
    pub reduction_pattern: Option<String>,
    /// Number of recursive calls per invocation.
    pub branching_factor: f64,
}

impl RecursiveCall {
    pub fn new(function_name: impl Into<String>, arguments: Vec<ExprNode>) -> Self {
        Self {
            function_name: function_name.into(),
            arguments,
            is_recursive: false,
            reduction_pattern: None,
            branching_factor: 1.0,
        }
    }
}
