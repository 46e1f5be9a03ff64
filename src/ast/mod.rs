//! Abstract Syntax Tree (AST) contract for evaluated pseudocode.
//!
//! The evaluation service parses a student's pseudocode and may send the
//! resulting tree back as JSON. This module defines the shape of that tree
//! and validates incoming JSON against it.
//!
//! # Structure
//!
//! ```text
//! Program
//! ├── functions: Vec<Function>
//! │   ├── parameters: Vec<Variable>
//! │   └── body: Block
//! └── global_statements: Block
//!     └── statements: Vec<any node>
//!         ├── Loop { loop_type, iterator, start, end, step, body, ... }
//!         ├── Conditional { condition, then_branch, elif_branches, else_branch }
//!         ├── Assignment { target, operator, value }
//!         └── ...
//! ```
//!
//! # Design Decisions
//!
//! - **Owned nodes**: every child is owned by its parent. The tree has no
//!   sharing and no back-edges, and JSON input cannot express either.
//! - **Typed children**: where the grammar fixes a child's kind (a
//!   function's body is a block, parameters are variables) the field is
//!   typed accordingly, so a decoded tree is structurally valid by
//!   construction.
//! - **Open metadata**: every [`Node`] keeps `metadata` and any fields the
//!   schema does not know about (`extra`), and re-emits them on encode.
//! - **Decode only**: trees come from [`decode`]; nothing here infers an
//!   AST from source text.
//!
//! # Example
//!
//! ```
//! use pseudocode::ast::{decode, NodeKind};
//! use serde_json::json;
//!
//! let raw = json!({
//!     "node_type": "return",
//!     "value": { "node_type": "variable", "name": "total" }
//! });
//! let node = decode(&raw).unwrap();
//! assert!(matches!(node.kind, NodeKind::Return(_)));
//! ```

mod decode;
mod error;
mod expr;
mod schema;
mod stmt;

pub use decode::NodeShape;
pub use error::ValidationError;
pub use expr::*;
pub use stmt::*;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// Source location of a node, as reported by the evaluator's parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: u32,
    pub column: u32,
    pub end_line: Option<u32>,
    pub end_column: Option<u32>,
}

impl SourceLocation {
    pub fn new(line: u32, column: u32) -> Self {
        Self {
            line,
            column,
            end_line: None,
            end_column: None,
        }
    }
}

/// An AST node: a kind-specific payload plus the fields every node shares.
///
/// `T` is either [`NodeKind`] (any node), [`Expr`] (any expression) or a
/// single payload type such as [`Block`].
#[derive(Debug, Clone, PartialEq)]
pub struct Node<T> {
    /// The kind-specific payload.
    pub kind: T,
    /// Where the node came from in the source, if known.
    pub location: Option<SourceLocation>,
    /// Free-form annotations from the evaluator.
    pub metadata: Map<String, Value>,
    /// Fields the schema does not model, kept verbatim.
    pub extra: Map<String, Value>,
}

impl<T> Node<T> {
    /// Creates a node with no location, metadata or extra fields.
    pub fn new(kind: T) -> Self {
        Self {
            kind,
            location: None,
            metadata: Map::new(),
            extra: Map::new(),
        }
    }

    /// Sets the source location.
    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Converts the payload, keeping location, metadata and extra fields.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Node<U> {
        Node {
            kind: f(self.kind),
            location: self.location,
            metadata: self.metadata,
            extra: self.extra,
        }
    }
}

impl<T: NodeShape> Node<T> {
    /// The `node_type` tag of this node.
    pub fn node_type(&self) -> NodeType {
        self.kind.tag()
    }

    /// Encodes this node as JSON.
    pub fn to_json(&self) -> Value {
        encode(self)
    }
}

impl<T: NodeShape> Serialize for Node<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        encode(self).serialize(serializer)
    }
}

impl<'de, T: NodeShape> Deserialize<'de> for Node<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        decode_as(&raw).map_err(serde::de::Error::custom)
    }
}

/// The closed set of node kinds, as spelled in `node_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Program,
    Function,
    Block,
    Loop,
    Conditional,
    Assignment,
    Return,
    FunctionCall,
    RecursiveCall,
    Variable,
    Literal,
    BinaryOp,
    UnaryOp,
    ArrayAccess,
}

impl NodeType {
    pub const ALL: [NodeType; 14] = [
        NodeType::Program,
        NodeType::Function,
        NodeType::Block,
        NodeType::Loop,
        NodeType::Conditional,
        NodeType::Assignment,
        NodeType::Return,
        NodeType::FunctionCall,
        NodeType::RecursiveCall,
        NodeType::Variable,
        NodeType::Literal,
        NodeType::BinaryOp,
        NodeType::UnaryOp,
        NodeType::ArrayAccess,
    ];

    /// The wire spelling of the tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Program => "program",
            NodeType::Function => "function",
            NodeType::Block => "block",
            NodeType::Loop => "loop",
            NodeType::Conditional => "conditional",
            NodeType::Assignment => "assignment",
            NodeType::Return => "return",
            NodeType::FunctionCall => "function_call",
            NodeType::RecursiveCall => "recursive_call",
            NodeType::Variable => "variable",
            NodeType::Literal => "literal",
            NodeType::BinaryOp => "binary_op",
            NodeType::UnaryOp => "unary_op",
            NodeType::ArrayAccess => "array_access",
        }
    }

    /// Parses the wire spelling of a tag.
    pub fn from_wire(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }

    /// Returns true for the expression-class kinds.
    pub fn is_expression(&self) -> bool {
        matches!(
            self,
            NodeType::Variable
                | NodeType::Literal
                | NodeType::BinaryOp
                | NodeType::UnaryOp
                | NodeType::ArrayAccess
        )
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Any node kind. Used where the grammar allows every kind, such as the
/// statements of a block or the root of a decoded tree.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Program(Program),
    Function(Function),
    Block(Block),
    Loop(Loop),
    Conditional(Conditional),
    Assignment(Assignment),
    Return(Return),
    FunctionCall(FunctionCall),
    RecursiveCall(RecursiveCall),
    Variable(Variable),
    Literal(Literal),
    BinaryOp(BinaryOp),
    UnaryOp(UnaryOp),
    ArrayAccess(ArrayAccess),
}

impl NodeKind {
    /// The `node_type` tag of this node.
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeKind::Program(_) => NodeType::Program,
            NodeKind::Function(_) => NodeType::Function,
            NodeKind::Block(_) => NodeType::Block,
            NodeKind::Loop(_) => NodeType::Loop,
            NodeKind::Conditional(_) => NodeType::Conditional,
            NodeKind::Assignment(_) => NodeType::Assignment,
            NodeKind::Return(_) => NodeType::Return,
            NodeKind::FunctionCall(_) => NodeType::FunctionCall,
            NodeKind::RecursiveCall(_) => NodeType::RecursiveCall,
            NodeKind::Variable(_) => NodeType::Variable,
            NodeKind::Literal(_) => NodeType::Literal,
            NodeKind::BinaryOp(_) => NodeType::BinaryOp,
            NodeKind::UnaryOp(_) => NodeType::UnaryOp,
            NodeKind::ArrayAccess(_) => NodeType::ArrayAccess,
        }
    }
}

impl From<Expr> for NodeKind {
    fn from(expr: Expr) -> Self {
        match expr {
            Expr::Variable(v) => NodeKind::Variable(v),
            Expr::Literal(l) => NodeKind::Literal(l),
            Expr::BinaryOp(b) => NodeKind::BinaryOp(b),
            Expr::UnaryOp(u) => NodeKind::UnaryOp(u),
            Expr::ArrayAccess(a) => NodeKind::ArrayAccess(a),
        }
    }
}

macro_rules! node_kind_from {
    ($($payload:ident),* $(,)?) => {
        $(
            impl From<$payload> for NodeKind {
                fn from(payload: $payload) -> Self {
                    NodeKind::$payload(payload)
                }
            }
        )*
    };
}

node_kind_from!(
    Program,
    Function,
    Block,
    Loop,
    Conditional,
    Assignment,
    Return,
    FunctionCall,
    RecursiveCall,
);

/// Decodes any node from loosely-typed JSON.
///
/// Fails with the path of the first field that violates the grammar.
pub fn decode(raw: &Value) -> Result<Node<NodeKind>, ValidationError> {
    decode_as(raw)
}

/// Decodes a node whose kind is constrained by `T`, e.g. `decode_as::<Program>`.
pub fn decode_as<T: NodeShape>(raw: &Value) -> Result<Node<T>, ValidationError> {
    decode::decode_node(raw, &decode::Path::Root).map_err(|err| {
        log::debug!("AST validation failed: {err}");
        err
    })
}

/// Parses JSON text and decodes it as any node.
pub fn decode_str(text: &str) -> Result<Node<NodeKind>, ValidationError> {
    let raw: Value = serde_json::from_str(text).map_err(|e| ValidationError::Json {
        message: e.to_string(),
    })?;
    decode(&raw)
}

/// Encodes a node back to JSON, defaults included.
pub fn encode<T: NodeShape>(node: &Node<T>) -> Value {
    schema::encode_node(node)
}
