//! Wire format of each node kind.
//!
//! Every payload type describes its JSON fields here, decoding and
//! encoding side by side, so the two directions stay in step. Absent
//! optional fields decode to their defaults, and encoding writes the
//! defaults back out explicitly.

use serde_json::{Map, Value};

use super::decode::{Fields, NodeShape};
use super::{
    ArrayAccess, AssignTarget, Assignment, BinaryOp, Block, Conditional, Expr, Function,
    FunctionCall, Literal, Loop, Node, NodeKind, NodeType, Operator, Program, RecursiveCall,
    Return, SourceLocation, UnaryOp, ValidationError, Variable,
};

/// A payload that decodes from exactly one `node_type`.
trait Payload: Sized {
    const NODE_TYPE: NodeType;
    const EXPECTED: &'static str;

    fn decode_payload(fields: &mut Fields<'_>) -> Result<Self, ValidationError>;
    fn encode_payload(&self, out: &mut Map<String, Value>);
}

macro_rules! payload_shape {
    ($($payload:ty),* $(,)?) => {
        $(
            impl NodeShape for $payload {
                fn expected() -> &'static str {
                    <$payload as Payload>::EXPECTED
                }

                fn accepts(node_type: NodeType) -> bool {
                    node_type == <$payload as Payload>::NODE_TYPE
                }

                fn decode_fields(
                    _node_type: NodeType,
                    fields: &mut Fields<'_>,
                ) -> Result<Self, ValidationError> {
                    <$payload as Payload>::decode_payload(fields)
                }

                fn tag(&self) -> NodeType {
                    <$payload as Payload>::NODE_TYPE
                }

                fn encode_fields(&self, out: &mut Map<String, Value>) {
                    self.encode_payload(out)
                }
            }
        )*
    };
}

payload_shape!(
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
);

/// Encodes a node: tag, kind fields, location, metadata, then extras.
pub(super) fn encode_node<T: NodeShape>(node: &Node<T>) -> Value {
    let mut out = Map::new();
    out.insert("node_type".into(), node.kind.tag().as_str().into());
    node.kind.encode_fields(&mut out);
    if let Some(location) = &node.location {
        out.insert("location".into(), encode_location(location));
    }
    out.insert("metadata".into(), Value::Object(node.metadata.clone()));
    for (key, value) in &node.extra {
        // Modelled fields win over stray duplicates
        out.entry(key.clone()).or_insert_with(|| value.clone());
    }
    Value::Object(out)
}

fn encode_location(location: &SourceLocation) -> Value {
    let mut out = Map::new();
    out.insert("line".into(), location.line.into());
    out.insert("column".into(), location.column.into());
    if let Some(end_line) = location.end_line {
        out.insert("end_line".into(), end_line.into());
    }
    if let Some(end_column) = location.end_column {
        out.insert("end_column".into(), end_column.into());
    }
    Value::Object(out)
}

fn put_node<T: NodeShape>(out: &mut Map<String, Value>, key: &str, node: &Node<T>) {
    out.insert(key.into(), encode_node(node));
}

fn put_opt_node<T: NodeShape>(out: &mut Map<String, Value>, key: &str, node: Option<&Node<T>>) {
    if let Some(node) = node {
        put_node(out, key, node);
    }
}

fn put_nodes<T: NodeShape>(out: &mut Map<String, Value>, key: &str, nodes: &[Node<T>]) {
    out.insert(key.into(), nodes.iter().map(encode_node).collect());
}

fn put_opt_str(out: &mut Map<String, Value>, key: &str, value: Option<&String>) {
    if let Some(value) = value {
        out.insert(key.into(), value.clone().into());
    }
}

// ==================== Union shapes ====================

impl NodeShape for NodeKind {
    fn expected() -> &'static str {
        "any AST node"
    }

    fn accepts(_node_type: NodeType) -> bool {
        true
    }

    fn decode_fields(node_type: NodeType, f: &mut Fields<'_>) -> Result<Self, ValidationError> {
        Ok(match node_type {
            NodeType::Program => NodeKind::Program(Program::decode_payload(f)?),
            NodeType::Function => NodeKind::Function(Function::decode_payload(f)?),
            NodeType::Block => NodeKind::Block(Block::decode_payload(f)?),
            NodeType::Loop => NodeKind::Loop(Loop::decode_payload(f)?),
            NodeType::Conditional => NodeKind::Conditional(Conditional::decode_payload(f)?),
            NodeType::Assignment => NodeKind::Assignment(Assignment::decode_payload(f)?),
            NodeType::Return => NodeKind::Return(Return::decode_payload(f)?),
            NodeType::FunctionCall => NodeKind::FunctionCall(FunctionCall::decode_payload(f)?),
            NodeType::RecursiveCall => NodeKind::RecursiveCall(RecursiveCall::decode_payload(f)?),
            NodeType::Variable
            | NodeType::Literal
            | NodeType::BinaryOp
            | NodeType::UnaryOp
            | NodeType::ArrayAccess => Expr::decode_fields(node_type, f)?.into(),
        })
    }

    fn tag(&self) -> NodeType {
        self.node_type()
    }

    fn encode_fields(&self, out: &mut Map<String, Value>) {
        match self {
            NodeKind::Program(p) => p.encode_payload(out),
            NodeKind::Function(p) => p.encode_payload(out),
            NodeKind::Block(p) => p.encode_payload(out),
            NodeKind::Loop(p) => p.encode_payload(out),
            NodeKind::Conditional(p) => p.encode_payload(out),
            NodeKind::Assignment(p) => p.encode_payload(out),
            NodeKind::Return(p) => p.encode_payload(out),
            NodeKind::FunctionCall(p) => p.encode_payload(out),
            NodeKind::RecursiveCall(p) => p.encode_payload(out),
            NodeKind::Variable(p) => p.encode_payload(out),
            NodeKind::Literal(p) => p.encode_payload(out),
            NodeKind::BinaryOp(p) => p.encode_payload(out),
            NodeKind::UnaryOp(p) => p.encode_payload(out),
            NodeKind::ArrayAccess(p) => p.encode_payload(out),
        }
    }
}

impl NodeShape for Expr {
    fn expected() -> &'static str {
        "an expression node (variable, literal, binary_op, unary_op, array_access)"
    }

    fn accepts(node_type: NodeType) -> bool {
        node_type.is_expression()
    }

    fn decode_fields(node_type: NodeType, f: &mut Fields<'_>) -> Result<Self, ValidationError> {
        Ok(match node_type {
            NodeType::Literal => Expr::Literal(Literal::decode_payload(f)?),
            NodeType::BinaryOp => Expr::BinaryOp(BinaryOp::decode_payload(f)?),
            NodeType::UnaryOp => Expr::UnaryOp(UnaryOp::decode_payload(f)?),
            NodeType::ArrayAccess => Expr::ArrayAccess(ArrayAccess::decode_payload(f)?),
            // `accepts` admits only expression kinds
            _ => Expr::Variable(Variable::decode_payload(f)?),
        })
    }

    fn tag(&self) -> NodeType {
        self.node_type()
    }

    fn encode_fields(&self, out: &mut Map<String, Value>) {
        match self {
            Expr::Variable(p) => p.encode_payload(out),
            Expr::Literal(p) => p.encode_payload(out),
            Expr::BinaryOp(p) => p.encode_payload(out),
            Expr::UnaryOp(p) => p.encode_payload(out),
            Expr::ArrayAccess(p) => p.encode_payload(out),
        }
    }
}

impl NodeShape for AssignTarget {
    fn expected() -> &'static str {
        "a variable or array_access node"
    }

    fn accepts(node_type: NodeType) -> bool {
        matches!(node_type, NodeType::Variable | NodeType::ArrayAccess)
    }

    fn decode_fields(node_type: NodeType, f: &mut Fields<'_>) -> Result<Self, ValidationError> {
        Ok(match node_type {
            NodeType::ArrayAccess => AssignTarget::ArrayAccess(ArrayAccess::decode_payload(f)?),
            _ => AssignTarget::Variable(Variable::decode_payload(f)?),
        })
    }

    fn tag(&self) -> NodeType {
        self.node_type()
    }

    fn encode_fields(&self, out: &mut Map<String, Value>) {
        match self {
            AssignTarget::Variable(p) => p.encode_payload(out),
            AssignTarget::ArrayAccess(p) => p.encode_payload(out),
        }
    }
}

// ==================== Structure ====================

impl Payload for Program {
    const NODE_TYPE: NodeType = NodeType::Program;
    const EXPECTED: &'static str = "a program node";

    fn decode_payload(f: &mut Fields<'_>) -> Result<Self, ValidationError> {
        Ok(Program {
            functions: f.nodes("functions")?,
            global_statements: f.node("global_statements")?,
        })
    }

    fn encode_payload(&self, out: &mut Map<String, Value>) {
        put_nodes(out, "functions", &self.functions);
        put_opt_node(out, "global_statements", self.global_statements.as_ref());
    }
}

impl Payload for Function {
    const NODE_TYPE: NodeType = NodeType::Function;
    const EXPECTED: &'static str = "a function node";

    fn decode_payload(f: &mut Fields<'_>) -> Result<Self, ValidationError> {
        Ok(Function {
            name: f.required_string("name")?,
            parameters: f.nodes("parameters")?,
            body: f.node("body")?,
            return_type: f.optional_string("return_type")?,
            is_recursive: f.bool_or("is_recursive", false)?,
        })
    }

    fn encode_payload(&self, out: &mut Map<String, Value>) {
        out.insert("name".into(), self.name.clone().into());
        put_nodes(out, "parameters", &self.parameters);
        put_opt_node(out, "body", self.body.as_ref());
        put_opt_str(out, "return_type", self.return_type.as_ref());
        out.insert("is_recursive".into(), self.is_recursive.into());
    }
}

impl Payload for Block {
    const NODE_TYPE: NodeType = NodeType::Block;
    const EXPECTED: &'static str = "a block node";

    fn decode_payload(f: &mut Fields<'_>) -> Result<Self, ValidationError> {
        Ok(Block {
            statements: f.nodes("statements")?,
        })
    }

    fn encode_payload(&self, out: &mut Map<String, Value>) {
        put_nodes(out, "statements", &self.statements);
    }
}

// ==================== Control flow ====================

impl Payload for Loop {
    const NODE_TYPE: NodeType = NodeType::Loop;
    const EXPECTED: &'static str = "a loop node";

    fn decode_payload(f: &mut Fields<'_>) -> Result<Self, ValidationError> {
        Ok(Loop {
            loop_type: f.loop_type("loop_type")?,
            iterator: f.node("iterator")?,
            start: f.boxed("start")?,
            end: f.boxed("end")?,
            step: f.boxed("step")?,
            collection: f.boxed("collection")?,
            condition: f.boxed("condition")?,
            body: f.required_node("body")?,
            estimated_iterations: f.optional_string("estimated_iterations")?,
            nesting_level: f.optional_u32("nesting_level")?.unwrap_or(0),
        })
    }

    fn encode_payload(&self, out: &mut Map<String, Value>) {
        out.insert("loop_type".into(), self.loop_type.as_str().into());
        put_opt_node(out, "iterator", self.iterator.as_ref());
        put_opt_node(out, "start", self.start.as_deref());
        put_opt_node(out, "end", self.end.as_deref());
        put_opt_node(out, "step", self.step.as_deref());
        put_opt_node(out, "collection", self.collection.as_deref());
        put_opt_node(out, "condition", self.condition.as_deref());
        put_node(out, "body", &self.body);
        put_opt_str(out, "estimated_iterations", self.estimated_iterations.as_ref());
        out.insert("nesting_level".into(), self.nesting_level.into());
    }
}

impl Payload for Conditional {
    const NODE_TYPE: NodeType = NodeType::Conditional;
    const EXPECTED: &'static str = "a conditional node";

    fn decode_payload(f: &mut Fields<'_>) -> Result<Self, ValidationError> {
        Ok(Conditional {
            condition: f.required_boxed("condition")?,
            then_branch: f.required_node("then_branch")?,
            else_branch: f.node("else_branch")?,
            elif_branches: f.nodes("elif_branches")?,
        })
    }

    fn encode_payload(&self, out: &mut Map<String, Value>) {
        put_node(out, "condition", &self.condition);
        put_node(out, "then_branch", &self.then_branch);
        put_opt_node(out, "else_branch", self.else_branch.as_ref());
        put_nodes(out, "elif_branches", &self.elif_branches);
    }
}

impl Payload for Return {
    const NODE_TYPE: NodeType = NodeType::Return;
    const EXPECTED: &'static str = "a return node";

    fn decode_payload(f: &mut Fields<'_>) -> Result<Self, ValidationError> {
        Ok(Return {
            value: f.boxed("value")?,
        })
    }

    fn encode_payload(&self, out: &mut Map<String, Value>) {
        put_opt_node(out, "value", self.value.as_deref());
    }
}

impl Payload for Assignment {
    const NODE_TYPE: NodeType = NodeType::Assignment;
    const EXPECTED: &'static str = "an assignment node";

    fn decode_payload(f: &mut Fields<'_>) -> Result<Self, ValidationError> {
        Ok(Assignment {
            target: f.node("target")?,
            value: f.boxed("value")?,
            operator: f.operator("operator", Some(Operator::Assign))?,
        })
    }

    fn encode_payload(&self, out: &mut Map<String, Value>) {
        put_opt_node(out, "target", self.target.as_ref());
        put_opt_node(out, "value", self.value.as_deref());
        out.insert("operator".into(), self.operator.as_str().into());
    }
}

// ==================== Calls ====================

impl Payload for FunctionCall {
    const NODE_TYPE: NodeType = NodeType::FunctionCall;
    const EXPECTED: &'static str = "a function_call node";

    fn decode_payload(f: &mut Fields<'_>) -> Result<Self, ValidationError> {
        Ok(FunctionCall {
            function_name: f.required_string("function_name")?,
            arguments: f.nodes("arguments")?,
            is_recursive: f.bool_or("is_recursive", false)?,
        })
    }

    fn encode_payload(&self, out: &mut Map<String, Value>) {
        out.insert("function_name".into(), self.function_name.clone().into());
        put_nodes(out, "arguments", &self.arguments);
        out.insert("is_recursive".into(), self.is_recursive.into());
    }
}

impl Payload for RecursiveCall {
    const NODE_TYPE: NodeType = NodeType::RecursiveCall;
    const EXPECTED: &'static str = "a recursive_call node";

    fn decode_payload(f: &mut Fields<'_>) -> Result<Self, ValidationError> {
        Ok(RecursiveCall {
            function_name: f.required_string("function_name")?,
            arguments: f.nodes("arguments")?,
            is_recursive: f.bool_or("is_recursive", false)?,
            reduction_pattern: f.optional_string("reduction_pattern")?,
            branching_factor: f.f64_or("branching_factor", 1.0)?,
        })
    }

    fn encode_payload(&self, out: &mut Map<String, Value>) {
        out.insert("function_name".into(), self.function_name.clone().into());
        put_nodes(out, "arguments", &self.arguments);
        out.insert("is_recursive".into(), self.is_recursive.into());
        put_opt_str(out, "reduction_pattern", self.reduction_pattern.as_ref());
        out.insert("branching_factor".into(), self.branching_factor.into());
    }
}

// ==================== Expressions ====================

impl Payload for Variable {
    const NODE_TYPE: NodeType = NodeType::Variable;
    const EXPECTED: &'static str = "a variable node";

    fn decode_payload(f: &mut Fields<'_>) -> Result<Self, ValidationError> {
        Ok(Variable {
            name: f.required_string("name")?,
        })
    }

    fn encode_payload(&self, out: &mut Map<String, Value>) {
        out.insert("name".into(), self.name.clone().into());
    }
}

impl Payload for Literal {
    const NODE_TYPE: NodeType = NodeType::Literal;
    const EXPECTED: &'static str = "a literal node";

    fn decode_payload(f: &mut Fields<'_>) -> Result<Self, ValidationError> {
        Ok(Literal {
            value: f.raw("value"),
            literal_type: f
                .optional_string("literal_type")?
                .unwrap_or_else(|| Literal::default().literal_type),
        })
    }

    fn encode_payload(&self, out: &mut Map<String, Value>) {
        if let Some(value) = &self.value {
            out.insert("value".into(), value.clone());
        }
        out.insert("literal_type".into(), self.literal_type.clone().into());
    }
}

impl Payload for BinaryOp {
    const NODE_TYPE: NodeType = NodeType::BinaryOp;
    const EXPECTED: &'static str = "a binary_op node";

    fn decode_payload(f: &mut Fields<'_>) -> Result<Self, ValidationError> {
        Ok(BinaryOp {
            operator: f.operator("operator", None)?,
            left: f.boxed("left")?,
            right: f.boxed("right")?,
        })
    }

    fn encode_payload(&self, out: &mut Map<String, Value>) {
        out.insert("operator".into(), self.operator.as_str().into());
        put_opt_node(out, "left", self.left.as_deref());
        put_opt_node(out, "right", self.right.as_deref());
    }
}

impl Payload for UnaryOp {
    const NODE_TYPE: NodeType = NodeType::UnaryOp;
    const EXPECTED: &'static str = "a unary_op node";

    fn decode_payload(f: &mut Fields<'_>) -> Result<Self, ValidationError> {
        Ok(UnaryOp {
            operator: f.operator("operator", None)?,
            operand: f.boxed("operand")?,
        })
    }

    fn encode_payload(&self, out: &mut Map<String, Value>) {
        out.insert("operator".into(), self.operator.as_str().into());
        put_opt_node(out, "operand", self.operand.as_deref());
    }
}

impl Payload for ArrayAccess {
    const NODE_TYPE: NodeType = NodeType::ArrayAccess;
    const EXPECTED: &'static str = "an array_access node";

    fn decode_payload(f: &mut Fields<'_>) -> Result<Self, ValidationError> {
        Ok(ArrayAccess {
            array: f.boxed("array")?,
            index: f.boxed("index")?,
        })
    }

    fn encode_payload(&self, out: &mut Map<String, Value>) {
        put_opt_node(out, "array", self.array.as_deref());
        put_opt_node(out, "index", self.index.as_deref());
    }
}

#[cfg(test)]
mod tests {
    use super::super::{decode, decode_as, decode_str, encode, LoopType, SourceLocation};
    use super::*;
    use serde_json::json;

    fn var(name: &str) -> Node<Expr> {
        Node::new(Expr::variable(name))
    }

    fn int(n: i64) -> Node<Expr> {
        Node::new(Expr::literal(n, "int"))
    }

    fn counted_loop() -> Node<NodeKind> {
        let body = Block::new(vec![Node::new(NodeKind::Assignment(Assignment {
            target: Some(Node::new(AssignTarget::Variable(Variable::new("sum")))),
            value: Some(Box::new(Node::new(Expr::binary(
                var("sum"),
                Operator::Add,
                var("i"),
            )))),
            operator: Operator::Assign,
        }))]);
        let mut l = Loop::new(LoopType::For, Node::new(body));
        l.iterator = Some(Node::new(Variable::new("i")));
        l.start = Some(Box::new(int(1)));
        l.end = Some(Box::new(var("n")));
        l.estimated_iterations = Some("n".to_string());
        Node::new(NodeKind::Loop(l)).with_location(SourceLocation {
            line: 2,
            column: 0,
            end_line: Some(4),
            end_column: None,
        })
    }

    #[test]
    fn test_loop_round_trip() {
        let original = counted_loop();
        let encoded = encode(&original);
        assert_eq!(encoded["node_type"], "loop");
        assert_eq!(encoded["loop_type"], "for");
        assert_eq!(encoded["body"]["node_type"], "block");

        let decoded = decode(&encoded).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_defaults_filled_in() {
        let node = decode(&json!({
            "node_type": "loop",
            "body": { "node_type": "block" }
        }))
        .unwrap();
        let NodeKind::Loop(l) = node.kind else {
            panic!("expected loop");
        };
        assert_eq!(l.loop_type, LoopType::For);
        assert_eq!(l.nesting_level, 0);
        assert!(l.body.kind.statements.is_empty());
        assert!(node.metadata.is_empty());
    }

    #[test]
    fn test_unknown_node_type_path() {
        let err = decode(&json!({
            "node_type": "block",
            "statements": [
                { "node_type": "return" },
                { "node_type": "goto", "label": "top" }
            ]
        }))
        .unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownNodeType {
                path: "$.statements[1]".to_string(),
                found: "goto".to_string(),
            }
        );
    }

    #[test]
    fn test_expression_tag_is_not_a_node() {
        let err = decode(&json!({ "node_type": "expression" })).unwrap_err();
        assert!(matches!(err, ValidationError::UnknownNodeType { .. }));
        assert_eq!(err.path(), "$");
    }

    #[test]
    fn test_extra_fields_preserved() {
        let raw = json!({
            "node_type": "variable",
            "name": "n",
            "inferred_type": "int",
            "scope": { "depth": 2 }
        });
        let node = decode(&raw).unwrap();
        assert_eq!(node.extra["inferred_type"], "int");
        assert_eq!(node.extra["scope"], json!({ "depth": 2 }));
        assert!(!node.extra.contains_key("name"));

        let encoded = encode(&node);
        assert_eq!(encoded["inferred_type"], "int");
        assert_eq!(encoded["scope"]["depth"], 2);
    }

    #[test]
    fn test_fields_of_other_kinds_are_extra() {
        let node = decode(&json!({
            "node_type": "variable",
            "name": "x",
            "is_recursive": true
        }))
        .unwrap();
        assert_eq!(node.extra["is_recursive"], true);
    }

    #[test]
    fn test_missing_required_field() {
        let err = decode(&json!({
            "node_type": "function",
            "parameters": []
        }))
        .unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingField {
                path: "$.name".to_string()
            }
        );
    }

    #[test]
    fn test_missing_node_type() {
        let err = decode(&json!({ "name": "x" })).unwrap_err();
        assert_eq!(err.path(), "$.node_type");
    }

    #[test]
    fn test_statement_in_expression_position() {
        let err = decode(&json!({
            "node_type": "binary_op",
            "operator": "+",
            "left": { "node_type": "variable", "name": "a" },
            "right": { "node_type": "block", "statements": [] }
        }))
        .unwrap_err();
        match err {
            ValidationError::UnexpectedNode { path, found, .. } => {
                assert_eq!(path, "$.right");
                assert_eq!(found, "block");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_partial_binary_op_decodes() {
        let raw = json!({
            "node_type": "binary_op",
            "operator": "-",
            "left": { "node_type": "variable", "name": "n" }
        });
        let node = decode_as::<Expr>(&raw).unwrap();
        let Expr::BinaryOp(op) = &node.kind else {
            panic!("expected binary_op, got {:?}", node.node_type());
        };
        assert_eq!(op.operator, Operator::Subtract);
        assert_eq!(op.left.as_deref(), Some(&var("n")));
        assert!(op.right.is_none());
        // The missing side stays missing on the way out
        let out = encode(&node);
        assert_eq!(out["left"], encode(&var("n")));
        assert!(out.get("right").is_none());
    }

    #[test]
    fn test_partial_unary_op_decodes() {
        let node = decode_as::<Expr>(&json!({ "node_type": "unary_op", "operator": "not" }))
            .unwrap();
        let Expr::UnaryOp(op) = &node.kind else {
            panic!("expected unary_op");
        };
        assert_eq!(op.operator, Operator::Not);
        assert!(op.operand.is_none());
        assert!(encode(&node).get("operand").is_none());
    }

    #[test]
    fn test_partial_array_access_decodes() {
        let node = decode_as::<Expr>(&json!({
            "node_type": "array_access",
            "array": { "node_type": "variable", "name": "arr" },
            "index": null
        }))
        .unwrap();
        let Expr::ArrayAccess(access) = &node.kind else {
            panic!("expected array_access");
        };
        assert_eq!(access.array.as_deref(), Some(&var("arr")));
        assert!(access.index.is_none());

        let bare = decode_as::<Expr>(&json!({ "node_type": "array_access" })).unwrap();
        assert!(matches!(
            bare.kind,
            Expr::ArrayAccess(ArrayAccess { array: None, index: None })
        ));
    }

    #[test]
    fn test_parameters_must_be_variables() {
        let err = decode(&json!({
            "node_type": "function",
            "name": "f",
            "parameters": [
                { "node_type": "variable", "name": "a" },
                { "node_type": "literal", "value": 1 }
            ]
        }))
        .unwrap_err();
        assert_eq!(err.path(), "$.parameters[1]");
    }

    #[test]
    fn test_unknown_operator() {
        let err = decode(&json!({
            "node_type": "unary_op",
            "operator": "~",
            "operand": { "node_type": "variable", "name": "a" }
        }))
        .unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownVariant {
                path: "$.operator".to_string(),
                what: "operator",
                found: "~".to_string(),
            }
        );
    }

    #[test]
    fn test_wrong_json_shapes() {
        let err = decode(&json!({ "node_type": "block", "statements": {} })).unwrap_err();
        assert_eq!(err.path(), "$.statements");

        let err = decode(&json!({
            "node_type": "variable",
            "name": "x",
            "location": { "line": -1, "column": 0 }
        }))
        .unwrap_err();
        assert_eq!(err.path(), "$.location.line");

        let err = decode(&json!([1, 2])).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidType { .. }));
    }

    #[test]
    fn test_null_optional_fields_are_absent() {
        let node = decode(&json!({
            "node_type": "return",
            "value": null,
            "location": null
        }))
        .unwrap();
        assert_eq!(node.kind, NodeKind::Return(Return { value: None }));
        assert!(node.extra.is_empty());
    }

    #[test]
    fn test_literal_keeps_null_value() {
        let node = decode(&json!({ "node_type": "literal", "value": null })).unwrap();
        let NodeKind::Literal(lit) = node.kind else {
            panic!("expected literal");
        };
        assert_eq!(lit.value, Some(Value::Null));
        assert_eq!(lit.literal_type, "unknown");
    }

    #[test]
    fn test_elif_chain() {
        let raw = json!({
            "node_type": "conditional",
            "condition": { "node_type": "variable", "name": "a" },
            "then_branch": { "node_type": "block" },
            "elif_branches": [{
                "node_type": "conditional",
                "condition": { "node_type": "variable", "name": "b" },
                "then_branch": { "node_type": "block" }
            }],
            "else_branch": { "node_type": "block" }
        });
        let node = decode(&raw).unwrap();
        let NodeKind::Conditional(cond) = &node.kind else {
            panic!("expected conditional");
        };
        assert_eq!(cond.elif_branches.len(), 1);
        assert!(cond.else_branch.is_some());
        assert_eq!(decode(&encode(&node)).unwrap(), node);
    }

    #[test]
    fn test_recursive_call_defaults() {
        let node = decode_as::<RecursiveCall>(&json!({
            "node_type": "recursive_call",
            "function_name": "fib",
            "arguments": [{
                "node_type": "binary_op",
                "operator": "-",
                "left": { "node_type": "variable", "name": "n" },
                "right": { "node_type": "literal", "value": 1 }
            }]
        }))
        .unwrap();
        assert_eq!(node.kind.branching_factor, 1.0);
        assert_eq!(node.kind.arguments.len(), 1);
    }

    #[test]
    fn test_decode_as_rejects_other_root() {
        let err = decode_as::<Program>(&json!({ "node_type": "block" })).unwrap_err();
        assert!(matches!(err, ValidationError::UnexpectedNode { .. }));
    }

    #[test]
    fn test_decode_str_invalid_json() {
        let err = decode_str("{ not json").unwrap_err();
        assert!(matches!(err, ValidationError::Json { .. }));
    }

    #[test]
    fn test_serde_integration() {
        let node: Node<Program> = serde_json::from_value(json!({
            "node_type": "program",
            "functions": [{ "node_type": "function", "name": "main" }]
        }))
        .unwrap();
        assert_eq!(node.kind.functions[0].kind.name, "main");

        let text = serde_json::to_string(&node).unwrap();
        assert!(text.contains("\"node_type\":\"program\""));

        let bad: Result<Node<Program>, _> =
            serde_json::from_value(json!({ "node_type": "program", "functions": 3 }));
        assert!(bad.unwrap_err().to_string().contains("$.functions"));
    }
}
