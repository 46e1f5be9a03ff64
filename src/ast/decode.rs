//! Validation of loosely-typed JSON against the AST grammar.
//!
//! Decoding walks the JSON tree once. Each object is checked for a known
//! `node_type`, that type is checked against what the parent position
//! allows, and the kind's fields are pulled out through [`Fields`]. Keys no
//! kind claims end up in [`Node::extra`].
//!
//! Paths are built as a chain of stack frames and only rendered to a
//! string when an error is reported.

use serde_json::{Map, Value};
use std::fmt;

use super::{LoopType, Node, NodeType, Operator, SourceLocation, ValidationError};

/// Keys shared by every node, handled outside the per-kind decoders.
const BASE_KEYS: [&str; 3] = ["node_type", "location", "metadata"];

/// Position of a value inside the document being decoded.
#[derive(Debug, Clone, Copy)]
pub enum Path<'a> {
    Root,
    Key(&'a Path<'a>, &'a str),
    Index(&'a Path<'a>, usize),
}

impl fmt::Display for Path<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Path::Root => f.write_str("$"),
            Path::Key(parent, key) => write!(f, "{parent}.{key}"),
            Path::Index(parent, index) => write!(f, "{parent}[{index}]"),
        }
    }
}

/// A payload type that can appear in some set of AST positions.
///
/// Implemented for every node payload, for [`NodeKind`](super::NodeKind)
/// (any node) and for [`Expr`](super::Expr) (any expression).
pub trait NodeShape: Sized {
    /// Description of the acceptable kinds, used in error messages.
    fn expected() -> &'static str;

    /// Whether a node tagged `node_type` can decode into this shape.
    fn accepts(node_type: NodeType) -> bool;

    /// Decodes the kind-specific fields of a node already known to be
    /// tagged `node_type`.
    fn decode_fields(node_type: NodeType, fields: &mut Fields<'_>)
        -> Result<Self, ValidationError>;

    /// The tag this payload encodes as.
    fn tag(&self) -> NodeType;

    /// Writes the kind-specific fields.
    fn encode_fields(&self, out: &mut Map<String, Value>);
}

/// Decodes one node at `path`.
pub(super) fn decode_node<T: NodeShape>(
    value: &Value,
    path: &Path<'_>,
) -> Result<Node<T>, ValidationError> {
    let object = value
        .as_object()
        .ok_or_else(|| invalid_type(path, "an AST node object", value))?;

    let tag_path = Path::Key(path, "node_type");
    let node_type = match object.get("node_type") {
        None | Some(Value::Null) => {
            return Err(ValidationError::MissingField {
                path: tag_path.to_string(),
            })
        }
        Some(Value::String(tag)) => {
            NodeType::from_wire(tag).ok_or_else(|| ValidationError::UnknownNodeType {
                path: path.to_string(),
                found: tag.clone(),
            })?
        }
        Some(other) => return Err(invalid_type(&tag_path, "a string", other)),
    };

    if !T::accepts(node_type) {
        return Err(ValidationError::UnexpectedNode {
            path: path.to_string(),
            found: node_type.as_str().to_string(),
            expected: T::expected().to_string(),
        });
    }

    let mut fields = Fields::new(object, path);
    let location = fields.location("location")?;
    let metadata = fields.object_or_empty("metadata")?;
    let kind = T::decode_fields(node_type, &mut fields)?;

    Ok(Node {
        kind,
        location,
        metadata,
        extra: fields.into_extra(),
    })
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn invalid_type(path: &Path<'_>, expected: &str, found: &Value) -> ValidationError {
    ValidationError::InvalidType {
        path: path.to_string(),
        expected: expected.to_string(),
        found: describe(found).to_string(),
    }
}

/// Field accessor for one JSON object being decoded.
///
/// Remembers which keys were read so that the rest can be kept as extra
/// fields. Optional fields treat `null` the same as absent.
pub struct Fields<'a> {
    object: &'a Map<String, Value>,
    path: &'a Path<'a>,
    consumed: Vec<&'static str>,
}

impl<'a> Fields<'a> {
    fn new(object: &'a Map<String, Value>, path: &'a Path<'a>) -> Self {
        Self {
            object,
            path,
            consumed: Vec::new(),
        }
    }

    /// Looks up `key`, treating null as absent.
    fn get(&mut self, key: &'static str) -> Option<&'a Value> {
        self.consumed.push(key);
        self.object.get(key).filter(|v| !v.is_null())
    }

    fn missing(&self, key: &'static str) -> ValidationError {
        ValidationError::MissingField {
            path: Path::Key(self.path, key).to_string(),
        }
    }

    fn wrong(&self, key: &'static str, expected: &str, found: &Value) -> ValidationError {
        invalid_type(&Path::Key(self.path, key), expected, found)
    }

    /// Raw value of `key`, null included. For fields typed as "any JSON".
    pub fn raw(&mut self, key: &'static str) -> Option<Value> {
        self.consumed.push(key);
        self.object.get(key).cloned()
    }

    pub fn optional_string(&mut self, key: &'static str) -> Result<Option<String>, ValidationError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(self.wrong(key, "a string", other)),
        }
    }

    pub fn required_string(&mut self, key: &'static str) -> Result<String, ValidationError> {
        self.optional_string(key)?.ok_or_else(|| self.missing(key))
    }

    pub fn bool_or(&mut self, key: &'static str, default: bool) -> Result<bool, ValidationError> {
        match self.get(key) {
            None => Ok(default),
            Some(Value::Bool(b)) => Ok(*b),
            Some(other) => Err(self.wrong(key, "a boolean", other)),
        }
    }

    pub fn optional_u32(&mut self, key: &'static str) -> Result<Option<u32>, ValidationError> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .map(Some)
                .ok_or_else(|| self.wrong(key, "a non-negative integer", value)),
        }
    }

    pub fn required_u32(&mut self, key: &'static str) -> Result<u32, ValidationError> {
        self.optional_u32(key)?.ok_or_else(|| self.missing(key))
    }

    pub fn f64_or(&mut self, key: &'static str, default: f64) -> Result<f64, ValidationError> {
        match self.get(key) {
            None => Ok(default),
            Some(value) => value
                .as_f64()
                .ok_or_else(|| self.wrong(key, "a number", value)),
        }
    }

    /// An operator field; `default` of `None` makes it required.
    pub fn operator(
        &mut self,
        key: &'static str,
        default: Option<Operator>,
    ) -> Result<Operator, ValidationError> {
        match self.get(key) {
            None => default.ok_or_else(|| self.missing(key)),
            Some(Value::String(s)) => {
                Operator::from_wire(s).ok_or_else(|| ValidationError::UnknownVariant {
                    path: Path::Key(self.path, key).to_string(),
                    what: "operator",
                    found: s.clone(),
                })
            }
            Some(other) => Err(self.wrong(key, "an operator string", other)),
        }
    }

    pub fn loop_type(&mut self, key: &'static str) -> Result<LoopType, ValidationError> {
        match self.get(key) {
            None => Ok(LoopType::default()),
            Some(Value::String(s)) => {
                LoopType::from_wire(s).ok_or_else(|| ValidationError::UnknownVariant {
                    path: Path::Key(self.path, key).to_string(),
                    what: "loop_type",
                    found: s.clone(),
                })
            }
            Some(other) => Err(self.wrong(key, "a loop_type string", other)),
        }
    }

    pub fn location(&mut self, key: &'static str) -> Result<Option<SourceLocation>, ValidationError> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };
        let path = Path::Key(self.path, key);
        let object = value
            .as_object()
            .ok_or_else(|| invalid_type(&path, "a location object", value))?;

        // Unknown keys inside a location are dropped
        let mut loc = Fields::new(object, &path);
        Ok(Some(SourceLocation {
            line: loc.required_u32("line")?,
            column: loc.required_u32("column")?,
            end_line: loc.optional_u32("end_line")?,
            end_column: loc.optional_u32("end_column")?,
        }))
    }

    pub fn object_or_empty(
        &mut self,
        key: &'static str,
    ) -> Result<Map<String, Value>, ValidationError> {
        match self.get(key) {
            None => Ok(Map::new()),
            Some(Value::Object(map)) => Ok(map.clone()),
            Some(other) => Err(self.wrong(key, "an object", other)),
        }
    }

    /// An optional child node.
    pub fn node<T: NodeShape>(&mut self, key: &'static str) -> Result<Option<Node<T>>, ValidationError> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => decode_node(value, &Path::Key(self.path, key)).map(Some),
        }
    }

    /// A required child node.
    pub fn required_node<T: NodeShape>(&mut self, key: &'static str) -> Result<Node<T>, ValidationError> {
        self.node(key)?.ok_or_else(|| self.missing(key))
    }

    /// An optional child node, boxed.
    pub fn boxed<T: NodeShape>(
        &mut self,
        key: &'static str,
    ) -> Result<Option<Box<Node<T>>>, ValidationError> {
        Ok(self.node(key)?.map(Box::new))
    }

    /// A required child node, boxed.
    pub fn required_boxed<T: NodeShape>(
        &mut self,
        key: &'static str,
    ) -> Result<Box<Node<T>>, ValidationError> {
        self.required_node(key).map(Box::new)
    }

    /// An array of child nodes; absent means empty.
    pub fn nodes<T: NodeShape>(&mut self, key: &'static str) -> Result<Vec<Node<T>>, ValidationError> {
        let Some(value) = self.get(key) else {
            return Ok(Vec::new());
        };
        let path = Path::Key(self.path, key);
        let items = value
            .as_array()
            .ok_or_else(|| invalid_type(&path, "an array", value))?;
        items
            .iter()
            .enumerate()
            .map(|(i, item)| decode_node(item, &Path::Index(&path, i)))
            .collect()
    }

    /// Everything not read by the decoders.
    fn into_extra(self) -> Map<String, Value> {
        self.object
            .iter()
            .filter(|(key, _)| {
                !BASE_KEYS.contains(&key.as_str()) && !self.consumed.contains(&key.as_str())
            })
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_display() {
        let root = Path::Root;
        let functions = Path::Key(&root, "functions");
        let first = Path::Index(&functions, 0);
        let body = Path::Key(&first, "body");
        assert_eq!(root.to_string(), "$");
        assert_eq!(body.to_string(), "$.functions[0].body");
    }

    #[test]
    fn test_describe() {
        assert_eq!(describe(&Value::Null), "null");
        assert_eq!(describe(&Value::from(vec![1, 2])), "an array");
    }
}
