//! AST validation error types.
//!
//! Every error carries the JSON path of the offending value, written as
//! `$` for the root, `.field` for object keys and `[i]` for array
//! elements, e.g. `$.functions[0].body.statements[2]`.

use thiserror::Error;

/// Why an externally supplied tree does not fit the AST grammar.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is absent (or null).
    #[error("{path}: missing required field")]
    MissingField {
        /// Path of the missing field.
        path: String,
    },

    /// A value has the wrong JSON shape.
    #[error("{path}: expected {expected}, found {found}")]
    InvalidType {
        /// Path of the offending value.
        path: String,
        /// What the grammar requires here.
        expected: String,
        /// What was actually there.
        found: String,
    },

    /// `node_type` is not one of the known node kinds.
    #[error("{path}: unknown node_type `{found}`")]
    UnknownNodeType {
        /// Path of the node.
        path: String,
        /// The unrecognized tag.
        found: String,
    },

    /// A known node kind in a position that does not allow it.
    #[error("{path}: `{found}` node not allowed here, expected {expected}")]
    UnexpectedNode {
        /// Path of the node.
        path: String,
        /// The node's kind.
        found: String,
        /// The kinds allowed in this position.
        expected: String,
    },

    /// An enumerated string field holds a value outside its set.
    #[error("{path}: unknown {what} `{found}`")]
    UnknownVariant {
        /// Path of the field.
        path: String,
        /// Which enumeration (`operator`, `loop_type`).
        what: &'static str,
        /// The unrecognized value.
        found: String,
    },

    /// The input was not JSON at all.
    #[error("$: invalid JSON: {message}")]
    Json {
        /// The parser's description of the problem.
        message: String,
    },
}

impl ValidationError {
    /// The path of the value that failed validation.
    pub fn path(&self) -> &str {
        match self {
            ValidationError::MissingField { path }
            | ValidationError::InvalidType { path, .. }
            | ValidationError::UnknownNodeType { path, .. }
            | ValidationError::UnexpectedNode { path, .. }
            | ValidationError::UnknownVariant { path, .. } => path,
            ValidationError::Json { .. } => "$",
        }
    }
}
