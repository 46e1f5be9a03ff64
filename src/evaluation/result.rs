//! What the evaluator sends back.
//!
//! Every field the evaluator may omit has a serde default, so a minimal
//! `{"is_correct": false}` is a valid result.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::check_range;
use super::{BoundaryError, ComplexityClass};
use crate::ast::{self, Node, Program, ValidationError};

/// Severity of a feedback item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackLevel {
    #[default]
    Info,
    Success,
    Warning,
    Error,
    Hint,
}

/// One categorized piece of feedback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackItem {
    #[serde(default)]
    pub level: FeedbackLevel,
    pub message: String,
    /// `time_complexity`, `space_complexity`, `syntax`, ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl FeedbackItem {
    pub fn new(level: FeedbackLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            category: None,
            location: None,
            suggestion: None,
        }
    }
}

/// Derived time complexity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeComplexity {
    pub overall: ComplexityClass,
    /// Human-readable expression, e.g. `"n * (n - 1) / 2"`.
    pub expression: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dominant_term: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

/// Derived space complexity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpaceComplexity {
    pub overall: ComplexityClass,
    pub expression: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auxiliary_space: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

/// A code construct the analyzer found, with its cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructAnalysis {
    /// `loop`, `nested_loop`, `recursion`, ...
    pub construct_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default = "constant")]
    pub complexity_contribution: ComplexityClass,
    #[serde(default)]
    pub details: Map<String, Value>,
}

fn constant() -> ComplexityClass {
    ComplexityClass::Constant
}

fn full_confidence() -> f64 {
    1.0
}

/// Outcome of the evaluator's parse step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ast: Option<Value>,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalized_code: Option<String>,
}

impl ParseResult {
    /// Decodes the parsed tree, if one was sent.
    pub fn program(&self) -> Result<Option<Node<Program>>, ValidationError> {
        decode_program(self.ast.as_ref())
    }
}

/// Full analysis of the submitted pseudocode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexityAnalysis {
    pub time_complexity: TimeComplexity,
    pub space_complexity: SpaceComplexity,
    #[serde(default)]
    pub constructs: Vec<ConstructAnalysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub algorithm_type: Option<String>,
    #[serde(default = "full_confidence")]
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parse_result: Option<ParseResult>,
}

/// Grading of the student's time complexity answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeComplexityResult {
    pub is_correct: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_answer: Option<String>,
    pub expected_answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_complexity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_normalized: Option<ComplexityClass>,
    pub expected_normalized: ComplexityClass,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<TimeComplexity>,
    #[serde(default)]
    pub feedback: String,
}

/// Grading of the student's space complexity answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpaceComplexityResult {
    pub is_correct: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_answer: Option<String>,
    pub expected_answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_complexity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_normalized: Option<ComplexityClass>,
    pub expected_normalized: ComplexityClass,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<SpaceComplexity>,
    #[serde(default)]
    pub feedback: String,
}

/// The evaluator's verdict on one submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub is_correct: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_complexity_result: Option<TimeComplexityResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_complexity_result: Option<SpaceComplexityResult>,
    /// In `[0, 1]`.
    #[serde(default)]
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<ComplexityAnalysis>,
    /// Raw tree, present only when `show_ast` was requested. Use
    /// [`EvaluationResult::program`] to validate it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ast: Option<Value>,
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub feedback_items: Vec<FeedbackItem>,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl EvaluationResult {
    /// Decodes the attached AST.
    ///
    /// `Ok(None)` when the evaluator sent no tree, which is the usual case.
    pub fn program(&self) -> Result<Option<Node<Program>>, ValidationError> {
        decode_program(self.ast.as_ref())
    }

    /// Feedback items of one severity.
    pub fn items_at(&self, level: FeedbackLevel) -> impl Iterator<Item = &FeedbackItem> {
        self.feedback_items
            .iter()
            .filter(move |item| item.level == level)
    }

    /// Checks the score and confidence values.
    pub fn validate(&self) -> Result<(), BoundaryError> {
        check_range("score", self.score, 0.0, 1.0)?;
        if let Some(analysis) = &self.analysis {
            check_range("analysis.confidence", analysis.confidence, 0.0, 1.0)?;
            if let Some(c) = analysis.time_complexity.confidence {
                check_range("analysis.time_complexity.confidence", c, 0.0, 1.0)?;
            }
            if let Some(c) = analysis.space_complexity.confidence {
                check_range("analysis.space_complexity.confidence", c, 0.0, 1.0)?;
            }
        }
        Ok(())
    }
}

fn decode_program(raw: Option<&Value>) -> Result<Option<Node<Program>>, ValidationError> {
    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(raw) => ast::decode_as::<Program>(raw).map(Some),
    }
}
