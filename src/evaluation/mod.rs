//! Typed models of the exchange with the remote evaluator.
//!
//! A submission travels as an [`EvaluationRequest`] bundling the student's
//! [`StudentResponse`], the author's [`ExpectedAnswer`] and the
//! [`EvaluationParams`]; the evaluator answers with an
//! [`EvaluationResult`]. Transport is left to the caller.
//!
//! Field defaults follow the evaluator's, so partial JSON from either side
//! deserializes. Numeric ranges are not enforced by deserialization; call
//! `validate()` before trusting a bundle.

mod complexity;
mod error;
mod result;

pub use complexity::ComplexityClass;
pub use error::BoundaryError;
pub use result::{
    ComplexityAnalysis, ConstructAnalysis, EvaluationResult, FeedbackItem, FeedbackLevel,
    ParseResult, SpaceComplexity, SpaceComplexityResult, TimeComplexity, TimeComplexityResult,
};

use error::check_range;
use serde::{Deserialize, Serialize};

/// Pseudocode dialect the evaluator's parser should assume.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PseudocodeStyle {
    #[default]
    Auto,
    Python,
    Pascal,
    C,
}

/// Options controlling what the evaluator checks and how it scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationParams {
    // What to evaluate
    pub analyze_pseudocode: bool,
    pub require_time_complexity: bool,
    pub require_space_complexity: bool,

    // Scoring
    pub partial_credit: bool,
    pub time_weight: f64,
    pub space_weight: f64,

    // Comparison
    /// Treat `O(2n)` as `O(n)`.
    pub complexity_equivalence: bool,
    pub case_sensitive: bool,
    pub strict_notation: bool,

    // Feedback
    pub show_detailed_feedback: bool,
    pub show_correct_answer: bool,
    pub show_detected_complexity: bool,
    /// Ask for the parsed tree in [`EvaluationResult::ast`].
    pub show_ast: bool,

    // Parser
    pub pseudocode_style: PseudocodeStyle,
    /// Fail on parse errors instead of best effort.
    pub strict_parsing: bool,

    // Limits
    /// Deepest loop nesting analyzed, `1..=50`.
    pub max_nesting_depth: u32,
    /// `0.1..=60`.
    pub timeout_seconds: f64,
}

impl Default for EvaluationParams {
    fn default() -> Self {
        Self {
            analyze_pseudocode: true,
            require_time_complexity: true,
            require_space_complexity: true,
            partial_credit: true,
            time_weight: 0.5,
            space_weight: 0.5,
            complexity_equivalence: true,
            case_sensitive: false,
            strict_notation: false,
            show_detailed_feedback: true,
            show_correct_answer: true,
            show_detected_complexity: true,
            show_ast: false,
            pseudocode_style: PseudocodeStyle::Auto,
            strict_parsing: false,
            max_nesting_depth: 10,
            timeout_seconds: 5.0,
        }
    }
}

impl EvaluationParams {
    pub fn validate(&self) -> Result<(), BoundaryError> {
        check_range("time_weight", self.time_weight, 0.0, 1.0)?;
        check_range("space_weight", self.space_weight, 0.0, 1.0)?;
        check_range(
            "max_nesting_depth",
            f64::from(self.max_nesting_depth),
            1.0,
            50.0,
        )?;
        check_range("timeout_seconds", self.timeout_seconds, 0.1, 60.0)
    }
}

/// What the student submitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentResponse {
    pub pseudocode: String,
    /// The student's answer, e.g. `"O(n^2)"`.
    #[serde(default)]
    pub time_complexity: Option<String>,
    #[serde(default)]
    pub space_complexity: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
}

impl StudentResponse {
    pub fn new(pseudocode: impl Into<String>) -> Self {
        Self {
            pseudocode: pseudocode.into(),
            ..Default::default()
        }
    }

    /// Rejects a blank submission.
    pub fn validate(&self) -> Result<(), BoundaryError> {
        if self.pseudocode.trim().is_empty() {
            return Err(BoundaryError::EmptyPseudocode);
        }
        Ok(())
    }

    /// The stated time complexity as a class, if it reads as one.
    pub fn time_class(&self) -> Option<ComplexityClass> {
        self.time_complexity.as_deref().and_then(ComplexityClass::parse)
    }

    /// The stated space complexity as a class, if it reads as one.
    pub fn space_class(&self) -> Option<ComplexityClass> {
        self.space_complexity.as_deref().and_then(ComplexityClass::parse)
    }
}

fn constant_notation() -> String {
    ComplexityClass::Constant.notation().to_string()
}

fn half() -> f64 {
    0.5
}

/// The exercise author's answer key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectedAnswer {
    #[serde(default = "constant_notation")]
    pub expected_time_complexity: String,
    #[serde(default = "constant_notation")]
    pub expected_space_complexity: String,
    #[serde(default)]
    pub acceptable_time_alternatives: Vec<String>,
    #[serde(default)]
    pub acceptable_space_alternatives: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub algorithm_description: Option<String>,
    /// `sorting`, `searching`, `graph`, ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub algorithm_type: Option<String>,
    /// `nested_loop`, `recursion`, ...
    #[serde(default)]
    pub expected_constructs: Vec<String>,
    #[serde(default = "half")]
    pub time_complexity_weight: f64,
    #[serde(default = "half")]
    pub space_complexity_weight: f64,
    #[serde(default)]
    pub evaluation_params: EvaluationParams,
}

impl Default for ExpectedAnswer {
    /// A fresh answer key: time left for the author to fill in, constant
    /// space expected.
    fn default() -> Self {
        Self {
            expected_time_complexity: String::new(),
            expected_space_complexity: constant_notation(),
            acceptable_time_alternatives: Vec::new(),
            acceptable_space_alternatives: Vec::new(),
            algorithm_description: None,
            algorithm_type: None,
            expected_constructs: Vec::new(),
            time_complexity_weight: 0.5,
            space_complexity_weight: 0.5,
            evaluation_params: EvaluationParams::default(),
        }
    }
}

impl ExpectedAnswer {
    pub fn validate(&self) -> Result<(), BoundaryError> {
        check_range("time_complexity_weight", self.time_complexity_weight, 0.0, 1.0)?;
        check_range("space_complexity_weight", self.space_complexity_weight, 0.0, 1.0)?;
        self.evaluation_params.validate()
    }

    /// Whether `answer` matches the expected time complexity or one of its
    /// alternatives, comparing by class where both sides parse.
    pub fn accepts_time(&self, answer: &str) -> bool {
        accepts(&self.expected_time_complexity, &self.acceptable_time_alternatives, answer)
    }

    /// Space counterpart of [`ExpectedAnswer::accepts_time`].
    pub fn accepts_space(&self, answer: &str) -> bool {
        accepts(&self.expected_space_complexity, &self.acceptable_space_alternatives, answer)
    }
}

fn accepts(expected: &str, alternatives: &[String], answer: &str) -> bool {
    let class = ComplexityClass::parse(answer);
    std::iter::once(expected)
        .chain(alternatives.iter().map(String::as_str))
        .any(|candidate| match (class, ComplexityClass::parse(candidate)) {
            (Some(a), Some(b)) => a == b,
            _ => candidate.trim() == answer.trim(),
        })
}

/// The body posted to the evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub response: StudentResponse,
    pub answer: ExpectedAnswer,
    #[serde(default)]
    pub params: EvaluationParams,
}

impl EvaluationRequest {
    /// Bundles a submission with the answer key's own parameters.
    pub fn new(response: StudentResponse, answer: ExpectedAnswer) -> Self {
        let params = answer.evaluation_params.clone();
        Self {
            response,
            answer,
            params,
        }
    }

    pub fn validate(&self) -> Result<(), BoundaryError> {
        self.response.validate()?;
        self.answer.validate()?;
        self.params.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_params_defaults_from_empty_json() {
        let params: EvaluationParams = serde_json::from_value(json!({})).unwrap();
        assert_eq!(params, EvaluationParams::default());
        assert_eq!(params.max_nesting_depth, 10);
        assert_eq!(params.timeout_seconds, 5.0);
        assert_eq!(params.pseudocode_style, PseudocodeStyle::Auto);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_params_ranges() {
        let params = EvaluationParams {
            max_nesting_depth: 0,
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(BoundaryError::OutOfRange {
                field: "max_nesting_depth",
                ..
            })
        ));

        let params = EvaluationParams {
            timeout_seconds: 0.05,
            ..Default::default()
        };
        assert!(params.validate().is_err());

        let params = EvaluationParams {
            timeout_seconds: 60.0,
            max_nesting_depth: 50,
            ..Default::default()
        };
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_pseudocode_style_wire_names() {
        let params: EvaluationParams =
            serde_json::from_value(json!({ "pseudocode_style": "pascal" })).unwrap();
        assert_eq!(params.pseudocode_style, PseudocodeStyle::Pascal);
        assert!(serde_json::from_value::<EvaluationParams>(json!({ "pseudocode_style": "basic" })).is_err());
    }

    #[test]
    fn test_blank_pseudocode_rejected() {
        assert_eq!(StudentResponse::default().validate(), Err(BoundaryError::EmptyPseudocode));
        assert!(StudentResponse::new("  \n\t").validate().is_err());
        assert!(StudentResponse::new("x = 1").validate().is_ok());
    }

    #[test]
    fn test_student_classes() {
        let response = StudentResponse {
            time_complexity: Some("O(n^2)".to_string()),
            space_complexity: Some("constant".to_string()),
            ..StudentResponse::new("FOR i = 1 TO n DO")
        };
        assert_eq!(response.time_class(), Some(ComplexityClass::Quadratic));
        assert_eq!(response.space_class(), None);
    }

    #[test]
    fn test_expected_answer_defaults() {
        let answer = ExpectedAnswer::default();
        assert_eq!(answer.expected_time_complexity, "");
        assert_eq!(answer.expected_space_complexity, "O(1)");
        assert_eq!(answer.time_complexity_weight, 0.5);
        assert!(answer.validate().is_ok());

        let answer: ExpectedAnswer = serde_json::from_value(json!({})).unwrap();
        assert_eq!(answer.expected_time_complexity, "O(1)");
        assert_eq!(answer.evaluation_params, EvaluationParams::default());
    }

    #[test]
    fn test_accepts_alternatives() {
        let answer = ExpectedAnswer {
            expected_time_complexity: "O(n²)".to_string(),
            acceptable_time_alternatives: vec!["O(n*n)".to_string()],
            ..Default::default()
        };
        assert!(answer.accepts_time("O(n^2)"));
        assert!(answer.accepts_time("O(n*n)"));
        assert!(!answer.accepts_time("O(n)"));
        assert!(answer.accepts_space("o(1)"));
    }

    #[test]
    fn test_request_validation() {
        let mut answer = ExpectedAnswer::default();
        answer.evaluation_params.show_ast = true;
        let request = EvaluationRequest::new(StudentResponse::new("RETURN 0"), answer);
        assert!(request.params.show_ast);
        assert!(request.validate().is_ok());

        let bad = EvaluationRequest {
            params: EvaluationParams {
                space_weight: -0.1,
                ..Default::default()
            },
            ..request
        };
        assert!(matches!(
            bad.validate(),
            Err(BoundaryError::OutOfRange {
                field: "space_weight",
                ..
            })
        ));
    }

    #[test]
    fn test_request_wire_shape() {
        let request = EvaluationRequest::new(StudentResponse::new("x = 1"), ExpectedAnswer::default());
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["response"]["pseudocode"], "x = 1");
        assert_eq!(json["answer"]["expected_space_complexity"], "O(1)");
        assert_eq!(json["params"]["pseudocode_style"], "auto");
    }
}
