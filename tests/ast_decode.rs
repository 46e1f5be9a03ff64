//! Decoding realistic evaluator output end to end.

#![recursion_limit = "256"]

use pseudocode::ast::{self, Expr, LoopType, NodeKind, Operator, ValidationError};
use pseudocode::evaluation::{ComplexityClass, EvaluationResult, FeedbackLevel};
use serde_json::{json, Value};

/// A bubble-sort submission as the evaluator reports it with `show_ast`.
fn bubble_sort_result() -> Value {
    json!({
        "is_correct": false,
        "score": 0.5,
        "time_complexity_result": {
            "is_correct": true,
            "student_answer": "O(n^2)",
            "expected_answer": "O(n^2)",
            "detected_complexity": "O(n²)",
            "student_normalized": "O(n²)",
            "expected_normalized": "O(n²)",
            "feedback": "Correct: two nested loops over the array."
        },
        "space_complexity_result": {
            "is_correct": false,
            "student_answer": "O(n)",
            "expected_answer": "O(1)",
            "student_normalized": "O(n)",
            "expected_normalized": "O(1)"
        },
        "analysis": {
            "time_complexity": { "overall": "O(n²)", "expression": "n * (n - 1)", "confidence": 0.9 },
            "space_complexity": { "overall": "O(1)", "expression": "1" },
            "constructs": [
                { "construct_type": "nested_loop", "complexity_contribution": "O(n²)", "details": { "depth": 2 } }
            ],
            "algorithm_type": "sorting"
        },
        "feedback": "Time complexity is right; the sort works in place.",
        "feedback_items": [
            { "level": "success", "message": "Time complexity correct", "category": "time_complexity" },
            { "level": "error", "message": "Space complexity incorrect", "category": "space_complexity",
              "suggestion": "Swapping in place needs no extra array." }
        ],
        "metadata": { "parser": "lark", "elapsed_ms": 12 },
        "ast": {
            "node_type": "program",
            "location": { "line": 1, "column": 0 },
            "functions": [{
                "node_type": "function",
                "name": "bubble_sort",
                "parameters": [{ "node_type": "variable", "name": "arr" }],
                "body": {
                    "node_type": "block",
                    "statements": [
                        {
                            "node_type": "assignment",
                            "target": { "node_type": "variable", "name": "n" },
                            "value": {
                                "node_type": "literal",
                                "value": 10,
                                "literal_type": "int"
                            }
                        },
                        {
                            "node_type": "loop",
                            "loop_type": "for",
                            "iterator": { "node_type": "variable", "name": "i" },
                            "start": { "node_type": "literal", "value": 0 },
                            "end": { "node_type": "variable", "name": "n" },
                            "estimated_iterations": "n",
                            "body": {
                                "node_type": "block",
                                "statements": [{
                                    "node_type": "loop",
                                    "loop_type": "for",
                                    "nesting_level": 1,
                                    "iterator": { "node_type": "variable", "name": "j" },
                                    "start": { "node_type": "literal", "value": 0 },
                                    "end": {
                                        "node_type": "binary_op",
                                        "operator": "-",
                                        "left": { "node_type": "variable", "name": "n" },
                                        "right": { "node_type": "variable", "name": "i" }
                                    },
                                    "body": {
                                        "node_type": "block",
                                        "statements": [{
                                            "node_type": "conditional",
                                            "condition": {
                                                "node_type": "binary_op",
                                                "operator": ">",
                                                "left": {
                                                    "node_type": "array_access",
                                                    "array": { "node_type": "variable", "name": "arr" },
                                                    "index": { "node_type": "variable", "name": "j" }
                                                },
                                                "right": {
                                                    "node_type": "array_access",
                                                    "array": { "node_type": "variable", "name": "arr" },
                                                    "index": {
                                                        "node_type": "binary_op",
                                                        "operator": "+",
                                                        "left": { "node_type": "variable", "name": "j" },
                                                        "right": { "node_type": "literal", "value": 1 }
                                                    }
                                                }
                                            },
                                            "then_branch": {
                                                "node_type": "block",
                                                "statements": [{
                                                    "node_type": "function_call",
                                                    "function_name": "swap",
                                                    "arguments": [
                                                        { "node_type": "variable", "name": "arr" },
                                                        { "node_type": "variable", "name": "j" }
                                                    ],
                                                    "side_effects": ["arr"]
                                                }]
                                            }
                                        }]
                                    }
                                }]
                            }
                        },
                        { "node_type": "return", "value": { "node_type": "variable", "name": "arr" } }
                    ]
                }
            }]
        }
    })
}

#[test]
fn test_result_bundle_decodes() {
    let result: EvaluationResult = serde_json::from_value(bubble_sort_result()).unwrap();
    assert!(result.validate().is_ok());
    assert_eq!(result.score, 0.5);

    let time = result.time_complexity_result.as_ref().unwrap();
    assert_eq!(time.expected_normalized, ComplexityClass::Quadratic);
    let space = result.space_complexity_result.as_ref().unwrap();
    assert_eq!(space.student_normalized, Some(ComplexityClass::Linear));
    assert_eq!(space.feedback, "");

    let analysis = result.analysis.as_ref().unwrap();
    assert_eq!(analysis.confidence, 1.0);
    assert_eq!(analysis.constructs[0].details["depth"], 2);

    assert_eq!(result.items_at(FeedbackLevel::Error).count(), 1);
    assert_eq!(result.metadata["parser"], "lark");
}

#[test]
fn test_result_ast_is_typed() {
    let result: EvaluationResult = serde_json::from_value(bubble_sort_result()).unwrap();
    let program = result.program().unwrap().unwrap();
    assert_eq!(program.location.map(|l| l.line), Some(1));
    assert!(program.kind.global_statements.is_none());

    let function = &program.kind.functions[0].kind;
    assert_eq!(function.name, "bubble_sort");
    assert_eq!(function.parameters[0].kind.name, "arr");

    let body = &function.body.as_ref().unwrap().kind.statements;
    assert_eq!(body.len(), 3);

    let NodeKind::Loop(outer) = &body[1].kind else {
        panic!("expected outer loop, got {:?}", body[1].node_type());
    };
    assert_eq!(outer.loop_type, LoopType::For);
    assert_eq!(outer.nesting_level, 0);
    assert_eq!(outer.estimated_iterations.as_deref(), Some("n"));

    let NodeKind::Loop(inner) = &outer.body.kind.statements[0].kind else {
        panic!("expected inner loop");
    };
    assert_eq!(inner.nesting_level, 1);
    let Some(end) = &inner.end else {
        panic!("inner loop has no end bound");
    };
    assert!(matches!(&end.kind, Expr::BinaryOp(op) if op.operator == Operator::Subtract));

    let NodeKind::Conditional(cond) = &inner.body.kind.statements[0].kind else {
        panic!("expected conditional");
    };
    assert!(cond.else_branch.is_none());
    assert!(cond.elif_branches.is_empty());

    // Unmodelled fields survive on the node that carried them
    let call = &cond.then_branch.kind.statements[0];
    assert_eq!(call.extra["side_effects"], json!(["arr"]));
}

#[test]
fn test_reencoded_ast_decodes_identically() {
    let raw = bubble_sort_result()["ast"].clone();
    let first = ast::decode(&raw).unwrap();
    let second = ast::decode(&ast::encode(&first)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_deep_error_path() {
    let mut raw = bubble_sort_result()["ast"].clone();
    raw["functions"][0]["body"]["statements"][1]["body"]["statements"][0]["end"]["operator"] =
        json!("<>");
    let err = ast::decode(&raw).unwrap_err();
    assert_eq!(
        err.path(),
        "$.functions[0].body.statements[1].body.statements[0].end.operator"
    );
    assert!(matches!(err, ValidationError::UnknownVariant { what: "operator", .. }));
}

#[test]
fn test_bad_ast_does_not_spoil_the_result() {
    let mut raw = bubble_sort_result();
    raw["ast"]["functions"][0]["body"] = json!({ "node_type": "return" });
    let result: EvaluationResult = serde_json::from_value(raw).unwrap();
    // The rest of the bundle stays usable
    assert_eq!(result.score, 0.5);
    let err = result.program().unwrap_err();
    assert_eq!(err.path(), "$.functions[0].body");
}
