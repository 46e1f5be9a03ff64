//! # Pseudocode
//!
//! Language front end for the loosely specified pseudocode students write
//! in complexity-analysis exercises.
//!
//! ## Architecture
//!
//! ```text
//! text ──→ lexer ──→ highlighting, diagnostics
//! text ──→ editor ──→ fold ranges, auto-indent
//! evaluator JSON ──→ evaluation / ast ──→ typed, validated result
//! ```
//!
//! - [`lexer`] - Classifies source text into highlighting categories
//! - [`editor`] - Block folding and the auto-indent heuristic
//! - [`ast`] - The AST exchanged with the evaluator, and its validation
//! - [`evaluation`] - Request and result bundles of the evaluator
//! - [`lsp`] - Language Server Protocol implementation for IDE integration
//!
//! ## Example
//!
//! ```
//! use pseudocode::editor::{fold_ranges, FoldStrategy};
//! use pseudocode::lexer::{lex, TokenKind};
//!
//! let source = "FOR i = 1 TO n DO\n    total = total + i\nNEXT\n";
//!
//! let tokens = lex(source);
//! assert_eq!(tokens[0].kind, TokenKind::Keyword);
//!
//! let folds = fold_ranges(source, FoldStrategy::default());
//! assert_eq!(folds.len(), 1);
//! ```

pub mod ast;
pub mod editor;
pub mod evaluation;
pub mod lexer;
pub mod lsp;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::ast::{decode, Expr, Node, NodeKind, NodeType, Program, ValidationError};
    pub use crate::editor::{EditorConfig, FoldRange, FoldStrategy, IndentEdit};
    pub use crate::evaluation::{
        BoundaryError, ComplexityClass, EvaluationRequest, EvaluationResult,
    };
    pub use crate::lexer::{Lexer, Token, TokenKind};
}
