//! Syntax errors for the embedded DSLs.

use thiserror::Error;

/// A syntax error in a condition, path pattern or production template.
///
/// These DSLs are single-line, so the location is a 1-based column. Loaders
/// wrap this with the rules-file line the DSL text came from.
#[derive(Debug, Clone, Error)]
#[error("column {column}: {message}")]
pub struct SyntaxError {
    pub column: usize,
    pub message: String,
}
