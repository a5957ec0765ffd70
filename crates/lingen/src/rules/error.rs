//! Error types for rules-file loading.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::dsl::SyntaxError;
use crate::suggest::render;

/// An error raised while loading a language's rules file.
///
/// All variants abort the load for that language; line numbers are 1-based.
#[derive(Debug, Error)]
pub enum RuleError {
    /// The language has no rules file in the rules directory.
    #[error("the language '{language}' has no rules file")]
    NotImplemented { language: String },

    /// The rules file could not be opened.
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An I/O failure while streaming lines.
    #[error("i/o error while reading the rules: {0}")]
    Read(#[from] io::Error),

    /// A line did not start with a known keyword or a comment.
    #[error(
        "rules file for '{language}', line {line}: expected rules, tag, rule, \
         super, or a comment (//), found '{found}'"
    )]
    UnexpectedLine {
        language: String,
        line: u64,
        found: String,
    },

    /// A `tag`, `rule` or `super` line appeared before any `rules` line.
    #[error("rules file for '{language}', line {line}: '{keyword}' before any 'rules' line")]
    OrphanLine {
        language: String,
        line: u64,
        keyword: String,
    },

    /// A `rule` line did not have the `name,condition,"template"` shape.
    #[error(
        "rules file for '{language}', line {line}: a rule is defined as \
         name,condition,\"template\""
    )]
    MalformedRule { language: String, line: u64 },

    /// The rule's condition failed to compile.
    #[error("rules file for '{language}', line {line}: condition syntax: {source}")]
    Condition {
        language: String,
        line: u64,
        #[source]
        source: SyntaxError,
    },

    /// The rule's template failed to compile.
    #[error("rules file for '{language}', line {line}: template syntax: {source}")]
    Template {
        language: String,
        line: u64,
        #[source]
        source: SyntaxError,
    },

    /// A `super` line named a rule set that does not exist anywhere in the
    /// file.
    #[error(
        "rules file for '{language}', line {line}: no rule set named '{name}' \
         to inherit from{}", render(suggestions)
    )]
    UnknownSuperSet {
        language: String,
        line: u64,
        name: String,
        suggestions: Vec<String>,
    },
}
