//! Error types for vocabulary loading and lookup.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::suggest::render;

/// An error raised while loading the vocabulary file.
///
/// All variants abort the load. Line numbers are 1-based physical lines;
/// errors raised while linking a deferred `super`/`field` body carry the
/// line on which that body started.
#[derive(Debug, Error)]
pub enum VocabError {
    /// The vocabulary file could not be opened.
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An I/O failure while streaming lines.
    #[error("i/o error while reading the vocabulary: {0}")]
    Read(#[from] io::Error),

    /// The file does not start with a `language` header.
    #[error("vocabulary line {line}: no 'language' header")]
    NoLanguages { line: u64 },

    /// A line did not match any expected shape.
    #[error("vocabulary line {line}: expected {expected}, found '{found}'")]
    UnexpectedLine {
        line: u64,
        expected: &'static str,
        found: String,
    },

    /// A name or label line referenced a language missing from the header.
    #[error("vocabulary line {line}: the language '{language}' is not listed in the header")]
    UndeclaredLanguage { line: u64, language: String },

    /// Two `super` lines of one meaning resolved to different meanings.
    #[error(
        "vocabulary, after line {line}: the supertype '{name}' in '{language}' \
         does not match the previously declared supertype"
    )]
    SupertypeMismatch {
        line: u64,
        name: String,
        language: String,
    },

    /// Two `_type` lines of one field resolved to different types.
    #[error(
        "vocabulary, after line {line}: the field type '{name}' in '{language}' \
         conflicts with the previously declared type"
    )]
    FieldTypeConflict {
        line: u64,
        name: String,
        language: String,
    },

    /// A field block carried labels but no `_type` line.
    #[error("vocabulary, after line {line}: field declared without a type")]
    MissingFieldType { line: u64 },

    /// A lookup failed while linking deferred definitions.
    #[error("vocabulary, after line {line}: {source}")]
    Link {
        line: u64,
        #[source]
        source: LookupError,
    },
}

/// An error raised by name or label lookups against a loaded vocabulary.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The language code is not part of the vocabulary.
    #[error("the language '{language}' is not implemented")]
    UnknownLanguage { language: String },

    /// No meaning carries this name in the given language.
    #[error("no type named '{name}' in language '{language}'{}", render(suggestions))]
    UnknownType {
        name: String,
        language: String,
        suggestions: Vec<String>,
    },

    /// No field carries this label, in the type or any of its supertypes.
    #[error("no field labelled '{label}' in language '{language}'")]
    UnknownField { label: String, language: String },

    /// The meaning or field has no display name in the given language.
    #[error("no name in language '{language}'")]
    MissingName { language: String },
}
