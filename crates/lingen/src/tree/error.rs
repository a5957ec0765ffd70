//! Error types for meaning-representation trees.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::vocabulary::LookupError;

/// An error raised while parsing, serializing or mutating a tree.
///
/// Parse errors wrap the underlying cause in [`AtLine`](TreeError::AtLine)
/// with the 1-based input line; mutation errors carry no line.
#[derive(Debug, Error)]
pub enum TreeError {
    /// The input file could not be opened.
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An I/O failure while streaming lines.
    #[error("i/o error while reading the meaning representation: {0}")]
    Read(#[from] io::Error),

    /// A parse error, located on an input line.
    #[error("line {line}: {source}")]
    AtLine {
        line: u64,
        #[source]
        source: Box<TreeError>,
    },

    /// The input ended before the language or root-type line.
    #[error("the input ended before the {what} line")]
    MissingHeader { what: &'static str },

    /// A type, field or language could not be resolved.
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// A child's type violates its field's declared type.
    #[error(
        "'{child}' is not the same type or a subtype of '{field_type}' \
         and cannot be put into the field '{label}'"
    )]
    Typing {
        child: String,
        field_type: String,
        label: String,
    },

    /// An integer field received a non-integer value.
    #[error("'{value}' is not an integer")]
    NotAnInt { value: String },

    /// A field line appeared without indentation below the root.
    #[error("unindented line outside the tree")]
    OutsideTree,

    /// A field line carried no value.
    #[error("the field line '{label}' has no value")]
    MissingValue { label: String },

    /// Children were attached under a literal node.
    #[error("a literal node cannot hold children")]
    LiteralParent,

    /// A typed child was attached under a raw-literal field.
    #[error("the field '{label}' holds a literal value, not a typed node")]
    LiteralField { label: String },

    /// A literal operation was applied to a typed node.
    #[error("the node is not a literal")]
    NotALiteral,

    /// The tree has no root node.
    #[error("the tree has no root node")]
    EmptyTree,
}

impl TreeError {
    /// Wraps an error with the input line it was raised on.
    pub(crate) fn at(line: u64, source: TreeError) -> TreeError {
        TreeError::AtLine {
            line,
            source: Box::new(source),
        }
    }
}
