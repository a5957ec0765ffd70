//! Error types for generation.

use thiserror::Error;

use crate::suggest::render;

/// An error raised while producing text for a tree.
///
/// These are resolution failures: the registries loaded fine, but the rule
/// traffic they describe does not cover the tree being generated. Nothing
/// is retried; batch callers catch per-tree failures and substitute a
/// placeholder.
#[derive(Debug, Error)]
pub enum ProduceError {
    /// Generation was requested for a tree without a typed root node.
    #[error("generation requested for an empty meaning representation")]
    NoRoot,

    /// A node's type has no rule set bound to it in this language.
    #[error("no rule set for '{name}' in language '{language}'{}", render(suggestions))]
    RuleSetNotFound {
        name: String,
        language: String,
        suggestions: Vec<String>,
    },

    /// The rule-set chain was exhausted without a matching rule.
    #[error("no production rule named '{rule}' matched in rule set '{set}' or its supertypes")]
    NoMatchingRule { rule: String, set: String },

    /// A template path reference could not be followed.
    #[error("the path '{pattern}' cannot be resolved")]
    Unresolved { pattern: String },
}
