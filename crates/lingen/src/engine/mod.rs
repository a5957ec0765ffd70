//! The production engine: recursive template expansion.
//!
//! Producing text for a `(rule name, node)` pair scans a rule set's rules in
//! declaration order; the first whose name matches and whose condition holds
//! is expanded, with no backtracking past that choice. When nothing matches,
//! the request falls through to the supertype rule set, carrying along the
//! *originating* set, the one the request first entered. Nested `{name}`
//! invocations route through the originating set, so a supertype's template
//! can invoke a name that a subtype overrides.
//!
//! Recursion is unbounded by design: a rule whose template invokes itself
//! unconditionally recurses until the call stack runs out. Rule authors own
//! termination, the engine does not police it.

mod error;

pub use error::ProduceError;

use log::debug;
use unicode_segmentation::UnicodeSegmentation;

use crate::dsl::{EvalContext, Segment};
use crate::rules::{LanguageRules, Rule, RuleSetId};
use crate::suggest::suggestions;
use crate::tree::{MrTree, NodeId};
use crate::vocabulary::{MeaningId, Vocabulary};

/// Generates text for a whole tree: resolves the root node's rule set and
/// produces its `*` rule.
pub fn generate(
    tree: &MrTree,
    vocab: &Vocabulary,
    rules: &LanguageRules,
) -> Result<String, ProduceError> {
    let root = tree.root().ok_or(ProduceError::NoRoot)?;
    let ty = tree.node_type(root).ok_or(ProduceError::NoRoot)?;
    let ctx = EvalContext::new(tree, vocab, rules);
    let set = require_set_for(&ctx, ty)?;
    produce(&ctx, set, "*", root)
}

/// Produces text for a named rule of a rule set, applied to a node. The
/// given set becomes the originating set of the request.
pub fn produce(
    ctx: &EvalContext<'_>,
    set: RuleSetId,
    rule: &str,
    node: NodeId,
) -> Result<String, ProduceError> {
    produce_in(ctx, set, rule, node, set)
}

fn produce_in(
    ctx: &EvalContext<'_>,
    set: RuleSetId,
    rule: &str,
    node: NodeId,
    originating: RuleSetId,
) -> Result<String, ProduceError> {
    let rule_set = ctx.rules.set(set);
    debug!("rule set '{}': matching '{rule}'", rule_set.name());

    for candidate in rule_set.rules() {
        if candidate.applies(rule, ctx, node) {
            debug!("rule set '{}': invoking '{rule}'", rule_set.name());
            return expand(ctx, candidate, node, originating);
        }
    }

    match rule_set.supertype() {
        Some(parent) => {
            debug!(
                "rule set '{}': no match, falling back to '{}'",
                rule_set.name(),
                ctx.rules.set(parent).name()
            );
            produce_in(ctx, parent, rule, node, originating)
        }
        None => Err(ProduceError::NoMatchingRule {
            rule: rule.to_string(),
            set: rule_set.name().to_string(),
        }),
    }
}

/// Expands one rule's template left-to-right.
fn expand(
    ctx: &EvalContext<'_>,
    rule: &Rule,
    node: NodeId,
    originating: RuleSetId,
) -> Result<String, ProduceError> {
    let mut output = String::new();
    for segment in rule.template().segments() {
        match segment {
            Segment::Literal(text) => output.push_str(text),
            Segment::RuleCall { name, capitalize } => {
                // the originating set is re-entered and becomes the
                // originating set of the nested request
                let produced = produce(ctx, originating, name, node)?;
                push(&mut output, &produced, *capitalize);
            }
            Segment::PathCall {
                pattern,
                rule: rule_name,
                capitalize,
            } => {
                let target = pattern.follow(ctx, node)?;
                let produced = match ctx.tree.node_type(target) {
                    None => ctx.tree.literal_value(target).unwrap_or_default(),
                    Some(ty) => {
                        let set = require_set_for(ctx, ty)?;
                        let name = rule_name.as_deref().unwrap_or("*");
                        produce(ctx, set, name, target)?
                    }
                };
                push(&mut output, &produced, *capitalize);
            }
        }
    }
    Ok(output)
}

fn require_set_for(ctx: &EvalContext<'_>, ty: MeaningId) -> Result<RuleSetId, ProduceError> {
    ctx.rules.rule_set_for(ty).ok_or_else(|| {
        let name = ctx.vocabulary.display_name(ty, ctx.language());
        ProduceError::RuleSetNotFound {
            suggestions: suggestions(&name, ctx.rules.set_names()),
            language: ctx.language().to_string(),
            name,
        }
    })
}

fn push(output: &mut String, text: &str, capitalize: bool) {
    if capitalize {
        output.push_str(&capitalize_first(text));
    } else {
        output.push_str(text);
    }
}

/// Uppercases the first grapheme of the text; the rest is untouched.
fn capitalize_first(text: &str) -> String {
    let mut graphemes = text.graphemes(true);
    match graphemes.next() {
        Some(first) => {
            let mut result = first.to_uppercase();
            result.push_str(graphemes.as_str());
            result
        }
        None => String::new(),
    }
}
