//! The path pattern compiler.
//!
//! A pattern is a compact navigation program over a meaning tree:
//!
//! ```text
//! .actor            descend into the field labelled "actor"
//! ^actor            ascend, checking we were in the parent's "actor" field
//! ^                 ascend unconditionally
//! =                 stay put
//! .actor[dog]       descend, then require type/tag "dog" on the target
//! ```
//!
//! Instructions concatenate: `.actor.called` descends twice. Each may carry
//! a `[guard]` checked against the arrived node: its literal value for
//! literals, else its type's display name, else the name or tags of the
//! rule set registered for its type (recursing rule-set supertypes).
//!
//! A pattern can be *evaluated* (does it match?) or *followed* (where does
//! it lead?); the two differ only in how a failed step is reported.

use std::fmt;

use winnow::combinator::{alt, delimited, opt, preceded, repeat};
use winnow::prelude::*;
use winnow::token::take_while;

use super::SyntaxError;
use crate::engine::ProduceError;
use crate::rules::LanguageRules;
use crate::tree::{MrTree, NodeId};
use crate::vocabulary::Vocabulary;

/// Everything pattern evaluation needs to see: the tree being navigated,
/// the vocabulary for label resolution, and the rule registry of the
/// language being generated (for tag guards).
pub struct EvalContext<'a> {
    pub tree: &'a MrTree,
    pub vocabulary: &'a Vocabulary,
    pub rules: &'a LanguageRules,
}

impl<'a> EvalContext<'a> {
    pub fn new(tree: &'a MrTree, vocabulary: &'a Vocabulary, rules: &'a LanguageRules) -> Self {
        Self {
            tree,
            vocabulary,
            rules,
        }
    }

    /// The language everything is resolved in: the rules language.
    pub fn language(&self) -> &str {
        self.rules.language()
    }
}

/// A movement step of a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    /// Check the current node without moving.
    Stay,
    /// Move to the child under the field with this label.
    Descend(String),
    /// Move to the parent; with a label, verify the original node sits
    /// under that field of the parent.
    Ascend(Option<String>),
}

/// One instruction: a movement plus an optional type-or-tag guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub op: Op,
    pub guard: Option<String>,
}

impl Instruction {
    /// Executes the instruction. `None` means no-match.
    fn step(&self, ctx: &EvalContext<'_>, node: NodeId) -> Option<NodeId> {
        let language = ctx.language();
        let next = match &self.op {
            Op::Stay => node,
            Op::Descend(label) => ctx.tree.child_by_label(node, label, language, ctx.vocabulary)?,
            Op::Ascend(check) => {
                let parent = ctx.tree.parent(node)?;
                if let Some(label) = check
                    && ctx
                        .tree
                        .child_by_label(parent, label, language, ctx.vocabulary)
                        != Some(node)
                {
                    return None;
                }
                parent
            }
        };
        match &self.guard {
            Some(guard) if !guard_holds(ctx, next, guard) => None,
            _ => Some(next),
        }
    }
}

/// Checks a guard against the node arrived at. Resolution order: literal
/// value, declared-type display name, registered rule set name/tag. The
/// first applicable check decides; a literal that fails its value compare
/// does not fall through.
fn guard_holds(ctx: &EvalContext<'_>, node: NodeId, guard: &str) -> bool {
    if ctx.tree.is_literal(node) {
        return ctx.tree.literal_value(node).as_deref() == Some(guard);
    }
    let Some(ty) = ctx.tree.node_type(node) else {
        return false;
    };
    if ctx.vocabulary.meaning_name_opt(ty, ctx.language()) == Some(guard) {
        return true;
    }
    match ctx.rules.rule_set_for(ty) {
        Some(set) => ctx.rules.has_name_or_tag(set, guard),
        None => false,
    }
}

/// A compiled path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    instructions: Vec<Instruction>,
}

impl Pattern {
    /// Compiles a pattern from its text form.
    pub fn parse(source: &str) -> Result<Pattern, SyntaxError> {
        let mut remaining = source;
        let parsed: Result<Vec<Instruction>, _> = instruction_seq(&mut remaining);
        match parsed {
            Ok(instructions) if remaining.is_empty() => Ok(Pattern { instructions }),
            _ => {
                let column = source.len() - remaining.len() + 1;
                let found = remaining.chars().next().unwrap_or('?');
                Err(SyntaxError {
                    column,
                    message: format!(
                        "unexpected character '{found}'; \
                         an instruction starts with '.', '^' or '='"
                    ),
                })
            }
        }
    }

    /// The instruction sequence.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Evaluates the pattern from `node`, folding the instructions
    /// left-to-right and short-circuiting at the first no-match. An empty
    /// pattern matches trivially.
    pub fn matches(&self, ctx: &EvalContext<'_>, node: NodeId) -> bool {
        self.walk(ctx, node).is_some()
    }

    /// Follows the pattern from `node` to its target.
    pub fn follow(&self, ctx: &EvalContext<'_>, node: NodeId) -> Result<NodeId, ProduceError> {
        self.walk(ctx, node).ok_or_else(|| ProduceError::Unresolved {
            pattern: self.to_string(),
        })
    }

    fn walk(&self, ctx: &EvalContext<'_>, node: NodeId) -> Option<NodeId> {
        let mut current = node;
        for instruction in &self.instructions {
            current = instruction.step(ctx, current)?;
        }
        Some(current)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for instruction in &self.instructions {
            write!(f, "{instruction}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.op {
            Op::Stay => write!(f, "=")?,
            Op::Descend(label) => write!(f, ".{label}")?,
            Op::Ascend(None) => write!(f, "^")?,
            Op::Ascend(Some(label)) => write!(f, "^{label}")?,
        }
        if let Some(guard) = &self.guard {
            write!(f, "[{guard}]")?;
        }
        Ok(())
    }
}

fn instruction_seq(input: &mut &str) -> ModalResult<Vec<Instruction>> {
    repeat(0.., instruction).parse_next(input)
}

fn instruction(input: &mut &str) -> ModalResult<Instruction> {
    let op = alt((
        preceded('.', label).map(Op::Descend),
        preceded('^', opt(label)).map(Op::Ascend),
        '='.value(Op::Stay),
    ))
    .parse_next(input)?;
    let guard = opt(delimited(
        '[',
        take_while(1.., |c| c != ']').map(|s: &str| s.to_string()),
        ']',
    ))
    .parse_next(input)?;
    Ok(Instruction { op, guard })
}

fn label(input: &mut &str) -> ModalResult<String> {
    take_while(1.., |c: char| {
        !matches!(c, '.' | '^' | '=' | '[' | ']' | ' ' | '\t')
    })
    .map(|s: &str| s.to_string())
    .parse_next(input)
}
