//! The condition logic compiler.
//!
//! Rule conditions are boolean expressions whose terminals are path
//! patterns:
//!
//! ```text
//! .count & !.actor[dog] | =[eat]
//! ```
//!
//! `&` and `|` bind equally and associate left-to-right: `a & b | c` is
//! `(a & b) | c`. Parentheses override grouping; `!` negates the term that
//! follows it. The bare condition `*` is the distinguished always-true
//! condition and never reaches this parser: it is represented as the
//! absence of a condition.

use std::fmt;

use winnow::combinator::{alt, delimited, opt};
use winnow::prelude::*;
use winnow::token::{one_of, take_while};

use super::SyntaxError;
use super::pattern::{EvalContext, Pattern};
use crate::tree::NodeId;

/// A compiled boolean condition over path patterns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    Pattern(Pattern),
    Not(Box<Condition>),
    And(Box<Condition>, Box<Condition>),
    Or(Box<Condition>, Box<Condition>),
}

impl Condition {
    /// Compiles a condition. `Ok(None)` is the always-true condition `*`.
    pub fn compile(source: &str) -> Result<Option<Condition>, SyntaxError> {
        let trimmed = source.trim();
        if trimmed == "*" {
            return Ok(None);
        }
        let mut remaining = trimmed;
        let ast = match expr(&mut remaining) {
            Ok(ast) if remaining.is_empty() => ast,
            Ok(_) => {
                let column = trimmed.len() - remaining.len() + 1;
                let message = if remaining.starts_with(')') {
                    "found ')' without a matching '('".to_string()
                } else {
                    format!("expected '&' or '|' before '{remaining}'")
                };
                return Err(SyntaxError { column, message });
            }
            Err(_) => {
                return Err(SyntaxError {
                    column: 1,
                    message: "a term was expected where none was found".to_string(),
                });
            }
        };
        resolve(ast, trimmed).map(Some)
    }

    /// Folds the condition down to a boolean for the given node.
    pub fn evaluate(&self, ctx: &EvalContext<'_>, node: NodeId) -> bool {
        match self {
            Condition::Pattern(pattern) => pattern.matches(ctx, node),
            Condition::Not(inner) => !inner.evaluate(ctx, node),
            Condition::And(a, b) => a.evaluate(ctx, node) && b.evaluate(ctx, node),
            Condition::Or(a, b) => a.evaluate(ctx, node) || b.evaluate(ctx, node),
        }
    }
}

/// Renders a fully parenthesized form that parses back to an equivalent
/// condition.
impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Pattern(pattern) => write!(f, "{pattern}"),
            Condition::Not(inner) => write!(f, "!({inner})"),
            Condition::And(a, b) => write!(f, "({a} & {b})"),
            Condition::Or(a, b) => write!(f, "({a} | {b})"),
        }
    }
}

/// Parse-stage tree: terminals are still raw text. Patterns are compiled in
/// a second step so their own syntax errors can name the offending terminal.
enum Ast {
    Term(String),
    Not(Box<Ast>),
    And(Box<Ast>, Box<Ast>),
    Or(Box<Ast>, Box<Ast>),
}

fn resolve(ast: Ast, source: &str) -> Result<Condition, SyntaxError> {
    match ast {
        Ast::Term(term) => {
            let pattern = Pattern::parse(&term).map_err(|e| SyntaxError {
                column: source.find(&term).map_or(0, |at| at + e.column),
                message: format!("in pattern '{term}': {}", e.message),
            })?;
            Ok(Condition::Pattern(pattern))
        }
        Ast::Not(inner) => Ok(Condition::Not(Box::new(resolve(*inner, source)?))),
        Ast::And(a, b) => Ok(Condition::And(
            Box::new(resolve(*a, source)?),
            Box::new(resolve(*b, source)?),
        )),
        Ast::Or(a, b) => Ok(Condition::Or(
            Box::new(resolve(*a, source)?),
            Box::new(resolve(*b, source)?),
        )),
    }
}

/// `expr := ['!'] term (('&'|'|') ['!'] term)*`, left-associative with no
/// precedence distinction between the two operators.
fn expr(input: &mut &str) -> ModalResult<Ast> {
    ws(input)?;
    let mut acc = negated_term(input)?;
    loop {
        ws(input)?;
        let Some(op) = opt(one_of(['&', '|'])).parse_next(input)? else {
            break;
        };
        ws(input)?;
        let rhs = negated_term(input)?;
        acc = if op == '&' {
            Ast::And(Box::new(acc), Box::new(rhs))
        } else {
            Ast::Or(Box::new(acc), Box::new(rhs))
        };
    }
    Ok(acc)
}

fn negated_term(input: &mut &str) -> ModalResult<Ast> {
    let negated = opt('!').parse_next(input)?.is_some();
    ws(input)?;
    let term = term(input)?;
    Ok(if negated {
        Ast::Not(Box::new(term))
    } else {
        term
    })
}

fn term(input: &mut &str) -> ModalResult<Ast> {
    alt((delimited('(', expr, (ws, ')')), terminal)).parse_next(input)
}

fn terminal(input: &mut &str) -> ModalResult<Ast> {
    take_while(1.., |c: char| {
        !matches!(c, ' ' | '\t' | '(' | ')' | '!' | '&' | '|')
    })
    .map(|s: &str| Ast::Term(s.to_string()))
    .parse_next(input)
}

fn ws(input: &mut &str) -> ModalResult<()> {
    take_while(0.., |c: char| c == ' ' || c == '\t')
        .void()
        .parse_next(input)
}
