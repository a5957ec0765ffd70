//! The production template parser.
//!
//! A template is the text a rule emits, with two substitution forms:
//!
//! ```text
//! {rulename}        invoke another rule on the same node, routed through
//!                   the originating rule set
//! <path:rulename>   follow a path to another node and invoke a rule of its
//!                   own rule set there (":rulename" defaults to "*")
//! ```
//!
//! A leading `+` inside either bracket capitalizes the first character of
//! the substituted text. Stray `}` and `>` are literal text; an unclosed
//! `{` or `<` is a syntax error at parse time, so malformed templates are
//! rejected when the rules file loads rather than mid-generation.

use winnow::combinator::{alt, opt, preceded, repeat};
use winnow::prelude::*;
use winnow::token::{none_of, take_while};

use super::SyntaxError;
use super::pattern::Pattern;

/// A parsed production template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

/// A piece of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text, copied to the output.
    Literal(String),
    /// `{name}` or `{+name}`: a rule invocation on the current node.
    RuleCall { name: String, capitalize: bool },
    /// `<path>`, `<path:name>` or `<+path:name>`: a cross-node invocation.
    PathCall {
        pattern: Pattern,
        rule: Option<String>,
        capitalize: bool,
    },
}

impl Template {
    /// Parses a template from its text form (without surrounding quotes).
    pub fn parse(source: &str) -> Result<Template, SyntaxError> {
        let mut remaining = source;
        let parsed: Result<Vec<RawSegment>, _> = segments(&mut remaining);
        let raw = match parsed {
            Ok(raw) if remaining.is_empty() => raw,
            _ => {
                let column = source.len() - remaining.len() + 1;
                let message = match remaining.chars().next() {
                    Some('{') => "unclosed rule reference '{'".to_string(),
                    Some('<') => "unclosed path reference '<'".to_string(),
                    Some(other) => format!("unexpected character '{other}'"),
                    None => "unexpected end of template".to_string(),
                };
                return Err(SyntaxError { column, message });
            }
        };

        let mut segments = Vec::with_capacity(raw.len());
        for segment in raw {
            segments.push(match segment {
                RawSegment::Literal(text) => Segment::Literal(text),
                RawSegment::RuleCall { name, capitalize } => Segment::RuleCall { name, capitalize },
                RawSegment::PathCall {
                    path,
                    rule,
                    capitalize,
                } => {
                    let pattern = Pattern::parse(&path).map_err(|e| SyntaxError {
                        column: source.find(&path).map_or(0, |at| at + e.column),
                        message: format!("in path '{path}': {}", e.message),
                    })?;
                    Segment::PathCall {
                        pattern,
                        rule,
                        capitalize,
                    }
                }
            });
        }
        Ok(Template {
            segments: merge_literals(segments),
        })
    }

    /// The template's segments, in emission order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

/// Parse-stage segment: paths are still raw text so their own syntax errors
/// can name the offending path.
enum RawSegment {
    Literal(String),
    RuleCall {
        name: String,
        capitalize: bool,
    },
    PathCall {
        path: String,
        rule: Option<String>,
        capitalize: bool,
    },
}

fn segments(input: &mut &str) -> ModalResult<Vec<RawSegment>> {
    repeat(0.., segment).parse_next(input)
}

fn segment(input: &mut &str) -> ModalResult<RawSegment> {
    alt((rule_call, path_call, literal_char)).parse_next(input)
}

/// `{[+]name}`
fn rule_call(input: &mut &str) -> ModalResult<RawSegment> {
    '{'.parse_next(input)?;
    let capitalize = opt('+').parse_next(input)?.is_some();
    let name: &str =
        take_while(1.., |c: char| !matches!(c, '}' | '{' | '<')).parse_next(input)?;
    '}'.parse_next(input)?;
    Ok(RawSegment::RuleCall {
        name: name.to_string(),
        capitalize,
    })
}

/// `<[+]path[:name]>`
fn path_call(input: &mut &str) -> ModalResult<RawSegment> {
    '<'.parse_next(input)?;
    let capitalize = opt('+').parse_next(input)?.is_some();
    let path: &str =
        take_while(0.., |c: char| !matches!(c, ':' | '>' | '<' | '{')).parse_next(input)?;
    let rule: Option<&str> = opt(preceded(
        ':',
        take_while(1.., |c: char| !matches!(c, '>' | '<' | '{')),
    ))
    .parse_next(input)?;
    '>'.parse_next(input)?;
    Ok(RawSegment::PathCall {
        path: path.to_string(),
        rule: rule.map(|name| name.to_string()),
        capitalize,
    })
}

fn literal_char(input: &mut &str) -> ModalResult<RawSegment> {
    none_of(['{', '<'])
        .map(|c: char| RawSegment::Literal(c.to_string()))
        .parse_next(input)
}

/// Collapses runs of single-character literals into one segment.
fn merge_literals(segments: Vec<Segment>) -> Vec<Segment> {
    let mut result: Vec<Segment> = Vec::with_capacity(segments.len());
    for segment in segments {
        match segment {
            Segment::Literal(text) => {
                if let Some(Segment::Literal(previous)) = result.last_mut() {
                    previous.push_str(&text);
                } else {
                    result.push(Segment::Literal(text));
                }
            }
            other => result.push(other),
        }
    }
    result
}
