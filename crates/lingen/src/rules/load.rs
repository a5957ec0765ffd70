//! Rules file loading.
//!
//! The format is one keyword per line: `rules <name>` opens a rule set,
//! `tag <t>` and `rule <def>` extend the current one, `super <name>` records
//! a deferred supertype, and `//` starts a comment. Supertype names resolve
//! in a linking pass after the whole file is read, because inheriting from a
//! set defined further down the file is legal.

use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::debug;

use super::{LanguageRules, Rule, RuleError, RuleSet, RuleSetId};
use crate::dsl::{Condition, Template};
use crate::source::{LineSource, split_first_space};
use crate::suggest::suggestions;
use crate::vocabulary::Vocabulary;

impl LanguageRules {
    /// Loads a language's rules from a file.
    pub fn load(
        path: impl AsRef<Path>,
        language: &str,
        vocab: &Vocabulary,
    ) -> Result<Self, RuleError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| RuleError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::load_from(BufReader::new(file), language, vocab)
    }

    /// Loads a language's rules from any line source.
    pub fn load_from(
        reader: impl BufRead,
        language: &str,
        vocab: &Vocabulary,
    ) -> Result<Self, RuleError> {
        let mut lines = LineSource::new(reader, true, true)?;
        let mut this = LanguageRules {
            language: language.to_string(),
            sets: Vec::new(),
            by_name: HashMap::new(),
            by_meaning: HashMap::new(),
        };
        let mut current: Option<RuleSetId> = None;

        while let Some(line) = lines.read_line()? {
            let line_number = lines.line_number();
            let (keyword, rest) = split_first_space(&line);
            match keyword {
                "rules" => {
                    let id = RuleSetId(this.sets.len() as u32);
                    let meaning = vocab.lookup_opt(rest, language);
                    this.sets.push(RuleSet {
                        name: rest.to_string(),
                        meaning,
                        tags: BTreeSet::new(),
                        super_name: None,
                        supertype: None,
                        rules: Vec::new(),
                        defined_at: line_number,
                    });
                    this.by_name.insert(rest.to_string(), id);
                    if let Some(meaning) = meaning {
                        this.by_meaning.insert(meaning, id);
                    }
                    current = Some(id);
                }
                "tag" => {
                    let set = require_current(current, language, line_number, keyword)?;
                    this.sets[set.0 as usize].tags.insert(rest.to_string());
                }
                "rule" => {
                    let set = require_current(current, language, line_number, keyword)?;
                    let rule = parse_rule(rest, language, line_number)?;
                    this.sets[set.0 as usize].rules.push(rule);
                }
                "super" => {
                    let set = require_current(current, language, line_number, keyword)?;
                    this.sets[set.0 as usize].super_name = Some(rest.to_string());
                }
                _ if keyword.starts_with("//") => {}
                _ => {
                    return Err(RuleError::UnexpectedLine {
                        language: language.to_string(),
                        line: line_number,
                        found: line.clone(),
                    });
                }
            }
        }

        this.link()?;
        debug!("loaded {} rule sets for '{language}'", this.sets.len());
        Ok(this)
    }

    /// Resolves every recorded supertype name to a rule set reference.
    fn link(&mut self) -> Result<(), RuleError> {
        for index in 0..self.sets.len() {
            let Some(super_name) = self.sets[index].super_name.clone() else {
                continue;
            };
            let Some(&target) = self.by_name.get(&super_name) else {
                return Err(RuleError::UnknownSuperSet {
                    language: self.language.clone(),
                    line: self.sets[index].defined_at,
                    suggestions: suggestions(&super_name, self.set_names()),
                    name: super_name,
                });
            };
            self.sets[index].supertype = Some(target);
        }
        Ok(())
    }
}

fn require_current(
    current: Option<RuleSetId>,
    language: &str,
    line: u64,
    keyword: &str,
) -> Result<RuleSetId, RuleError> {
    current.ok_or_else(|| RuleError::OrphanLine {
        language: language.to_string(),
        line,
        keyword: keyword.to_string(),
    })
}

/// Parses a `rule` definition: `name,condition,"template"`. The second
/// comma is searched at least two characters past the first, so the
/// condition is never empty.
fn parse_rule(def: &str, language: &str, line: u64) -> Result<Rule, RuleError> {
    let malformed = || RuleError::MalformedRule {
        language: language.to_string(),
        line,
    };

    let mut commas = def.match_indices(',').map(|(at, _)| at);
    let first = commas.next().ok_or_else(malformed)?;
    let second = commas.find(|&at| at > first + 1).ok_or_else(malformed)?;

    let name = &def[..first];
    let condition_src = &def[first + 1..second];
    let template_src = def[second + 1..]
        .trim()
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .ok_or_else(malformed)?;

    let condition = Condition::compile(condition_src).map_err(|source| RuleError::Condition {
        language: language.to_string(),
        line,
        source,
    })?;
    let template = Template::parse(template_src).map_err(|source| RuleError::Template {
        language: language.to_string(),
        line,
        source,
    })?;

    Ok(Rule {
        name: name.to_string(),
        condition,
        template,
    })
}
