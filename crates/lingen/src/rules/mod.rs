//! The per-language rule registry.
//!
//! A [`RuleServer`] caches one [`LanguageRules`] per language code, loaded
//! from `<rules dir>/<code>.txt` on first request and memoized for the
//! process lifetime; nothing is ever invalidated or reloaded. Each
//! `LanguageRules` holds named [`RuleSet`]s in arena storage. A rule set is
//! bound to the vocabulary meaning of the same name in its language when one
//! exists; purely organizational sets (an abstract "verb" category, say)
//! stay unbound and are reachable by name only.

mod error;
mod load;

use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub use error::RuleError;

use crate::dsl::{Condition, EvalContext, Template};
use crate::tree::NodeId;
use crate::vocabulary::{MeaningId, Vocabulary};

/// Handle to a [`RuleSet`] in a [`LanguageRules`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RuleSetId(pub(crate) u32);

/// A named, conditionally-guarded production rule.
#[derive(Debug)]
pub struct Rule {
    pub(crate) name: String,
    pub(crate) condition: Option<Condition>,
    pub(crate) template: Template,
}

impl Rule {
    /// The name this rule is matched against.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The guard condition. `None` is the always-true condition `*`.
    pub fn condition(&self) -> Option<&Condition> {
        self.condition.as_ref()
    }

    /// The production template.
    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Whether the rule applies: its name matches and its condition holds
    /// for the node.
    pub fn applies(&self, name: &str, ctx: &EvalContext<'_>, node: NodeId) -> bool {
        self.name == name
            && self
                .condition
                .as_ref()
                .is_none_or(|condition| condition.evaluate(ctx, node))
    }
}

/// The ordered rules of one meaning (or organizational category) in one
/// language, plus its tags and supertype link.
#[derive(Debug)]
pub struct RuleSet {
    pub(crate) name: String,
    pub(crate) meaning: Option<MeaningId>,
    pub(crate) tags: BTreeSet<String>,
    pub(crate) super_name: Option<String>,
    pub(crate) supertype: Option<RuleSetId>,
    pub(crate) rules: Vec<Rule>,
    pub(crate) defined_at: u64,
}

impl RuleSet {
    /// The rule set's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The vocabulary meaning this set is bound to, if any.
    pub fn meaning(&self) -> Option<MeaningId> {
        self.meaning
    }

    /// The set's tags, in sorted order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    /// The supertype rule set, if any.
    pub fn supertype(&self) -> Option<RuleSetId> {
        self.supertype
    }

    /// The rules, in declaration order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// The rules-file line this set's definition started on.
    pub fn defined_at(&self) -> u64 {
        self.defined_at
    }
}

/// All rule sets of one language.
#[derive(Debug)]
pub struct LanguageRules {
    language: String,
    sets: Vec<RuleSet>,
    by_name: HashMap<String, RuleSetId>,
    by_meaning: HashMap<MeaningId, RuleSetId>,
}

impl LanguageRules {
    /// The language code these rules are for.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// The rule set bound to a meaning, if one exists.
    pub fn rule_set_for(&self, meaning: MeaningId) -> Option<RuleSetId> {
        self.by_meaning.get(&meaning).copied()
    }

    /// Whether any rule set is bound to the meaning.
    pub fn has_rules_for(&self, meaning: MeaningId) -> bool {
        self.by_meaning.contains_key(&meaning)
    }

    /// The rule set with the given name, if one exists.
    pub fn rule_set_named(&self, name: &str) -> Option<RuleSetId> {
        self.by_name.get(name).copied()
    }

    /// The rule set behind a handle.
    ///
    /// # Panics
    ///
    /// Panics if the id does not come from this registry.
    pub fn set(&self, id: RuleSetId) -> &RuleSet {
        &self.sets[id.0 as usize]
    }

    /// All rule sets, in definition order.
    pub fn sets(&self) -> impl Iterator<Item = (RuleSetId, &RuleSet)> {
        self.sets
            .iter()
            .enumerate()
            .map(|(index, set)| (RuleSetId(index as u32), set))
    }

    /// All rule set names, in definition order.
    pub fn set_names(&self) -> impl Iterator<Item = &str> {
        self.sets.iter().map(|set| set.name.as_str())
    }

    /// Whether `needle` is the set's name or one of its tags, recursing
    /// through the supertype chain. Patterns use this for type-or-tag
    /// guards.
    pub fn has_name_or_tag(&self, id: RuleSetId, needle: &str) -> bool {
        let mut current = Some(id);
        while let Some(step) = current {
            let set = self.set(step);
            if set.name == needle || set.tags.contains(needle) {
                return true;
            }
            current = set.supertype;
        }
        false
    }
}

/// The lazily-populated cache of per-language rule registries.
#[derive(Debug)]
pub struct RuleServer {
    dir: PathBuf,
    cache: HashMap<String, LanguageRules>,
}

impl RuleServer {
    /// Creates a server loading rules files from `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cache: HashMap::new(),
        }
    }

    /// The rules for a language, loading `<dir>/<code>.txt` on the first
    /// request. A language whose file is missing is not implemented.
    pub fn language(
        &mut self,
        code: &str,
        vocab: &Vocabulary,
    ) -> Result<&LanguageRules, RuleError> {
        use std::collections::hash_map::Entry;

        match self.cache.entry(code.to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let path = self.dir.join(format!("{code}.txt"));
                if !path.exists() {
                    return Err(RuleError::NotImplemented {
                        language: code.to_string(),
                    });
                }
                let loaded = LanguageRules::load(&path, code, vocab)?;
                Ok(entry.insert(loaded))
            }
        }
    }

    /// Seeds the cache with already-loaded rules, for callers that do not
    /// work from a rules directory.
    pub fn insert(&mut self, rules: LanguageRules) {
        self.cache.insert(rules.language().to_string(), rules);
    }

    /// The cached rules for a language, without loading.
    pub fn loaded(&self, code: &str) -> Option<&LanguageRules> {
        self.cache.get(code)
    }
}
