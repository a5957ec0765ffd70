//! The vocabulary registry: the space of meanings and their typed fields.
//!
//! A [`Vocabulary`] is loaded once from its text format and is read-only
//! afterwards. It owns every [`Meaning`] and [`Field`] in arena storage;
//! [`MeaningId`] and [`FieldId`] are cheap handles into those arenas. There
//! is no process-wide registry: callers construct a `Vocabulary` and pass it
//! by reference into tree parsing and generation.

mod error;
mod load;

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

pub use error::{LookupError, VocabError};

use crate::suggest::suggestions;

/// Handle to a [`Meaning`] in a [`Vocabulary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MeaningId(pub(crate) u32);

impl MeaningId {
    /// Stable numeric form, for diagnostics and graph output.
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

/// Handle to a [`Field`] in a [`Vocabulary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FieldId(pub(crate) u32);

impl FieldId {
    /// Stable numeric form, for diagnostics and graph output.
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

/// The declared value type of a field.
///
/// `Str`, `Int` and `Any` replace the original design's sentinel meaning
/// objects: a field either holds a typed child, a raw literal, or anything
/// non-abstract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    /// The field holds a node of this meaning or one of its subtypes.
    Meaning(MeaningId),
    /// The field holds a raw string literal.
    Str,
    /// The field holds a raw integer literal.
    Int,
    /// The field holds any non-abstract typed node, or a literal.
    Any,
}

impl FieldType {
    pub fn is_string(self) -> bool {
        self == FieldType::Str
    }

    pub fn is_int(self) -> bool {
        self == FieldType::Int
    }

    /// True for the two raw-literal field types.
    pub fn is_literal(self) -> bool {
        matches!(self, FieldType::Str | FieldType::Int)
    }

    pub fn is_any(self) -> bool {
        self == FieldType::Any
    }
}

/// A type in the vocabulary.
///
/// A meaning may be abstract (a pure classification node) and may be flagged
/// root-eligible. It carries per-language display names, free-text info and
/// a per-language field table; the supertype link forms a single-inheritance
/// chain, acyclic by construction because a `super` line can only reference
/// meanings that parse before or after it by name, resolved after all
/// meanings exist.
#[derive(Debug)]
pub struct Meaning {
    is_abstract: bool,
    is_root: bool,
    supertype: Option<MeaningId>,
    names: BTreeMap<String, String>,
    info: BTreeMap<String, String>,
    // language -> label -> field
    fields: BTreeMap<String, BTreeMap<String, FieldId>>,
    defined_at: u64,
}

impl Meaning {
    fn new(is_abstract: bool, is_root: bool, defined_at: u64) -> Self {
        Self {
            is_abstract,
            is_root,
            supertype: None,
            names: BTreeMap::new(),
            info: BTreeMap::new(),
            fields: BTreeMap::new(),
            defined_at,
        }
    }

    /// Whether this meaning is abstract (not meant to be instantiated).
    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    /// The meaning's own root flag. See [`Vocabulary::is_root_eligible`] for
    /// the inherited check.
    pub fn is_root(&self) -> bool {
        self.is_root
    }

    /// The direct supertype, if any.
    pub fn supertype(&self) -> Option<MeaningId> {
        self.supertype
    }

    /// The vocabulary-file line this meaning's definition started on.
    pub fn defined_at(&self) -> u64 {
        self.defined_at
    }
}

/// A named, typed slot of a meaning, fillable with one child node.
#[derive(Debug)]
pub struct Field {
    ty: FieldType,
    labels: BTreeMap<String, String>,
    info: BTreeMap<String, String>,
}

/// The load-once, read-only registry of meanings and fields.
#[derive(Debug)]
pub struct Vocabulary {
    languages: Vec<String>,
    // language -> name -> meaning
    by_name: HashMap<String, HashMap<String, MeaningId>>,
    meanings: Vec<Meaning>,
    fields: Vec<Field>,
}

impl Vocabulary {
    /// Language codes, in header order.
    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    /// Whether the given language was declared in the vocabulary header.
    pub fn language_available(&self, language: &str) -> bool {
        self.by_name.contains_key(language)
    }

    /// Looks up a meaning by its name in a language.
    pub fn lookup(&self, name: &str, language: &str) -> Result<MeaningId, LookupError> {
        let Some(per_language) = self.by_name.get(language) else {
            return Err(LookupError::UnknownLanguage {
                language: language.to_string(),
            });
        };
        per_language
            .get(name)
            .copied()
            .ok_or_else(|| LookupError::UnknownType {
                name: name.to_string(),
                language: language.to_string(),
                suggestions: suggestions(name, per_language.keys().map(String::as_str)),
            })
    }

    /// Like [`lookup`](Self::lookup), but absence is not an error.
    pub fn lookup_opt(&self, name: &str, language: &str) -> Option<MeaningId> {
        self.by_name.get(language)?.get(name).copied()
    }

    /// The meaning behind a handle.
    ///
    /// # Panics
    ///
    /// Panics if the id does not come from this vocabulary.
    pub fn meaning(&self, id: MeaningId) -> &Meaning {
        &self.meanings[id.0 as usize]
    }

    /// The field behind a handle.
    ///
    /// # Panics
    ///
    /// Panics if the id does not come from this vocabulary.
    pub fn field(&self, id: FieldId) -> &Field {
        &self.fields[id.0 as usize]
    }

    /// All meanings, in definition order.
    pub fn meanings(&self) -> impl Iterator<Item = (MeaningId, &Meaning)> {
        self.meanings
            .iter()
            .enumerate()
            .map(|(index, meaning)| (MeaningId(index as u32), meaning))
    }

    /// Whether `id` is `ancestor` or a (transitive) subtype of it.
    pub fn is_me_or_super(&self, id: MeaningId, ancestor: MeaningId) -> bool {
        let mut current = Some(id);
        while let Some(step) = current {
            if step == ancestor {
                return true;
            }
            current = self.meaning(step).supertype;
        }
        false
    }

    /// Whether a node of type `id` may fill a field declared as `ty`.
    ///
    /// The `Any` wildcard admits every non-abstract meaning; the literal
    /// field types never admit a typed node.
    pub fn matches_field_type(&self, id: MeaningId, ty: FieldType) -> bool {
        match ty {
            FieldType::Any => !self.meaning(id).is_abstract,
            FieldType::Meaning(ancestor) => self.is_me_or_super(id, ancestor),
            FieldType::Str | FieldType::Int => false,
        }
    }

    /// Whether the meaning or any of its supertypes carries the root flag.
    pub fn is_root_eligible(&self, id: MeaningId) -> bool {
        let mut current = Some(id);
        while let Some(step) = current {
            let meaning = self.meaning(step);
            if meaning.is_root {
                return true;
            }
            current = meaning.supertype;
        }
        false
    }

    /// All non-abstract subtypes of `ancestor`, including `ancestor` itself
    /// if concrete. Unsorted; display callers sort by name.
    pub fn subtypes_of(&self, ancestor: MeaningId) -> Vec<MeaningId> {
        self.meanings()
            .filter(|(id, meaning)| !meaning.is_abstract && self.is_me_or_super(*id, ancestor))
            .map(|(id, _)| id)
            .collect()
    }

    /// All non-abstract, root-eligible meanings. Unsorted; display callers
    /// sort by name.
    pub fn root_meanings(&self) -> Vec<MeaningId> {
        self.meanings()
            .filter(|(id, meaning)| !meaning.is_abstract && self.is_root_eligible(*id))
            .map(|(id, _)| id)
            .collect()
    }

    /// The display name of a meaning in a language.
    pub fn meaning_name(&self, id: MeaningId, language: &str) -> Result<&str, LookupError> {
        self.meaning_name_opt(id, language)
            .ok_or_else(|| LookupError::MissingName {
                language: language.to_string(),
            })
    }

    /// Like [`meaning_name`](Self::meaning_name), absence is not an error.
    pub fn meaning_name_opt(&self, id: MeaningId, language: &str) -> Option<&str> {
        self.meaning(id).names.get(language).map(String::as_str)
    }

    /// Free-text info of a meaning in a language. Empty when absent.
    pub fn meaning_info(&self, id: MeaningId, language: &str) -> &str {
        self.meaning(id).info.get(language).map_or("", String::as_str)
    }

    /// Resolves a field by label, searching the supertype chain.
    pub fn field_of(
        &self,
        ty: MeaningId,
        label: &str,
        language: &str,
    ) -> Result<FieldId, LookupError> {
        if let Some(id) = self.field_of_opt(ty, label, language) {
            return Ok(id);
        }
        if self.language_available(language) {
            Err(LookupError::UnknownField {
                label: label.to_string(),
                language: language.to_string(),
            })
        } else {
            Err(LookupError::UnknownLanguage {
                language: language.to_string(),
            })
        }
    }

    /// Like [`field_of`](Self::field_of), for path following where absent
    /// fields are an expected no-match rather than an error.
    pub fn field_of_opt(&self, ty: MeaningId, label: &str, language: &str) -> Option<FieldId> {
        let mut current = ty;
        loop {
            let meaning = self.meaning(current);
            if let Some(id) = meaning.fields.get(language).and_then(|map| map.get(label)) {
                return Some(*id);
            }
            current = meaning.supertype?;
        }
    }

    /// The fields a meaning declares itself (no inheritance), with their
    /// labels in the given language, in label order.
    pub fn fields_in(&self, ty: MeaningId, language: &str) -> Vec<(&str, FieldId)> {
        self.meaning(ty)
            .fields
            .get(language)
            .into_iter()
            .flat_map(|map| map.iter().map(|(label, id)| (label.as_str(), *id)))
            .collect()
    }

    /// All fields of a meaning, own and inherited.
    pub fn all_fields(&self, ty: MeaningId, language: &str) -> Vec<FieldId> {
        let mut result = Vec::new();
        let mut current = Some(ty);
        while let Some(step) = current {
            let meaning = self.meaning(step);
            if let Some(map) = meaning.fields.get(language) {
                for id in map.values() {
                    if !result.contains(id) {
                        result.push(*id);
                    }
                }
            }
            current = meaning.supertype;
        }
        result
    }

    /// The declared value type of a field.
    pub fn field_type(&self, id: FieldId) -> FieldType {
        self.field(id).ty
    }

    /// The label of a field in a language.
    pub fn field_label(&self, id: FieldId, language: &str) -> Result<&str, LookupError> {
        self.field_label_opt(id, language)
            .ok_or_else(|| LookupError::MissingName {
                language: language.to_string(),
            })
    }

    /// Like [`field_label`](Self::field_label), absence is not an error.
    pub fn field_label_opt(&self, id: FieldId, language: &str) -> Option<&str> {
        self.field(id).labels.get(language).map(String::as_str)
    }

    /// Free-text info of a field in a language. Empty when absent.
    pub fn field_info(&self, id: FieldId, language: &str) -> &str {
        self.field(id).info.get(language).map_or("", String::as_str)
    }

    /// Some display name for a meaning, preferring `language`. For error
    /// messages, where failing the lookup would mask the real problem.
    pub(crate) fn display_name(&self, id: MeaningId, language: &str) -> String {
        if let Some(name) = self.meaning_name_opt(id, language) {
            return name.to_string();
        }
        self.meaning(id)
            .names
            .values()
            .next()
            .cloned()
            .unwrap_or_else(|| "?".to_string())
    }

    /// Some label for a field, preferring `language`.
    pub(crate) fn display_label(&self, id: FieldId, language: &str) -> String {
        if let Some(label) = self.field_label_opt(id, language) {
            return label.to_string();
        }
        self.field(id)
            .labels
            .values()
            .next()
            .cloned()
            .unwrap_or_else(|| "?".to_string())
    }

    /// Renders a field type for error messages.
    pub(crate) fn display_field_type(&self, ty: FieldType, language: &str) -> String {
        match ty {
            FieldType::Meaning(id) => self.display_name(id, language),
            FieldType::Str => "*STRING".to_string(),
            FieldType::Int => "*INT".to_string(),
            FieldType::Any => "*ANY".to_string(),
        }
    }
}
