//! Vocabulary file loading.
//!
//! Loading is two-phase. The first pass reads every meaning block, registers
//! names per language and stores `super`/`field` bodies verbatim; the second
//! pass parses those bodies, so that forward references to meanings defined
//! later in the file resolve.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::mem;
use std::path::Path;

use log::debug;

use super::{Field, FieldId, FieldType, Meaning, MeaningId, VocabError, Vocabulary};
use crate::source::{LineSource, split_first_space};

/// A deferred `super`/`field` body, parsed in the linking pass.
struct PendingBody {
    owner: MeaningId,
    start_line: u64,
    lines: Vec<String>,
}

impl Vocabulary {
    /// Loads and links a vocabulary from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, VocabError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| VocabError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::load_from(BufReader::new(file))
    }

    /// Loads and links a vocabulary from any line source.
    pub fn load_from(reader: impl BufRead) -> Result<Self, VocabError> {
        let mut lines = LineSource::new(reader, true, true)?;
        let mut vocab = Vocabulary {
            languages: Vec::new(),
            by_name: HashMap::new(),
            meanings: Vec::new(),
            fields: Vec::new(),
        };

        if !lines.peek().is_some_and(|line| line.starts_with("language")) {
            return Err(VocabError::NoLanguages { line: 1 });
        }
        while lines.peek().is_some_and(|line| line.starts_with("language")) {
            let line = lines.read_line()?.unwrap_or_default();
            let (_, code) = split_first_space(&line);
            if !vocab.by_name.contains_key(code) {
                vocab.languages.push(code.to_string());
                vocab.by_name.insert(code.to_string(), HashMap::new());
            }
        }

        let mut bodies = Vec::new();
        while lines.peek().is_some() {
            vocab.read_meaning(&mut lines, &mut bodies)?;
        }

        for body in bodies {
            vocab.link_meaning(body)?;
        }

        debug!(
            "loaded vocabulary: {} meanings, {} fields, {} languages",
            vocab.meanings.len(),
            vocab.fields.len(),
            vocab.languages.len()
        );
        Ok(vocab)
    }

    /// First pass over one meaning block.
    fn read_meaning(
        &mut self,
        lines: &mut LineSource<impl BufRead>,
        bodies: &mut Vec<PendingBody>,
    ) -> Result<(), VocabError> {
        let header = lines.read_line()?.unwrap_or_default();
        let header_line = lines.line_number();
        let is_abstract = match header.as_str() {
            "abstract" => true,
            "meaning" => false,
            _ => {
                return Err(VocabError::UnexpectedLine {
                    line: header_line,
                    expected: "'abstract' or 'meaning'",
                    found: header,
                });
            }
        };

        let is_root = lines.peek().is_some_and(|line| line.starts_with("root"));
        if is_root {
            lines.read_line()?;
        }

        let id = MeaningId(self.meanings.len() as u32);
        let mut meaning = Meaning::new(is_abstract, is_root, header_line);

        // <lang>_info lines
        loop {
            let Some(peeked) = lines.peek() else { break };
            let (keyword, rest) = split_first_space(peeked);
            let Some(language) = keyword.strip_suffix("_info") else {
                break;
            };
            let (language, text) = (language.to_string(), rest.to_string());
            lines.read_line()?;
            meaning.info.insert(language, text);
        }

        // one <lang> <name> line per declared language
        loop {
            let Some(peeked) = lines.peek() else { break };
            if peeked.starts_with("abstract")
                || peeked.starts_with("meaning")
                || peeked.starts_with("super")
                || peeked.starts_with("field")
            {
                break;
            }
            let (language, name) = split_first_space(peeked);
            let (language, name) = (language.to_string(), name.to_string());
            lines.read_line()?;
            let line = lines.line_number();
            let Some(per_language) = self.by_name.get_mut(&language) else {
                return Err(VocabError::UndeclaredLanguage { line, language });
            };
            per_language.insert(name.clone(), id);
            meaning.names.insert(language, name);
        }

        // deferred super/field body, consumed verbatim
        if lines
            .peek()
            .is_some_and(|line| line.starts_with("super") || line.starts_with("field"))
        {
            let start_line = lines.line_number() + 1;
            let mut body = Vec::new();
            loop {
                let Some(peeked) = lines.peek() else { break };
                if peeked == "meaning" || peeked == "abstract" {
                    break;
                }
                body.push(lines.read_line()?.unwrap_or_default());
            }
            bodies.push(PendingBody {
                owner: id,
                start_line,
                lines: body,
            });
        }

        self.meanings.push(meaning);
        Ok(())
    }

    /// Second pass: sets a meaning's supertype and instantiates its fields.
    fn link_meaning(&mut self, body: PendingBody) -> Result<(), VocabError> {
        let PendingBody {
            owner,
            start_line,
            lines,
        } = body;
        let mut iter = lines.into_iter();
        let Some(first) = iter.next() else {
            return Ok(());
        };

        if first == "super" {
            let mut reached_fields = false;
            for entry in iter.by_ref() {
                if entry == "field" {
                    reached_fields = true;
                    break;
                }
                let (language, name) = split_first_space(&entry);
                let super_id =
                    self.lookup(name, language)
                        .map_err(|source| VocabError::Link {
                            line: start_line,
                            source,
                        })?;
                let previous = self.meanings[owner.0 as usize].supertype;
                if previous.is_some_and(|existing| existing != super_id) {
                    return Err(VocabError::SupertypeMismatch {
                        line: start_line,
                        name: name.to_string(),
                        language: language.to_string(),
                    });
                }
                self.meanings[owner.0 as usize].supertype = Some(super_id);
            }
            if !reached_fields {
                return Ok(());
            }
        } else if first != "field" {
            return Err(VocabError::UnexpectedLine {
                line: start_line,
                expected: "'super' or 'field'",
                found: first,
            });
        }

        let mut blocks: Vec<Vec<String>> = Vec::new();
        let mut current = Vec::new();
        for entry in iter {
            if entry == "field" {
                blocks.push(mem::take(&mut current));
            } else {
                current.push(entry);
            }
        }
        blocks.push(current);

        for block in blocks {
            self.link_field(owner, block, start_line)?;
        }
        Ok(())
    }

    /// Instantiates one field block of a meaning.
    fn link_field(
        &mut self,
        owner: MeaningId,
        block: Vec<String>,
        start_line: u64,
    ) -> Result<(), VocabError> {
        if block.is_empty() {
            return Ok(());
        }

        let mut ty: Option<FieldType> = None;
        let mut labels: Vec<(String, String)> = Vec::new();
        let mut info: Vec<(String, String)> = Vec::new();

        for entry in &block {
            let (keyword, rest) = split_first_space(entry);
            if let Some(language) = keyword.strip_suffix("_info") {
                info.push((language.to_string(), rest.to_string()));
            } else if let Some(language) = keyword.strip_suffix("_type") {
                let declared = match rest {
                    "*STRING" => FieldType::Str,
                    "*INT" => FieldType::Int,
                    "*ANY" => FieldType::Any,
                    name => FieldType::Meaning(self.lookup(name, language).map_err(|source| {
                        VocabError::Link {
                            line: start_line,
                            source,
                        }
                    })?),
                };
                if ty.is_some_and(|existing| existing != declared) {
                    return Err(VocabError::FieldTypeConflict {
                        line: start_line,
                        name: rest.to_string(),
                        language: language.to_string(),
                    });
                }
                ty = Some(declared);
            } else {
                // a <lang> <label> line
                if !self.by_name.contains_key(keyword) {
                    return Err(VocabError::UndeclaredLanguage {
                        line: start_line,
                        language: keyword.to_string(),
                    });
                }
                labels.push((keyword.to_string(), rest.to_string()));
            }
        }

        let Some(ty) = ty else {
            return Err(VocabError::MissingFieldType { line: start_line });
        };

        let id = FieldId(self.fields.len() as u32);
        self.fields.push(Field {
            ty,
            labels: labels.iter().cloned().collect(),
            info: info.into_iter().collect(),
        });
        for (language, label) in labels {
            self.meanings[owner.0 as usize]
                .fields
                .entry(language)
                .or_default()
                .insert(label, id);
        }
        Ok(())
    }
}
