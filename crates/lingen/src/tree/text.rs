//! Tree text format: parsing and serialization.
//!
//! The format is line-oriented: the language code on line 1, the root type
//! name on line 2, then one `<tab>*<label> <value>` line per child. The tab
//! count gives the depth; a depth-indexed stack of in-progress nodes is
//! popped down to the tab count before each attach, so
//!
//! ```text
//! en
//! Statement
//! 	action eat
//! 		actor dog
//! 		target fish
//! ```
//!
//! attaches `fish` back up to `eat` after descending into `dog`.

use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::{MrTree, NodeId, TreeError};
use crate::source::{LineSource, split_first_space};
use crate::vocabulary::{LookupError, Vocabulary};

impl MrTree {
    /// Parses a tree from a file.
    pub fn parse(path: impl AsRef<Path>, vocab: &Vocabulary) -> Result<Self, TreeError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| TreeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_from(BufReader::new(file), vocab)
    }

    /// Parses a tree from text.
    pub fn parse_str(text: &str, vocab: &Vocabulary) -> Result<Self, TreeError> {
        Self::parse_from(text.as_bytes(), vocab)
    }

    /// Parses a tree from any line source. Blank lines are skipped; tabs
    /// are structure and are kept.
    pub fn parse_from(reader: impl BufRead, vocab: &Vocabulary) -> Result<Self, TreeError> {
        let mut lines = LineSource::new(reader, true, false)?;

        let Some(language) = lines.read_line()? else {
            return Err(TreeError::MissingHeader {
                what: "language code",
            });
        };
        if !vocab.language_available(&language) {
            return Err(TreeError::at(
                lines.line_number(),
                LookupError::UnknownLanguage { language }.into(),
            ));
        }

        let Some(root_name) = lines.read_line()? else {
            return Err(TreeError::MissingHeader { what: "root type" });
        };
        let root_ty = vocab
            .lookup(&root_name, &language)
            .map_err(|e| TreeError::at(lines.line_number(), e.into()))?;

        let mut tree = MrTree::new();
        let root = tree.set_root(root_ty);
        let mut stack: Vec<NodeId> = vec![root];

        while let Some(line) = lines.read_line()? {
            let line_number = lines.line_number();
            let tabs = line.chars().take_while(|&c| c == '\t').count();
            let rest = &line[tabs..];

            while stack.len() > tabs {
                stack.pop();
            }
            let Some(&top) = stack.last() else {
                return Err(TreeError::at(line_number, TreeError::OutsideTree));
            };

            let (label, value) = split_first_space(rest);
            if value.is_empty() {
                return Err(TreeError::at(
                    line_number,
                    TreeError::MissingValue {
                        label: label.to_string(),
                    },
                ));
            }
            let child = tree
                .add_child(top, label, value, &language, vocab)
                .map_err(|e| TreeError::at(line_number, e))?;
            stack.push(child);
        }

        Ok(tree)
    }

    /// Serializes the tree in the given language, the exact inverse of
    /// [`parse_from`](Self::parse_from). Field order is the vocabulary's
    /// field definition order, so the output is deterministic.
    pub fn serialize(&self, language: &str, vocab: &Vocabulary) -> Result<String, TreeError> {
        let Some(root) = self.root() else {
            return Err(TreeError::EmptyTree);
        };
        let Some(root_ty) = self.node_type(root) else {
            return Err(TreeError::NotALiteral);
        };
        let mut out = String::new();
        let _ = writeln!(out, "{language}");
        let _ = writeln!(out, "{}", vocab.meaning_name(root_ty, language)?);
        self.write_fields(root, language, vocab, 1, &mut out)?;
        Ok(out)
    }

    fn write_fields(
        &self,
        node: NodeId,
        language: &str,
        vocab: &Vocabulary,
        depth: usize,
        out: &mut String,
    ) -> Result<(), TreeError> {
        for field in self.used_fields(node) {
            let Some(child) = self.child(node, field) else {
                continue;
            };
            let label = vocab.field_label(field, language)?;
            let tabs = "\t".repeat(depth);
            match self.node_type(child) {
                Some(ty) => {
                    let name = vocab.meaning_name(ty, language)?;
                    let _ = writeln!(out, "{tabs}{label} {name}");
                    self.write_fields(child, language, vocab, depth + 1, out)?;
                }
                None => {
                    let value = self.literal_value(child).unwrap_or_default();
                    if self.is_string_literal(child) {
                        let _ = writeln!(out, "{tabs}{label} \"{value}\"");
                    } else {
                        let _ = writeln!(out, "{tabs}{label} {value}");
                    }
                }
            }
        }
        Ok(())
    }
}
