//! The generation façade: one vocabulary plus lazily-loaded rules.

use bon::Builder;
use thiserror::Error;

use crate::engine::{self, ProduceError};
use crate::rules::{LanguageRules, RuleError, RuleServer};
use crate::tree::MrTree;
use crate::vocabulary::Vocabulary;

/// An error raised by [`Generator::generate`]: either the language's rules
/// failed to load, or production failed against the tree.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Rules(#[from] RuleError),
    #[error(transparent)]
    Produce(#[from] ProduceError),
}

/// Owns the registries and answers generation requests.
///
/// The vocabulary is loaded once up front; each language's rules load on
/// its first generation request and stay cached. Batch callers that want a
/// placeholder instead of an abort catch the error per `(tree, language)`
/// pair themselves; the generator never swallows one.
///
/// # Example
///
/// ```no_run
/// use lingen::{Generator, MrTree, RuleServer, Vocabulary};
///
/// let vocabulary = Vocabulary::load("data/vocabulary.txt")?;
/// let tree = MrTree::parse("input.txt", &vocabulary)?;
/// let mut generator = Generator::builder()
///     .vocabulary(vocabulary)
///     .rules(RuleServer::new("data/languages"))
///     .build();
/// let text = generator.generate(&tree, "en")?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Builder)]
pub struct Generator {
    vocabulary: Vocabulary,
    rules: RuleServer,
}

impl Generator {
    /// The vocabulary everything is resolved against.
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// The rules for a language, loading them on first request.
    pub fn language(&mut self, code: &str) -> Result<&LanguageRules, RuleError> {
        self.rules.language(code, &self.vocabulary)
    }

    /// Produces text for the tree in the given language.
    pub fn generate(&mut self, tree: &MrTree, language: &str) -> Result<String, GenerateError> {
        let rules = self.rules.language(language, &self.vocabulary)?;
        Ok(engine::generate(tree, &self.vocabulary, rules)?)
    }
}
