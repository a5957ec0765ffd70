//! Rule-driven natural-language generation from typed meaning trees.
//!
//! A [`Vocabulary`] defines the space of meanings: a single-inheritance type
//! hierarchy whose types carry per-language names and typed fields. An
//! [`MrTree`] is an instance of that vocabulary, a typed tree of meaning
//! nodes and literals, built from a tab-indented text format or by direct
//! mutation. Per-language [rules](rules) map meanings to ordered,
//! conditionally-guarded production templates; the [engine](engine)
//! recursively expands the winning templates into surface text.
//!
//! All state is explicit: registries are constructed once and passed by
//! reference, so tests and callers can hold several independent worlds in
//! one process.
//!
//! # Example
//!
//! ```
//! use lingen::{LanguageRules, MrTree, Vocabulary, engine};
//!
//! let vocabulary = Vocabulary::load_from(
//!     "language en
//! abstract
//! en verb
//! meaning
//! root
//! en Statement
//! field
//! en_type verb
//! en action
//! meaning
//! en open
//! super
//! en verb
//! field
//! en_type *ANY
//! en target
//! "
//!     .as_bytes(),
//! )?;
//!
//! let rules = LanguageRules::load_from(
//!     r#"rules Statement
//! rule *,*,"<.action>"
//! rules open
//! super target
//! rule *,*,"open {target}"
//! rules target
//! rule target,*,"<.target>"
//! "#
//!     .as_bytes(),
//!     "en",
//!     &vocabulary,
//! )?;
//!
//! let tree = MrTree::parse_str(
//!     "en\nStatement\n\taction open\n\t\ttarget \"the door\"\n",
//!     &vocabulary,
//! )?;
//!
//! let text = engine::generate(&tree, &vocabulary, &rules)?;
//! assert_eq!(text, "open the door");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod dsl;
pub mod engine;
pub mod generator;
pub mod rules;
pub mod source;
mod suggest;
pub mod tree;
pub mod vocabulary;

pub use dsl::{Condition, EvalContext, Pattern, Segment, SyntaxError, Template};
pub use engine::ProduceError;
pub use generator::{GenerateError, Generator};
pub use rules::{LanguageRules, Rule, RuleError, RuleServer, RuleSet, RuleSetId};
pub use source::LineSource;
pub use tree::{MrTree, NodeId, TreeError};
pub use vocabulary::{
    Field, FieldId, FieldType, LookupError, Meaning, MeaningId, VocabError, Vocabulary,
};
