//! The embedded DSL compilers.
//!
//! Rules files embed three little languages: boolean conditions over path
//! patterns, the path patterns themselves, and production templates. Each
//! compiles to an immutable value at rules-load time; nothing is re-parsed
//! during generation.

mod error;
pub mod logic;
pub mod pattern;
pub mod template;

pub use error::SyntaxError;
pub use logic::Condition;
pub use pattern::{EvalContext, Instruction, Op, Pattern};
pub use template::{Segment, Template};
