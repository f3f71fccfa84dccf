//! Line classification: the grammar registry, the classifier, and the
//! timestamp sub-grammar the planning and timestamp rules delegate to.

pub mod grammar;
pub mod lexer;
pub mod timestamp;

pub use grammar::{headline_pattern, Grammar, GrammarError, Rule, DEFAULT_TODOS};
pub use lexer::{Lexer, Options};
