//! Line classifier
//!
//!     One line in, one token out. The classifier walks its grammar's rules
//!     in registration order and returns a token for the first rule whose
//!     pattern matches; later rules are never consulted once one has matched.
//!     Lines that match nothing degrade to `blank` (whitespace only) or
//!     `line` (opaque paragraph text), so classification is total: no input
//!     string fails.
//!
//!     Each classifier owns its grammar. Configurations with different TODO
//!     keyword sets can therefore coexist; reconfiguring one lexer never
//!     leaks into another. Newline handling belongs to the caller for
//!     `tokenize`; `tokenize_source` splits a whole source itself and stamps
//!     each token with the span of its line.

use serde::{Deserialize, Serialize};

use crate::org::ast::range::{Range, SourceIndex};
use crate::org::lexing::grammar::{headline_pattern, Grammar, GrammarError};
use crate::org::token::Token;

/// Classifier configuration.
///
/// `todos` is the list of recognized headline keywords. Absent or empty, the
/// built-in two-member set (`TODO`, `DONE`) stays in effect.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Options {
    pub todos: Option<Vec<String>>,
}

/// The line classifier: an owned grammar plus the matching loop.
#[derive(Debug, Clone)]
pub struct Lexer {
    grammar: Grammar,
}

impl Lexer {
    /// A classifier over the built-in Org grammar with default keywords.
    pub fn new() -> Self {
        Self {
            grammar: Grammar::org(),
        }
    }

    /// A classifier over a caller-assembled grammar.
    pub fn with_grammar(grammar: Grammar) -> Self {
        Self { grammar }
    }

    /// A classifier configured from `options`.
    ///
    /// A present, non-empty `todos` list regenerates the headline rule in
    /// place before the first line is classified.
    pub fn with_options(options: Options) -> Result<Self, GrammarError> {
        let mut lexer = Self::new();
        if let Some(todos) = options.todos {
            if !todos.is_empty() {
                lexer.update_todos(&todos)?;
            }
        }
        Ok(lexer)
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Mutable access to the grammar, for defining or updating rules.
    pub fn grammar_mut(&mut self) -> &mut Grammar {
        &mut self.grammar
    }

    /// Regenerate the headline rule for a new keyword set.
    ///
    /// The rule keeps its slot in the evaluation order.
    pub fn update_todos<S: AsRef<str>>(&mut self, todos: &[S]) -> Result<(), GrammarError> {
        self.grammar.update("headline", &headline_pattern(todos))
    }

    /// Classify one line of input.
    ///
    /// Rules are tried in registration order; the first match wins and its
    /// extractor produces the payload. With no match the token degrades to
    /// `blank` or `line`. The returned token's position is empty; callers
    /// that know where the line sits stamp it with [`Token::at`].
    pub fn tokenize(&self, line: &str) -> Token {
        for rule in self.grammar.rules() {
            if let Some(captures) = rule.pattern().captures(line) {
                return Token::new(rule.name(), line, rule.extract(&captures));
            }
        }

        if line.trim().is_empty() {
            Token::blank(line)
        } else {
            Token::line(line)
        }
    }

    /// Classify every line of `source`, stamping real positions.
    ///
    /// Columns are byte offsets within the line. The result is flat, one
    /// token per line in document order; nesting tokens into a tree is the
    /// assembler's job.
    pub fn tokenize_source(&self, source: &str) -> Vec<Token> {
        let index = SourceIndex::new(source);
        let mut lines: Vec<&str> = source.split('\n').collect();
        if source.ends_with('\n') {
            lines.pop();
        }

        let mut tokens = Vec::with_capacity(lines.len());
        let mut offset = 0;
        for line in lines {
            let extent = Range::new(offset, offset + line.len());
            tokens.push(self.tokenize(line).at(index.range_to_position(&extent)));
            offset += line.len() + 1;
        }
        tokens
    }
}

impl Default for Lexer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::org::ast::range::{Point, Position};
    use crate::org::token::TokenData;

    #[test]
    fn test_unmatched_line_degrades_to_line() {
        let lexer = Lexer::new();
        let token = lexer.tokenize("Just some prose.");
        assert_eq!(token.kind, "line");
        assert_eq!(token.raw, "Just some prose.");
        assert_eq!(token.data, TokenData::None);
    }

    #[test]
    fn test_whitespace_degrades_to_blank() {
        let lexer = Lexer::new();
        assert_eq!(lexer.tokenize("").kind, "blank");
        assert_eq!(lexer.tokenize("   \t ").kind, "blank");
    }

    #[test]
    fn test_tokenize_source_positions() {
        let lexer = Lexer::new();
        let tokens = lexer.tokenize_source("* Title\n\nBody text\n");

        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].kind, "headline");
        assert_eq!(
            tokens[0].position,
            Position::new(Point::new(0, 0), Point::new(0, 7))
        );
        assert_eq!(tokens[1].kind, "blank");
        assert_eq!(
            tokens[1].position,
            Position::new(Point::new(1, 0), Point::new(1, 0))
        );
        assert_eq!(tokens[2].kind, "line");
        assert_eq!(
            tokens[2].position,
            Position::new(Point::new(2, 0), Point::new(2, 9))
        );
    }

    #[test]
    fn test_tokenize_source_without_trailing_newline() {
        let lexer = Lexer::new();
        let tokens = lexer.tokenize_source("# one\n# two");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].kind, "comment");
        assert_eq!(
            tokens[1].position,
            Position::new(Point::new(1, 0), Point::new(1, 5))
        );
    }

    #[test]
    fn test_custom_todos_replace_defaults() {
        let lexer = Lexer::with_options(Options {
            todos: Some(vec!["WAIT".to_string(), "DROP".to_string()]),
        })
        .unwrap();

        match lexer.tokenize("* WAIT on review").data {
            TokenData::Headline { keyword, content, .. } => {
                assert_eq!(keyword.as_deref(), Some("WAIT"));
                assert_eq!(content, "on review");
            }
            data => panic!("expected headline, got {:?}", data),
        }

        // The default keywords are gone: TODO reads as plain content
        match lexer.tokenize("* TODO things").data {
            TokenData::Headline { keyword, content, .. } => {
                assert_eq!(keyword, None);
                assert_eq!(content, "TODO things");
            }
            data => panic!("expected headline, got {:?}", data),
        }
    }

    #[test]
    fn test_empty_todos_keep_defaults() {
        let lexer = Lexer::with_options(Options {
            todos: Some(Vec::new()),
        })
        .unwrap();
        match lexer.tokenize("* DONE ship").data {
            TokenData::Headline { keyword, .. } => assert_eq!(keyword.as_deref(), Some("DONE")),
            data => panic!("expected headline, got {:?}", data),
        }
    }
}
