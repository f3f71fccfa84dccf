//! Declarative line grammar for the Org format
//!
//!     The grammar is an ordered list of named rules, each a regex over one
//!     line plus an extractor that turns the match into a structured payload.
//!     Order matters: rules are tried in registration order and the first
//!     match wins, so a line that satisfies both a permissive pattern and a
//!     later, more specific one resolves to the earlier rule. The built-in
//!     rule set encodes Org's precedence (for example `drawer.end` before
//!     `drawer.begin`, so `:end:` is never read as opening a drawer named
//!     "end").
//!
//!     The registry is mutable so a grammar can be reconfigured: `update`
//!     swaps a rule's pattern in place, keeping its slot in the ordering and
//!     its extractor. The headline rule is regenerated this way whenever the
//!     set of recognized TODO keywords changes, without disturbing its
//!     precedence relative to the other rules.

use std::fmt;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::org::lexing::timestamp;
use crate::org::token::TokenData;

/// A rule's post-match extractor: match captures in, structured payload out.
pub type Extract = fn(&Captures) -> TokenData;

/// The built-in headline keyword set: one "open" and one "closed" state.
pub const DEFAULT_TODOS: [&str; 2] = ["TODO", "DONE"];

const PLANNING_KEYWORDS: [&str; 3] = ["DEADLINE", "SCHEDULED", "CLOSED"];

/// Errors raised while installing grammar rules
#[derive(Debug, Clone)]
pub enum GrammarError {
    /// The supplied pattern source failed to compile
    InvalidPattern { name: String, source: regex::Error },
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarError::InvalidPattern { name, source } => {
                write!(f, "invalid pattern for rule `{}`: {}", name, source)
            }
        }
    }
}

impl std::error::Error for GrammarError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GrammarError::InvalidPattern { source, .. } => Some(source),
        }
    }
}

/// One named classification rule: a line pattern plus a payload extractor.
#[derive(Debug, Clone)]
pub struct Rule {
    name: String,
    pattern: Regex,
    post: Extract,
}

impl Rule {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// Run the rule's extractor over a successful match.
    pub fn extract(&self, captures: &Captures) -> TokenData {
        (self.post)(captures)
    }
}

/// An ordered, reconfigurable collection of classification rules.
#[derive(Debug, Clone, Default)]
pub struct Grammar {
    rules: Vec<Rule>,
}

impl Grammar {
    /// An empty registry with no rules.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// The built-in Org rule set, in its fixed precedence order.
    pub fn org() -> Self {
        ORG_GRAMMAR.clone()
    }

    /// Rules in evaluation order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Compile `pattern` and append a rule under `name`.
    ///
    /// Names are not checked for uniqueness: during matching the first
    /// occurrence in order wins, so a later `define` under an existing name
    /// is dead code. The compile error from a malformed pattern is returned
    /// immediately; the registry is unchanged in that case.
    pub fn define(&mut self, name: &str, pattern: &str, post: Extract) -> Result<(), GrammarError> {
        let pattern = compile(name, pattern)?;
        self.rules.push(Rule {
            name: name.to_string(),
            pattern,
            post,
        });
        Ok(())
    }

    /// Swap the pattern of the first rule named `name`, in place.
    ///
    /// The rule keeps its index in the evaluation order and its extractor.
    /// If no rule has that name, a new rule with a no-op extractor is
    /// appended instead of signalling "not found" — callers relying on
    /// `update` to fail for unknown names should check the registry first.
    pub fn update(&mut self, name: &str, pattern: &str) -> Result<(), GrammarError> {
        let pattern = compile(name, pattern)?;
        match self.rules.iter().position(|rule| rule.name == name) {
            Some(index) => self.rules[index].pattern = pattern,
            None => self.rules.push(Rule {
                name: name.to_string(),
                pattern,
                post: |_| TokenData::None,
            }),
        }
        Ok(())
    }
}

fn compile(name: &str, pattern: &str) -> Result<Regex, GrammarError> {
    Regex::new(pattern).map_err(|source| GrammarError::InvalidPattern {
        name: name.to_string(),
        source,
    })
}

/// Build the headline pattern source for a keyword set.
///
/// Recognizes leading asterisks (outline depth), an optional keyword drawn
/// from `todos`, an optional bracketed single-letter priority, non-greedy
/// trimmed content, and a trailing `:tag:tag:` list. Keywords pass through
/// `regex::escape` before embedding, so metacharacters in user-supplied
/// keywords match literally. An empty slice falls back to [`DEFAULT_TODOS`].
pub fn headline_pattern<S: AsRef<str>>(todos: &[S]) -> String {
    let mut keywords: Vec<String> = todos
        .iter()
        .map(|keyword| regex::escape(keyword.as_ref()))
        .collect();
    if keywords.is_empty() {
        keywords = DEFAULT_TODOS.iter().map(|k| regex::escape(k)).collect();
    }
    format!(
        r"^(\*+)\s+(?:({})\s+)?(?:\[#([A-Za-z])\]\s+)?(.*?)\s*(:(?:\w+:)+)?$",
        keywords.join("|")
    )
}

// The built-in grammar, compiled once. Patterns here are fixed and known
// good, so the Lazy initializer unwraps; runtime reconfiguration goes
// through the fallible `define`/`update` surface instead.
static ORG_GRAMMAR: Lazy<Grammar> = Lazy::new(|| {
    let mut g = Grammar::new();
    let defined: Result<(), GrammarError> = (|| {
        g.define("headline", &headline_pattern(&DEFAULT_TODOS), headline_data)?;
        g.define("keyword", r"^\s*#\+(\w+):\s*(.*)$", keyword_data)?;
        g.define(
            "planning",
            &format!(r"^\s*({}):\s*(.+)$", PLANNING_KEYWORDS.join("|")),
            planning_data,
        )?;
        g.define("timestamp", timestamp::pattern(), timestamp_data)?;
        g.define("block.begin", r"(?i)^\s*#\+begin_(\w+)(.*)$", block_begin_data)?;
        g.define("block.end", r"(?i)^\s*#\+end_(\w+)$", block_end_data)?;
        g.define("drawer.end", r"(?i)^\s*:end:\s*$", |_| TokenData::DrawerEnd)?;
        g.define("drawer.begin", r"^\s*:(\w+):\s*$", drawer_begin_data)?;
        g.define(
            "list.item",
            r"^(\s*)([-+]|\d+[.)])\s+(?:\[(x|X|-| )\][ \t]+)?(?:([^\n]+)[ \t]+::[ \t]*)?(.*)$",
            list_item_data,
        )?;
        g.define("table.separator", r"^\s*\|-", |_| TokenData::TableSeparator)?;
        g.define("table.row", r"^\s*\|(\s*.+\|)+\s*$", table_row_data)?;
        g.define("horizontalRule", r"^\s*-{5,}\s*$", |_| TokenData::HorizontalRule)?;
        g.define("comment", r"^\s*#\s.*$", |_| TokenData::Comment)?;
        g.define("footnote", r"^\[fn:(\w+)\]\s+(.*)$", footnote_data)?;
        Ok(())
    })();
    defined.unwrap();
    g
});

fn headline_data(caps: &Captures) -> TokenData {
    let level = caps[1].len();
    let keyword = caps.get(2).map(|m| m.as_str().to_string());
    let priority = caps.get(3).and_then(|m| m.as_str().chars().next());
    let content = caps[4].to_string();
    let tags = caps.get(5).map_or_else(Vec::new, |m| {
        m.as_str()
            .split(':')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(String::from)
            .collect()
    });
    TokenData::Headline {
        level,
        keyword,
        priority,
        content,
        tags,
    }
}

fn keyword_data(caps: &Captures) -> TokenData {
    TokenData::Keyword {
        key: caps[1].to_string(),
        value: caps[2].to_string(),
    }
}

fn planning_data(caps: &Captures) -> TokenData {
    TokenData::Planning {
        keyword: caps[1].to_string(),
        timestamp: timestamp::parse(&caps[2]),
    }
}

fn timestamp_data(caps: &Captures) -> TokenData {
    match timestamp::parse(&caps[0]) {
        Some(timestamp) => TokenData::Timestamp(timestamp),
        None => TokenData::None,
    }
}

fn block_begin_data(caps: &Captures) -> TokenData {
    TokenData::BlockBegin {
        kind: caps[1].to_string(),
        params: caps[2]
            .split_whitespace()
            .map(String::from)
            .collect(),
    }
}

fn block_end_data(caps: &Captures) -> TokenData {
    TokenData::BlockEnd {
        kind: caps[1].to_string(),
    }
}

fn drawer_begin_data(caps: &Captures) -> TokenData {
    TokenData::DrawerBegin {
        kind: caps[1].to_string(),
    }
}

fn list_item_data(caps: &Captures) -> TokenData {
    let checked = caps.get(3).map(|m| m.as_str() != " ");
    let tag = caps.get(4).map(|m| m.as_str().to_string());
    TokenData::ListItem {
        indent: caps[1].len(),
        ordered: !matches!(&caps[2], "-" | "+"),
        content: caps[5].to_string(),
        tag,
        checked,
    }
}

fn table_row_data(caps: &Captures) -> TokenData {
    TokenData::TableRow {
        cells: caps[1]
            .split('|')
            .map(str::trim)
            .filter(|cell| !cell.is_empty())
            .map(String::from)
            .collect(),
    }
}

fn footnote_data(caps: &Captures) -> TokenData {
    TokenData::Footnote {
        label: caps[1].to_string(),
        content: caps[2].to_string(),
    }
}
