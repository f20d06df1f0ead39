//! Lexer definitions: the uncompiled, serializable form of a rule table.
//!
//! A definition is plain data. It can be written by hand in TOML, built in
//! code with [`RuleDef`]'s helpers, and turned into a [`RuleTable`] with
//! [`LexerDefinition::build`].
//!
//! ```toml
//! [lexer]
//! name = "Splunk SPL"
//! aliases = ["spl"]
//! filenames = ["*.spl", "*.splunk"]
//!
//! [[states.root]]
//! pattern = '\b\d+\b'
//! category = "Number"
//!
//! [[states.root]]
//! pattern = '\b(count|sum)\b\('
//! category = "Name.Function"
//! consumes = false
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::rule_table::RuleTable;
use crate::token::TokenCategory;

/// Transition target that pops the state stack instead of pushing.
pub const POP_STATE: &str = "#pop";

fn default_entry() -> String {
    "root".to_string()
}

fn default_fallback() -> TokenCategory {
    TokenCategory::PlainText
}

fn default_true() -> bool {
    true
}

/// Descriptive metadata of a lexer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexerInfo {
    /// Human-readable name
    #[serde(default)]
    pub name: String,

    /// Short names used to select the lexer
    #[serde(default)]
    pub aliases: Vec<String>,

    /// File name patterns (`*.spl`) this lexer handles
    #[serde(default)]
    pub filenames: Vec<String>,
}

impl LexerInfo {
    /// Case-insensitive alias comparison.
    pub fn matches_alias(&self, alias: &str) -> bool {
        self.aliases.iter().any(|a| a.eq_ignore_ascii_case(alias))
    }

    /// Checks the final path component against the filename patterns.
    ///
    /// Patterns are shell globs: `*` matches any run of characters, `?`
    /// exactly one, and `[...]` one character from a set or range (`[!...]`
    /// negates it). Matching is case-sensitive.
    ///
    /// ```
    /// use splx_lex::LexerInfo;
    ///
    /// let info = LexerInfo {
    ///     filenames: vec!["*.spl".to_string(), "query_[0-9]?.txt".to_string()],
    ///     ..Default::default()
    /// };
    /// assert!(info.matches_filename("queries/errors.spl"));
    /// assert!(!info.matches_filename("errors.spl.bak"));
    /// assert!(info.matches_filename("query_7a.txt"));
    /// ```
    pub fn matches_filename(&self, path: &str) -> bool {
        let name: Vec<char> = path.rsplit(['/', '\\']).next().unwrap_or(path).chars().collect();
        self.filenames.iter().any(|pattern| {
            let pattern: Vec<char> = pattern.chars().collect();
            glob_match(&pattern, &name)
        })
    }
}

fn glob_match(pattern: &[char], name: &[char]) -> bool {
    match pattern.split_first() {
        None => name.is_empty(),
        Some((&'*', rest)) => (0..=name.len()).any(|skip| glob_match(rest, &name[skip..])),
        Some((&'?', rest)) => !name.is_empty() && glob_match(rest, &name[1..]),
        Some((&'[', rest)) => match class_end(rest) {
            Some(end) => match name.split_first() {
                Some((&c, name_rest)) => {
                    class_matches(&rest[..end], c) && glob_match(&rest[end + 1..], name_rest)
                },
                None => false,
            },
            // An unclosed `[` is a literal bracket
            None => name.first() == Some(&'[') && glob_match(rest, &name[1..]),
        },
        Some((&literal, rest)) => name.first() == Some(&literal) && glob_match(rest, &name[1..]),
    }
}

/// Index of the `]` closing a character class whose body starts at `class[0]`.
/// A `]` right after the opening (or after `!`) belongs to the set.
fn class_end(class: &[char]) -> Option<usize> {
    let mut start = usize::from(class.first() == Some(&'!'));
    if class.get(start) == Some(&']') {
        start += 1;
    }
    class[start..].iter().position(|&c| c == ']').map(|pos| start + pos)
}

fn class_matches(class: &[char], c: char) -> bool {
    let (negated, body) = match class.split_first() {
        Some((&'!', body)) => (true, body),
        _ => (false, class),
    };
    let mut found = false;
    let mut i = 0;
    while i < body.len() {
        if i + 2 < body.len() && body[i + 1] == '-' {
            found |= (body[i]..=body[i + 2]).contains(&c);
            i += 3;
        } else {
            found |= body[i] == c;
            i += 1;
        }
    }
    found != negated
}

/// The `[lexer]` header of a rule file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexerHeader {
    /// Human-readable name
    #[serde(default)]
    pub name: String,

    /// Short names used to select the lexer
    #[serde(default)]
    pub aliases: Vec<String>,

    /// File name patterns this lexer handles
    #[serde(default)]
    pub filenames: Vec<String>,

    /// State the scan starts in
    #[serde(default = "default_entry")]
    pub entry: String,

    /// Category for characters no rule matches
    #[serde(default = "default_fallback")]
    pub fallback: TokenCategory,
}

impl Default for LexerHeader {
    fn default() -> Self {
        Self {
            name: String::new(),
            aliases: Vec::new(),
            filenames: Vec::new(),
            entry: default_entry(),
            fallback: default_fallback(),
        }
    }
}

impl LexerHeader {
    /// Metadata part of the header.
    pub fn info(&self) -> LexerInfo {
        LexerInfo {
            name: self.name.clone(),
            aliases: self.aliases.clone(),
            filenames: self.filenames.clone(),
        }
    }
}

/// One uncompiled rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDef {
    /// Regular expression, matched anchored at the scan offset
    pub pattern: String,

    /// Category of the emitted token
    pub category: TokenCategory,

    /// `false` for lookahead rules: only capture group 1 is emitted and consumed
    #[serde(default = "default_true")]
    pub consumes: bool,

    /// State to push after a match, or `#pop`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,

    /// Pattern the single preceding character must match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lookbehind: Option<String>,
}

impl RuleDef {
    /// A consuming rule with no transition and no lookbehind.
    pub fn new(pattern: impl Into<String>, category: TokenCategory) -> Self {
        Self {
            pattern: pattern.into(),
            category,
            consumes: true,
            next: None,
            lookbehind: None,
        }
    }

    /// Marks the rule as a lookahead rule; the pattern's group 1 is the token.
    pub fn lookahead(mut self) -> Self {
        self.consumes = false;
        self
    }

    /// Pushes `state` (or pops, for `#pop`) after a match.
    pub fn then(mut self, state: impl Into<String>) -> Self {
        self.next = Some(state.into());
        self
    }

    /// Requires the preceding character to match `pattern`.
    pub fn after(mut self, pattern: impl Into<String>) -> Self {
        self.lookbehind = Some(pattern.into());
        self
    }
}

/// A complete, uncompiled lexer: header plus ordered rules per state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexerDefinition {
    /// Metadata, entry state and fallback category
    #[serde(rename = "lexer", default)]
    pub header: LexerHeader,

    /// Ordered rule lists keyed by state name
    #[serde(default)]
    pub states: IndexMap<String, Vec<RuleDef>>,
}

impl LexerDefinition {
    /// An empty definition whose entry state is `root`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a TOML rule file.
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Renders the definition back to TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Appends `rules` to `state`, creating the state if needed.
    pub fn state(mut self, name: impl Into<String>, rules: impl IntoIterator<Item = RuleDef>) -> Self {
        self.states.entry(name.into()).or_default().extend(rules);
        self
    }

    /// Compiles the definition.
    pub fn build(&self) -> Result<RuleTable, ConfigError> {
        RuleTable::build(self)
    }

    /// Total number of rules across all states.
    pub fn rule_count(&self) -> usize {
        self.states.values().map(Vec::len).sum()
    }
}
