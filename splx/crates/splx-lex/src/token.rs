//! Token definitions.
//!
//! A [`Token`] is a classified, offset-located slice of the input. The set of
//! classifications is the closed [`TokenCategory`] enumeration; rule files
//! name categories either by variant (`KeywordConstant`) or by their dotted
//! display name (`Keyword.Constant`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use splx_util::Span;

/// Classification attached to every token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum TokenCategory {
    /// Command names and language keywords (`stats`, `by`)
    Keyword,
    /// Literal constants (`true`, `NOT`)
    KeywordConstant,
    /// Function and macro names
    FunctionName,
    /// Field names and macro parameters
    Variable,
    /// Numeric literals
    Number,
    /// Operators and delimiters (`|`, `,`, `=`)
    Operator,
    /// Escape sequences (`\|`, `\*`)
    StringEscape,
    /// Double-quoted strings
    StringDouble,
    /// Single-quoted strings
    StringSingle,
    /// Delimited comments
    CommentMultiline,
    /// Text a rule explicitly marks as erroneous
    Error,
    /// Everything no rule claims
    PlainText,
}

impl TokenCategory {
    /// Every category, in declaration order.
    pub const ALL: [TokenCategory; 12] = [
        TokenCategory::Keyword,
        TokenCategory::KeywordConstant,
        TokenCategory::FunctionName,
        TokenCategory::Variable,
        TokenCategory::Number,
        TokenCategory::Operator,
        TokenCategory::StringEscape,
        TokenCategory::StringDouble,
        TokenCategory::StringSingle,
        TokenCategory::CommentMultiline,
        TokenCategory::Error,
        TokenCategory::PlainText,
    ];

    /// The variant name, as used in rule files.
    pub const fn as_str(self) -> &'static str {
        match self {
            TokenCategory::Keyword => "Keyword",
            TokenCategory::KeywordConstant => "KeywordConstant",
            TokenCategory::FunctionName => "FunctionName",
            TokenCategory::Variable => "Variable",
            TokenCategory::Number => "Number",
            TokenCategory::Operator => "Operator",
            TokenCategory::StringEscape => "StringEscape",
            TokenCategory::StringDouble => "StringDouble",
            TokenCategory::StringSingle => "StringSingle",
            TokenCategory::CommentMultiline => "CommentMultiline",
            TokenCategory::Error => "Error",
            TokenCategory::PlainText => "PlainText",
        }
    }

    /// The dotted token-type path used by highlighters.
    pub const fn dotted_name(self) -> &'static str {
        match self {
            TokenCategory::Keyword => "Keyword",
            TokenCategory::KeywordConstant => "Keyword.Constant",
            TokenCategory::FunctionName => "Name.Function",
            TokenCategory::Variable => "Name.Variable",
            TokenCategory::Number => "Literal.Number",
            TokenCategory::Operator => "Operator",
            TokenCategory::StringEscape => "Literal.String.Escape",
            TokenCategory::StringDouble => "Literal.String.Double",
            TokenCategory::StringSingle => "Literal.String.Single",
            TokenCategory::CommentMultiline => "Comment.Multiline",
            TokenCategory::Error => "Error",
            TokenCategory::PlainText => "Text",
        }
    }
}

impl fmt::Display for TokenCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dotted_name())
    }
}

/// Error returned when a category name is not recognised.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown token category `{0}`")]
pub struct UnknownCategory(pub String);

impl FromStr for TokenCategory {
    type Err = UnknownCategory;

    /// Accepts the variant name or the dotted name. The `Literal.` prefix of
    /// dotted names is optional, so `String.Double` works too.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let short = s.strip_prefix("Literal.").unwrap_or(s);
        TokenCategory::ALL
            .into_iter()
            .find(|category| {
                let dotted = category.dotted_name();
                s == category.as_str()
                    || s == dotted
                    || short == dotted.strip_prefix("Literal.").unwrap_or(dotted)
            })
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

impl TryFrom<String> for TokenCategory {
    type Error = UnknownCategory;

    fn try_from(value: String) -> Result<Self, UnknownCategory> {
        value.parse()
    }
}

/// A classified slice of the input.
///
/// `start` and `end` are byte offsets into the scanned text and `text` is
/// exactly `&input[start..end]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Token<'s> {
    /// Classification chosen by the matching rule (or the fallback)
    pub category: TokenCategory,
    /// The matched text
    pub text: &'s str,
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

impl<'s> Token<'s> {
    /// Creates a token for `source[start..end]`.
    ///
    /// Callers guarantee the range lies on character boundaries.
    pub(crate) fn new(category: TokenCategory, source: &'s str, start: usize, end: usize) -> Self {
        Self {
            category,
            text: &source[start..end],
            start,
            end,
        }
    }

    /// The byte range covered by this token.
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }

    /// Length of the token in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Always false for tokens produced by a scan.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{} {} {:?}", self.start, self.end, self.category, self.text)
    }
}

/// Merges runs of adjacent tokens that share a category.
///
/// Fallback characters come out one per token; highlighters usually want
/// them as a single run. The merged stream still covers `source` exactly.
///
/// # Example
///
/// ```
/// use splx_lex::{coalesce, languages, TokenCategory};
///
/// let table = languages::spl().unwrap();
/// let source = "host";
/// let merged = coalesce(table.scanner().tokens(source), source);
/// assert_eq!(merged.len(), 1);
/// assert_eq!(merged[0].category, TokenCategory::PlainText);
/// assert_eq!(merged[0].text, "host");
/// ```
pub fn coalesce<'s>(tokens: impl IntoIterator<Item = Token<'s>>, source: &'s str) -> Vec<Token<'s>> {
    let mut merged: Vec<Token<'s>> = Vec::new();
    for token in tokens {
        match merged.last_mut() {
            Some(last) if last.category == token.category && last.end == token.start => {
                *last = Token::new(last.category, source, last.start, token.end);
            },
            _ => merged.push(token),
        }
    }
    merged
}
