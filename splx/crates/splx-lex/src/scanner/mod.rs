//! Scanner engine.
//!
//! The scanner drives the match-emit-advance loop. It borrows an immutable
//! [`RuleTable`]; all mutable scan state lives in a [`ScanCursor`], one per
//! document. Each call to [`Scanner::next_token`]:
//!
//! 1. returns `None` once the cursor reaches the end of the input;
//! 2. tries the active state's rules in table order, anchored at the cursor
//!    offset; the first rule that matches wins, however short its match;
//! 3. on a match emits the token, advances past it and applies the rule's
//!    transition;
//! 4. otherwise emits one character of the table's fallback category and
//!    advances by that character. An unmatched newline also resets the state
//!    stack to the entry state.
//!
//! Every call advances the offset, so a scan over `n` bytes produces at most
//! `n` tokens, and the token texts concatenate back to the input.

mod cursor;
mod tokens;

use tracing::trace;

use crate::rule_table::{RuleTable, Transition};
use crate::token::Token;

pub use cursor::ScanCursor;
pub use tokens::Tokens;

/// Tokenizes text with a borrowed [`RuleTable`].
///
/// # Example
///
/// ```
/// use splx_lex::{languages, TokenCategory};
///
/// let table = languages::spl().unwrap();
/// let scanner = table.scanner();
/// let mut cursor = scanner.cursor("count(x)");
///
/// let name = scanner.next_token(&mut cursor).unwrap();
/// assert_eq!((name.category, name.text), (TokenCategory::FunctionName, "count"));
///
/// let paren = scanner.next_token(&mut cursor).unwrap();
/// assert_eq!((paren.category, paren.text), (TokenCategory::Operator, "("));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Scanner<'t> {
    table: &'t RuleTable,
}

impl<'t> Scanner<'t> {
    /// Creates a scanner for `table`.
    pub fn new(table: &'t RuleTable) -> Self {
        Self { table }
    }

    /// The table driving this scanner.
    pub fn table(&self) -> &'t RuleTable {
        self.table
    }

    /// A fresh cursor at offset 0 in the table's entry state.
    pub fn cursor<'s>(&self, source: &'s str) -> ScanCursor<'s> {
        ScanCursor::new(source, self.table.entry_state())
    }

    /// Produces the next token, or `None` at end of input.
    pub fn next_token<'s>(&self, cursor: &mut ScanCursor<'s>) -> Option<Token<'s>> {
        let source = cursor.source();
        let start = cursor.offset();
        if start >= source.len() {
            return None;
        }

        for rule in self.table.rules_for(cursor.state()) {
            if let Some(end) = rule.match_at(source, start) {
                cursor.advance_to(end);
                match rule.transition() {
                    Some(Transition::Push(state)) => cursor.push_state(state),
                    Some(Transition::Pop) => cursor.pop_state(),
                    None => {},
                }
                return Some(Token::new(rule.category(), source, start, end));
            }
        }

        self.fallback(cursor)
    }

    /// Emits the character at the cursor as a fallback token.
    fn fallback<'s>(&self, cursor: &mut ScanCursor<'s>) -> Option<Token<'s>> {
        let source = cursor.source();
        let start = cursor.offset();
        let c = source[start..].chars().next()?;
        let end = start + c.len_utf8();
        trace!(offset = start, character = ?c, "no rule matched");

        cursor.advance_to(end);
        if c == '\n' {
            cursor.reset_state(self.table.entry_state());
        }
        Some(Token::new(self.table.fallback(), source, start, end))
    }

    /// Lazily tokenizes `source`.
    pub fn tokens<'s>(&self, source: &'s str) -> Tokens<'t, 's> {
        Tokens::new(*self, self.cursor(source))
    }

    /// Tokenizes `source` eagerly.
    pub fn tokenize<'s>(&self, source: &'s str) -> Vec<Token<'s>> {
        self.tokens(source).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{LexerDefinition, RuleDef};
    use crate::token::TokenCategory;

    fn table(rules: Vec<RuleDef>) -> RuleTable {
        LexerDefinition::new().state("root", rules).build().unwrap()
    }

    fn lex(table: &RuleTable, source: &str) -> Vec<(TokenCategory, String)> {
        table
            .scanner()
            .tokenize(source)
            .into_iter()
            .map(|t| (t.category, t.text.to_string()))
            .collect()
    }

    /// Strings in their own state: push on the opening quote, pop on the
    /// closing one.
    fn string_table() -> RuleTable {
        LexerDefinition::new()
            .state(
                "root",
                [
                    RuleDef::new("\"", TokenCategory::StringDouble).then("string"),
                    RuleDef::new(r"\w+", TokenCategory::Variable),
                ],
            )
            .state(
                "string",
                [
                    RuleDef::new(r#"[^"\\\n]+"#, TokenCategory::StringDouble),
                    RuleDef::new(r"\\.", TokenCategory::StringEscape),
                    RuleDef::new("\"", TokenCategory::StringDouble).then("#pop"),
                ],
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        let table = table(vec![RuleDef::new("a", TokenCategory::Keyword)]);
        let scanner = table.scanner();
        let mut cursor = scanner.cursor("");
        assert_eq!(scanner.next_token(&mut cursor), None);
        assert!(cursor.is_at_end());
    }

    #[test]
    fn test_returns_none_after_end_repeatedly() {
        let table = table(vec![RuleDef::new("a", TokenCategory::Keyword)]);
        let scanner = table.scanner();
        let mut cursor = scanner.cursor("a");
        assert!(scanner.next_token(&mut cursor).is_some());
        assert_eq!(scanner.next_token(&mut cursor), None);
        assert_eq!(scanner.next_token(&mut cursor), None);
    }

    #[test]
    fn test_first_match_wins_over_longer_match() {
        let short_first = table(vec![
            RuleDef::new("a", TokenCategory::Keyword),
            RuleDef::new("ab", TokenCategory::Variable),
        ]);
        assert_eq!(
            lex(&short_first, "ab"),
            [
                (TokenCategory::Keyword, "a".to_string()),
                (TokenCategory::PlainText, "b".to_string()),
            ]
        );

        let long_first = table(vec![
            RuleDef::new("ab", TokenCategory::Variable),
            RuleDef::new("a", TokenCategory::Keyword),
        ]);
        assert_eq!(lex(&long_first, "ab"), [(TokenCategory::Variable, "ab".to_string())]);
    }

    #[test]
    fn test_token_offsets_are_contiguous() {
        let table = table(vec![
            RuleDef::new(r"\w+", TokenCategory::Variable),
            RuleDef::new(r"\s+", TokenCategory::PlainText),
        ]);
        let tokens = table.scanner().tokenize("ab  cd!");
        let mut expected_start = 0;
        for token in &tokens {
            assert_eq!(token.start, expected_start);
            assert!(token.end > token.start);
            expected_start = token.end;
        }
        assert_eq!(expected_start, "ab  cd!".len());
    }

    #[test]
    fn test_fallback_is_one_character() {
        let table = table(vec![RuleDef::new(r"\d+", TokenCategory::Number)]);
        assert_eq!(
            lex(&table, "1@é2"),
            [
                (TokenCategory::Number, "1".to_string()),
                (TokenCategory::PlainText, "@".to_string()),
                (TokenCategory::PlainText, "é".to_string()),
                (TokenCategory::Number, "2".to_string()),
            ]
        );
    }

    #[test]
    fn test_fallback_uses_table_category() {
        let mut def = LexerDefinition::new().state("root", Vec::new());
        def.header.fallback = TokenCategory::Error;
        let table = def.build().unwrap();
        assert_eq!(lex(&table, "?"), [(TokenCategory::Error, "?".to_string())]);
    }

    #[test]
    fn test_lookahead_rule_leaves_context() {
        let table = table(vec![
            RuleDef::new(r"(\w+)\(", TokenCategory::FunctionName).lookahead(),
            RuleDef::new(r"[()]", TokenCategory::Operator),
            RuleDef::new(r"\w+", TokenCategory::Variable),
        ]);
        assert_eq!(
            lex(&table, "avg(x)"),
            [
                (TokenCategory::FunctionName, "avg".to_string()),
                (TokenCategory::Operator, "(".to_string()),
                (TokenCategory::Variable, "x".to_string()),
                (TokenCategory::Operator, ")".to_string()),
            ]
        );
    }

    #[test]
    fn test_push_and_pop_states() {
        let table = string_table();
        let scanner = table.scanner();
        let mut cursor = scanner.cursor(r#"x"a\"b"y"#);
        let mut seen = Vec::new();
        while let Some(token) = scanner.next_token(&mut cursor) {
            let state = table.state_name(cursor.state()).unwrap_or_default().to_string();
            seen.push((token.category, token.text, state));
        }
        assert_eq!(
            seen,
            [
                (TokenCategory::Variable, "x", "root".to_string()),
                (TokenCategory::StringDouble, "\"", "string".to_string()),
                (TokenCategory::StringDouble, "a", "string".to_string()),
                (TokenCategory::StringEscape, "\\\"", "string".to_string()),
                (TokenCategory::StringDouble, "b", "string".to_string()),
                (TokenCategory::StringDouble, "\"", "root".to_string()),
                (TokenCategory::Variable, "y", "root".to_string()),
            ]
        );
    }

    #[test]
    fn test_pop_never_leaves_entry_state() {
        let table = table(vec![RuleDef::new("x", TokenCategory::Keyword).then("#pop")]);
        let scanner = table.scanner();
        let mut cursor = scanner.cursor("xx");
        scanner.next_token(&mut cursor);
        scanner.next_token(&mut cursor);
        assert_eq!(cursor.state(), table.entry_state());
        assert_eq!(cursor.depth(), 1);
    }

    #[test]
    fn test_unmatched_newline_resets_to_entry_state() {
        let table = string_table();
        assert_eq!(
            lex(&table, "\"ab\ncd"),
            [
                (TokenCategory::StringDouble, "\"".to_string()),
                (TokenCategory::StringDouble, "ab".to_string()),
                (TokenCategory::PlainText, "\n".to_string()),
                (TokenCategory::Variable, "cd".to_string()),
            ]
        );
    }

    #[test]
    fn test_tokens_iterator_matches_next_token() {
        let table = string_table();
        let source = "a \"b\" c";
        let scanner = table.scanner();
        let mut cursor = scanner.cursor(source);
        let mut manual = Vec::new();
        while let Some(token) = scanner.next_token(&mut cursor) {
            manual.push(token);
        }
        assert_eq!(scanner.tokenize(source), manual);
    }
}
