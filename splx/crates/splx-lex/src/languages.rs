//! Bundled language definitions.
//!
//! Rule files for the supported languages are compiled into the crate. They
//! are parsed on request; callers that scan repeatedly should build a table
//! once and keep it.

use tracing::debug;

use crate::definition::LexerDefinition;
use crate::error::ConfigError;
use crate::rule_table::RuleTable;

/// Rule file for the Splunk Search Processing Language.
pub const SPL_RULES: &str = include_str!("../languages/spl.toml");

/// Every bundled rule file, in lookup order.
const BUNDLED: &[&str] = &[SPL_RULES];

/// Parses every bundled definition.
pub fn bundled() -> Result<Vec<LexerDefinition>, ConfigError> {
    BUNDLED.iter().map(|source| LexerDefinition::from_toml(source)).collect()
}

/// Finds the bundled definition with the given alias (case-insensitive).
pub fn find_by_alias(alias: &str) -> Result<Option<LexerDefinition>, ConfigError> {
    let found = bundled()?
        .into_iter()
        .find(|def| def.header.info().matches_alias(alias));
    debug!(alias, found = found.is_some(), "language lookup by alias");
    Ok(found)
}

/// Finds the bundled definition whose filename patterns match `path`.
pub fn find_for_filename(path: &str) -> Result<Option<LexerDefinition>, ConfigError> {
    let found = bundled()?
        .into_iter()
        .find(|def| def.header.info().matches_filename(path));
    debug!(path, found = found.is_some(), "language lookup by file name");
    Ok(found)
}

/// The bundled SPL definition.
pub fn spl_definition() -> Result<LexerDefinition, ConfigError> {
    LexerDefinition::from_toml(SPL_RULES)
}

/// The bundled SPL rule table.
///
/// ```
/// use splx_lex::{languages, TokenCategory};
///
/// let table = languages::spl().unwrap();
/// let tokens = table.scanner().tokenize("12 x3");
/// assert_eq!(tokens[0].category, TokenCategory::Number);
/// assert_eq!(tokens[0].text, "12");
/// ```
pub fn spl() -> Result<RuleTable, ConfigError> {
    spl_definition()?.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenCategory;

    fn lex(source: &str) -> Vec<(TokenCategory, &str)> {
        spl()
            .unwrap()
            .scanner()
            .tokenize(source)
            .into_iter()
            .map(|t| (t.category, t.text))
            .collect()
    }

    #[test]
    fn test_spl_builds() {
        let table = spl().unwrap();
        assert_eq!(table.info().name, "Splunk SPL");
        assert_eq!(table.state_count(), 1);
        assert_eq!(table.rule_count(), 17);
        assert_eq!(table.fallback(), TokenCategory::PlainText);
    }

    #[test]
    fn test_spl_rule_order_is_preserved() {
        let table = spl().unwrap();
        let categories: Vec<_> = table
            .rules_for(table.entry_state())
            .iter()
            .map(|rule| rule.category())
            .collect();
        assert_eq!(
            categories,
            [
                TokenCategory::Keyword,
                TokenCategory::FunctionName,
                TokenCategory::FunctionName,
                TokenCategory::Keyword,
                TokenCategory::FunctionName,
                TokenCategory::Number,
                TokenCategory::StringEscape,
                TokenCategory::Operator,
                TokenCategory::Keyword,
                TokenCategory::KeywordConstant,
                TokenCategory::Variable,
                TokenCategory::Variable,
                TokenCategory::Operator,
                TokenCategory::StringDouble,
                TokenCategory::StringSingle,
                TokenCategory::CommentMultiline,
                TokenCategory::PlainText,
            ]
        );
    }

    #[test]
    fn test_lookups() {
        assert!(find_by_alias("SPL").unwrap().is_some());
        assert!(find_by_alias("sql").unwrap().is_none());
        assert!(find_for_filename("saved/errors.splunk").unwrap().is_some());
        assert!(find_for_filename("errors.txt").unwrap().is_none());
        assert_eq!(bundled().unwrap().len(), 1);
    }

    #[test]
    fn test_function_name_leaves_paren() {
        assert_eq!(
            lex("count(x)"),
            [
                (TokenCategory::FunctionName, "count"),
                (TokenCategory::Operator, "("),
                (TokenCategory::Variable, "x"),
                (TokenCategory::Operator, ")"),
            ]
        );
    }

    #[test]
    fn test_command_list_wins_over_function_list() {
        // `replace` is both a search command and an eval function
        assert_eq!(lex("replace(")[0], (TokenCategory::Keyword, "replace"));
    }

    #[test]
    fn test_escapes() {
        assert_eq!(
            lex(r"\|\*\=\"),
            [
                (TokenCategory::StringEscape, r"\|"),
                (TokenCategory::StringEscape, r"\*"),
                (TokenCategory::StringEscape, r"\="),
                (TokenCategory::StringEscape, r"\"),
            ]
        );
    }

    #[test]
    fn test_strings() {
        assert_eq!(lex(r#""a\"b""#), [(TokenCategory::StringDouble, r#""a\"b""#)]);
        assert_eq!(lex(r"'it\'s'"), [(TokenCategory::StringSingle, r"'it\'s'")]);
    }

    #[test]
    fn test_comments_are_separate() {
        assert_eq!(
            lex("```a``` rest ```b```"),
            [
                (TokenCategory::CommentMultiline, "```a```"),
                (TokenCategory::PlainText, " "),
                (TokenCategory::Keyword, "rest"),
                (TokenCategory::PlainText, " "),
                (TokenCategory::CommentMultiline, "```b```"),
            ]
        );
    }

    #[test]
    fn test_macro_and_parameters() {
        assert_eq!(
            lex("`mymacro(a, b)`"),
            [
                (TokenCategory::FunctionName, "`mymacro"),
                (TokenCategory::Operator, "("),
                (TokenCategory::Variable, "a"),
                (TokenCategory::Operator, ","),
                (TokenCategory::PlainText, " "),
                (TokenCategory::Variable, "b"),
                (TokenCategory::Operator, ")"),
                (TokenCategory::PlainText, "`"),
            ]
        );
    }

    #[test]
    fn test_field_assignment() {
        assert_eq!(
            lex("status = 404 AND NOT true"),
            [
                (TokenCategory::Variable, "status "),
                (TokenCategory::Operator, "="),
                (TokenCategory::PlainText, " "),
                (TokenCategory::Number, "404"),
                (TokenCategory::PlainText, " "),
                (TokenCategory::PlainText, "A"),
                (TokenCategory::PlainText, "N"),
                (TokenCategory::PlainText, "D"),
                (TokenCategory::PlainText, " "),
                (TokenCategory::KeywordConstant, "NOT"),
                (TokenCategory::PlainText, " "),
                (TokenCategory::KeywordConstant, "true"),
            ]
        );
    }
}
