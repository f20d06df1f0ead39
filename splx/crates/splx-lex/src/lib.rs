//! splx-lex - Rule-Table Lexer for Splunk SPL
//!
//! This crate tokenizes text with an ordered, state-grouped table of regular
//! expression rules. The table is data: it is loaded from a TOML rule file,
//! validated and compiled once, and then drives any number of scans. A
//! table for the Splunk Search Processing Language ships with the crate.
//!
//! # Example Usage
//!
//! ```
//! use splx_lex::{languages, TokenCategory};
//!
//! let table = languages::spl().unwrap();
//! let tokens = table.scanner().tokenize("| stats count(x) by host");
//!
//! assert_eq!(tokens[0].category, TokenCategory::Operator);
//! assert!(tokens
//!     .iter()
//!     .any(|t| t.category == TokenCategory::FunctionName && t.text == "count"));
//!
//! // Token texts always concatenate back to the input
//! let rebuilt: String = tokens.iter().map(|t| t.text).collect();
//! assert_eq!(rebuilt, "| stats count(x) by host");
//! ```
//!
//! # Module Structure
//!
//! - [`token`] - Token categories and the token type
//! - [`definition`] - Serializable lexer definitions (the rule file format)
//! - [`rule_table`] - Validated, compiled rule tables
//! - [`scanner`] - The match-emit-advance scan loop
//! - [`languages`] - Bundled language definitions
//! - [`error`] - Construction-time errors
//!
//! # Scanning Model
//!
//! A scan keeps a stack of state names, starting with the table's entry
//! state. At each offset the rules of the active state are tried in order
//! and the first one that matches wins. A match emits a token and may push
//! or pop a state. Where no rule matches, one character is emitted with the
//! table's fallback category, so scanning always terminates and never
//! fails.
//!
//! Rules can look ahead and behind without consuming:
//!
//! - A rule with `consumes = false` emits only its first capture group; the
//!   rest of the match stays in the input for the next rule.
//! - A rule with a `lookbehind` pattern only fires when the single character
//!   before the offset matches that pattern.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod definition;
pub mod error;
pub mod languages;
pub mod rule_table;
pub mod scanner;
pub mod token;

// Re-export main types for convenience
pub use definition::{LexerDefinition, LexerHeader, LexerInfo, RuleDef, POP_STATE};
pub use error::ConfigError;
pub use rule_table::{Rule, RuleTable, StateId, Transition};
pub use scanner::{ScanCursor, Scanner, Tokens};
pub use token::{coalesce, Token, TokenCategory, UnknownCategory};
