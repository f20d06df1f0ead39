//! Construction-time errors.
//!
//! Scanning never fails; every problem with a lexer surfaces here, while the
//! rule table is being built. Rule-level variants carry the state name and
//! the rule's index within that state.

use regex_automata::meta::BuildError;
use thiserror::Error;

/// Error raised while loading or building a rule table.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The rule file is not valid TOML or does not fit the schema
    #[error("failed to parse rule file: {0}")]
    Parse(#[from] toml::de::Error),

    /// The designated entry state has no rule list
    #[error("entry state `{entry}` is not defined")]
    MissingEntryState {
        /// Name of the missing state
        entry: String,
    },

    /// A rule transitions to a state that does not exist
    #[error("rule {index} in state `{state}` targets undefined state `{target}`")]
    UnknownState {
        /// State holding the rule
        state: String,
        /// Position of the rule in its state
        index: usize,
        /// The undefined target
        target: String,
    },

    /// A rule pattern does not compile
    #[error("rule {index} in state `{state}` has an invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        /// State holding the rule
        state: String,
        /// Position of the rule in its state
        index: usize,
        /// The offending pattern
        pattern: String,
        /// Compiler error
        #[source]
        source: Box<BuildError>,
    },

    /// A lookbehind constraint does not compile
    #[error("rule {index} in state `{state}` has an invalid lookbehind `{pattern}`: {source}")]
    InvalidLookbehind {
        /// State holding the rule
        state: String,
        /// Position of the rule in its state
        index: usize,
        /// The offending pattern
        pattern: String,
        /// Compiler error
        #[source]
        source: Box<BuildError>,
    },

    /// A lookahead rule has no capture group marking the token body
    #[error("rule {index} in state `{state}` does not consume but `{pattern}` has no capture group")]
    MissingCapture {
        /// State holding the rule
        state: String,
        /// Position of the rule in its state
        index: usize,
        /// The offending pattern
        pattern: String,
    },
}

impl ConfigError {
    /// The `(state, index)` of the offending rule, when the error is tied to one.
    pub fn rule(&self) -> Option<(&str, usize)> {
        match self {
            ConfigError::UnknownState { state, index, .. }
            | ConfigError::InvalidPattern { state, index, .. }
            | ConfigError::InvalidLookbehind { state, index, .. }
            | ConfigError::MissingCapture { state, index, .. } => Some((state.as_str(), *index)),
            ConfigError::Parse(_) | ConfigError::MissingEntryState { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_state_display() {
        let err = ConfigError::UnknownState {
            state: "root".to_string(),
            index: 3,
            target: "string".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "rule 3 in state `root` targets undefined state `string`"
        );
        assert_eq!(err.rule(), Some(("root", 3)));
    }

    #[test]
    fn test_missing_entry_display() {
        let err = ConfigError::MissingEntryState {
            entry: "root".to_string(),
        };
        assert_eq!(err.to_string(), "entry state `root` is not defined");
        assert_eq!(err.rule(), None);
    }

    #[test]
    fn test_parse_error_conversion() {
        let toml_err = toml::from_str::<toml::Table>("states = [").unwrap_err();
        let err: ConfigError = toml_err.into();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
