//! Common types and utilities for splxt commands.
//!
//! This module provides shared types and functions used across the command
//! implementations: the output format and lexer selection.

use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use splx_lex::{languages, LexerDefinition, RuleTable};
use tracing::debug;

use crate::config::Config;
use crate::error::{Result, SplxtError};

// ============================================================================
// Output Format
// ============================================================================

/// Supported token output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One token per line
    #[default]
    Text,
    /// A JSON array of per-file token lists
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Json => f.write_str("json"),
        }
    }
}

// ============================================================================
// Input
// ============================================================================

/// Name used for standard input in output and diagnostics.
pub const STDIN_NAME: &str = "<stdin>";

/// A document to tokenize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Read from standard input
    Stdin,
    /// Read from a file
    File(PathBuf),
}

impl Input {
    /// Maps CLI arguments to inputs; no arguments or `-` mean stdin.
    ///
    /// Stdin can only be read once, so `-` may appear at most once.
    pub fn from_args(paths: &[PathBuf]) -> Result<Vec<Input>> {
        if paths.is_empty() {
            return Ok(vec![Input::Stdin]);
        }
        let inputs: Vec<Input> = paths
            .iter()
            .map(|path| {
                if path.as_os_str() == "-" {
                    Input::Stdin
                } else {
                    Input::File(path.clone())
                }
            })
            .collect();
        if inputs.iter().filter(|input| **input == Input::Stdin).count() > 1 {
            return Err(SplxtError::Validation(
                "stdin (`-`) can be given only once".to_string(),
            ));
        }
        Ok(inputs)
    }

    /// Display name of the input.
    pub fn name(&self) -> String {
        match self {
            Input::Stdin => STDIN_NAME.to_string(),
            Input::File(path) => path.display().to_string(),
        }
    }

    /// Path of the input, if it is a file.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Input::Stdin => None,
            Input::File(path) => Some(path),
        }
    }

    /// Reads the whole input as UTF-8.
    pub fn read(&self) -> Result<String> {
        match self {
            Input::Stdin => {
                let mut content = String::new();
                std::io::stdin().read_to_string(&mut content)?;
                Ok(content)
            },
            Input::File(path) => {
                if !path.is_file() {
                    return Err(SplxtError::Validation(format!(
                        "Input file not found: {}",
                        path.display()
                    )));
                }
                Ok(std::fs::read_to_string(path)?)
            },
        }
    }
}

// ============================================================================
// Lexer Selection
// ============================================================================

/// How the lexer for an input is chosen, from most to least specific.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexerChoice {
    /// An explicit rule file
    RulesFile(PathBuf),
    /// A language alias
    Alias(String),
    /// The input's file name, then the configured default language
    Detect,
}

impl LexerChoice {
    /// Builds a choice from the `--rules` and `--lang` flags.
    pub fn from_flags(rules: Option<PathBuf>, lang: Option<String>) -> Self {
        match (rules, lang) {
            (Some(path), _) => LexerChoice::RulesFile(path),
            (None, Some(alias)) => LexerChoice::Alias(alias),
            (None, None) => LexerChoice::Detect,
        }
    }

    /// Whether the choice is the same for every input.
    pub fn is_fixed(&self) -> bool {
        !matches!(self, LexerChoice::Detect)
    }

    /// Resolves the rule table for `path` (or stdin when `None`).
    pub fn resolve(&self, path: Option<&Path>, config: &Config) -> Result<RuleTable> {
        let definition = match self {
            LexerChoice::RulesFile(rules) => load_rules_file(rules)?,
            LexerChoice::Alias(alias) => definition_for_alias(alias, config)?,
            LexerChoice::Detect => {
                let detected = match path.and_then(|p| p.to_str()) {
                    Some(name) => languages::find_for_filename(name)?,
                    None => None,
                };
                match detected {
                    Some(definition) => definition,
                    None => definition_for_alias(&config.default_language, config)?,
                }
            },
        };
        debug!(lexer = %definition.header.name, "selected lexer");
        Ok(definition.build()?)
    }
}

/// Reads and parses a rule file.
pub fn load_rules_file(path: &Path) -> Result<LexerDefinition> {
    if !path.is_file() {
        return Err(SplxtError::Validation(format!(
            "Rule file not found: {}",
            path.display()
        )));
    }
    let content = std::fs::read_to_string(path)?;
    Ok(LexerDefinition::from_toml(&content)?)
}

/// Looks up `alias` in the configured rule directories, then among the
/// bundled languages.
pub fn definition_for_alias(alias: &str, config: &Config) -> Result<LexerDefinition> {
    let file_name = format!("{}.toml", alias);
    if let Some(path) = config
        .rules_dirs
        .iter()
        .map(|dir| dir.join(&file_name))
        .find(|path| path.is_file())
    {
        debug!(alias, path = %path.display(), "using rule file from rules_dirs");
        return load_rules_file(&path);
    }

    languages::find_by_alias(alias)?.ok_or_else(|| SplxtError::UnknownLanguage(alias.to_string()))
}
