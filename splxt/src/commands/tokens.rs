//! Tokens command implementation.
//!
//! Tokenizes one or more documents and prints the token stream. Inputs are
//! read into a [`SourceMap`] first, then scanned in parallel; output keeps
//! the order of the arguments.

use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;
use splx_lex::{coalesce, RuleTable, Token};
use splx_util::{SourceFile, SourceMap};
use tracing::{debug, info};

use crate::commands::common::{Input, LexerChoice, OutputFormat};
use crate::commands::traits::{Command, CommandDescription};
use crate::config::Config;
use crate::error::Result;

/// Arguments for the tokens command.
#[derive(Debug, Clone, Default)]
pub struct TokensArgs {
    /// Files to tokenize; empty means stdin.
    pub inputs: Vec<PathBuf>,
    /// Language alias.
    pub lang: Option<String>,
    /// Rule file overriding `lang`.
    pub rules: Option<PathBuf>,
    /// Output format.
    pub format: OutputFormat,
    /// Merge adjacent tokens of the same category.
    pub merge: bool,
}

/// Token stream of one input, as rendered.
#[derive(Debug, Clone, Serialize)]
pub struct FileTokens {
    /// Display name of the input
    pub file: String,
    /// The tokens
    pub tokens: Vec<TokenRecord>,
}

/// A token with its position resolved to line and column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenRecord {
    /// Category variant name
    pub category: String,
    /// Token text
    pub text: String,
    /// Start byte offset
    pub start: usize,
    /// End byte offset
    pub end: usize,
    /// 1-indexed line of the start offset
    pub line: usize,
    /// 1-indexed character column of the start offset
    pub column: usize,
}

impl TokenRecord {
    fn new(token: &Token<'_>, file: &SourceFile) -> Result<Self> {
        let (line, column) = file.offset_to_line_col(token.start);
        Ok(Self {
            category: token.category.as_str().to_string(),
            text: file.slice(token.span())?.to_string(),
            start: token.start,
            end: token.end,
            line,
            column,
        })
    }
}

/// Tokens command handler.
pub struct TokensCommand {
    args: TokensArgs,
    config: Config,
}

impl TokensCommand {
    /// Create a new TokensCommand.
    pub fn new(args: TokensArgs, config: Config) -> Self {
        Self { args, config }
    }

    /// Tokenize every input.
    pub fn collect(&self) -> Result<Vec<FileTokens>> {
        let start_time = Instant::now();
        let inputs = Input::from_args(&self.args.inputs)?;
        let choice = LexerChoice::from_flags(self.args.rules.clone(), self.args.lang.clone());

        // A fixed choice is built once and shared across worker threads
        let shared = if choice.is_fixed() {
            Some(choice.resolve(None, &self.config)?)
        } else {
            None
        };

        let mut sources = SourceMap::new();
        let mut ids = Vec::with_capacity(inputs.len());
        for input in &inputs {
            ids.push(sources.add_file(input.name(), input.read()?));
        }

        let results = inputs
            .par_iter()
            .zip(ids.par_iter())
            .map(|(input, &id)| {
                let resolved;
                let table = match &shared {
                    Some(table) => table,
                    None => {
                        resolved = choice.resolve(input.path(), &self.config)?;
                        &resolved
                    },
                };
                self.tokenize_file(&*sources.get_file(id)?, table)
            })
            .collect::<Result<Vec<_>>>()?;

        info!(
            files = sources.file_count(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "tokenized input"
        );
        Ok(results)
    }

    fn tokenize_file(&self, file: &SourceFile, table: &RuleTable) -> Result<FileTokens> {
        let source = file.content();
        let scanner = table.scanner();

        let tokens = if self.args.merge {
            coalesce(scanner.tokens(source), source)
        } else {
            scanner.tokenize(source)
        };
        debug!(file = file.name(), id = file.id().index(), tokens = tokens.len(), "scanned");

        Ok(FileTokens {
            file: file.name().to_string(),
            tokens: tokens
                .iter()
                .map(|token| TokenRecord::new(token, file))
                .collect::<Result<_>>()?,
        })
    }

    /// Execute the command, writing to `out`.
    pub fn run_to(&self, out: &mut impl Write) -> Result<()> {
        let files = self.collect()?;
        match self.args.format {
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut *out, &files)?;
                writeln!(out)?;
            },
            OutputFormat::Text => {
                let with_names = files.len() > 1;
                for file in &files {
                    for token in &file.tokens {
                        if with_names {
                            write!(out, "{}:", file.file)?;
                        }
                        writeln!(
                            out,
                            "{}:{}\t{}\t{:?}",
                            token.line, token.column, token.category, token.text
                        )?;
                    }
                }
            },
        }
        Ok(())
    }

    /// Execute the command, writing to stdout.
    pub fn run(&self) -> Result<()> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        self.run_to(&mut out)
    }
}

impl Command for TokensCommand {
    type Args = (TokensArgs, Config);
    type Output = ();

    fn new((args, config): Self::Args) -> Self {
        Self { args, config }
    }

    fn execute(&self) -> Result<Self::Output> {
        self.run()
    }

    fn name() -> &'static str {
        "tokens"
    }
}

impl CommandDescription for TokensCommand {
    fn description() -> &'static str {
        "Tokenize search files"
    }

    fn help() -> &'static str {
        "Tokenizes each file (or stdin) with the selected lexer and prints one \
         token per line, or a JSON array with --format json."
    }
}

/// Run the tokens command.
pub fn run_tokens(args: TokensArgs, config: Config) -> Result<()> {
    TokensCommand::new(args, config).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SplxtError;
    use tempfile::TempDir;

    fn write_query(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn render(args: TokensArgs) -> String {
        let mut out = Vec::new();
        TokensCommand::new(args, Config::default())
            .run_to(&mut out)
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_tokens_command_name() {
        assert_eq!(<TokensCommand as Command>::name(), "tokens");
    }

    #[test]
    fn test_text_output() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_query(&temp_dir, "q.spl", "| stats\ncount(x)");
        let output = render(TokensArgs {
            inputs: vec![path],
            ..TokensArgs::default()
        });
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines[0], "1:1\tOperator\t\"|\"");
        assert_eq!(lines[2], "1:3\tKeyword\t\"stats\"");
        assert!(lines.contains(&"2:1\tFunctionName\t\"count\""));
    }

    #[test]
    fn test_merge_joins_fallback_runs() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_query(&temp_dir, "q.spl", "host");
        let args = TokensArgs {
            inputs: vec![path],
            ..TokensArgs::default()
        };

        assert_eq!(render(args.clone()).lines().count(), 4);
        let merged = render(TokensArgs { merge: true, ..args });
        assert_eq!(merged.trim_end(), "1:1\tPlainText\t\"host\"");
    }

    #[test]
    fn test_json_output_keeps_input_order() {
        let temp_dir = TempDir::new().unwrap();
        let first = write_query(&temp_dir, "a.spl", "1");
        let second = write_query(&temp_dir, "b.spl", "x=2");
        let command = TokensCommand::new(
            TokensArgs {
                inputs: vec![first, second],
                format: OutputFormat::Json,
                ..TokensArgs::default()
            },
            Config::default(),
        );

        let files = command.collect().unwrap();
        assert_eq!(files.len(), 2);
        assert!(files[0].file.ends_with("a.spl"));
        assert_eq!(files[0].tokens[0].category, "Number");
        assert_eq!(files[1].tokens[0].category, "Variable");

        let mut out = Vec::new();
        command.run_to(&mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[1]["tokens"][1]["text"], "=");
    }

    #[test]
    fn test_rules_override() {
        let temp_dir = TempDir::new().unwrap();
        let rules = write_query(
            &temp_dir,
            "words.toml",
            "[[states.root]]\npattern = '\\w+'\ncategory = \"Keyword\"\n",
        );
        let path = write_query(&temp_dir, "q.spl", "count(x)");
        let output = render(TokensArgs {
            inputs: vec![path],
            rules: Some(rules),
            ..TokensArgs::default()
        });
        assert!(output.starts_with("1:1\tKeyword\t\"count\""));
    }

    #[test]
    fn test_records_resolve_positions_through_source_file() {
        let file = SourceFile::new(0, "q.spl", "é=1\n| stats");
        let table = splx_lex::languages::spl().unwrap();
        let tokens = table.scanner().tokenize(file.content());

        let records: Vec<_> = tokens
            .iter()
            .map(|token| TokenRecord::new(token, &file).unwrap())
            .collect();
        let stats = records.iter().find(|record| record.text == "stats").unwrap();
        assert_eq!((stats.line, stats.column), (2, 3));
        assert_eq!(records[1].text, "=");
        assert_eq!((records[1].start, records[1].column), (2, 2));
    }

    #[test]
    fn test_repeated_stdin_is_rejected() {
        let command = TokensCommand::new(
            TokensArgs {
                inputs: vec![PathBuf::from("-"), PathBuf::from("-")],
                ..TokensArgs::default()
            },
            Config::default(),
        );
        assert!(matches!(command.collect(), Err(SplxtError::Validation(_))));
    }

    #[test]
    fn test_missing_file_fails() {
        let command = TokensCommand::new(
            TokensArgs {
                inputs: vec![PathBuf::from("/nonexistent/q.spl")],
                ..TokensArgs::default()
            },
            Config::default(),
        );
        assert!(command.collect().is_err());
    }
}
