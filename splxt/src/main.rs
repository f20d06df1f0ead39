//! Splxt CLI - A command-line tokenizer for Splunk SPL.
//!
//! This is the main entry point for the splxt CLI application.
//! It uses clap for argument parsing and dispatches to the command
//! handlers based on user input.

mod commands;
mod config;
mod error;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{common::OutputFormat, run_check, run_languages, run_tokens, CheckArgs, TokensArgs};
use config::Config;
use error::{Result, SplxtError};

/// Splxt - Tokenize search-language text
///
/// Splxt runs the rule-table lexer over files, validates rule files and
/// lists the languages it ships with.
#[derive(Parser, Debug)]
#[command(name = "splxt")]
#[command(author = "Splx Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Tokenize Splunk SPL and other rule-table languages", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, env = "SPLXT_VERBOSE")]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "SPLXT_CONFIG")]
    config: Option<PathBuf>,

    /// Disable color output
    #[arg(long, global = true, env = "SPLXT_NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands for the splxt CLI.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenize files
    ///
    /// Reads each file (or stdin when none is given, or for `-`) and prints
    /// its tokens.
    Tokens(TokensCommand),

    /// Validate a rule file
    ///
    /// Builds the rule file and reports its size, or the first error with
    /// the state and rule index it occurred at.
    Check(CheckCommand),

    /// List bundled languages
    Languages,
}

/// Arguments for the tokens subcommand.
#[derive(Parser, Debug)]
struct TokensCommand {
    /// Input files (default: stdin)
    files: Vec<PathBuf>,

    /// Language alias (default: detected from the file name, then config)
    #[arg(short, long)]
    lang: Option<String>,

    /// Rule file to use instead of a bundled language
    #[arg(short, long)]
    rules: Option<PathBuf>,

    /// Output format (default: from config)
    #[arg(short = 'F', long, value_enum)]
    format: Option<OutputFormat>,

    /// Merge adjacent tokens of the same category
    #[arg(short, long)]
    merge: bool,
}

/// Arguments for the check subcommand.
#[derive(Parser, Debug)]
struct CheckCommand {
    /// Rule file to validate
    rules: PathBuf,
}

/// Main entry point for the splxt CLI.
///
/// Parses command-line arguments, loads configuration, initializes logging,
/// and dispatches to the appropriate command handler.
fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = load_config(cli.config.as_deref())?;

    // Initialize logging
    init_logging(cli.verbose || config.verbose, cli.no_color)?;

    // Execute the selected command
    execute_command(cli.command, config)
}

/// Initialize the logging system.
///
/// Logs go to stderr so token output on stdout stays machine-readable.
fn init_logging(verbose: bool, no_color: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    let subscriber = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(!no_color)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .try_init()
        .map_err(|e| SplxtError::Config(format!("Failed to initialize logging: {}", e)))?;

    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(config_path: Option<&std::path::Path>) -> Result<Config> {
    match config_path {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    }
}

/// Execute the selected command.
fn execute_command(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::Tokens(args) => execute_tokens(args, config),
        Commands::Check(args) => run_check(CheckArgs { rules: args.rules }),
        Commands::Languages => run_languages(),
    }
}

/// Execute the tokens command, filling unset options from the config.
fn execute_tokens(args: TokensCommand, config: Config) -> Result<()> {
    let tokens_args = TokensArgs {
        inputs: args.files,
        lang: args.lang,
        rules: args.rules,
        format: args.format.unwrap_or(config.output.format),
        merge: args.merge || config.output.merge,
    };
    run_tokens(tokens_args, config)
}
