//! Check command implementation.
//!
//! Loads a rule file and builds it, reporting either its size or the first
//! construction error.

use std::io::Write;
use std::path::PathBuf;

use splx_lex::RuleTable;
use tracing::info;

use crate::commands::common::load_rules_file;
use crate::commands::traits::{Command, CommandDescription};
use crate::error::Result;

/// Arguments for the check command.
#[derive(Debug, Clone, Default)]
pub struct CheckArgs {
    /// Rule file to validate.
    pub rules: PathBuf,
}

/// Summary of a rule file that built successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    /// Lexer name from the header
    pub name: String,
    /// Number of states
    pub states: usize,
    /// Number of rules across all states
    pub rules: usize,
}

impl CheckReport {
    fn from_table(table: &RuleTable) -> Self {
        Self {
            name: table.info().name.clone(),
            states: table.state_count(),
            rules: table.rule_count(),
        }
    }
}

/// Check command handler.
pub struct CheckCommand {
    args: CheckArgs,
}

impl CheckCommand {
    /// Create a new CheckCommand.
    pub fn new(args: CheckArgs) -> Self {
        Self { args }
    }

    /// Build the rule file.
    pub fn check(&self) -> Result<CheckReport> {
        let table = load_rules_file(&self.args.rules)?.build()?;
        let report = CheckReport::from_table(&table);
        info!(
            path = %self.args.rules.display(),
            states = report.states,
            rules = report.rules,
            "rule file is valid"
        );
        Ok(report)
    }

    /// Execute the command, writing to `out`.
    pub fn run_to(&self, out: &mut impl Write) -> Result<()> {
        let report = self.check()?;
        let name = if report.name.is_empty() {
            self.args.rules.display().to_string()
        } else {
            report.name
        };
        writeln!(
            out,
            "{}: ok ({} states, {} rules)",
            name, report.states, report.rules
        )?;
        Ok(())
    }

    /// Execute the command, writing to stdout.
    pub fn run(&self) -> Result<()> {
        self.run_to(&mut std::io::stdout().lock())
    }
}

impl Command for CheckCommand {
    type Args = CheckArgs;
    type Output = CheckReport;

    fn new(args: Self::Args) -> Self {
        Self { args }
    }

    fn execute(&self) -> Result<Self::Output> {
        self.check()
    }

    fn name() -> &'static str {
        "check"
    }
}

impl CommandDescription for CheckCommand {
    fn description() -> &'static str {
        "Validate a rule file"
    }

    fn help() -> &'static str {
        "Parses and compiles a TOML rule file and reports the number of states \
         and rules, or the state and rule index of the first error."
    }
}

/// Run the check command.
pub fn run_check(args: CheckArgs) -> Result<()> {
    CheckCommand::new(args).run()
}
