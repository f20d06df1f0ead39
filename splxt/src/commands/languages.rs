//! Languages command implementation.

use std::io::Write;

use splx_lex::{languages, LexerInfo};

use crate::commands::traits::{Command, CommandDescription};
use crate::error::Result;

/// Languages command handler.
#[derive(Debug, Default)]
pub struct LanguagesCommand;

impl LanguagesCommand {
    /// Metadata of every bundled language.
    pub fn list(&self) -> Result<Vec<LexerInfo>> {
        Ok(languages::bundled()?
            .iter()
            .map(|definition| definition.header.info())
            .collect())
    }

    /// Execute the command, writing to `out`.
    pub fn run_to(&self, out: &mut impl Write) -> Result<()> {
        for info in self.list()? {
            writeln!(
                out,
                "{}\taliases: {}\tfiles: {}",
                info.name,
                info.aliases.join(", "),
                info.filenames.join(", ")
            )?;
        }
        Ok(())
    }
}

impl Command for LanguagesCommand {
    type Args = ();
    type Output = Vec<LexerInfo>;

    fn new(_args: Self::Args) -> Self {
        Self
    }

    fn execute(&self) -> Result<Self::Output> {
        self.list()
    }

    fn name() -> &'static str {
        "languages"
    }
}

impl CommandDescription for LanguagesCommand {
    fn description() -> &'static str {
        "List bundled languages"
    }

    fn help() -> &'static str {
        "Prints the name, aliases and file name patterns of every language \
         compiled into splxt."
    }
}

/// Run the languages command.
pub fn run_languages() -> Result<()> {
    LanguagesCommand.run_to(&mut std::io::stdout().lock())
}
