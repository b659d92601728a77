//! Interactive shell for exploring numerals, labels and progressions

use crate::commands::theory::{describe_numeral, describe_progression};
use crate::commands::{create_registry, CommandContext, CommandResult};
use crate::config::Config;
use anyhow::Result;
use chordsweep_core::{NumeralToken, ProgressionSpec, TheoryError};
use colored::*;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RustylineResult};

/// Interactive shell
pub struct Repl {
    editor: DefaultEditor,
    config: Config,
}

impl Repl {
    /// Create a new shell instance
    pub fn new(config: Config) -> RustylineResult<Self> {
        let editor = DefaultEditor::new()?;
        Ok(Repl { editor, config })
    }

    /// Start the shell loop
    pub fn run(&mut self) -> Result<()> {
        println!("{}", "Chordsweep progression shell".bright_cyan().bold());
        println!(
            "Type numerals or progressions like: {}, {}, {}",
            "V,7".cyan(),
            "ii,#,7".cyan(),
            "ii-V-I".cyan()
        );
        println!(
            "Type '{}' for more information, '{}' or {} to exit.\n",
            "help".bright_green(),
            "quit".bright_red(),
            "Ctrl+C".bright_red()
        );

        let registry = create_registry();
        let mut ctx = CommandContext::new(self.config.clone());

        loop {
            let prompt = format!("{} ", "chordsweep>".bright_magenta().bold());
            match self.editor.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    self.editor.add_history_entry(line.to_owned())?;

                    let result = match registry.execute(line, &mut ctx) {
                        CommandResult::NotACommand => describe(line, &ctx),
                        other => other,
                    };
                    match result {
                        CommandResult::Success | CommandResult::NotACommand => {}
                        CommandResult::Message(msg) => println!("{}", msg),
                        CommandResult::Exit => {
                            println!("{}", "Goodbye!".bright_cyan());
                            break;
                        }
                        CommandResult::Error(e) => {
                            println!("{} {}", "Error:".bright_red().bold(), e.red());
                        }
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                    println!("{}", "Goodbye!".bright_cyan());
                    break;
                }
                Err(err) => {
                    println!(
                        "{} {}",
                        "Error reading input:".bright_red().bold(),
                        err.to_string().red()
                    );
                }
            }
        }

        Ok(())
    }
}

/// Read a line that is not a command as a progression (if it has `-`) or a
/// single numeral
pub fn describe(line: &str, ctx: &CommandContext) -> CommandResult {
    if line.contains('-') {
        return match ProgressionSpec::parse(line) {
            Ok(spec) => CommandResult::Message(describe_progression(&spec, ctx.start, &ctx.key)),
            Err(e) => CommandResult::Error(e.to_string()),
        };
    }
    match NumeralToken::parse(line) {
        Ok(token) => CommandResult::Message(describe_numeral(&token, ctx)),
        Err(TheoryError::UnrecognizedNumeral(_)) => CommandResult::Error(format!(
            "Unknown command or numeral '{}'. Type 'help' for usage.",
            line
        )),
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

/// Convenience function to start the shell
pub fn start(config: Config) -> Result<()> {
    let mut repl = Repl::new(config)?;
    repl.run()
}
