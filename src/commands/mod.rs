//! Shell commands: a table of built-ins matched by leading words

pub mod general;
pub mod theory;

use crate::config::Config;
use chordsweep_core::{Mode, PitchClass, StartPitch, Tonality};

/// Result of executing a command
#[derive(Debug)]
pub enum CommandResult {
    /// Command executed successfully, continue the shell
    Success,
    /// Command executed, show this message
    Message(String),
    /// Exit the shell
    Exit,
    /// Not a command, try reading the line as a numeral or progression
    NotACommand,
    /// Error occurred
    Error(String),
}

/// Context passed to command handlers
pub struct CommandContext {
    pub config: Config,
    /// Key used by `label` when none is given
    pub key: Tonality,
    /// Starting pitch used by `chord` and `progression` when none is given
    pub start: StartPitch,
}

impl CommandContext {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            key: Tonality::new(PitchClass::C, Mode::Major),
            start: StartPitch::from_midi(60),
        }
    }
}

impl Default for CommandContext {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// A command handler function
pub type CommandHandler = fn(&str, &mut CommandContext) -> CommandResult;

/// One shell command: the words that invoke it plus its help line
#[derive(Clone, Copy)]
pub struct Command {
    pub name: &'static str,
    pub usage: &'static str,
    pub summary: &'static str,
    pub handler: CommandHandler,
}

impl Command {
    /// Arguments following the command name, or `None` if `input` is some
    /// other word that merely starts with the same letters
    fn arguments<'a>(&self, input: &'a str) -> Option<&'a str> {
        let rest = input.strip_prefix(self.name)?;
        if rest.is_empty() || rest.starts_with(char::is_whitespace) {
            Some(rest.trim())
        } else {
            None
        }
    }
}

/// Commands ordered longest name first, so `a b` wins over `a`
#[derive(Default)]
pub struct CommandRegistry {
    commands: Vec<Command>,
    /// `(usage, summary)` in registration order, one entry per usage
    help: Vec<(&'static str, &'static str)>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert after every command with a name at least as long, keeping
    /// registration order among equal lengths
    pub fn register(&mut self, command: Command) {
        let at = self
            .commands
            .partition_point(|c| c.name.len() >= command.name.len());
        self.commands.insert(at, command);
        if !self.help.iter().any(|(usage, _)| *usage == command.usage) {
            self.help.push((command.usage, command.summary));
        }
    }

    /// Run the first matching command, or report `NotACommand`
    pub fn execute(&self, input: &str, ctx: &mut CommandContext) -> CommandResult {
        self.commands
            .iter()
            .find_map(|c| c.arguments(input).map(|args| (c.handler, args)))
            .map_or(CommandResult::NotACommand, |(handler, args)| {
                handler(args, ctx)
            })
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.commands.iter().map(|c| c.name).collect()
    }

    pub fn help_lines(&self) -> &[(&'static str, &'static str)] {
        &self.help
    }
}

/// Shell commands and the order `help` lists them in
const BUILTINS: [Command; 10] = [
    Command {
        name: "label",
        usage: "label <numeral> [key]",
        summary: "Chord label in a key (default: current key)",
        handler: theory::cmd_label,
    },
    Command {
        name: "chord",
        usage: "chord <numeral> [start]",
        summary: "Every inversion from a starting pitch",
        handler: theory::cmd_chord,
    },
    Command {
        name: "count",
        usage: "count <progression>",
        summary: "Files generated over the configured sweep",
        handler: theory::cmd_count,
    },
    Command {
        name: "progression",
        usage: "progression <prog> [start]",
        summary: "Root-position voicings from a starting pitch",
        handler: theory::cmd_progression,
    },
    Command {
        name: "catalogue",
        usage: "catalogue",
        summary: "Built-in named progressions",
        handler: theory::cmd_catalogue,
    },
    Command {
        name: "key",
        usage: "key [key]",
        summary: "Show or set the current key",
        handler: general::cmd_key,
    },
    Command {
        name: "start",
        usage: "start [pitch]",
        summary: "Show or set the starting pitch (e.g. Eb-3, 60)",
        handler: general::cmd_start,
    },
    Command {
        name: "help",
        usage: "help",
        summary: "This help",
        handler: general::cmd_help,
    },
    Command {
        name: "quit",
        usage: "quit",
        summary: "Exit",
        handler: general::cmd_quit,
    },
    Command {
        name: "exit",
        usage: "quit",
        summary: "Exit",
        handler: general::cmd_quit,
    },
];

/// Registry holding every built-in command
pub fn create_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    for command in BUILTINS {
        registry.register(command);
    }
    registry
}
