//! General shell commands (help, quit, key, start)

use crate::commands::{CommandContext, CommandResult};
use chordsweep_core::{StartPitch, Tonality};
use colored::*;

/// Handle `help` command
pub fn cmd_help(_args: &str, _ctx: &mut CommandContext) -> CommandResult {
    print_help();
    CommandResult::Success
}

/// Handle `quit` or `exit` command
pub fn cmd_quit(_args: &str, _ctx: &mut CommandContext) -> CommandResult {
    CommandResult::Exit
}

/// Handle `key [tonality]` command
pub fn cmd_key(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Message(format!("Current key: {}", ctx.key));
    }

    match Tonality::resolve(args) {
        Ok(key) => {
            ctx.key = key;
            CommandResult::Message(format!("Key set to {}", key).bright_green().to_string())
        }
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

/// Handle `start [pitch]` command
pub fn cmd_start(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Message(format!(
            "Current starting pitch: {} (MIDI {})",
            ctx.start, ctx.start.midi
        ));
    }

    match args.parse::<StartPitch>() {
        Ok(start) if (0..=127).contains(&start.midi) => {
            ctx.start = start;
            CommandResult::Message(
                format!("Starting pitch set to {} (MIDI {})", start, start.midi)
                    .bright_green()
                    .to_string(),
            )
        }
        Ok(start) => CommandResult::Error(format!("MIDI {} is out of range", start.midi)),
        Err(e) => CommandResult::Error(e),
    }
}

/// Print help information
fn print_help() {
    println!("{}", "Chordsweep Shell Help".bold());
    println!("{}", "=====================".bold());
    println!();
    println!("{}", "Numerals:".green());
    println!("  {}             - Minor triad on degree II", "ii".cyan());
    println!("  {}            - Dominant seventh on V (comma form)", "V,7".cyan());
    println!("  {}           - Same chord, glued form", "Imaj7".cyan());
    println!("  {}          - Raised ii with a 7th", "ii,#,7".cyan());
    println!(
        "  Extensions: {}",
        "7 maj7 min7 minmaj7 dim7 hdim7 min6 maj6 sus2 sus4 dim aug maj min".cyan()
    );
    println!();
    println!("{}", "Commands:".green());
    let registry = super::create_registry();
    let width = registry
        .help_lines()
        .iter()
        .map(|(usage, _)| usage.len())
        .max()
        .unwrap_or(0);
    for (usage, summary) in registry.help_lines() {
        println!("  {:<width$} - {}", usage.cyan(), summary, width = width);
    }
    println!();
    println!("{}", "Examples:".green());
    println!("  chordsweep> {}", "label V,7 C".cyan());
    println!("  G:7");
    println!();
    println!("  chordsweep> {}", "count ii-V-I".cyan());
    println!("  1944 files (72 starting pitches x 27 inversion combinations)");
    println!();
    println!(
        "Typing a bare numeral or progression describes it in the current key."
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_command() {
        let mut ctx = CommandContext::default();
        assert!(matches!(cmd_key("Am", &mut ctx), CommandResult::Message(_)));
        assert_eq!(ctx.key.to_string(), "Am");
        assert!(matches!(cmd_key("H", &mut ctx), CommandResult::Error(_)));
        assert_eq!(ctx.key.to_string(), "Am");
    }

    #[test]
    fn test_start_command() {
        let mut ctx = CommandContext::default();
        assert!(matches!(cmd_start("Eb-3", &mut ctx), CommandResult::Message(_)));
        assert_eq!(ctx.start.midi, 51);
        assert!(matches!(cmd_start("C-12", &mut ctx), CommandResult::Error(_)));
        assert!(matches!(cmd_start("nope", &mut ctx), CommandResult::Error(_)));
        assert_eq!(ctx.start.midi, 51);
    }
}
