//! Theory commands: label, chord, count, progression, catalogue

use crate::commands::{CommandContext, CommandResult};
use chordsweep_core::{
    ChordLabel, CommonProgressions, NumeralToken, ProgressionSpec, StartPitch, Tonality,
};
use colored::*;

/// Split off an optional trailing argument
fn split_last(args: &str) -> (&str, Option<&str>) {
    match args.rsplit_once(char::is_whitespace) {
        Some((head, tail)) => (head.trim(), Some(tail.trim())),
        None => (args, None),
    }
}

fn start_arg(arg: Option<&str>, ctx: &CommandContext) -> Result<StartPitch, String> {
    match arg {
        None => Ok(ctx.start),
        Some(text) => {
            let start: StartPitch = text.parse()?;
            if (0..=127).contains(&start.midi) {
                Ok(start)
            } else {
                Err(format!("MIDI {} is out of range", start.midi))
            }
        }
    }
}

/// Handle `label <numeral> [key]`
pub fn cmd_label(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Error("Usage: label <numeral> [key]".to_string());
    }
    let (numeral, key) = split_last(args);
    let key = match key.map(Tonality::resolve) {
        Some(Ok(key)) => key,
        Some(Err(e)) => return CommandResult::Error(e.to_string()),
        None => ctx.key,
    };

    match NumeralToken::parse(numeral) {
        Ok(token) => CommandResult::Message(ChordLabel::for_numeral(&token, &key).to_string()),
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

/// Handle `chord <numeral> [start]`: the chord built on the degree's fixed
/// offset from the starting pitch, in every inversion
pub fn cmd_chord(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Error("Usage: chord <numeral> [start]".to_string());
    }
    let (numeral, start) = match split_last(args) {
        (head, Some(tail)) if !head.is_empty() => (head, Some(tail)),
        _ => (args, None),
    };
    let start = match start_arg(start, ctx) {
        Ok(start) => start,
        Err(e) => return CommandResult::Error(e),
    };
    let token = match NumeralToken::parse(numeral) {
        Ok(token) => token,
        Err(e) => return CommandResult::Error(e.to_string()),
    };

    let voicing = token.build(start.midi + token.degree.fixed_offset());
    let mut out = format!(
        "{} from {} ({})",
        token.to_string().bright_cyan(),
        start,
        ChordLabel::for_numeral(&token, &ctx.key)
    );
    for (k, inverted) in voicing.inversions().enumerate() {
        out.push_str(&format!("\n  {}: {}", k, inverted));
    }
    CommandResult::Message(out)
}

/// Handle `count <progression>`
pub fn cmd_count(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Error("Usage: count <progression>".to_string());
    }
    let spec = match ProgressionSpec::parse(args) {
        Ok(spec) => spec,
        Err(e) => return CommandResult::Error(e.to_string()),
    };
    let sweep = &ctx.config.sweep;
    if let Err(e) = sweep.validate() {
        return CommandResult::Error(e.to_string());
    }
    CommandResult::Message(format!(
        "{} files ({} starting pitches x {} inversion combinations)",
        spec.realization_count(sweep),
        sweep.len(),
        spec.combinations_per_start()
    ))
}

/// Handle `progression <progression> [start]`
pub fn cmd_progression(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Error("Usage: progression <progression> [start]".to_string());
    }
    let (progression, start) = match split_last(args) {
        (head, Some(tail)) if !head.is_empty() => (head, Some(tail)),
        _ => (args, None),
    };
    let start = match start_arg(start, ctx) {
        Ok(start) => start,
        Err(e) => return CommandResult::Error(e),
    };
    match ProgressionSpec::parse(progression) {
        Ok(spec) => CommandResult::Message(describe_progression(&spec, start, &ctx.key)),
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

/// Handle `catalogue`
pub fn cmd_catalogue(_args: &str, _ctx: &mut CommandContext) -> CommandResult {
    let lines: Vec<String> = CommonProgressions::ALL
        .iter()
        .map(|(name, progression)| format!("  {:<10} {}", name.green(), progression))
        .collect();
    CommandResult::Message(lines.join("\n"))
}

/// One line per slot: numeral, label in `key`, root-position voicing from `start`
pub fn describe_progression(spec: &ProgressionSpec, start: StartPitch, key: &Tonality) -> String {
    let chords = spec.voicings_at(start.midi);
    let lines: Vec<String> = spec
        .slots()
        .iter()
        .zip(&chords)
        .map(|(slot, chord)| {
            format!(
                "  {:<10} {:<8} {}",
                slot.to_string().cyan(),
                ChordLabel::for_numeral(slot, key),
                chord
            )
        })
        .collect();
    format!("{} from {}\n{}", spec.to_string().bold(), start, lines.join("\n"))
}

/// One line describing a numeral in the current key and from the current start
pub fn describe_numeral(token: &NumeralToken, ctx: &CommandContext) -> String {
    let voicing = token.build(ctx.start.midi + token.degree.fixed_offset());
    format!(
        "{} in {}: {}  {}",
        token.to_string().cyan(),
        ctx.key,
        ChordLabel::for_numeral(token, &ctx.key),
        voicing
    )
}
