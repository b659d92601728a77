//! Terminal logging through `env_logger`, with colored level tags

use colored::*;
use env_logger::Builder;
use log::{Level, LevelFilter, SetLoggerError};
use std::io::Write;

/// Tag printed in front of every message
pub fn level_tag(level: Level) -> ColoredString {
    match level {
        Level::Error => "error".bright_red().bold(),
        Level::Warn => "warn".yellow().bold(),
        Level::Info => "info".green(),
        Level::Debug => "debug".cyan(),
        Level::Trace => "trace".dimmed(),
    }
}

/// Install the logger at `level`; `RUST_LOG` still overrides it.
/// Fails if another logger is already set.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| writeln!(buf, "{} {}", level_tag(record.level()), record.args()))
        .try_init()
}

/// `-v` shows per-file detail, `-q` only warnings and errors
pub fn level_for(verbose: bool, quiet: bool) -> LevelFilter {
    match (verbose, quiet) {
        (true, _) => LevelFilter::Debug,
        (false, true) => LevelFilter::Warn,
        (false, false) => LevelFilter::Info,
    }
}
