//! # Chordsweep
//!
//! Chordsweep builds chord-recognition datasets from Roman-numeral
//! progressions. Every progression is realized from every starting pitch of
//! a sweep in every combination of chord inversions, and each realization is
//! written as a MIDI file. The same numerals are translated into `Root:Quality`
//! labels for JAMS annotation files, and an external synthesizer renders
//! the MIDI files to audio.
//!
//! The chord theory lives in `chordsweep-core`; this crate adds the files,
//! processes and user interfaces around it.
//!
//! ## Modules
//!
//! - `generate`: Writes every realization of a progression to disk, with
//!   optional randomized chord lengths recorded in a sidecar.
//! - `export`: MIDI, duration sidecar and JAMS writers.
//! - `audio`: MIDI to WAV conversion through an external program.
//! - `config`: JSON configuration with defaults for every value.
//! - `logging`: Colored terminal logger for the `log` facade.
//! - `commands` / `repl`: The interactive shell and its command registry.

pub mod audio;
pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod generate;
pub mod logging;
pub mod repl;

// Re-export commonly used types and functions for convenience
pub use crate::config::Config;
pub use crate::error::ExportError;
pub use crate::generate::{generate_progression, GenerateOptions, GenerationSummary};
pub use chordsweep_core::{translate, ChordLabel, ProgressionSpec, Sweep, TheoryError};
