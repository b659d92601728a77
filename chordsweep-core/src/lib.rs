//! # Chordsweep Core
//!
//! Chord theory and enumeration engine for the chordsweep dataset generator.
//! Parses Roman-numeral progressions, builds triad/tetrad voicings, sweeps
//! them over keys, octaves and inversions, and labels numerals for
//! annotation. No file, process or audio I/O happens here.
//!
//! ## Features
//!
//! - **serde**: Enable serialization of theory types and the sweep range
//!
//! ## Example
//!
//! ```
//! use chordsweep_core::{ProgressionSpec, Sweep, PitchClass, translate};
//!
//! let spec = ProgressionSpec::parse("ii-V-I").unwrap();
//! let sweep = Sweep::single(PitchClass::C, 4);
//! assert_eq!(spec.enumerate(&sweep).unwrap().count(), 27);
//! assert_eq!(translate("V,7", "C").unwrap().to_string(), "G:7");
//! ```

pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{Result, TheoryError};
pub use types::{
    enumerate, inversion_count, translate, translate_all, Accidental, Beats, ChordLabel,
    CommonProgressions, Enumeration, Extension, Mode, NumeralToken, PitchClass, ProgressionSpec,
    Realization, ScaleDegree, Span, StartPitch, Sweep, Tonality, Voicing,
};
