// chordsweep-core/src/types/mod.rs

pub mod chord;
pub mod label;
pub mod note;
pub mod progression;
pub mod roman_numeral;
pub mod time;
pub mod tonality;

pub use chord::{inversion_count, Voicing};
pub use label::{translate, translate_all, ChordLabel};
pub use note::PitchClass;
pub use progression::{
    enumerate, CommonProgressions, Enumeration, ProgressionSpec, Realization, StartPitch, Sweep,
};
pub use roman_numeral::{Accidental, Extension, NumeralToken, ScaleDegree};
pub use time::{Beats, Span};
pub use tonality::{Mode, Tonality};
