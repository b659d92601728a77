use thiserror::Error;

/// Errors raised while parsing numerals, tonalities and progressions.
///
/// All of them are detected before any voicing is produced, so a failing
/// progression never yields a partial enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TheoryError {
    #[error("unrecognized numeral '{0}': accepted chords are I/i - VII/vii")]
    UnrecognizedNumeral(String),

    #[error("unrecognized alteration or extension '{0}'")]
    UnrecognizedExtension(String),

    #[error("only 3- or 4-chord progressions are supported, got {0} chords")]
    UnsupportedProgressionLength(usize),

    #[error("unrecognized tonality '{0}'")]
    UnresolvedTonality(String),

    #[error("inversion {index} is out of range for a {voices}-voice chord")]
    InversionOutOfRange { index: usize, voices: usize },

    #[error("invalid sweep: {0}")]
    InvalidSweep(String),
}

pub type Result<T> = std::result::Result<T, TheoryError>;
