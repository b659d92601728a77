//! Tonality resolution: `"C"`, `"Am"`, `"F#m"`, `"Eb"` -> root pitch class + mode.
//!
//! Unknown roots are rejected with [`TheoryError::UnresolvedTonality`]; there is
//! no fallback to C major.

use crate::error::{Result, TheoryError};
use crate::types::note::PitchClass;
use crate::types::roman_numeral::ScaleDegree;
use std::fmt;
use std::str::FromStr;

/// Semitone offsets of the major scale, degrees I..VII
pub const MAJOR_SCALE: [u8; 7] = [0, 2, 4, 5, 7, 9, 11];

/// Semitone offsets of the natural minor scale, degrees i..vii
pub const NATURAL_MINOR_SCALE: [u8; 7] = [0, 2, 3, 5, 7, 8, 10];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Mode {
    Major,
    Minor,
}

impl Mode {
    /// Diatonic offsets for this mode, indexed positionally by scale degree
    pub const fn scale_offsets(self) -> [u8; 7] {
        match self {
            Mode::Major => MAJOR_SCALE,
            Mode::Minor => NATURAL_MINOR_SCALE,
        }
    }
}

/// A key: root pitch class plus major/natural-minor mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tonality {
    pub root: PitchClass,
    pub mode: Mode,
}

impl Tonality {
    pub fn new(root: PitchClass, mode: Mode) -> Self {
        Tonality { root, mode }
    }

    /// Parse a tonality string. A trailing lowercase `m` selects natural minor.
    pub fn resolve(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let (root_part, mode) = match trimmed.strip_suffix('m') {
            Some(rest) => (rest.trim(), Mode::Minor),
            None => (trimmed, Mode::Major),
        };

        let root = PitchClass::from_name(root_part)
            .ok_or_else(|| TheoryError::UnresolvedTonality(input.to_string()))?;

        Ok(Tonality { root, mode })
    }

    /// Semitone offset of a degree within this key's own scale
    pub fn degree_offset(&self, degree: ScaleDegree) -> u8 {
        self.mode.scale_offsets()[degree.index()]
    }

    /// Root pitch class of a degree using the true diatonic offset
    pub fn degree_root(&self, degree: ScaleDegree) -> PitchClass {
        self.root.transpose(self.degree_offset(degree) as i32)
    }
}

impl FromStr for Tonality {
    type Err = TheoryError;

    fn from_str(s: &str) -> Result<Self> {
        Tonality::resolve(s)
    }
}

impl fmt::Display for Tonality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            Mode::Major => write!(f, "{}", self.root),
            Mode::Minor => write!(f, "{}m", self.root),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_major_and_minor() {
        let c = Tonality::resolve("C").unwrap();
        assert_eq!(c.root, PitchClass::C);
        assert_eq!(c.mode, Mode::Major);

        let am = Tonality::resolve("Am").unwrap();
        assert_eq!(am.root.value(), 9);
        assert_eq!(am.mode, Mode::Minor);

        let fsm = Tonality::resolve(" F#m ").unwrap();
        assert_eq!(fsm.root.value(), 6);
        assert_eq!(fsm.mode, Mode::Minor);

        let abm: Tonality = "Abm".parse().unwrap();
        assert_eq!(abm.root.value(), 8);
    }

    #[test]
    fn test_flat_and_sharp_spellings_accepted() {
        assert_eq!(Tonality::resolve("Eb").unwrap().root.value(), 3);
        assert_eq!(Tonality::resolve("D#").unwrap().root.value(), 3);
        assert_eq!(Tonality::resolve("Bbm").unwrap().root.value(), 10);
        assert_eq!(Tonality::resolve("Cb").unwrap().root.value(), 11);
    }

    #[test]
    fn test_unknown_root_is_rejected() {
        assert_eq!(
            Tonality::resolve("H"),
            Err(TheoryError::UnresolvedTonality("H".to_string()))
        );
        assert!(Tonality::resolve("").is_err());
        assert!(Tonality::resolve("m").is_err());
        // Upper-case M is not a mode marker
        assert!(Tonality::resolve("CM").is_err());
        assert!(Tonality::resolve("c").is_err());
    }

    #[test]
    fn test_scale_offsets() {
        assert_eq!(Mode::Major.scale_offsets(), [0, 2, 4, 5, 7, 9, 11]);
        assert_eq!(Mode::Minor.scale_offsets(), [0, 2, 3, 5, 7, 8, 10]);
    }

    #[test]
    fn test_degree_root_uses_key_scale() {
        let am = Tonality::resolve("Am").unwrap();
        // III in A minor is C
        assert_eq!(am.degree_root(ScaleDegree::III), PitchClass::C);
        let d = Tonality::resolve("D").unwrap();
        assert_eq!(d.degree_root(ScaleDegree::VII).sharp_name(), "C#");
    }

    #[test]
    fn test_display() {
        assert_eq!(Tonality::resolve("Ebm").unwrap().to_string(), "D#m");
        assert_eq!(Tonality::resolve("G").unwrap().to_string(), "G");
    }
}
